//! Configuration validation logic.
//!
//! Everything here runs before the first request is sent, so a bad page
//! size or a missing token never costs an API call.

use crate::config::loader::{Config, MAX_PAGE_SIZE};
use crate::error::{Error, Result};
use regex::Regex;

/// Minimum length for an access token.
const MIN_TOKEN_LENGTH: usize = 20;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_user_id(&config.account.user_id)?;
    validate_token(&config.account.access_token)?;
    validate_api_version(&config.api.version)?;
    validate_page_size(config.archive.page_size)?;
    validate_max_pages(config.archive.max_pages)?;

    if config.api.timeout_secs == 0 {
        return Err(Error::ConfigValidation {
            field: "timeout_secs".to_string(),
            message: "Request timeout must be at least one second".to_string(),
        });
    }

    if config.api.max_attempts == 0 || config.api.download_attempts == 0 {
        return Err(Error::ConfigValidation {
            field: "max_attempts".to_string(),
            message: "Attempt counts must be at least 1".to_string(),
        });
    }

    Ok(())
}

/// Validate the Instagram account id.
pub fn validate_user_id(user_id: &str) -> Result<()> {
    if user_id.is_empty() {
        return Err(Error::MissingConfig("IG_USER_ID".to_string()));
    }

    if !user_id.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::ConfigValidation {
            field: "user_id".to_string(),
            message: format!("Account id must be numeric (got '{}')", user_id),
        });
    }

    Ok(())
}

/// Validate the access token without ever echoing it back.
pub fn validate_token(token: &str) -> Result<()> {
    if token.is_empty() {
        return Err(Error::MissingConfig("IG_ACCESS_TOKEN".to_string()));
    }

    if token.len() < MIN_TOKEN_LENGTH {
        return Err(Error::ConfigValidation {
            field: "access_token".to_string(),
            message: format!(
                "Token must be at least {} characters (got {})",
                MIN_TOKEN_LENGTH,
                token.len()
            ),
        });
    }

    if token.chars().any(char::is_whitespace) {
        return Err(Error::ConfigValidation {
            field: "access_token".to_string(),
            message: "Token must not contain whitespace".to_string(),
        });
    }

    let token_lower = token.to_lowercase();
    if token_lower.contains("replaceme") || token_lower.contains("your_token") {
        return Err(Error::ConfigValidation {
            field: "access_token".to_string(),
            message: "Token appears to be a placeholder. Please provide your long-lived token."
                .to_string(),
        });
    }

    Ok(())
}

/// Validate the Graph API version segment, e.g. "v19.0".
pub fn validate_api_version(version: &str) -> Result<()> {
    let pattern = Regex::new(r"^v\d+\.\d+$")
        .map_err(|e| Error::Config(format!("Invalid version pattern: {}", e)))?;

    if !pattern.is_match(version) {
        return Err(Error::ConfigValidation {
            field: "api_version".to_string(),
            message: format!("Expected a version like 'v19.0' (got '{}')", version),
        });
    }

    Ok(())
}

/// Validate the listing page size against the API maximum.
pub fn validate_page_size(page_size: u32) -> Result<()> {
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(Error::ConfigValidation {
            field: "page_size".to_string(),
            message: format!(
                "Page size must be between 1 and {} (got {})",
                MAX_PAGE_SIZE, page_size
            ),
        });
    }

    Ok(())
}

/// Validate the optional page cap.
pub fn validate_max_pages(max_pages: Option<u32>) -> Result<()> {
    if max_pages == Some(0) {
        return Err(Error::ConfigValidation {
            field: "max_pages".to_string(),
            message: "Page cap must be at least 1 when set".to_string(),
        });
    }

    Ok(())
}
