//! Configuration structures and loading logic.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default Graph API host.
pub const DEFAULT_BASE_URL: &str = "https://graph.facebook.com";

/// Default Graph API version.
pub const DEFAULT_API_VERSION: &str = "v19.0";

/// Default archive directory, relative to the working directory.
pub const DEFAULT_ARCHIVE_DIR: &str = "InstagramArchive";

/// Maximum page size accepted by the media listing endpoint.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub account: AccountConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub archive: ArchiveConfig,
}

/// Account credentials configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Instagram professional account id.
    #[serde(default)]
    pub user_id: String,

    /// Long-lived user access token.
    #[serde(default)]
    pub access_token: String,
}

/// Remote API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Graph API host, without version.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Graph API version path segment (e.g. "v19.0").
    #[serde(default = "default_api_version")]
    pub version: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Attempts for API calls (initial request included).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Attempts for binary downloads (initial request included).
    #[serde(default = "default_download_attempts")]
    pub download_attempts: u32,

    /// Backoff delay before the first retry, doubled on each further retry.
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Upper bound for a single backoff delay.
    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            version: default_api_version(),
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            download_attempts: default_download_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
            backoff_max_ms: default_backoff_max_ms(),
        }
    }
}

/// Archive layout and walk options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Root of the archive tree. State lives at `<output_dir>/state.json`.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Items requested per listing page (1..=50).
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Optional cap on listing pages fetched per run.
    #[serde(default)]
    pub max_pages: Option<u32>,

    /// Log file path. Defaults to `<output_dir>/archive.log`.
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Average pause between items in milliseconds (jittered). 0 disables.
    #[serde(default = "default_item_delay_ms")]
    pub item_delay_ms: u64,

    /// Whether to show progress bars for large downloads.
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            page_size: default_page_size(),
            max_pages: None,
            log_file: None,
            item_delay_ms: default_item_delay_ms(),
            show_progress: true,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    5
}

fn default_download_attempts() -> u32 {
    3
}

fn default_backoff_base_ms() -> u64 {
    1_000
}

fn default_backoff_max_ms() -> u64 {
    32_000
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_ARCHIVE_DIR)
}

fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}

fn default_item_delay_ms() -> u64 {
    500
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Effective log file path.
    pub fn log_file(&self) -> PathBuf {
        self.archive
            .log_file
            .clone()
            .unwrap_or_else(|| self.archive.output_dir.join("archive.log"))
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [account]
            user_id = "17841400000000000"

            [archive]
            page_size = 25
            "#,
        )
        .unwrap();

        assert_eq!(config.account.user_id, "17841400000000000");
        assert_eq!(config.archive.page_size, 25);
        assert_eq!(config.api.version, DEFAULT_API_VERSION);
        assert_eq!(config.api.max_attempts, 5);
        assert_eq!(config.archive.max_pages, None);
    }

    #[test]
    fn test_log_file_defaults_under_output_dir() {
        let mut config = Config::default();
        config.archive.output_dir = PathBuf::from("/archive");
        assert_eq!(config.log_file(), PathBuf::from("/archive/archive.log"));

        config.archive.log_file = Some(PathBuf::from("/var/log/ig.log"));
        assert_eq!(config.log_file(), PathBuf::from("/var/log/ig.log"));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = Config::load(Path::new("/nonexistent/ig-archive.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
