//! Instagram Graph API module.
//!
//! This module provides:
//! - HTTP client with timeout, retry and backoff
//! - Retry strategy functions
//! - Token redaction for logged URLs
//! - API response types

pub mod client;
pub mod redact;
pub mod retry;
pub mod types;

pub use client::{content_type, GraphApi, CHILDREN_FIELDS, MEDIA_FIELDS};
pub use redact::{redact_params, redact_url, redact_url_str, REDACTED};
pub use retry::{classify_status, should_retry_for_status, RetryAction, RetryPolicy, StatusClass};
pub use types::*;
