//! Configuration module for ig-archive.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Run mode definitions
//! - Configuration validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{
    AccountConfig, ApiConfig, ArchiveConfig, Config, DEFAULT_API_VERSION, DEFAULT_ARCHIVE_DIR,
    DEFAULT_BASE_URL, MAX_PAGE_SIZE,
};
pub use modes::RunMode;
pub use validation::{validate_config, validate_page_size};
