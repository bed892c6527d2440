//! Filesystem module.
//!
//! Provides:
//! - Archive tree layout (daily buckets, item folders)
//! - File naming inside item folders

pub mod naming;
pub mod paths;

pub use naming::{
    child_stem, file_name, find_completed, media_stem, sanitize_path_component,
    CAPTION_FILENAME, FALLBACK_EXTENSION, META_FILENAME, PART_SUFFIX,
};
pub use paths::{bucket_dir, check_write_permissions, ensure_dir, item_dir};
