//! Path and directory management.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::fs::naming::sanitize_path_component;
use crate::media::MediaItem;

/// Daily bucket directory: `<root>/<YYYY-MM-DD>`.
pub fn bucket_dir(root: &Path, date: NaiveDate) -> PathBuf {
    root.join(date.format("%Y-%m-%d").to_string())
}

/// Item directory: `<root>/<YYYY-MM-DD>/<media_id>`.
pub fn item_dir(root: &Path, item: &MediaItem) -> Result<PathBuf> {
    let id = sanitize_path_component(&item.id)?;
    Ok(bucket_dir(root, item.bucket_date()).join(id))
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Verify the process can create and write files in `path`.
pub fn check_write_permissions(path: &Path) -> Result<()> {
    let probe = path.join(".write_test");
    let result = ensure_dir(path)
        .and_then(|_| std::fs::write(&probe, b"ok").map_err(Error::from))
        .and_then(|_| std::fs::remove_file(&probe).map_err(Error::from));

    result.map_err(|e| Error::Config(format!("Cannot write to {}: {}", path.display(), e)))
}
