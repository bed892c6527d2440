//! File naming inside an item folder.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Raw payload file.
pub const META_FILENAME: &str = "meta.json";

/// Caption file. Always written, empty when the item has no caption.
pub const CAPTION_FILENAME: &str = "caption.txt";

/// Suffix of in-progress downloads.
pub const PART_SUFFIX: &str = "part";

/// Fallback extension when neither URL nor Content-Type gives one.
pub const FALLBACK_EXTENSION: &str = "bin";

/// Validate a remote id for use as a directory name.
///
/// Ids are rejected rather than rewritten, since rewriting could make two
/// ids share a folder.
pub fn sanitize_path_component(name: &str) -> Result<&str> {
    // Reject path traversal attempts
    if name == "." || name.contains("..") {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    if name.contains('/') || name.contains('\\') {
        return Err(Error::InvalidFilename(format!(
            "Path separators not allowed: '{}'",
            name
        )));
    }

    if name.contains('\0') || name.chars().any(char::is_control) {
        return Err(Error::InvalidFilename(format!(
            "Control characters not allowed: '{}'",
            name.escape_debug()
        )));
    }

    // Reject empty or whitespace-only names
    if name.trim().is_empty() {
        return Err(Error::InvalidFilename(
            "Path component cannot be empty or whitespace-only".to_string(),
        ));
    }

    Ok(name)
}

/// Stem of the single binary of an image/video item.
pub fn media_stem() -> String {
    "media_01".to_string()
}

/// Stem of the carousel child at 1-based `index`.
pub fn child_stem(index: usize) -> String {
    format!("child_{:02}", index)
}

/// Join a stem and an extension.
pub fn file_name(stem: &str, extension: &str) -> String {
    format!("{}.{}", stem, extension)
}

/// Find a completed, non-empty file named `<stem>` or `<stem>.<ext>` in
/// `dir`. In-progress `.part` files never match.
pub fn find_completed(dir: &Path, stem: &str) -> Option<PathBuf> {
    let entries = std::fs::read_dir(dir).ok()?;

    entries.filter_map(|e| e.ok()).map(|e| e.path()).find(|path| {
        let matches_stem = path.file_stem().and_then(|s| s.to_str()) == Some(stem)
            || path.file_name().and_then(|s| s.to_str()) == Some(stem);
        let is_part = path.extension().and_then(|e| e.to_str()) == Some(PART_SUFFIX);
        let non_empty = std::fs::metadata(path)
            .map(|m| m.is_file() && m.len() > 0)
            .unwrap_or(false);

        matches_stem && !is_part && non_empty
    })
}
