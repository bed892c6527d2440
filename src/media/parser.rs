//! Media parsing utilities.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::media::item::{parse_timestamp, ChildItem, MediaItem, MediaKind};

fn str_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse a listing entry into a MediaItem, keeping the payload verbatim.
pub fn parse_media_item(value: Value) -> Result<MediaItem> {
    let id = str_field(&value, "id")
        .ok_or_else(|| Error::Media("Media entry without id".to_string()))?;

    let timestamp = str_field(&value, "timestamp")
        .ok_or_else(|| Error::Media(format!("Media {} has no timestamp", id)))?;
    let timestamp = parse_timestamp(&timestamp)?;

    let kind = str_field(&value, "media_type")
        .map(|t| MediaKind::from_api(&t))
        .unwrap_or_else(|| MediaKind::Other("UNKNOWN".to_string()));

    let children = value
        .get("children")
        .and_then(|c| c.get("data"))
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(parse_child).collect())
        .unwrap_or_default();

    Ok(MediaItem {
        id,
        timestamp,
        kind,
        caption: value
            .get("caption")
            .and_then(Value::as_str)
            .map(str::to_string),
        permalink: str_field(&value, "permalink"),
        media_url: str_field(&value, "media_url"),
        thumbnail_url: str_field(&value, "thumbnail_url"),
        children,
        raw: value,
    })
}

/// Parse a carousel child entry. Entries without an id are dropped.
pub fn parse_child(value: &Value) -> Option<ChildItem> {
    let id = str_field(value, "id")?;
    let kind = str_field(value, "media_type")
        .map(|t| MediaKind::from_api(&t))
        .unwrap_or_else(|| MediaKind::Other("UNKNOWN".to_string()));
    let url = str_field(value, "media_url").or_else(|| str_field(value, "thumbnail_url"));

    Some(ChildItem { id, kind, url })
}

/// Extract the file extension from a URL path, lowercased and without dot.
pub fn extension_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let filename = parsed.path_segments()?.next_back()?;
    let (stem, ext) = filename.rsplit_once('.')?;

    // Validate it looks like an extension (1-10 chars, alphanumeric)
    if !stem.is_empty()
        && !ext.is_empty()
        && ext.len() <= 10
        && ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        Some(ext.to_lowercase())
    } else {
        None
    }
}

/// Convert a Content-Type header value to a file extension.
pub fn extension_from_content_type(content_type: &str) -> Option<String> {
    let essence = content_type.split(';').next()?.trim();
    match essence {
        // mime_guess lists "jpe" first for image/jpeg
        "image/jpeg" => Some("jpg".to_string()),
        "video/mp4" => Some("mp4".to_string()),
        _ => mime_guess::get_mime_extensions_str(essence)
            .and_then(|exts| exts.first())
            .map(|ext| ext.to_string()),
    }
}
