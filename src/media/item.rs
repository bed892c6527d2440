//! Media item representation.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use crate::error::{Error, Result};

/// Kind of a media item or carousel child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Carousel,
    /// Any kind the archive does not know; downloaded like a single file.
    Other(String),
}

impl MediaKind {
    /// Parse the API `media_type` value.
    pub fn from_api(value: &str) -> Self {
        match value {
            "IMAGE" => MediaKind::Image,
            "VIDEO" | "REELS" => MediaKind::Video,
            "CAROUSEL_ALBUM" => MediaKind::Carousel,
            other => MediaKind::Other(other.to_string()),
        }
    }

    pub fn is_carousel(&self) -> bool {
        matches!(self, MediaKind::Carousel)
    }
}

/// A carousel child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildItem {
    pub id: String,
    pub kind: MediaKind,
    /// Download URL (`media_url`, falling back to `thumbnail_url`).
    pub url: Option<String>,
}

/// A listed media item.
#[derive(Debug, Clone)]
pub struct MediaItem {
    /// Unique media ID.
    pub id: String,

    /// Creation time.
    pub timestamp: DateTime<Utc>,

    pub kind: MediaKind,

    pub caption: Option<String>,

    pub permalink: Option<String>,

    pub media_url: Option<String>,

    pub thumbnail_url: Option<String>,

    /// Children embedded in the listing payload, in API order. Empty when
    /// the listing did not include them.
    pub children: Vec<ChildItem>,

    /// Full API payload, kept verbatim for `meta.json`.
    pub raw: Value,
}

impl MediaItem {
    /// URL of the single binary for image/video items.
    pub fn download_url(&self) -> Option<&str> {
        self.media_url
            .as_deref()
            .or(self.thumbnail_url.as_deref())
    }

    /// Daily bucket date (UTC).
    pub fn bucket_date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// A batch of listed items plus the cursor of the next batch.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub items: Vec<MediaItem>,
    /// Absent on the last page.
    pub next_cursor: Option<String>,
    /// Listed entries that could not be parsed and were left out of `items`.
    pub unreadable: u32,
}

/// Parse an API timestamp.
///
/// The Graph API writes offsets without a colon (`+0000`), which RFC 3339
/// parsing rejects, so both forms are accepted.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%.f%z"] {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    Err(Error::Media(format!("Invalid timestamp format: {}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_graph_timestamp() {
        let dt = parse_timestamp("2024-01-15T23:30:00+0000").unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.day(), 15);

        let dt = parse_timestamp("2024-01-15T23:30:00Z").unwrap();
        assert_eq!(dt.day(), 15);
    }

    #[test]
    fn test_offset_normalized_to_utc_date() {
        // 01:30 at +02:00 is still the previous day in UTC.
        let dt = parse_timestamp("2024-03-02T01:30:00+0200").unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_invalid_timestamp() {
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_media_kind_from_api() {
        assert_eq!(MediaKind::from_api("IMAGE"), MediaKind::Image);
        assert_eq!(MediaKind::from_api("VIDEO"), MediaKind::Video);
        assert!(MediaKind::from_api("CAROUSEL_ALBUM").is_carousel());
        assert_eq!(
            MediaKind::from_api("STORY"),
            MediaKind::Other("STORY".to_string())
        );
    }
}
