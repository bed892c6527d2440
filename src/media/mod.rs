//! Media module for item representation and parsing.

pub mod item;
pub mod parser;

pub use item::{parse_timestamp, ChildItem, MediaItem, MediaKind, Page};
pub use parser::{
    extension_from_content_type, extension_from_url, parse_child, parse_media_item,
};
