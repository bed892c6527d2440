//! ig-archive - archive your own Instagram media to a local folder tree
//!
//! This library walks the media listing of one Instagram professional
//! account through the Graph API and materializes every item on disk.
//!
//! # Features
//!
//! - Cursor pagination with page caps and a since-last stop marker
//! - One folder per item with `meta.json`, `caption.txt` and media files
//! - Carousel children saved in order as `child_01`, `child_02`, ...
//! - Idempotent re-runs backed by an atomically saved `state.json`
//! - Retry with exponential backoff for 429 and 5xx responses
//! - Access tokens redacted from every logged URL
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use ig_archive::{ArchiveSettings, Archiver, Config, GraphApi, JsonStateStore, RunMode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("ig-archive.toml"))?;
//!     let api = GraphApi::new(&config)?;
//!     let store = JsonStateStore::in_dir(&config.archive.output_dir);
//!
//!     let archiver = Archiver::new(&api, store, ArchiveSettings::from_config(&config));
//!     let summary = archiver.run(RunMode::SinceLast).await?;
//!     println!("archived {} items", summary.items_written);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod media;
pub mod output;
pub mod state;

// Re-exports for convenience
pub use api::GraphApi;
pub use archive::{
    materialize, run_doctor, ArchiveSettings, Archiver, MediaWalker, RunSummary, WalkEnd,
    WalkOptions,
};
pub use config::{Config, RunMode};
pub use error::{Error, Result};
pub use media::{MediaItem, MediaKind};
pub use state::{ArchiveState, JsonStateStore, MemoryStateStore, StateStore};
