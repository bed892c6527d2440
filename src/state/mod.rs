//! Persistent archive state.
//!
//! Tracks which media ids have been archived so re-runs skip them, and the
//! newest id of the last completed run for `--since-last` walks.

pub mod store;
pub mod types;

pub use store::{JsonStateStore, LoadStatus, MemoryStateStore, StateStore, STATE_FILENAME};
pub use types::ArchiveState;
