//! Archive engine.
//!
//! This module provides:
//! - Pagination over the media listing
//! - Materializing items into folders
//! - Binary downloads with `.part` files
//! - Run orchestration and totals
//! - Interrupt handling between items

pub mod file;
pub mod interrupt;
pub mod materialize;
pub mod orchestrator;
pub mod stats;
pub mod walker;

pub use file::{download_to, FileOutcome};
pub use interrupt::install_interrupt_handler;
pub use materialize::{materialize, write_item, MaterializeResult, Outcome};
pub use orchestrator::{run_doctor, ArchiveSettings, Archiver};
pub use stats::RunSummary;
pub use walker::{MediaWalker, WalkEnd, WalkOptions};
