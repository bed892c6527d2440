//! Output module for console output and progress.
//!
//! Provides:
//! - Colored console output
//! - Download progress bars
//! - Run summary reporting

pub mod console;
pub mod progress;
pub mod stats;

pub use console::{
    print_banner, print_error, print_info, print_run_header, print_success, print_warning,
};
pub use progress::create_download_bar;
pub use stats::print_run_summary;
