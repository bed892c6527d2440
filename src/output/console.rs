//! Console output utilities.

use std::path::Path;

use console::style;

use crate::config::RunMode;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     ig-archive                                        ║
║     Local archive of your Instagram media             ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print what this run is about to do.
pub fn print_run_header(user_id: &str, mode: RunMode, output_dir: &Path, max_pages: Option<u32>) {
    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Account:   {}", user_id);
    println!("  Mode:      {}", mode);
    println!("  Directory: {}", output_dir.display());
    if let Some(max) = max_pages {
        println!("  Max pages: {}", max);
    }
    println!();
}
