//! Command-line argument definitions using clap.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{Config, RunMode};

/// Instagram media archiver CLI.
#[derive(Parser, Debug)]
#[command(
    name = "ig-archive",
    version,
    about = "Archive your own Instagram media to a local folder tree",
    long_about = "Walks the media listing of one Instagram professional account and saves \
                  every post into <dir>/YYYY-MM-DD/<media id>/ with its metadata, caption \
                  and files.\n\nRe-running is safe: archived items are recorded in state.json \
                  and skipped."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (optional).
    #[arg(short, long, global = true, default_value = "ig-archive.toml")]
    pub config: PathBuf,

    /// Root directory of the archive.
    #[arg(short = 'd', long = "output-dir", global = true, env = "IG_ARCHIVE_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Log file path (defaults to <output-dir>/archive.log).
    #[arg(long, global = true, env = "IG_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Instagram professional account id.
    #[arg(long, global = true, env = "IG_USER_ID")]
    pub user_id: Option<String>,

    /// Long-lived access token.
    #[arg(long, global = true, env = "IG_ACCESS_TOKEN", hide_env_values = true, hide = true)]
    pub access_token: Option<String>,

    /// Graph API version, e.g. v19.0.
    #[arg(long, global = true, env = "IG_API_VERSION")]
    pub api_version: Option<String>,

    /// Hide download progress bars.
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Archive the whole listing, skipping what is already archived.
    Run(RunArgs),

    /// Archive older media in bounded chunks.
    Backfill(BackfillArgs),

    /// Retry items that were archived with missing files.
    Repair(WalkArgs),

    /// Check configuration, permissions and the access token.
    Doctor,

    /// Exchange a short-lived token for a long-lived one.
    ExchangeToken(ExchangeArgs),
}

/// Listing options shared by the walking commands.
#[derive(ClapArgs, Debug, Default)]
pub struct WalkArgs {
    /// Items per listing page (1-50).
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Stop after this many listing pages.
    #[arg(long)]
    pub max_pages: Option<u32>,
}

#[derive(ClapArgs, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub walk: WalkArgs,

    /// Stop at the newest item archived by a previous run.
    #[arg(long)]
    pub since_last: bool,
}

#[derive(ClapArgs, Debug)]
pub struct BackfillArgs {
    /// Items per listing page (1-50).
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Listing pages to walk in this chunk.
    #[arg(long)]
    pub max_pages: u32,
}

#[derive(ClapArgs, Debug)]
pub struct ExchangeArgs {
    /// Short-lived user access token.
    #[arg(long, env = "IG_SHORT_LIVED_TOKEN", hide_env_values = true)]
    pub short_token: String,

    /// Meta app id.
    #[arg(long, env = "IG_APP_ID")]
    pub app_id: String,

    /// Meta app secret.
    #[arg(long, env = "IG_APP_SECRET", hide_env_values = true)]
    pub app_secret: String,
}

impl Args {
    /// The run mode for walking commands, `None` for the others.
    pub fn run_mode(&self) -> Option<RunMode> {
        match &self.command {
            Command::Run(run) if run.since_last => Some(RunMode::SinceLast),
            Command::Run(_) => Some(RunMode::Full),
            Command::Backfill(_) => Some(RunMode::Backfill),
            Command::Repair(_) => Some(RunMode::Repair),
            Command::Doctor | Command::ExchangeToken(_) => None,
        }
    }

    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(user_id) = &self.user_id {
            config.account.user_id = user_id.clone();
        }

        if let Some(token) = &self.access_token {
            config.account.access_token = token.clone();
        }

        if let Some(version) = &self.api_version {
            config.api.version = version.clone();
        }

        if let Some(dir) = &self.output_dir {
            config.archive.output_dir = dir.clone();
        }

        if let Some(log_file) = &self.log_file {
            config.archive.log_file = Some(log_file.clone());
        }

        if self.quiet {
            config.archive.show_progress = false;
        }

        let (page_size, max_pages) = match &self.command {
            Command::Run(run) => (run.walk.page_size, run.walk.max_pages),
            Command::Repair(walk) => (walk.page_size, walk.max_pages),
            Command::Backfill(backfill) => (backfill.page_size, Some(backfill.max_pages)),
            Command::Doctor | Command::ExchangeToken(_) => (None, None),
        };

        if let Some(size) = page_size {
            config.archive.page_size = size;
        }

        if max_pages.is_some() {
            config.archive.max_pages = max_pages;
        }
    }
}
