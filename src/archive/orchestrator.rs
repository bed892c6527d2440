//! Run orchestration: identity check, walk, materialize, checkpoint.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use tokio::time::sleep;

use crate::api::{GraphApi, Identity};
use crate::archive::materialize::{materialize, write_item, MaterializeResult, Outcome};
use crate::archive::stats::RunSummary;
use crate::archive::walker::{MediaWalker, WalkOptions};
use crate::config::{Config, RunMode};
use crate::error::Result;
use crate::fs::check_write_permissions;
use crate::media::MediaItem;
use crate::state::{ArchiveState, LoadStatus, StateStore};

/// Settings for one run, taken from the validated config.
#[derive(Debug, Clone)]
pub struct ArchiveSettings {
    pub account_id: String,
    pub output_root: PathBuf,
    pub page_size: u32,
    pub max_pages: Option<u32>,
    /// Average pause between archived items.
    pub item_delay: Duration,
    pub show_progress: bool,
}

impl ArchiveSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            account_id: config.account.user_id.clone(),
            output_root: config.archive.output_dir.clone(),
            page_size: config.archive.page_size,
            max_pages: config.archive.max_pages,
            item_delay: Duration::from_millis(config.archive.item_delay_ms),
            show_progress: config.archive.show_progress,
        }
    }
}

/// Owns the archive state for the duration of a run.
pub struct Archiver<'a, S: StateStore> {
    api: &'a GraphApi,
    store: S,
    settings: ArchiveSettings,
    interrupt: Arc<AtomicBool>,
}

impl<'a, S: StateStore> Archiver<'a, S> {
    pub fn new(api: &'a GraphApi, store: S, settings: ArchiveSettings) -> Self {
        Self {
            api,
            store,
            settings,
            interrupt: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Use `flag` to stop between items once it is set.
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = flag;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn interrupted(&self) -> bool {
        self.interrupt.load(Ordering::SeqCst)
    }

    /// Run one archive pass in `mode`.
    ///
    /// Fails before touching the archive if the identity check fails, and
    /// if the first listing page cannot be fetched. Later failures are
    /// counted in the summary.
    pub async fn run(&self, mode: RunMode) -> Result<RunSummary> {
        let identity = self.api.identity(&self.settings.account_id).await?;
        tracing::info!(
            "Access token validated for Instagram user {} (@{})",
            identity.id,
            identity.username.as_deref().unwrap_or("unknown")
        );

        let (mut state, status) = self.store.load();
        match status {
            LoadStatus::Missing => tracing::info!("No saved state; starting fresh"),
            LoadStatus::Loaded => tracing::info!(
                "Loaded state: {} processed, last archived media id: {}",
                state.processed_ids.len(),
                state.last_saved_media_id.as_deref().unwrap_or("<none>")
            ),
            LoadStatus::Recovered(_) => {
                tracing::warn!("Progress tracking was reset; existing files will still be kept")
            }
        }

        let stop_at = if mode.stops_at_marker() {
            if state.last_saved_media_id.is_none() {
                tracing::info!("No saved marker yet; walking the whole listing");
            }
            state.last_saved_media_id.clone()
        } else {
            None
        };

        let mut walker = MediaWalker::new(
            self.api,
            &self.settings.account_id,
            WalkOptions {
                page_size: self.settings.page_size,
                max_pages: self.settings.max_pages,
                stop_at,
            },
        )?;

        let mut summary = RunSummary::new(mode);
        let mut newest: Option<String> = None;

        'pages: loop {
            if self.interrupted() {
                summary.interrupted = true;
                break;
            }

            let page = match walker.next_page().await {
                Ok(Some(page)) => page,
                Ok(None) => break,
                Err(e) if walker.pages_fetched() == 0 || e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::warn!("Listing page failed, ending walk: {}", e);
                    summary.page_errors += 1;
                    break;
                }
            };

            summary.pages_fetched = walker.pages_fetched();
            summary.items_unreadable += page.unreadable;
            tracing::info!(
                "Fetched page {} with {} items.",
                summary.pages_fetched,
                page.items.len()
            );

            for item in &page.items {
                if self.interrupted() {
                    tracing::info!("Interrupted; stopping before media {}", item.id);
                    summary.interrupted = true;
                    break 'pages;
                }

                let result = self.archive_item(mode, item, &state).await;
                match result {
                    Ok(result) => {
                        summary.add_item(&result);
                        if result.outcome == Outcome::Written {
                            state.mark_processed(&item.id, result.is_complete());
                            state.touch(Utc::now());
                            self.store.save(&state)?;
                            self.pace().await;
                        }
                    }
                    Err(e) => {
                        summary.mark_item_failed();
                        tracing::warn!("Failed to archive media {}: {}", item.id, e);
                    }
                }

                // Newest item known to be on disk; anything newer that failed is
                // listed ahead of it and gets retried next run.
                if newest.is_none() && state.is_processed(&item.id) {
                    newest = Some(item.id.clone());
                }
            }
        }

        summary.walk_end = walker.end();

        if mode != RunMode::Repair && summary.completed() {
            if let Some(id) = newest {
                if state.last_saved_media_id.as_deref() != Some(id.as_str()) {
                    tracing::info!("Updated state marker to {}", id);
                    state.last_saved_media_id = Some(id);
                }
            }
        }

        state.touch(Utc::now());
        self.store.save(&state)?;

        Ok(summary)
    }

    async fn archive_item(
        &self,
        mode: RunMode,
        item: &MediaItem,
        state: &ArchiveState,
    ) -> Result<MaterializeResult> {
        let root = &self.settings.output_root;
        let show_progress = self.settings.show_progress;

        if mode == RunMode::Repair {
            if !state.is_partial(&item.id) {
                return Ok(MaterializeResult::skipped());
            }
            tracing::info!("Repairing media {}", item.id);
            return write_item(self.api, item, root, show_progress).await;
        }

        materialize(self.api, item, root, state, show_progress).await
    }

    async fn pace(&self) {
        let base = self.settings.item_delay.as_millis() as u64;
        if base == 0 {
            return;
        }
        let delay_ms = rand::thread_rng().gen_range(base / 2..=base + base / 2);
        sleep(Duration::from_millis(delay_ms)).await;
    }
}

/// Check write access and the token without archiving anything.
pub async fn run_doctor(api: &GraphApi, config: &Config) -> Result<Identity> {
    check_write_permissions(&config.archive.output_dir)?;
    let log_file = config.log_file();
    if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        check_write_permissions(parent)?;
    }

    let identity = api.identity(&config.account.user_id).await?;

    tracing::info!("IG_USER_ID present: {}", config.account.user_id);
    tracing::info!("Log file path: {}", log_file.display());
    tracing::info!(
        "Output directory writable: {}",
        config.archive.output_dir.display()
    );
    tracing::info!("Access token validated successfully.");

    Ok(identity)
}
