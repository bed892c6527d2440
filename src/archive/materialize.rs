//! Turning a listed media item into its folder on disk.

use std::path::Path;

use tokio::fs;

use crate::api::GraphApi;
use crate::archive::file::{download_to, FileOutcome};
use crate::error::Result;
use crate::fs::{child_stem, item_dir, media_stem, CAPTION_FILENAME, META_FILENAME};
use crate::media::{ChildItem, MediaItem};
use crate::state::ArchiveState;

/// Whether the item was archived in this call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    Written,
    /// Already in `processed_ids`; nothing fetched or written.
    Skipped,
}

/// Per-item counts.
///
/// The single file of an image/video item counts as one child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MaterializeResult {
    pub outcome: Outcome,
    pub children_downloaded: u32,
    /// Already on disk from an earlier, interrupted or partial, run.
    pub children_present: u32,
    pub children_failed: u32,
}

impl MaterializeResult {
    pub fn skipped() -> Self {
        Self {
            outcome: Outcome::Skipped,
            ..Default::default()
        }
    }

    /// No child download failed.
    pub fn is_complete(&self) -> bool {
        self.children_failed == 0
    }

    fn record(&mut self, stem: &str, result: Result<FileOutcome>) {
        match result {
            Ok(FileOutcome::Downloaded(_)) => self.children_downloaded += 1,
            Ok(FileOutcome::AlreadyPresent(_)) => self.children_present += 1,
            Err(e) => {
                tracing::warn!("Giving up on {}: {}", stem, e);
                self.children_failed += 1;
            }
        }
    }
}

/// Archive `item` under `output_root` unless the state already lists it.
///
/// The state is only read; recording the id is the caller's job.
pub async fn materialize(
    api: &GraphApi,
    item: &MediaItem,
    output_root: &Path,
    state: &ArchiveState,
    show_progress: bool,
) -> Result<MaterializeResult> {
    if state.is_processed(&item.id) {
        tracing::info!("Media {} already processed; skipping.", item.id);
        return Ok(MaterializeResult::skipped());
    }

    write_item(api, item, output_root, show_progress).await
}

/// Write the folder of `item` regardless of the state.
///
/// Metadata and caption are always rewritten; binaries already on disk are
/// kept. An error here means the item is incomplete and must not be
/// recorded as processed. Individual download failures are only counted.
pub async fn write_item(
    api: &GraphApi,
    item: &MediaItem,
    output_root: &Path,
    show_progress: bool,
) -> Result<MaterializeResult> {
    let dir = item_dir(output_root, item)?;
    fs::create_dir_all(&dir).await?;

    let meta = serde_json::to_string_pretty(&item.raw)?;
    fs::write(dir.join(META_FILENAME), meta).await?;
    fs::write(
        dir.join(CAPTION_FILENAME),
        item.caption.as_deref().unwrap_or_default(),
    )
    .await?;

    let mut result = MaterializeResult::default();

    if item.kind.is_carousel() {
        let children = resolve_children(api, item).await?;
        if children.is_empty() {
            tracing::warn!("Carousel {} has no children", item.id);
        } else {
            tracing::info!(
                "Archiving {} children for carousel {}",
                children.len(),
                item.id
            );
        }

        for (index, child) in children.iter().enumerate() {
            let stem = child_stem(index + 1);
            match child.url.as_deref() {
                Some(url) => {
                    let downloaded = download_to(api, url, &dir, &stem, show_progress).await;
                    result.record(&stem, downloaded);
                }
                None => {
                    tracing::warn!("Child {} has no downloadable URL; skipping.", child.id);
                    result.children_failed += 1;
                }
            }
        }
    } else {
        match item.download_url() {
            Some(url) => {
                let stem = media_stem();
                let downloaded = download_to(api, url, &dir, &stem, show_progress).await;
                result.record(&stem, downloaded);
            }
            None => {
                tracing::warn!(
                    "No media_url/thumbnail_url for {}; metadata saved only.",
                    item.id
                );
            }
        }
    }

    Ok(result)
}

/// Children embedded in the listing, or fetched from the children edge.
async fn resolve_children(api: &GraphApi, item: &MediaItem) -> Result<Vec<ChildItem>> {
    if !item.children.is_empty() {
        return Ok(item.children.clone());
    }

    tracing::info!("Fetching carousel children for {} via children edge", item.id);
    api.list_children(&item.id).await
}
