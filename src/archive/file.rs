//! Binary downloads into an item folder.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tokio::time::timeout;

use crate::api::{content_type, redact_url_str, GraphApi};
use crate::error::{Error, Result};
use crate::fs::{file_name, find_completed, FALLBACK_EXTENSION, PART_SUFFIX};
use crate::media::{extension_from_content_type, extension_from_url};
use crate::output::create_download_bar;

/// Minimum file size to show progress bar (20 MB).
const PROGRESS_THRESHOLD: u64 = 20 * 1024 * 1024;

/// Result of [`download_to`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Downloaded(PathBuf),
    /// A completed file with this stem was already on disk; no request made.
    AlreadyPresent(PathBuf),
}

/// Download `url` into `dir` as `<stem>.<ext>` unless it is already there.
///
/// The body streams into `<stem>.<ext>.part`, renamed once complete. The
/// extension comes from the URL path, then the Content-Type, then `bin`.
pub async fn download_to(
    api: &GraphApi,
    url: &str,
    dir: &Path,
    stem: &str,
    show_progress: bool,
) -> Result<FileOutcome> {
    if let Some(existing) = find_completed(dir, stem) {
        tracing::debug!("File {} already exists; skipping download", existing.display());
        return Ok(FileOutcome::AlreadyPresent(existing));
    }

    let response = api.download(url).await.map_err(|e| match e {
        Error::Download(_) => e,
        other => Error::Download(format!("{}: {}", stem, other)),
    })?;

    let extension = extension_from_url(url)
        .or_else(|| content_type(&response).and_then(|ct| extension_from_content_type(&ct)))
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string());
    let final_name = file_name(stem, &extension);
    let output_path = dir.join(&final_name);
    let part_path = dir.join(format!("{}.{}", final_name, PART_SUFFIX));

    let content_length = response.content_length();
    let progress = if show_progress && content_length.is_some_and(|l| l > PROGRESS_THRESHOLD) {
        Some(create_download_bar(content_length.unwrap_or(0)))
    } else {
        None
    };

    // Stream to file
    let mut file = File::create(&part_path).await?;
    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;

    let streamed: Result<()> = async {
        loop {
            let next = timeout(api.timeout(), stream.next()).await.map_err(|_| {
                Error::Download(format!(
                    "{}: stalled for {}s",
                    redact_url_str(url),
                    api.timeout().as_secs()
                ))
            })?;

            let Some(chunk) = next else { break };
            let chunk = chunk
                .map_err(|e| Error::Download(format!("Stream error: {}", e.without_url())))?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;

            if let Some(ref pb) = progress {
                pb.set_position(downloaded);
            }
        }
        file.flush().await?;
        Ok(())
    }
    .await;
    drop(file);

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    if let Err(e) = streamed {
        let _ = fs::remove_file(&part_path).await;
        return Err(e);
    }

    fs::rename(&part_path, &output_path).await?;
    tracing::info!("Downloaded {} -> {}", redact_url_str(url), output_path.display());

    Ok(FileOutcome::Downloaded(output_path))
}
