//! Single-file media download for snapstory-dl
//!
//! Streams a remote media URL straight to a destination path without
//! buffering the whole payload in memory. Used for one-off downloads and by
//! the bulk orchestrator.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use futures::TryStreamExt;
use tokio::io::AsyncWriteExt;

use crate::core::error::{Error, Result};
use crate::core::fetch::{http_client, MEDIA_TIMEOUT};

/// Byte-level progress callback: (bytes downloaded, total bytes or 0)
pub type ProgressCallback = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// Options for download operations
pub struct DownloadOptions {
    /// Optional progress callback
    pub progress: Option<ProgressCallback>,

    /// Hard deadline for the whole transfer
    pub timeout: Duration,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            progress: None,
            timeout: MEDIA_TIMEOUT,
        }
    }
}

/// Streams remote media to local files using the shared impersonation client
#[derive(Default)]
pub struct Downloader;

impl Downloader {
    pub fn new() -> Self {
        Self
    }

    /// Stream `url` to `dest`.
    ///
    /// The caller owns directory creation. Read-side failures surface as
    /// `Timeout`/`NetworkError`, write-side failures as `IoError`; the
    /// operation fails on whichever fires first.
    pub async fn download_to_file(
        &self,
        url: &str,
        dest: &Path,
        options: &DownloadOptions,
    ) -> Result<()> {
        log::debug!("downloading {} -> {}", url, dest.display());

        let response = http_client()
            .get(url)
            .timeout(options.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::NetworkError(format!(
                "media request failed with HTTP {status}"
            )));
        }

        let total_size = response.content_length().unwrap_or(0);
        let mut file = tokio::fs::File::create(dest).await.map_err(Error::IoError)?;

        let mut stream = response.bytes_stream();
        let mut downloaded = 0u64;

        while let Some(chunk) = stream.try_next().await? {
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;

            if let Some(ref progress) = options.progress {
                progress(downloaded, total_size);
            }
        }

        file.flush().await?;
        log::debug!("downloaded {downloaded} bytes to {}", dest.display());
        Ok(())
    }
}
