//! Bulk download orchestration for snapstory-dl
//!
//! Downloads a list of snaps into a destination folder one at a time.
//! Transfers are strictly serial: this bounds upstream load and keeps the
//! `(current, total)` progress sequence monotonic and gap-free. The run
//! aborts on the first failed item and surfaces that item's error; it does
//! not skip and continue.

use std::path::Path;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::core::downloader::{DownloadOptions, Downloader};
use crate::core::error::Result;
use crate::core::model::Snap;

/// One progress event, emitted after each completed item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkProgress {
    /// Items completed so far, 1-based
    pub current: usize,
    /// Items in the run
    pub total: usize,
}

/// Per-item progress callback for bulk runs
pub type BulkProgressCallback = Arc<dyn Fn(BulkProgress) + Send + Sync>;

/// Filename for the item at 0-based `index`: `{seq3}_{source}.{ext}` with a
/// 1-based zero-padded sequence
pub fn snap_filename(index: usize, snap: &Snap) -> String {
    format!(
        "{:03}_{}.{}",
        index + 1,
        snap.source.as_str(),
        snap.media_type.extension()
    )
}

/// Destination folder name convention: `{username}_stories_{epochMillis}`
pub fn bulk_folder_name(username: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("{username}_stories_{millis}")
}

/// Sequential bulk downloader
#[derive(Default)]
pub struct BulkDownloader {
    downloader: Downloader,
}

impl BulkDownloader {
    pub fn new() -> Self {
        Self {
            downloader: Downloader::new(),
        }
    }

    /// Download every snap into `dest_folder`, in input order.
    ///
    /// The folder must already exist; creating it (and revealing it
    /// afterwards) belongs to the caller. One progress event fires after
    /// each completed item, so on failure the last event reflects the last
    /// item that actually finished.
    pub async fn download_all(
        &self,
        snaps: &[Snap],
        dest_folder: &Path,
        progress: Option<BulkProgressCallback>,
    ) -> Result<()> {
        let total = snaps.len();
        log::info!("bulk download of {} snaps into {}", total, dest_folder.display());

        for (index, snap) in snaps.iter().enumerate() {
            let dest = dest_folder.join(snap_filename(index, snap));
            self.downloader
                .download_to_file(&snap.media_url, &dest, &DownloadOptions::default())
                .await?;

            if let Some(ref callback) = progress {
                callback(BulkProgress {
                    current: index + 1,
                    total,
                });
            }
        }

        Ok(())
    }
}
