//! # snapstory-dl
//!
//! Scrapes a public Snapchat user's story, highlight and spotlight media
//! from the embedded JSON payload of the public story page, normalizes the
//! heterogeneous records into one flat [`Snap`] shape, and downloads them
//! individually or in bulk.
//!
//! ```no_run
//! # async fn demo() -> snapstory_dl::Result<()> {
//! let result = snapstory_dl::fetch_stories("someuser").await?;
//! println!("{} snaps", result.all_snaps.len());
//!
//! let folder = std::path::Path::new("downloads");
//! snapstory_dl::download_all(&result.all_snaps, folder, None).await?;
//! # Ok(())
//! # }
//! ```

mod core;

pub use crate::core::bulk::{
    bulk_folder_name, snap_filename, BulkDownloader, BulkProgress, BulkProgressCallback,
};
pub use crate::core::downloader::{DownloadOptions, Downloader, ProgressCallback};
pub use crate::core::error::{Error, Result};
pub use crate::core::fetch::{impersonation_headers, MEDIA_TIMEOUT, PAGE_TIMEOUT};
pub use crate::core::model::{MediaType, Snap, SnapSource, StoryResult, UserProfile};
pub use crate::core::story::{StoryConfig, StoryService};

use std::path::Path;

/// Fetch and normalize everything publicly visible for a username, against
/// the public Snapchat endpoint.
pub async fn fetch_stories(username: &str) -> Result<StoryResult> {
    StoryService::new().fetch_stories(username).await
}

/// Stream one media URL to a destination path with default options.
pub async fn download(url: &str, dest: impl AsRef<Path>) -> Result<()> {
    Downloader::new()
        .download_to_file(url, dest.as_ref(), &DownloadOptions::default())
        .await
}

/// Download a list of snaps sequentially into an existing folder, emitting
/// one progress event per completed item.
pub async fn download_all(
    snaps: &[Snap],
    dest_folder: impl AsRef<Path>,
    progress: Option<BulkProgressCallback>,
) -> Result<()> {
    BulkDownloader::new()
        .download_all(snaps, dest_folder.as_ref(), progress)
        .await
}
