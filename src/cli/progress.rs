//! CLI-specific progress handling for snapstory-dl
//!
//! Provides the item-count progress bar for bulk downloads.

use indicatif::{ProgressBar, ProgressStyle};

/// Creates a progress bar counting completed snaps
pub fn create_progress_bar(total_items: u64) -> ProgressBar {
    let pb = ProgressBar::new(total_items);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} snaps ({percent}%) ETA: {eta}")
            .expect("Failed to create progress style")
            .progress_chars("#>-")
    );
    pb
}

/// Progress manager for bulk download runs
pub struct ProgressManager {
    pub pb: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_items: u64, message: &str) -> Self {
        let pb = create_progress_bar(total_items);

        // Print initial message to stderr
        eprintln!("{}", message);

        Self { pb }
    }
}
