//! Story fetching orchestration for snapstory-dl
//!
//! Composes fetch → extract → normalize into the one call the surrounding
//! shell makes. Single attempt, fail fast: any stage's error propagates
//! unchanged; retry is a caller policy, not core behavior.

use serde_json::Value;

use crate::core::error::Result;
use crate::core::extract::extract_next_data;
use crate::core::fetch::fetch_story_page;
use crate::core::model::StoryResult;
use crate::core::normalize::normalize;

/// Configuration for the story scrape
pub struct StoryConfig {
    /// Base URL for public story pages; `{username}` is appended
    pub story_base_url: String,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            story_base_url: "https://story.snapchat.com/s".to_string(),
        }
    }
}

/// The sole public entry point of the scrape pipeline
pub struct StoryService {
    config: StoryConfig,
}

impl Default for StoryService {
    fn default() -> Self {
        Self::new()
    }
}

impl StoryService {
    /// Create a service against the public Snapchat endpoint
    pub fn new() -> Self {
        Self {
            config: StoryConfig::default(),
        }
    }

    /// Create a service with a custom configuration
    pub fn with_config(config: StoryConfig) -> Self {
        Self { config }
    }

    /// Fetch and normalize everything publicly visible for a username.
    ///
    /// `username` is trusted to be trimmed and non-empty; validation is the
    /// caller's responsibility.
    pub async fn fetch_stories(&self, username: &str) -> Result<StoryResult> {
        log::info!("fetching stories for '{username}'");
        let html = fetch_story_page(&self.config.story_base_url, username).await?;
        let next_data: Value = extract_next_data(&html)?;
        normalize(&next_data, username)
    }
}
