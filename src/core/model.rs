//! Normalized entities produced by the scrape pipeline.
//!
//! Everything here is immutable once constructed; a fresh set is built per
//! `fetch_stories` call and discarded on the next search.

use serde::Serialize;

/// Provenance category of a snap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapSource {
    Story,
    Highlight,
    Spotlight,
}

impl SnapSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapSource::Story => "story",
            SnapSource::Highlight => "highlight",
            SnapSource::Spotlight => "spotlight",
        }
    }
}

/// Media kind, derived from the raw numeric media-type code (1 = video)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    /// File extension used when saving this media to disk
    pub fn extension(&self) -> &'static str {
        match self {
            MediaType::Image => "jpg",
            MediaType::Video => "mp4",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }
}

/// One normalized unit of media plus metadata
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snap {
    /// Stable identifier; falls back to the timestamp, then a generated
    /// token, when the source record lacks a native id. Best-effort unique.
    pub id: String,

    pub source: SnapSource,

    pub media_type: MediaType,

    /// Direct fetch URL; empty string when the upstream record omits it
    pub media_url: String,

    /// Preview image for video, identical to `media_url` for images
    pub thumbnail_url: String,

    /// Milliseconds since epoch, when the record carries one
    pub timestamp: Option<i64>,

    pub duration: Option<f64>,

    pub title: Option<String>,

    /// Title of the curated collection; highlight/spotlight snaps only
    pub collection_title: Option<String>,
}

/// Public profile of the searched account
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub subscriber_count: Option<u64>,
    pub bio: Option<String>,
}

/// Everything scraped for one username in one call.
///
/// `all_snaps` is always the concatenation `stories ++ highlights ++
/// spotlight`, in that order; consumers index into it relying on that.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryResult {
    pub user_profile: UserProfile,
    pub stories: Vec<Snap>,
    pub highlights: Vec<Snap>,
    pub spotlight: Vec<Snap>,
    pub all_snaps: Vec<Snap>,
}
