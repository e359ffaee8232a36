//! Core library modules for snapstory-dl
//!
//! This module contains the internal implementation details of the
//! snapstory-dl library.

pub mod bulk;
pub mod downloader;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod model;
pub mod normalize;
pub mod story;

// Re-export main types for internal use
pub use downloader::Downloader;
pub use story::{StoryConfig, StoryService};
