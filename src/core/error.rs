//! Error types for snapstory-dl
//!
//! One typed error per failure condition in the pipeline; every operation
//! either succeeds with fully-populated data or fails with exactly one of
//! these kinds.

use std::fmt;

/// Main error type for snapstory-dl operations
#[derive(Debug)]
pub enum Error {
    /// A network call exceeded its deadline
    Timeout,

    /// Any other transport-level failure
    NetworkError(String),

    /// The data island is missing, unparseable, or an expected nested
    /// object is gone; the upstream page layout changed
    PageStructure(String),

    /// Upstream payload carries an explicit not-found sentinel
    UserNotFound(String),

    /// Page loaded but exposes no public profile object
    PrivateAccount(String),

    /// Profile found but zero snaps across all three categories
    NoContent(String),

    /// Local filesystem failure while writing a download
    IoError(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Timeout => {
                write!(f, "Request timed out")
            }
            Error::NetworkError(msg) => {
                write!(f, "Network error: {}", msg)
            }
            Error::PageStructure(msg) => {
                write!(
                    f,
                    "Could not load story data ({}). Snapchat may have changed their page",
                    msg
                )
            }
            Error::UserNotFound(username) => {
                write!(f, "User '{}' not found on Snapchat", username)
            }
            Error::PrivateAccount(username) => {
                write!(f, "The stories of '{}' are private", username)
            }
            Error::NoContent(username) => {
                write!(f, "No public stories found for '{}'", username)
            }
            Error::IoError(err) => {
                write!(f, "I/O error: {}", err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else {
            Error::NetworkError(err.to_string())
        }
    }
}

/// Convenience result type for snapstory-dl operations
pub type Result<T> = std::result::Result<T, Error>;
