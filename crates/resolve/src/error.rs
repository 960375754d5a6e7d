//! Resolution Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A resolution error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for resolution operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The index base URL can't be turned into a link pattern.
    #[display("invalid index base URL: {_0}")]
    InvalidIndex(#[error(not(source))] String),
    /// The HTTP client could not be constructed.
    #[display("could not initialise HTTP client")]
    HttpClient,
    /// The request never produced a response (DNS, TLS, connection, body).
    #[display("request failed: {_0}")]
    Transport(#[error(not(source))] String),
    /// The index answered with a non-success status.
    #[display("request for {url} returned status {status}")]
    Status { url: String, status: u16 },
    /// The release page doesn't have the expected structure.
    #[display("malformed release page for ID {_0}")]
    MalformedPage(#[error(not(source))] u64),
    /// The metadata store failed to read or write an entry.
    #[display("metadata store '{_0}' failed")]
    Store(#[error(not(source))] String),
    /// Scraped metadata could not be converted into a release record.
    #[display("release {id} has an invalid {field}")]
    InvalidRecord { id: u64, field: &'static str },
    /// The override file could not be read or written.
    #[display("override file unusable: {}", _0.display())]
    Overrides(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` for failures while retrieving release metadata.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Status { .. } | Self::MalformedPage(_) | Self::Store(_)
        )
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
