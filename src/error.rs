//! Error taxonomy for a bookmarker run.
//!
//! Module functions return [`anyhow::Result`]; failures that callers (and
//! tests) need to tell apart are raised as a [`BookmarkerError`] and can be
//! recovered with `err.downcast_ref::<BookmarkerError>()`.

use std::fmt;

/// Fatal errors of a bookmarker run. Every variant aborts the run with exit code 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookmarkerError {
    /// Config file missing, unreadable, unparsable or missing a required key.
    Config(String),
    /// Service-account key unreadable or token exchange rejected.
    Auth(String),
    /// The store could not be reached.
    StoreConnect(String),
    /// Listing the collection failed; partial results are discarded.
    StoreRead(String),
    /// Deleting a document failed.
    StoreDelete(String),
    /// The filter command could not be started or exited abnormally.
    FilterExecution(String),
    /// The selector returned nothing (the user aborted the selection).
    NoSelection,
    /// The selected line carries no `(url)` group.
    MalformedSelection(String),
    /// No bookmark in the listing has the selected URL.
    NotFound(String),
    /// The browser could not be launched or exited abnormally.
    Launch(String),
    /// Reading the confirmation key from the terminal failed.
    Confirmation(String),
}

impl fmt::Display for BookmarkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookmarkerError::Config(msg) => write!(f, "config error: {}", msg),
            BookmarkerError::Auth(msg) => write!(f, "authentication failed: {}", msg),
            BookmarkerError::StoreConnect(msg) => write!(f, "failed to reach store: {}", msg),
            BookmarkerError::StoreRead(msg) => write!(f, "failed to iterate: {}", msg),
            BookmarkerError::StoreDelete(msg) => write!(f, "failed to delete bookmark: {}", msg),
            BookmarkerError::FilterExecution(msg) => write!(f, "filter command failed: {}", msg),
            BookmarkerError::NoSelection => write!(f, "no bookmark selected"),
            BookmarkerError::MalformedSelection(line) => {
                write!(f, "no URL found in selection: '{}'", line)
            }
            BookmarkerError::NotFound(url) => write!(f, "no bookmark with URL: {}", url),
            BookmarkerError::Launch(msg) => write!(f, "failed to launch browser: {}", msg),
            BookmarkerError::Confirmation(msg) => {
                write!(f, "failed to read confirmation: {}", msg)
            }
        }
    }
}

impl std::error::Error for BookmarkerError {}

/// Extract the [`BookmarkerError`] behind an [`anyhow::Error`], if any.
pub fn kind(err: &anyhow::Error) -> Option<&BookmarkerError> {
    err.chain().find_map(|e| e.downcast_ref::<BookmarkerError>())
}
