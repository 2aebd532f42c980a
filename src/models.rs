//! Core data model.

use chrono::{DateTime, Utc};

/// A bookmark as read from the store.
///
/// Bookmarks are written by a separate tool; this crate only reads them and,
/// on request, deletes one by `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    /// Store-assigned document key (last segment of the document name).
    pub id: String,
    pub title: String,
    pub url: String,
    /// Assigned by the store at write time. Only used for ordering and display.
    pub created_at: Option<DateTime<Utc>>,
}

impl Bookmark {
    pub fn new(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
            created_at: None,
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}
