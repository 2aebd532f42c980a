//! In-memory [`BookmarkStore`] for tests and dry runs.

use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;

use super::BookmarkStore;
use crate::error::BookmarkerError;
use crate::models::Bookmark;

/// Holds bookmarks in a `Vec` and records deletions.
pub struct InMemoryStore {
    bookmarks: RwLock<Vec<Bookmark>>,
    deleted: RwLock<Vec<String>>,
    order_by_created: bool,
}

impl InMemoryStore {
    pub fn new(bookmarks: Vec<Bookmark>) -> Self {
        Self {
            bookmarks: RwLock::new(bookmarks),
            deleted: RwLock::new(Vec::new()),
            order_by_created: false,
        }
    }

    /// List oldest first, like an ordered store query. Bookmarks without a
    /// creation time sort first; ties keep insertion order.
    pub fn ordered_by_created(mut self) -> Self {
        self.order_by_created = true;
        self
    }

    /// IDs deleted so far, in order.
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.read().unwrap().clone()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl BookmarkStore for InMemoryStore {
    async fn list(&self) -> Result<Vec<Bookmark>> {
        let mut bookmarks = self.bookmarks.read().unwrap().clone();
        if self.order_by_created {
            bookmarks.sort_by_key(|b| b.created_at);
        }
        Ok(bookmarks)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut bookmarks = self.bookmarks.write().unwrap();
        let before = bookmarks.len();
        bookmarks.retain(|b| b.id != id);
        if bookmarks.len() == before {
            return Err(BookmarkerError::StoreDelete(format!("no document '{}'", id)).into());
        }
        self.deleted.write().unwrap().push(id.to_string());
        Ok(())
    }
}
