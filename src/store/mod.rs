//! Bookmark storage.
//!
//! The [`BookmarkStore`] trait is the only view the rest of the crate has of
//! the hosted document database: read the whole collection, delete one
//! document. [`firestore::FirestoreStore`] talks to Cloud Firestore over its
//! REST API; [`memory::InMemoryStore`] backs tests.

pub mod auth;
pub mod firestore;
pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::Bookmark;

pub use firestore::FirestoreStore;
pub use memory::InMemoryStore;

#[async_trait]
pub trait BookmarkStore: Send + Sync {
    /// Read every bookmark in the collection. Fails as a whole if any
    /// document cannot be read or decoded.
    async fn list(&self) -> Result<Vec<Bookmark>>;

    /// Delete the bookmark document with store identifier `id`.
    async fn delete(&self, id: &str) -> Result<()>;
}
