//! # bookmarker
//!
//! A personal bookmark manager. Bookmarks (title, URL, creation time) live
//! in a Cloud Firestore collection; each run reads the whole collection,
//! hands a `[title](url)` rendering to an interactive filter, parses the
//! chosen line and opens the URL in a browser or deletes the bookmark.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   ┌──────────┐   ┌────────────┐   ┌─────────┐   ┌───────────────┐
//! │ Firestore │──▶│  render  │──▶│  selector  │──▶│  parse  │──▶│ open / delete │
//! │  (store)  │   │ [t](url) │   │ peco / fzf │   │ (url)   │   │ launcher, y/N │
//! └───────────┘   └──────────┘   └────────────┘   └─────────┘   └───────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration: location, defaults, editing |
//! | [`models`] | The [`Bookmark`](models::Bookmark) type |
//! | [`error`] | Error taxonomy |
//! | [`store`] | Store trait, Firestore REST client, in-memory store |
//! | [`render`] | `[title](url)` rendering and selection parsing |
//! | [`selector`] | External filter bridge |
//! | [`tui`] | Built-in terminal list view |
//! | [`launcher`] | Browser launching |
//! | [`confirm`] | Raw-terminal y/N confirmation |
//! | [`table`] | Tabular listing |
//! | [`actions`] | Action dispatch |
//! | [`logging`] | Logger setup |

pub mod actions;
pub mod config;
pub mod confirm;
pub mod error;
pub mod launcher;
pub mod logging;
pub mod models;
pub mod render;
pub mod selector;
pub mod store;
pub mod table;
pub mod tui;
