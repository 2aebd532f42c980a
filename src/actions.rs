//! Action dispatch: the end of the list → select → act pipeline.
//!
//! ```text
//! store.list() ──▶ render ──▶ selector ──▶ parse_selection ──▶ open | delete
//!                                                              (y/N gate)
//! ```
//!
//! Every collaborator is passed in explicitly, so the whole pipeline runs in
//! tests against an [`InMemoryStore`](crate::store::InMemoryStore) and fake
//! selector, launcher and confirmer.

use anyhow::Result;

use crate::config::Config;
use crate::confirm::Confirmer;
use crate::error::BookmarkerError;
use crate::launcher::{LaunchResult, Launcher};
use crate::models::Bookmark;
use crate::render::{is_reversible, parse_selection, render_bookmarks, render_line};
use crate::selector::Selector;
use crate::store::BookmarkStore;
use crate::table;

/// What the user asked for on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Open,
    Delete,
    List,
}

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Opened { url: String, launch: LaunchResult },
    Deleted(Bookmark),
    /// The operator answered anything but `y` at the delete prompt.
    Declined(Bookmark),
    Listed(usize),
}

/// The external collaborators a run needs.
pub struct Collaborators<'a> {
    pub store: &'a dyn BookmarkStore,
    pub selector: &'a dyn Selector,
    pub launcher: &'a dyn Launcher,
    pub confirmer: &'a dyn Confirmer,
}

/// Fetch the collection and perform `action`.
pub async fn run_action(
    action: Action,
    config: &Config,
    deps: &Collaborators<'_>,
) -> Result<RunOutcome> {
    let bookmarks = deps.store.list().await?;
    log::debug!("{} bookmarks listed", bookmarks.len());

    match action {
        Action::List => {
            table::print_table(&bookmarks);
            Ok(RunOutcome::Listed(bookmarks.len()))
        }
        Action::Open => open_bookmark(&bookmarks, config, deps.selector, deps.launcher),
        Action::Delete => {
            delete_bookmark(&bookmarks, deps.store, deps.selector, deps.confirmer).await
        }
    }
}

/// Render `bookmarks`, let the user pick one and return its URL.
pub fn select_url(bookmarks: &[Bookmark], selector: &dyn Selector) -> Result<String> {
    for b in bookmarks.iter().filter(|b| !is_reversible(b)) {
        log::warn!(
            "bookmark {} may not be selectable: {}",
            b.id,
            render_line(b)
        );
    }

    let output = selector.select(&render_bookmarks(bookmarks))?;
    let url = parse_selection(&output)?;
    log::debug!("URL: '{}'", url);
    Ok(url)
}

/// First bookmark whose URL equals `url`.
pub fn find_by_url<'a>(bookmarks: &'a [Bookmark], url: &str) -> Option<&'a Bookmark> {
    bookmarks.iter().find(|b| b.url == url)
}

/// Select a bookmark and launch the configured browser on it.
pub fn open_bookmark(
    bookmarks: &[Bookmark],
    config: &Config,
    selector: &dyn Selector,
    launcher: &dyn Launcher,
) -> Result<RunOutcome> {
    let url = select_url(bookmarks, selector)?;
    let launch = launcher.launch(&config.browser, &[url.as_str()])?;
    log::info!("opened {} with {}", url, config.browser);
    Ok(RunOutcome::Opened { url, launch })
}

/// Select a bookmark and, after confirmation, delete it from the store.
pub async fn delete_bookmark(
    bookmarks: &[Bookmark],
    store: &dyn BookmarkStore,
    selector: &dyn Selector,
    confirmer: &dyn Confirmer,
) -> Result<RunOutcome> {
    let url = select_url(bookmarks, selector)?;
    let target = find_by_url(bookmarks, &url)
        .cloned()
        .ok_or_else(|| BookmarkerError::NotFound(url.clone()))?;

    println!("Will delete 「{}」.", target.title);
    if !confirmer.read_confirmation("Are you sure? (y/N)")? {
        log::debug!("delete of {} declined", target.id);
        return Ok(RunOutcome::Declined(target));
    }

    store.delete(&target.id).await?;
    Ok(RunOutcome::Deleted(target))
}
