//! Selection markup: rendering bookmarks into filter input and parsing the
//! chosen line back into a URL.
//!
//! Each bookmark becomes one line of bracket-and-parenthesis markup:
//!
//! ```text
//! [title](url)
//! ```
//!
//! No escaping is applied. The parser is line-anchored: it takes the last
//! line of the filter output and returns the **last** parenthesised group on
//! that line. Because a URL group is always the tail of its line, titles
//! containing `](`, `(` or `)` still resolve to the right URL. The markup
//! only breaks for URLs that contain parentheses themselves; see
//! [`is_reversible`].

use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;

use crate::error::BookmarkerError;
use crate::models::Bookmark;

/// Render bookmarks as filter input, one `[title](url)` line per bookmark,
/// in input order, each terminated by `\n`.
pub fn render_bookmarks(bookmarks: &[Bookmark]) -> String {
    let mut text = String::new();
    for b in bookmarks {
        text.push_str(&render_line(b));
        text.push('\n');
    }
    text
}

/// Render a single bookmark without the trailing newline.
pub fn render_line(bookmark: &Bookmark) -> String {
    format!("[{}]({})", bookmark.title, bookmark.url)
}

/// Whether a bookmark's rendered line parses back to exactly its URL.
pub fn is_reversible(bookmark: &Bookmark) -> bool {
    !bookmark.url.is_empty()
        && !bookmark.url.contains(['(', ')', '\n', '\r'])
        && !bookmark.title.contains(['\n', '\r'])
}

fn url_group() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(([^()]+)\)").expect("static regex is valid"))
}

/// Extract the URL from the filter's output.
///
/// Takes the last non-empty line of the trimmed output and returns the
/// content of the last `(...)` group on it.
///
/// # Errors
///
/// [`BookmarkerError::NoSelection`] for blank output,
/// [`BookmarkerError::MalformedSelection`] when the line has no group.
pub fn parse_selection(output: &str) -> Result<String> {
    let line = output
        .trim()
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or(BookmarkerError::NoSelection)?;

    url_group()
        .captures_iter(line)
        .last()
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| BookmarkerError::MalformedSelection(line.to_string()).into())
}
