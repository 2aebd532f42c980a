//! Plain tabular listing for `bookmarker -l`.

use crate::models::Bookmark;

const TITLE_WIDTH: usize = 40;

/// Format bookmarks as an aligned table with a header row.
///
/// ```text
/// CREATED           TITLE                                    URL
/// 2019-05-01 10:00  The Rust Book                            https://doc.rust-lang.org/book/
/// ```
pub fn format_table(bookmarks: &[Bookmark]) -> String {
    let mut out = format!("{:<17} {:<width$} URL\n", "CREATED", "TITLE", width = TITLE_WIDTH);
    for b in bookmarks {
        let created = b
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:<17} {:<width$} {}\n",
            created,
            truncate(&b.title, TITLE_WIDTH),
            b.url,
            width = TITLE_WIDTH
        ));
    }
    out
}

pub fn print_table(bookmarks: &[Bookmark]) {
    print!("{}", format_table(bookmarks));
}

/// Shorten `s` to at most `max` characters, marking the cut with `…`.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
