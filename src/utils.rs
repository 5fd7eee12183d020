//! Utility functions for text cleanup, link checks and file naming.

use chrono::{DateTime, Utc};
use scraper::Html;

/// Truncate a string for logging purposes.
///
/// Long strings are cut at `max` bytes (on a character boundary) with an
/// ellipsis and byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Reduce an HTML snippet to its visible text with whitespace collapsed.
///
/// Google News descriptions are small HTML fragments (an anchor plus a
/// `<font>` tag naming the publisher).
pub fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// True for absolute `http` or `https` URLs, the only links rendered as
/// anchors. Feed links are untrusted and may carry `javascript:` or `data:`.
pub fn is_web_link(link: &str) -> bool {
    let link = link.trim_start();
    ["http://", "https://"].iter().any(|scheme| {
        link.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// Build a download file name like `rss_feed_20251014_073000.csv`.
pub fn export_filename(prefix: &str, at: DateTime<Utc>, extension: &str) -> String {
    format!("{}_{}.{}", prefix, at.format("%Y%m%d_%H%M%S"), extension)
}
