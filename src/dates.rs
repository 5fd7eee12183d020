//! Best-effort normalization of feed publication dates.
//!
//! Google News emits RFC 2822 `pubDate`s, but feeds proxied from elsewhere
//! occasionally carry ISO 8601 or looser layouts. Anything we cannot read
//! becomes `None` and the raw string is kept on the article.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use tracing::debug;

/// Layouts that carry an explicit offset.
const OFFSET_LAYOUTS: [&str; 2] = ["%Y-%m-%d %H:%M:%S %z", "%d %b %Y %H:%M:%S %z"];

/// Layouts without an offset. These are interpreted as UTC.
const NAIVE_LAYOUTS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%a, %d %b %Y %H:%M:%S",
    "%d %b %Y %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Date-only layouts, taken as midnight UTC.
const DATE_LAYOUTS: [&str; 4] = ["%Y-%m-%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"];

/// Parse a feed date string, returning `None` when no known layout matches.
pub fn parse_published(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }
    for layout in OFFSET_LAYOUTS {
        if let Ok(dt) = DateTime::parse_from_str(raw, layout) {
            return Some(dt);
        }
    }
    for layout in NAIVE_LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, layout) {
            return Some(dt.and_utc().fixed_offset());
        }
    }
    for layout in DATE_LAYOUTS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, layout) {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc().fixed_offset());
        }
    }

    debug!(%raw, "Unrecognized publication date");
    None
}
