//! JSON export of collected articles.
//!
//! The export is a pretty-printed array of [`ExportRecord`] objects:
//!
//! ```json
//! [
//!   {
//!     "title": "Exxon pushes back on scope 3 rules - Reuters",
//!     "link": "https://news.google.com/rss/articles/...",
//!     "source": "Reuters",
//!     "published": "2025-10-14T07:00:00+00:00",
//!     "keyword": "exxon scope 3"
//!   }
//! ]
//! ```

use tracing::{info, instrument};

use super::{ExportError, ExportRecord};

/// Serialize records as a JSON array.
#[instrument(level = "info", skip_all, fields(rows = records.len()))]
pub fn to_json(records: &[ExportRecord]) -> Result<String, ExportError> {
    let json = serde_json::to_string_pretty(records)?;
    info!(bytes = json.len(), "Rendered JSON export");
    Ok(json)
}

/// Read records back from a JSON export.
#[cfg(test)]
pub fn from_json(data: &str) -> Result<Vec<ExportRecord>, ExportError> {
    Ok(serde_json::from_str(data)?)
}
