//! Output generation for article downloads and the dashboard pages.
//!
//! # Submodules
//!
//! - [`csv`]: spreadsheet-friendly export
//! - [`json`]: array-of-records export
//! - [`html`]: server-rendered dashboard and filter pages
//!
//! Both download formats share the [`ExportRecord`] shape:
//!
//! | Column | Content |
//! |--------|---------|
//! | `title` | Feed item title |
//! | `link` | Article URL |
//! | `source` | Publisher |
//! | `published` | RFC 3339 date, or the raw feed string when it could not be parsed |
//! | `keyword` | Keyword that produced the item |

pub mod csv;
pub mod html;
pub mod json;

use crate::models::Article;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name prefix for a full collection download.
pub const COLLECTION_PREFIX: &str = "rss_feed";
/// File name prefix for a filtered download.
pub const FILTERED_PREFIX: &str = "filtered_results";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("CSV buffer error: {0}")]
    Buffer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Export is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// One exported row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct ExportRecord {
    pub title: String,
    pub link: String,
    pub source: String,
    pub published: String,
    pub keyword: String,
}

impl From<&Article> for ExportRecord {
    fn from(article: &Article) -> Self {
        let published = match article.published_date {
            Some(date) => date.to_rfc3339(),
            None => article.published.clone(),
        };
        Self {
            title: article.title.clone(),
            link: article.link.clone(),
            source: article.source.clone(),
            published,
            keyword: article.keyword.clone(),
        }
    }
}

/// Convert articles into export rows, preserving order.
pub fn records<'a, I>(articles: I) -> Vec<ExportRecord>
where
    I: IntoIterator<Item = &'a Article>,
{
    articles.into_iter().map(ExportRecord::from).collect()
}
