//! Data models for collected feed entries and the summaries built from them.
//!
//! - [`Article`]: one normalized entry from a Google News feed
//! - [`Collection`]: the de-duplicated result of one "collect" action
//! - [`KeywordFailure`]: a keyword whose feed could not be fetched or parsed
//! - [`Summary`]: headline numbers shown on the dashboard

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Source label used when a feed entry carries no `<source>` element.
pub const UNKNOWN_SOURCE: &str = "Unknown";

/// Number of entries listed under "Recent Articles".
pub const RECENT_ARTICLES: usize = 20;

/// A single news entry extracted from a keyword's feed.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Article {
    /// The keyword whose search feed produced this entry.
    pub keyword: String,
    pub title: String,
    /// Article URL. Used as the identity of an entry across keywords.
    pub link: String,
    /// Publisher name taken from the feed's `<source>` element.
    pub source: String,
    /// The raw `<pubDate>` text, kept verbatim for display.
    pub published: String,
    /// Best-effort parse of `published`. `None` when the string was missing
    /// or in a layout we do not understand.
    pub published_date: Option<DateTime<FixedOffset>>,
    /// Plain-text snippet with the feed's HTML markup removed.
    pub description: String,
}

/// A keyword that was skipped during collection, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordFailure {
    pub keyword: String,
    pub error: String,
}

/// Outcome of collecting all keywords once.
#[derive(Debug, Clone, Serialize)]
pub struct Collection {
    pub articles: Vec<Article>,
    pub collected_at: DateTime<Utc>,
    pub keywords_used: Vec<String>,
    pub failures: Vec<KeywordFailure>,
}

/// Article count for a single keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: usize,
}

/// Headline numbers for a [`Collection`].
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_articles: usize,
    pub keywords_searched: usize,
    pub unique_sources: usize,
    /// Ordered by count descending, ties broken alphabetically.
    pub by_keyword: Vec<KeywordCount>,
}

impl Collection {
    pub fn summary(&self) -> Summary {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for article in &self.articles {
            *counts.entry(article.keyword.as_str()).or_default() += 1;
        }
        let mut by_keyword: Vec<KeywordCount> = counts
            .into_iter()
            .map(|(keyword, count)| KeywordCount {
                keyword: keyword.to_string(),
                count,
            })
            .collect();
        // BTreeMap already yields keywords alphabetically; a stable sort keeps that for ties
        by_keyword.sort_by(|a, b| b.count.cmp(&a.count));

        let unique_sources = self
            .articles
            .iter()
            .map(|a| a.source.as_str())
            .collect::<HashSet<_>>()
            .len();

        Summary {
            total_articles: self.articles.len(),
            keywords_searched: self.keywords_used.len(),
            unique_sources,
            by_keyword,
        }
    }

    /// The first [`RECENT_ARTICLES`] entries in collection order.
    pub fn recent(&self) -> &[Article] {
        let end = self.articles.len().min(RECENT_ARTICLES);
        &self.articles[..end]
    }
}
