//! Compound filters over a collected article list.
//!
//! All active conditions must hold for an article to be kept:
//!
//! - **Date range**: inclusive on calendar days. An article's day is its
//!   publication date in the offset the feed reported, so an article stamped
//!   `23:30 -0500` counts for that evening, not the following UTC day.
//! - **Search**: case-insensitive substring of the title or description.
//! - **Keywords / sources**: membership; an empty list means no restriction.

use crate::models::Article;
use chrono::{Duration, NaiveDate};
use itertools::Itertools;
use serde::Serialize;
use std::collections::HashSet;

/// How far back the date pickers reach when no article carries a date.
const FALLBACK_DAYS: i64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArticleFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub search: Option<String>,
    pub keywords: Vec<String>,
    pub sources: Vec<String>,
    /// Keep articles whose date could not be parsed even when a date
    /// bound is set.
    pub include_undated: bool,
}

impl ArticleFilter {
    pub fn matches(&self, article: &Article) -> bool {
        self.matches_date(article)
            && self.matches_search(article)
            && (self.keywords.is_empty() || self.keywords.contains(&article.keyword))
            && (self.sources.is_empty() || self.sources.contains(&article.source))
    }

    pub fn apply<'a>(&self, articles: &'a [Article]) -> Vec<&'a Article> {
        articles.iter().filter(|a| self.matches(a)).collect()
    }

    /// True when no condition is set and every article would pass.
    pub fn is_empty(&self) -> bool {
        self.start.is_none()
            && self.end.is_none()
            && self.search.as_deref().is_none_or(|s| s.trim().is_empty())
            && self.keywords.is_empty()
            && self.sources.is_empty()
    }

    fn matches_date(&self, article: &Article) -> bool {
        if self.start.is_none() && self.end.is_none() {
            return true;
        }
        let Some(published) = article.published_date else {
            return self.include_undated;
        };
        let day = published.date_naive();
        self.start.is_none_or(|start| day >= start) && self.end.is_none_or(|end| day <= end)
    }

    fn matches_search(&self, article: &Article) -> bool {
        let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
            return true;
        };
        let term = term.to_lowercase();
        article.title.to_lowercase().contains(&term)
            || article.description.to_lowercase().contains(&term)
    }
}

/// Shortcut ranges offered next to the date pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickRange {
    Today,
    Last7Days,
    Last30Days,
    AllTime,
}

impl QuickRange {
    pub const ALL: [QuickRange; 4] = [
        QuickRange::Today,
        QuickRange::Last7Days,
        QuickRange::Last30Days,
        QuickRange::AllTime,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "today" => Some(QuickRange::Today),
            "7days" => Some(QuickRange::Last7Days),
            "30days" => Some(QuickRange::Last30Days),
            "all" => Some(QuickRange::AllTime),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuickRange::Today => "today",
            QuickRange::Last7Days => "7days",
            QuickRange::Last30Days => "30days",
            QuickRange::AllTime => "all",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QuickRange::Today => "Today",
            QuickRange::Last7Days => "Last 7 days",
            QuickRange::Last30Days => "Last 30 days",
            QuickRange::AllTime => "All time",
        }
    }

    /// Resolve to an inclusive `(start, end)` pair.
    pub fn resolve(self, today: NaiveDate, articles: &[Article]) -> (NaiveDate, NaiveDate) {
        match self {
            QuickRange::Today => (today, today),
            QuickRange::Last7Days => (today - Duration::days(7), today),
            QuickRange::Last30Days => (today - Duration::days(30), today),
            QuickRange::AllTime => date_bounds(articles, today),
        }
    }
}

/// Earliest and latest publication day in `articles`.
///
/// Falls back to the thirty days up to `today` when nothing has a date.
pub fn date_bounds(articles: &[Article], today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let days = articles
        .iter()
        .filter_map(|a| a.published_date)
        .map(|d| d.date_naive());
    match days.minmax().into_option() {
        Some((min, max)) => (min, max),
        None => (today - Duration::days(FALLBACK_DAYS), today),
    }
}

/// Keywords present in `articles`, in first-seen order.
pub fn keyword_options(articles: &[Article]) -> Vec<String> {
    articles
        .iter()
        .map(|a| a.keyword.clone())
        .unique()
        .collect()
}

/// Sources present in `articles`, sorted alphabetically.
pub fn source_options(articles: &[Article]) -> Vec<String> {
    articles
        .iter()
        .map(|a| a.source.as_str())
        .collect::<HashSet<_>>()
        .into_iter()
        .sorted()
        .map(str::to_string)
        .collect()
}
