//! Query-string handling for the search & filter page and filtered exports.
//!
//! Multi-select widgets submit repeated keys (`keyword=a&keyword=b`), which
//! the stock `Query` extractor cannot collect, so the raw query is decoded
//! with `url::form_urlencoded` instead.

use crate::filter::{ArticleFilter, QuickRange};
use crate::models::Article;
use chrono::NaiveDate;
use url::form_urlencoded;

/// Scope of an export request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportScope {
    #[default]
    Collection,
    Filtered,
}

/// Decoded filter query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterParams {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub search: Option<String>,
    pub quick: Option<QuickRange>,
    pub keywords: Vec<String>,
    pub sources: Vec<String>,
    pub include_undated: bool,
    pub scope: ExportScope,
}

impl FilterParams {
    /// Decode a raw query string. Unknown keys and malformed dates are ignored.
    pub fn parse(query: Option<&str>) -> Self {
        let mut params = Self::default();
        let Some(query) = query else {
            return params;
        };
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = value.trim();
            match key.as_ref() {
                "start" => params.start = parse_day(value),
                "end" => params.end = parse_day(value),
                "q" if !value.is_empty() => params.search = Some(value.to_string()),
                "quick" => params.quick = QuickRange::parse(value),
                "keyword" if !value.is_empty() => params.keywords.push(value.to_string()),
                "source" if !value.is_empty() => params.sources.push(value.to_string()),
                "include_undated" => {
                    params.include_undated = matches!(value, "1" | "true" | "on")
                }
                "scope" => {
                    params.scope = match value {
                        "filtered" => ExportScope::Filtered,
                        _ => ExportScope::Collection,
                    }
                }
                _ => {}
            }
        }
        params
    }

    /// Turn the query into a filter. A quick range overrides explicit dates.
    pub fn to_filter(&self, today: NaiveDate, articles: &[Article]) -> ArticleFilter {
        let (start, end) = match self.quick {
            Some(range) => {
                let (start, end) = range.resolve(today, articles);
                (Some(start), Some(end))
            }
            None => (self.start, self.end),
        };
        ArticleFilter {
            start,
            end,
            search: self.search.clone(),
            keywords: self.keywords.clone(),
            sources: self.sources.clone(),
            include_undated: self.include_undated,
        }
    }
}

/// Re-encode an active filter, e.g. for the "download filtered" link.
pub fn filter_query(filter: &ArticleFilter) -> String {
    let mut out = form_urlencoded::Serializer::new(String::new());
    if let Some(start) = filter.start {
        out.append_pair("start", &start.to_string());
    }
    if let Some(end) = filter.end {
        out.append_pair("end", &end.to_string());
    }
    if let Some(search) = &filter.search {
        out.append_pair("q", search);
    }
    for keyword in &filter.keywords {
        out.append_pair("keyword", keyword);
    }
    for source in &filter.sources {
        out.append_pair("source", source);
    }
    if filter.include_undated {
        out.append_pair("include_undated", "1");
    }
    out.finish()
}

fn parse_day(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_repeated_keys() {
        let params = FilterParams::parse(Some(
            "start=2025-10-01&end=2025-10-14&q=scope+3&keyword=carbon+measures&keyword=exxon+scope+3&source=Reuters&include_undated=on&scope=filtered",
        ));
        assert_eq!(params.start, Some(day(2025, 10, 1)));
        assert_eq!(params.end, Some(day(2025, 10, 14)));
        assert_eq!(params.search.as_deref(), Some("scope 3"));
        assert_eq!(params.keywords, vec!["carbon measures", "exxon scope 3"]);
        assert_eq!(params.sources, vec!["Reuters"]);
        assert!(params.include_undated);
        assert_eq!(params.scope, ExportScope::Filtered);
    }

    #[test]
    fn test_parse_ignores_junk() {
        let params = FilterParams::parse(Some("start=yesterday&q=&keyword=&quick=soon&foo=bar"));
        assert_eq!(params, FilterParams::default());
        assert_eq!(FilterParams::parse(None), FilterParams::default());
    }

    #[test]
    fn test_quick_range_overrides_dates() {
        let params = FilterParams::parse(Some("start=2020-01-01&end=2020-01-02&quick=today"));
        let today = day(2025, 10, 16);
        let filter = params.to_filter(today, &[]);
        assert_eq!(filter.start, Some(today));
        assert_eq!(filter.end, Some(today));
    }

    #[test]
    fn test_query_round_trip() {
        let parsed = FilterParams::parse(Some(
            "start=2025-10-01&q=GHG+%26+Scope&keyword=a&keyword=b&source=FT",
        ));
        let filter = parsed.to_filter(day(2025, 10, 16), &[]);
        let query = filter_query(&filter);
        let reparsed = FilterParams::parse(Some(&query));
        assert_eq!(reparsed.to_filter(day(2025, 10, 16), &[]), filter);
    }
}
