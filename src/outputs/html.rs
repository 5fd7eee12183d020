//! Server-rendered pages for the dashboard.
//!
//! Every page extends `templates/base.html`: a sidebar for keyword
//! management and a tab bar for the three views.
//!
//! - **Collect Feeds** (`/`): keyword list, collect button, summary metrics,
//!   per-keyword counts, recent articles and download links
//! - **Search & Filter** (`/articles`): date pickers, quick ranges, search,
//!   keyword/source selection and the matching rows
//! - **Instructions** (`/instructions`): how to use the tool
//!
//! Templates are compiled by askama, which escapes every interpolated value.
//! Feed links only become anchors when they are plain web URLs.

use askama::Template;
use chrono::NaiveDate;

use crate::filter::{ArticleFilter, QuickRange, keyword_options, source_options};
use crate::models::{Article, Collection, Summary};
use crate::session::Notice;
use crate::utils::is_web_link;

/// Which tab is highlighted in the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Collect,
    Filter,
    Instructions,
}

/// Everything the search & filter page needs besides the shared layout.
#[derive(Debug)]
pub struct FilterView<'a> {
    pub collection: Option<&'a Collection>,
    pub filter: &'a ArticleFilter,
    pub quick: Option<QuickRange>,
    /// Earliest and latest publication day, used to pre-fill the pickers.
    pub bounds: (NaiveDate, NaiveDate),
    pub results: &'a [&'a Article],
    /// Encoded filter, appended to the filtered download links.
    pub export_query: &'a str,
}

/// One line of an article table.
struct ArticleRow<'a> {
    title: &'a str,
    /// `None` when the feed link is not an http(s) URL.
    link: Option<&'a str>,
    source: &'a str,
    keyword: &'a str,
    published: String,
}

impl<'a> From<&'a Article> for ArticleRow<'a> {
    fn from(article: &'a Article) -> Self {
        let published = match article.published_date {
            Some(date) => date.format("%Y-%m-%d %H:%M").to_string(),
            None => article.published.clone(),
        };
        Self {
            title: &article.title,
            link: Some(article.link.as_str()).filter(|link| is_web_link(link)),
            source: &article.source,
            keyword: &article.keyword,
            published,
        }
    }
}

struct KeywordBar {
    keyword: String,
    count: usize,
    /// Percentage of the largest count.
    width: usize,
}

struct CollectionView {
    collected_at: String,
    summary: Summary,
    bars: Vec<KeywordBar>,
}

struct QuickButton {
    value: &'static str,
    label: &'static str,
    active: bool,
}

struct SelectOption {
    value: String,
    selected: bool,
}

fn collected_at(collection: &Collection) -> String {
    collection
        .collected_at
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

fn select_options(options: Vec<String>, selected: &[String]) -> Vec<SelectOption> {
    options
        .into_iter()
        .map(|value| SelectOption {
            selected: selected.contains(&value),
            value,
        })
        .collect()
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardPage<'a> {
    tab: Tab,
    keywords: &'a [String],
    notices: &'a [Notice],
    collection: Option<CollectionView>,
    rows: Vec<ArticleRow<'a>>,
}

#[derive(Template)]
#[template(path = "articles.html")]
struct ArticlesPage<'a> {
    tab: Tab,
    keywords: &'a [String],
    notices: &'a [Notice],
    /// `None` until something has been collected.
    collected_at: Option<String>,
    start: NaiveDate,
    end: NaiveDate,
    include_undated: bool,
    quick_ranges: Vec<QuickButton>,
    search: &'a str,
    keyword_options: Vec<SelectOption>,
    source_options: Vec<SelectOption>,
    filtered: bool,
    rows: Vec<ArticleRow<'a>>,
    export_query: &'a str,
}

#[derive(Template)]
#[template(path = "instructions.html")]
struct InstructionsPage<'a> {
    tab: Tab,
    keywords: &'a [String],
    notices: &'a [Notice],
    defaults: &'a [String],
}

/// The "Collect Feeds" tab.
pub fn dashboard_page(
    keywords: &[String],
    collection: Option<&Collection>,
    notices: &[Notice],
) -> Result<String, askama::Error> {
    let view = collection.map(|c| {
        let summary = c.summary();
        let max = summary.by_keyword.first().map_or(1, |k| k.count.max(1));
        let bars = summary
            .by_keyword
            .iter()
            .map(|entry| KeywordBar {
                keyword: entry.keyword.clone(),
                count: entry.count,
                width: entry.count * 100 / max,
            })
            .collect();
        CollectionView {
            collected_at: collected_at(c),
            summary,
            bars,
        }
    });
    DashboardPage {
        tab: Tab::Collect,
        keywords,
        notices,
        collection: view,
        rows: collection
            .map(|c| c.recent().iter().map(ArticleRow::from).collect())
            .unwrap_or_default(),
    }
    .render()
}

/// The "Search & Filter" tab.
pub fn articles_page(
    keywords: &[String],
    notices: &[Notice],
    view: &FilterView<'_>,
) -> Result<String, askama::Error> {
    let filter = view.filter;
    let (keyword_choices, source_choices) = match view.collection {
        Some(c) => (
            select_options(keyword_options(&c.articles), &filter.keywords),
            select_options(source_options(&c.articles), &filter.sources),
        ),
        None => (Vec::new(), Vec::new()),
    };
    ArticlesPage {
        tab: Tab::Filter,
        keywords,
        notices,
        collected_at: view.collection.map(collected_at),
        start: filter.start.unwrap_or(view.bounds.0),
        end: filter.end.unwrap_or(view.bounds.1),
        include_undated: filter.include_undated,
        quick_ranges: QuickRange::ALL
            .into_iter()
            .map(|range| QuickButton {
                value: range.as_str(),
                label: range.label(),
                active: view.quick == Some(range),
            })
            .collect(),
        search: filter.search.as_deref().unwrap_or_default(),
        keyword_options: keyword_choices,
        source_options: source_choices,
        filtered: !filter.is_empty(),
        rows: view.results.iter().map(|a| ArticleRow::from(*a)).collect(),
        export_query: view.export_query,
    }
    .render()
}

/// The "Instructions" tab.
pub fn instructions_page(
    keywords: &[String],
    defaults: &[String],
    notices: &[Notice],
) -> Result<String, askama::Error> {
    InstructionsPage {
        tab: Tab::Instructions,
        keywords,
        notices,
        defaults,
    }
    .render()
}
