use axum::{
    Form, Json,
    extract::{RawQuery, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::AppState;
use super::error::{AppError, AppResult};
use super::params::{ExportScope, FilterParams, filter_query};
use crate::collector;
use crate::filter::date_bounds;
use crate::keywords::KeywordSet;
use crate::models::{Article, Summary};
use crate::outputs::{
    COLLECTION_PREFIX, ExportRecord, FILTERED_PREFIX, csv, html, json, records,
};
use crate::session::NoticeLevel;
use crate::utils::export_filename;

/// Body of the sidebar keyword forms.
#[derive(Debug, Deserialize)]
pub struct KeywordForm {
    #[serde(default)]
    pub keyword: String,
}

/// Filtered article list returned by the JSON API.
#[derive(Debug, Serialize)]
pub struct ArticlesResponse {
    pub total: usize,
    pub collected_at: Option<String>,
    pub summary: Option<Summary>,
    pub articles: Vec<Article>,
}

pub async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    let mut session = state.session.write().await;
    let notices = session.drain_notices();
    let page = html::dashboard_page(
        session.keywords.as_slice(),
        session.collection.as_ref(),
        &notices,
    )?;
    Ok(Html(page))
}

pub async fn instructions(State(state): State<AppState>) -> AppResult<Html<String>> {
    let mut session = state.session.write().await;
    let notices = session.drain_notices();
    let page = html::instructions_page(
        session.keywords.as_slice(),
        session.keywords.defaults(),
        &notices,
    )?;
    Ok(Html(page))
}

#[instrument(level = "info", skip(state))]
pub async fn add_keyword(
    State(state): State<AppState>,
    Form(form): Form<KeywordForm>,
) -> Redirect {
    let mut session = state.session.write().await;
    match session.keywords.add(&form.keyword) {
        Ok(keyword) => {
            info!(%keyword, "Keyword added");
            session.notify(NoticeLevel::Success, format!("Added: {keyword}"));
        }
        Err(e) => {
            warn!(error = %e, "Keyword rejected");
            session.notify(NoticeLevel::Warning, e.to_string());
        }
    }
    Redirect::to("/")
}

#[instrument(level = "info", skip(state))]
pub async fn delete_keyword(
    State(state): State<AppState>,
    Form(form): Form<KeywordForm>,
) -> Redirect {
    let mut session = state.session.write().await;
    let keyword = form.keyword.trim();
    if session.keywords.remove(keyword) {
        info!(%keyword, "Keyword removed");
        session.notify(NoticeLevel::Info, format!("Removed: {keyword}"));
    } else {
        session.notify(NoticeLevel::Warning, format!("Keyword not found: {keyword}"));
    }
    Redirect::to("/")
}

#[instrument(level = "info", skip(state))]
pub async fn reset_keywords(State(state): State<AppState>) -> Redirect {
    let mut session = state.session.write().await;
    session.keywords.reset();
    info!(count = session.keywords.len(), "Keywords reset to defaults");
    session.notify(NoticeLevel::Info, "Keywords reset to defaults");
    Redirect::to("/")
}

/// Run one collection over the current keywords.
///
/// The session lock is released while feeds are fetched, so the dashboard
/// stays responsive during a long collection.
#[instrument(level = "info", skip(state))]
pub async fn collect_articles(State(state): State<AppState>) -> Redirect {
    let keywords = state.session.read().await.keywords.clone();
    if keywords.is_empty() {
        state.session.write().await.notify(
            NoticeLevel::Warning,
            "No keywords configured. Please add keywords in the sidebar.",
        );
        return Redirect::to("/");
    }

    let collection =
        collector::collect(state.source.as_ref(), keywords.as_slice(), state.request_delay).await;

    let mut session = state.session.write().await;
    for failure in &collection.failures {
        session.notify(
            NoticeLevel::Error,
            format!("Error fetching {}: {}", failure.keyword, failure.error),
        );
    }
    if collection.articles.is_empty() {
        warn!("Collection returned no articles");
        session.notify(NoticeLevel::Warning, "No articles found. Try again later.");
    } else {
        session.notify(
            NoticeLevel::Success,
            format!(
                "Collection complete! Found {} unique articles",
                collection.articles.len()
            ),
        );
        session.collection = Some(collection);
    }
    Redirect::to("/")
}

pub async fn articles_page(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> AppResult<Html<String>> {
    let params = FilterParams::parse(query.as_deref());
    let today = Utc::now().date_naive();

    let mut session = state.session.write().await;
    let notices = session.drain_notices();
    let articles = session
        .collection
        .as_ref()
        .map(|c| c.articles.as_slice())
        .unwrap_or_default();

    let filter = params.to_filter(today, articles);
    let results = filter.apply(articles);
    let export_query = filter_query(&filter);
    let view = html::FilterView {
        collection: session.collection.as_ref(),
        filter: &filter,
        quick: params.quick,
        bounds: date_bounds(articles, today),
        results: &results,
        export_query: &export_query,
    };
    let page = html::articles_page(session.keywords.as_slice(), &notices, &view)?;
    Ok(Html(page))
}

/// Rows selected by an export request, with the matching file name prefix.
async fn export_records(
    state: &AppState,
    query: Option<&str>,
) -> AppResult<(Vec<ExportRecord>, &'static str)> {
    let session = state.session.read().await;
    let collection = session
        .collection
        .as_ref()
        .ok_or_else(|| AppError::not_found("No articles collected yet"))?;

    let params = FilterParams::parse(query);
    match params.scope {
        ExportScope::Collection => Ok((records(&collection.articles), COLLECTION_PREFIX)),
        ExportScope::Filtered => {
            let filter = params.to_filter(Utc::now().date_naive(), &collection.articles);
            Ok((records(filter.apply(&collection.articles)), FILTERED_PREFIX))
        }
    }
}

fn attachment(content_type: &'static str, filename: String, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}

#[instrument(level = "info", skip(state))]
pub async fn export_csv(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> AppResult<Response> {
    let (rows, prefix) = export_records(&state, query.as_deref()).await?;
    let body = csv::to_csv(&rows)?;
    let filename = export_filename(prefix, Utc::now(), "csv");
    info!(rows = rows.len(), %filename, "Serving CSV export");
    Ok(attachment("text/csv; charset=utf-8", filename, body))
}

#[instrument(level = "info", skip(state))]
pub async fn export_json(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> AppResult<Response> {
    let (rows, prefix) = export_records(&state, query.as_deref()).await?;
    let body = json::to_json(&rows)?;
    let filename = export_filename(prefix, Utc::now(), "json");
    info!(rows = rows.len(), %filename, "Serving JSON export");
    Ok(attachment("application/json", filename, body))
}

pub async fn api_keywords(State(state): State<AppState>) -> Json<KeywordSet> {
    Json(state.session.read().await.keywords.clone())
}

#[instrument(level = "info", skip(state))]
pub async fn api_add_keyword(
    State(state): State<AppState>,
    Json(form): Json<KeywordForm>,
) -> AppResult<(StatusCode, Json<KeywordSet>)> {
    let mut session = state.session.write().await;
    let keyword = session
        .keywords
        .add(&form.keyword)
        .map_err(|e| AppError::bad_request(e.to_string()))?;
    info!(%keyword, "Keyword added");
    Ok((StatusCode::CREATED, Json(session.keywords.clone())))
}

pub async fn api_articles(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Json<ArticlesResponse> {
    let params = FilterParams::parse(query.as_deref());
    let session = state.session.read().await;
    let Some(collection) = session.collection.as_ref() else {
        return Json(ArticlesResponse {
            total: 0,
            collected_at: None,
            summary: None,
            articles: Vec::new(),
        });
    };

    let filter = params.to_filter(Utc::now().date_naive(), &collection.articles);
    let articles: Vec<Article> = filter
        .apply(&collection.articles)
        .into_iter()
        .cloned()
        .collect();
    Json(ArticlesResponse {
        total: articles.len(),
        collected_at: Some(collection.collected_at.to_rfc3339()),
        summary: Some(collection.summary()),
        articles,
    })
}

pub async fn healthz() -> &'static str {
    "ok"
}
