//! # Keyword News Collector
//!
//! A small web dashboard that follows media coverage for a list of keywords.
//!
//! ## Features
//!
//! - Manage the keyword list from the sidebar (add, remove, reset to defaults)
//! - Fetch the Google News RSS search feed for every keyword
//! - Cache each keyword's feed for an hour to avoid excessive requests
//! - Merge results and drop articles already seen under another keyword
//! - Filter by date range, free text, keyword and source
//! - Download everything, or just the filtered rows, as CSV or JSON
//!
//! ## Usage
//!
//! ```sh
//! keyword_news_collector --port 8501 --config collector.yaml
//! ```
//!
//! ## Architecture
//!
//! 1. **Fetching**: [`feeds::GoogleNewsClient`] downloads and parses one feed
//!    per keyword, wrapped in a [`feeds::CachedFeedSource`]
//! 2. **Collecting**: [`collector::collect`] walks the keywords in order and
//!    de-duplicates by link
//! 3. **Filtering**: [`filter::ArticleFilter`] narrows the collection
//! 4. **Output**: HTML pages and CSV/JSON downloads served by [`web`]

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod collector;
mod config;
mod dates;
mod feeds;
mod filter;
mod keywords;
mod models;
mod outputs;
mod session;
mod utils;
mod web;

use cli::Cli;
use config::AppConfig;
use feeds::{CachedFeedSource, GoogleNewsClient};
use keywords::KeywordSet;
use session::Session;
use web::AppState;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!("keyword_news_collector starting up");

    // Parse CLI and layer it over the config file
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");
    let config = AppConfig::resolve(&args).await?;
    info!(
        bind = %config.bind_address(),
        cache_ttl_secs = config.cache_ttl_secs,
        request_delay_ms = config.request_delay_ms,
        keywords = config.default_keywords.len(),
        "Configuration resolved"
    );

    // ---- Feed source ----
    let client = GoogleNewsClient::new(config.locale.clone(), config.request_timeout())?;
    let source = CachedFeedSource::new(client, config.cache_ttl());

    // ---- Dashboard ----
    let session = Session::new(KeywordSet::new(config.default_keywords.clone()));
    let state = AppState::new(session, Arc::new(source), config.request_delay());
    let router = web::create_router(state);

    web::serve(&config.bind_address(), router).await?;

    info!("Execution complete");
    Ok(())
}
