//! Google News RSS search client.
//!
//! Each keyword maps to one search feed:
//!
//! ```text
//! https://news.google.com/rss/search?q=scope+3+emissions&hl=en-US&gl=US&ceid=US:en
//! ```

use crate::models::Article;
use crate::utils::truncate_for_log;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use super::{FeedError, FeedSource, parse_feed};

const SEARCH_URL: &str = "https://news.google.com/rss/search";
const USER_AGENT: &str = concat!("keyword_news_collector/", env!("CARGO_PKG_VERSION"));

/// Interface language and edition of the Google News feed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Locale {
    /// Interface language, e.g. `en-US`.
    pub hl: String,
    /// Country edition, e.g. `US`.
    pub gl: String,
    /// Combined edition id, e.g. `US:en`.
    pub ceid: String,
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            hl: "en-US".to_string(),
            gl: "US".to_string(),
            ceid: "US:en".to_string(),
        }
    }
}

/// Build the search feed URL for a keyword.
///
/// Spaces are encoded as `+`, matching the form encoding Google uses in its
/// own links. The `:` in `ceid` is left as is for the same reason.
pub fn feed_url(keyword: &str, locale: &Locale) -> String {
    let query = urlencoding::encode(keyword).replace("%20", "+");
    format!(
        "{}?q={}&hl={}&gl={}&ceid={}",
        SEARCH_URL,
        query,
        urlencoding::encode(&locale.hl),
        urlencoding::encode(&locale.gl),
        urlencoding::encode(&locale.ceid).replace("%3A", ":"),
    )
}

/// Fetches and parses Google News search feeds over HTTP.
#[derive(Debug, Clone)]
pub struct GoogleNewsClient {
    client: Client,
    locale: Locale,
}

impl GoogleNewsClient {
    pub fn new(locale: Locale, timeout: Duration) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, locale })
    }
}

#[async_trait]
impl FeedSource for GoogleNewsClient {
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, keyword: &str) -> Result<Vec<Article>, FeedError> {
        let url = feed_url(keyword, &self.locale);
        debug!(%url, "Fetching Google News feed");
        let t0 = Instant::now();

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "Feed request rejected");
            return Err(FeedError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let bytes = response.bytes().await?;
        let articles = parse_feed(&bytes, keyword).inspect_err(|e| {
            warn!(
                %url,
                error = %e,
                body_preview = %truncate_for_log(&String::from_utf8_lossy(&bytes), 300),
                "Feed body could not be parsed"
            );
        })?;
        info!(
            count = articles.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched Google News feed"
        );
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_url_default_locale() {
        assert_eq!(
            feed_url("scope 3 emissions", &Locale::default()),
            "https://news.google.com/rss/search?q=scope+3+emissions&hl=en-US&gl=US&ceid=US:en"
        );
    }

    #[test]
    fn test_feed_url_escapes_query() {
        let url = feed_url("\"carbon measures\" & exxon", &Locale::default());
        assert!(url.contains("q=%22carbon+measures%22+%26+exxon&"));
    }

    #[test]
    fn test_feed_url_custom_locale() {
        let locale = Locale {
            hl: "en-GB".to_string(),
            gl: "GB".to_string(),
            ceid: "GB:en".to_string(),
        };
        let url = feed_url("net zero", &locale);
        assert!(url.ends_with("&hl=en-GB&gl=GB&ceid=GB:en"));
    }

    #[test]
    fn test_feed_url_still_escapes_locale_separators() {
        let locale = Locale {
            hl: "en-US".to_string(),
            gl: "US&x=1".to_string(),
            ceid: "US:en".to_string(),
        };
        let url = feed_url("net zero", &locale);
        assert!(url.contains("&gl=US%26x%3D1&ceid=US:en"));
    }

    #[test]
    fn test_client_builds() {
        assert!(GoogleNewsClient::new(Locale::default(), Duration::from_secs(5)).is_ok());
    }
}
