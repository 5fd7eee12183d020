//! Command-line interface definitions for the keyword news collector.
//!
//! Every option can also come from an environment variable. Values given
//! here override the same settings from the YAML config file.

use clap::Parser;

/// Serve the keyword news dashboard.
///
/// # Examples
///
/// ```sh
/// # Defaults: http://127.0.0.1:8501
/// keyword_news_collector
///
/// # Listen on all interfaces with a config file
/// keyword_news_collector --host 0.0.0.0 --port 8080 --config collector.yaml
///
/// # Shorter cache, no pause between keywords
/// keyword_news_collector --cache-ttl-secs 600 --request-delay-ms 0
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Address to bind
    #[arg(long, env = "COLLECTOR_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "COLLECTOR_PORT")]
    pub port: Option<u16>,

    /// Optional path to a YAML config file
    #[arg(short, long, env = "COLLECTOR_CONFIG")]
    pub config: Option<String>,

    /// How long a keyword's feed is reused before it is fetched again
    #[arg(long, env = "COLLECTOR_CACHE_TTL_SECS")]
    pub cache_ttl_secs: Option<u64>,

    /// Pause between two keyword requests during a collection
    #[arg(long, env = "COLLECTOR_REQUEST_DELAY_MS")]
    pub request_delay_ms: Option<u64>,
}
