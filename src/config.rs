//! Runtime configuration.
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. built-in defaults,
//! 2. an optional YAML file (`--config`),
//! 3. command-line flags / environment variables.
//!
//! ```yaml
//! host: 0.0.0.0
//! port: 8501
//! cache_ttl_secs: 3600
//! request_delay_ms: 1000
//! request_timeout_secs: 15
//! default_keywords:
//!   - carbon measures
//!   - scope 3 emissions
//! locale:
//!   hl: en-US
//!   gl: US
//!   ceid: US:en
//! ```

use crate::cli::Cli;
use crate::collector::DEFAULT_REQUEST_DELAY;
use crate::feeds::Locale;
use crate::feeds::cache::DEFAULT_TTL;
use crate::keywords::DEFAULT_KEYWORDS;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Yaml {
        path: String,
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cache_ttl_secs: u64,
    pub request_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub default_keywords: Vec<String>,
    pub locale: Locale,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            cache_ttl_secs: DEFAULT_TTL.as_secs(),
            request_delay_ms: DEFAULT_REQUEST_DELAY.as_millis() as u64,
            request_timeout_secs: 15,
            default_keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            locale: Locale::default(),
        }
    }
}

impl AppConfig {
    /// Parse a YAML document. Missing keys keep their defaults.
    pub fn from_yaml(yaml: &str, path: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|source| ConfigError::Yaml {
            path: path.to_string(),
            source,
        })
    }

    #[instrument(level = "info")]
    pub async fn load(path: &str) -> Result<Self, ConfigError> {
        let yaml = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_string(),
                source,
            })?;
        let config = Self::from_yaml(&yaml, path)?;
        info!(keywords = config.default_keywords.len(), "Loaded configuration");
        Ok(config)
    }

    /// Build the effective configuration for a command line.
    pub async fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let config = match cli.config.as_deref() {
            Some(path) => Self::load(path).await?,
            None => Self::default(),
        };
        Ok(config.with_overrides(cli))
    }

    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(host) = &cli.host {
            self.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(ttl) = cli.cache_ttl_secs {
            self.cache_ttl_secs = ttl;
        }
        if let Some(delay) = cli.request_delay_ms {
            self.request_delay_ms = delay;
        }
        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
