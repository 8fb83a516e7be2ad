//! Service settings loaded from an optional YAML file.
//!
//! Every field has a default pointing at the live Throne and Liberty site, so
//! the service runs without any file. Command-line flags are applied on top
//! with [`Settings::apply_cli`].

use crate::cli::Cli;
use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Runtime settings for the scraper and HTTP server.
///
/// # Example
///
/// ```yaml
/// bind: "127.0.0.1:9000"
/// max_pages: 20
/// request_timeout_secs: 10
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Socket address the HTTP server listens on.
    pub bind: String,
    /// Paginated news fragment endpoint; `?page=N` is appended per page.
    pub news_url: String,
    /// Origin that relative article links are resolved against.
    pub link_origin: String,
    /// Server status page.
    pub server_status_url: String,
    /// Page fetched by the health check.
    pub health_url: String,
    /// Upper bound on news pages fetched per request.
    pub max_pages: usize,
    /// Timeout applied to every upstream request.
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
            news_url: "https://playthroneandliberty.com/en-us/news-load-more".to_string(),
            link_origin: "https://www.playthroneandliberty.com".to_string(),
            server_status_url: "https://www.playthroneandliberty.com/en-us/support/server-status"
                .to_string(),
            health_url: "https://playthroneandliberty.com".to_string(),
            max_pages: 50,
            request_timeout_secs: 15,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or defaults when no path is given.
    #[instrument(level = "debug")]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let settings = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                })?;
                Self::from_yaml_str(&raw)?
            }
            None => Self::default(),
        };
        settings.validate()?;
        debug!(?settings, "Loaded settings");
        Ok(settings)
    }

    /// Parse settings from YAML text; missing keys keep their defaults.
    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        // an empty file deserializes to unit, not to an empty mapping
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Override file values with any flags given on the command line.
    pub fn apply_cli(mut self, cli: &Cli) -> Result<Self, ConfigError> {
        if let Some(bind) = &cli.bind {
            self.bind = bind.clone();
        }
        if let Some(max_pages) = cli.max_pages {
            self.max_pages = max_pages;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("news_url", &self.news_url),
            ("link_origin", &self.link_origin),
            ("server_status_url", &self.server_status_url),
            ("health_url", &self.health_url),
        ] {
            Url::parse(value).map_err(|source| ConfigError::InvalidUrl { field, source })?;
        }
        if self.max_pages == 0 {
            return Err(ConfigError::Zero("max_pages"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Zero("request_timeout_secs"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
