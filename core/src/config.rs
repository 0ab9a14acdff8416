//! Client configuration read from the environment.

use std::env;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::cache::DEFAULT_STALE_TIME;
use crate::params::DEFAULT_PAGE_SIZE;

pub const BASE_URL_ENV: &str = "STUDENT_API_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8712/api";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid API base URL `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base_url: String,
    pub page_size: u32,
    pub stale_time: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            stale_time: DEFAULT_STALE_TIME,
        }
    }
}

impl Config {
    /// Reads `STUDENT_API_BASE_URL`, falling back to the default when unset
    /// or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::default().with_base_url(url.trim()),
            _ => Ok(Self::default()),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: url.to_string(),
                reason: format!("unsupported scheme `{}`", parsed.scheme()),
            });
        }
        self.api_base_url = url.trim_end_matches('/').to_string();
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_local_api() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:8712/api");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.stale_time, Duration::from_secs(30));
    }

    #[test]
    fn base_url_is_validated() {
        let config = Config::default().with_base_url("https://campus.example/api/").unwrap();
        assert_eq!(config.api_base_url, "https://campus.example/api");

        assert!(matches!(
            Config::default().with_base_url("not a url"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            Config::default().with_base_url("ftp://campus.example"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }
}
