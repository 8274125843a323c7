//! Client configuration
//!
//! Deployment knobs only: where the panel lives and how long a request may take.
//! Everything else about the session is fixed by the panel's protocol.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PanelError, Result};

/// Default panel location.
pub const DEFAULT_BASE_URL: &str = "https://my.cyon.ch";
/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding [`ClientConfig::base_url`].
pub const ENV_BASE_URL: &str = "CYON_BASE_URL";
/// Environment variable overriding [`ClientConfig::connect_timeout_secs`].
pub const ENV_CONNECT_TIMEOUT: &str = "CYON_CONNECT_TIMEOUT_SECS";
/// Environment variable overriding [`ClientConfig::request_timeout_secs`].
pub const ENV_REQUEST_TIMEOUT: &str = "CYON_REQUEST_TIMEOUT_SECS";

/// Transport configuration for a [`CyonClient`](crate::CyonClient).
///
/// Deserializable so embedding applications can keep it in their own config
/// files; missing fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    /// Panel root, without trailing slash (e.g. `https://my.cyon.ch`).
    pub base_url: String,
    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Optional `User-Agent` header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Defaults overlaid with `CYON_BASE_URL`, `CYON_CONNECT_TIMEOUT_SECS` and
    /// `CYON_REQUEST_TIMEOUT_SECS` when they are set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_BASE_URL) {
            config.base_url = url;
        }
        if let Some(raw) = lookup(ENV_CONNECT_TIMEOUT) {
            config.connect_timeout_secs = parse_secs(ENV_CONNECT_TIMEOUT, &raw)?;
        }
        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT) {
            config.request_timeout_secs = parse_secs(ENV_REQUEST_TIMEOUT, &raw)?;
        }

        config.validated()
    }

    /// Normalizes the base URL and rejects unusable values.
    pub fn validated(mut self) -> Result<Self> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(PanelError::validation(
                "base_url",
                format!("'{}' is not an http(s) URL", self.base_url),
            ));
        }
        self.base_url = trimmed.to_string();

        if self.request_timeout_secs == 0 {
            return Err(PanelError::validation(
                "request_timeout_secs",
                "must be greater than zero",
            ));
        }
        if self.connect_timeout_secs == 0 {
            return Err(PanelError::validation(
                "connect_timeout_secs",
                "must be greater than zero",
            ));
        }

        Ok(self)
    }

    pub(crate) fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub(crate) fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Absolute URL for a panel path (`path` starts with `/`).
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| PanelError::validation(key, format!("'{raw}' is not a number of seconds: {e}")))
}
