//! Configuration for the DevEx client.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable overriding [`ClientConfig::base_url`].
pub const BACKEND_URL_ENV: &str = "DEVEX_BACKEND_URL";

/// Default backend location.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Connection and paging settings for the metrics backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend base URL
    pub base_url: String,
    /// Organization records requested per load
    pub org_metrics_limit: usize,
    /// Team records requested per load
    pub team_metrics_limit: usize,
    /// Per-request timeout (ms)
    pub request_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            org_metrics_limit: 1,
            team_metrics_limit: 50,
            request_timeout_ms: 10_000,
        }
    }
}

impl ClientConfig {
    /// Create a config pointing at a backend.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Load config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(BACKEND_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.base_url = url;
        }
        self
    }

    /// Absolute URL for a backend path.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
