//! Prediction client configuration.

use std::time::Duration;

use url::Url;

use crate::error::{ClientError, ClientResult};

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// How `predict` treats non-2xx responses. Typed operations always fail on them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusPolicy {
    /// Decode the body as JSON whatever the status code.
    #[default]
    PassThrough,
    /// Fail with [`ClientError::Status`] on any non-2xx response.
    Strict,
}

/// Configuration for the prediction client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the prediction service
    pub base_url: String,
    /// Request timeout; `None` keeps the HTTP stack default
    pub timeout: Option<Duration>,
    /// Handling of non-2xx responses
    pub status_policy: StatusPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            status_policy: StatusPolicy::PassThrough,
        }
    }
}

impl ClientConfig {
    /// Config pointing at `base_url` with all other values defaulted.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("PREDICT_SERVICE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            // 0 means no timeout rather than an instant one
            timeout: std::env::var("PREDICT_SERVICE_TIMEOUT")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|&secs| secs > 0)
                .map(Duration::from_secs),
            status_policy: std::env::var("PREDICT_SERVICE_STRICT_STATUS")
                .map(|v| v == "true" || v == "1")
                .map(|strict| {
                    if strict {
                        StatusPolicy::Strict
                    } else {
                        StatusPolicy::PassThrough
                    }
                })
                .unwrap_or_default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.status_policy = policy;
        self
    }

    /// Validated base URL without a trailing slash, ready for path joins.
    pub(crate) fn normalized_base_url(&self) -> ClientResult<String> {
        let raw = self.base_url.trim();
        let parsed = Url::parse(raw)
            .map_err(|e| ClientError::invalid_config(format!("base URL {raw:?}: {e}")))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::invalid_config(format!(
                "base URL {raw:?}: unsupported scheme {}",
                parsed.scheme()
            )));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(ClientError::invalid_config(format!(
                "base URL {raw:?}: query and fragment are not allowed"
            )));
        }

        Ok(raw.trim_end_matches('/').to_string())
    }
}
