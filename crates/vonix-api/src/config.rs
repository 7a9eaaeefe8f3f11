//! Client configuration.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where the registration API lives and how long to wait for it.
///
/// `#[serde(default)]` lets a config file set only the fields it cares
/// about; everything else falls back to [`Default`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL, without a trailing slash. Endpoint paths are appended.
    pub base_url: String,

    /// Shared secret sent as `X-API-Key` on every request.
    pub api_key: String,

    /// Whole-request timeout (connect + send + read body), in seconds.
    pub request_timeout_secs: u64,

    /// Connection establishment timeout, in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            request_timeout_secs: 10,
            connect_timeout_secs: 5,
        }
    }
}

impl ApiConfig {
    /// The public Vonix API.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.vonix.network/api";

    /// Smallest timeout we accept. Zero would mean "fail immediately".
    pub const MIN_TIMEOUT_SECS: u64 = 1;

    /// Config pointing at `base_url` with `api_key`, defaults elsewhere.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Clamp and fix any out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`AuthClient::new`](crate::AuthClient::new).
    /// Rules:
    /// - trailing `/` stripped from `base_url`
    /// - both timeouts raised to at least [`Self::MIN_TIMEOUT_SECS`]
    ///
    /// Only logs when it changes something, so validating twice is quiet.
    /// An empty `api_key` is reported once, when the client is built.
    pub fn validated(mut self) -> Self {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        if trimmed.len() != self.base_url.len() {
            self.base_url = trimmed.to_string();
        }
        if self.request_timeout_secs < Self::MIN_TIMEOUT_SECS {
            tracing::warn!(
                value = self.request_timeout_secs,
                min = Self::MIN_TIMEOUT_SECS,
                "request_timeout_secs below minimum, clamping"
            );
            self.request_timeout_secs = Self::MIN_TIMEOUT_SECS;
        }
        if self.connect_timeout_secs < Self::MIN_TIMEOUT_SECS {
            tracing::warn!(
                value = self.connect_timeout_secs,
                min = Self::MIN_TIMEOUT_SECS,
                "connect_timeout_secs below minimum, clamping"
            );
            self.connect_timeout_secs = Self::MIN_TIMEOUT_SECS;
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// The API key is a shared secret, so `Debug` only says whether it's set.
impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}
