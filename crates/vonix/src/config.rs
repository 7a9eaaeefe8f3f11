//! Bridge configuration: TOML file plus environment overrides.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use vonix_api::ApiConfig;

use crate::BridgeError;

/// Environment variable overriding [`ApiConfig::base_url`].
pub const ENV_API_URL: &str = "VONIX_API_URL";
/// Environment variable overriding [`ApiConfig::api_key`].
pub const ENV_API_KEY: &str = "VONIX_API_KEY";
/// Environment variable overriding [`BridgeConfig::call_deadline_secs`].
pub const ENV_CALL_DEADLINE_SECS: &str = "VONIX_CALL_DEADLINE_SECS";

/// Everything the bridge needs to know at startup.
///
/// Loaded from TOML. Every field has a default, so an empty file (or no
/// file at all) gives a working config pointed at the public API:
///
/// ```toml
/// call_deadline_secs = 15
/// register_url = "https://vonix.network/register"
///
/// [api]
/// base_url = "http://localhost:3001/api"
/// api_key = "change-me"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Registration API location, key and HTTP timeouts.
    pub api: ApiConfig,

    /// Upper bound on one API call as seen by the bridge, in seconds.
    /// Applied on top of the HTTP client's own timeouts.
    pub call_deadline_secs: u64,

    /// Page players are sent to after `/vonix register`.
    pub register_url: String,

    /// Prefix on every chat line the bridge sends.
    pub tag: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            call_deadline_secs: 15,
            register_url: "https://vonix.network/register".to_string(),
            tag: "[Vonix]".to_string(),
        }
    }
}

impl BridgeConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    /// [`BridgeError::Config`] if the document isn't valid TOML or a field
    /// has the wrong type.
    pub fn from_toml_str(source: &str) -> Result<Self, BridgeError> {
        toml::from_str(source).map_err(|e| BridgeError::Config(e.to_string()))
    }

    /// Reads and parses a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, BridgeError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| BridgeError::Config(format!("{}: {e}", path.display())))?;

        tracing::info!(path = %path.display(), "loaded bridge configuration");
        Self::from_toml_str(&source)
    }

    /// Applies `VONIX_*` overrides from the process environment.
    pub fn with_env(self) -> Result<Self, BridgeError> {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, which maps a variable name to its
    /// value. Separate from [`with_env`](Self::with_env) so tests don't
    /// have to touch the real environment.
    pub fn with_env_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, BridgeError> {
        if let Some(url) = lookup(ENV_API_URL) {
            tracing::debug!(url = %url, "API URL overridden from environment");
            self.api.base_url = url;
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            tracing::debug!("API key overridden from environment");
            self.api.api_key = key;
        }
        if let Some(raw) = lookup(ENV_CALL_DEADLINE_SECS) {
            self.call_deadline_secs = raw.trim().parse().map_err(|_| {
                BridgeError::Config(format!("{ENV_CALL_DEADLINE_SECS}={raw:?} is not a number"))
            })?;
        }
        Ok(self)
    }

    /// Clamp out-of-range values, including the nested [`ApiConfig`].
    pub fn validated(mut self) -> Self {
        self.api = self.api.validated();
        if self.call_deadline_secs < ApiConfig::MIN_TIMEOUT_SECS {
            tracing::warn!(
                value = self.call_deadline_secs,
                min = ApiConfig::MIN_TIMEOUT_SECS,
                "call_deadline_secs below minimum, clamping"
            );
            self.call_deadline_secs = ApiConfig::MIN_TIMEOUT_SECS;
        }
        self
    }

    pub fn call_deadline(&self) -> Duration {
        Duration::from_secs(self.call_deadline_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_from_toml_str_empty_uses_defaults() {
        let config = BridgeConfig::from_toml_str("").unwrap();
        assert_eq!(config, BridgeConfig::default());
        assert_eq!(config.api.base_url, ApiConfig::DEFAULT_BASE_URL);
        assert_eq!(config.tag, "[Vonix]");
    }

    #[test]
    fn test_from_toml_str_nested_api_table() {
        let config = BridgeConfig::from_toml_str(
            r#"
            call_deadline_secs = 3
            [api]
            base_url = "http://localhost:3001/api"
            api_key = "secret"
            "#,
        )
        .unwrap();
        assert_eq!(config.call_deadline(), Duration::from_secs(3));
        assert_eq!(config.api.base_url, "http://localhost:3001/api");
        assert_eq!(config.api.api_key, "secret");
        assert_eq!(config.api.request_timeout_secs, 10);
        assert_eq!(config.register_url, "https://vonix.network/register");
    }

    #[test]
    fn test_from_toml_str_wrong_type_is_config_error() {
        let result = BridgeConfig::from_toml_str("call_deadline_secs = \"soon\"");
        assert!(matches!(result, Err(BridgeError::Config(_))));
    }

    #[test]
    fn test_from_file_missing_is_config_error() {
        let result = BridgeConfig::from_file("/definitely/not/here/vonix.toml");
        assert!(matches!(result, Err(BridgeError::Config(msg)) if msg.contains("vonix.toml")));
    }

    #[test]
    fn test_with_env_from_overrides_fields() {
        let env: HashMap<&str, &str> = [
            (ENV_API_URL, "http://127.0.0.1:9000/api"),
            (ENV_API_KEY, "from-env"),
            (ENV_CALL_DEADLINE_SECS, " 7 "),
        ]
        .into();

        let config = BridgeConfig::default()
            .with_env_from(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.api.base_url, "http://127.0.0.1:9000/api");
        assert_eq!(config.api.api_key, "from-env");
        assert_eq!(config.call_deadline_secs, 7);
    }

    #[test]
    fn test_with_env_from_bad_deadline_is_config_error() {
        let result = BridgeConfig::default()
            .with_env_from(|k| (k == ENV_CALL_DEADLINE_SECS).then(|| "never".to_string()));
        assert!(matches!(result, Err(BridgeError::Config(_))));
    }

    #[test]
    fn test_validated_clamps_zero_deadline() {
        let config = BridgeConfig {
            call_deadline_secs: 0,
            ..Default::default()
        }
        .validated();
        assert_eq!(config.call_deadline_secs, 1);
    }
}
