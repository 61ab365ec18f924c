//! Client configuration loaded from TOML.
//!
//! Provides two loading methods:
//! - `default_config()` - Parses the defaults compiled into the crate
//! - `load_config(text)` - Parses an override document (missing fields take defaults)

use std::time::Duration;

use serde::Deserialize;

use crate::error::ClientError;

/// Defaults embedded at compile time from `core/config/client.toml`.
const DEFAULT_CONFIG: &str = include_str!("../config/client.toml");

/// What the roster counters show after a failed roster fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailedRosterCounts {
    /// Leave the counters from the last successful render.
    #[default]
    Keep,
    /// Zero all three counters.
    Reset,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base: String,
    pub refresh_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub no_class_redirect_ms: u64,
    pub delete_redirect_ms: u64,
    pub login_redirect_ms: u64,
    pub save_redirect_ms: u64,
    pub failed_roster_counts: FailedRosterCounts,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: "/api".to_string(),
            refresh_interval_secs: 15,
            request_timeout_secs: 20,
            no_class_redirect_ms: 2000,
            delete_redirect_ms: 1500,
            login_redirect_ms: 1000,
            save_redirect_ms: 1000,
            failed_roster_counts: FailedRosterCounts::Keep,
        }
    }
}

impl ClientConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn no_class_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.no_class_redirect_ms)
    }

    pub fn delete_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.delete_redirect_ms)
    }

    pub fn login_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.login_redirect_ms)
    }

    /// Delay before leaving the class form after a successful save.
    pub fn save_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.save_redirect_ms)
    }

    /// Resolve a relative `api_base` (e.g. `/api`) against the page origin.
    /// Absolute bases are returned unchanged. Trailing slashes are dropped.
    pub fn resolved_api_base(&self, origin: &str) -> String {
        let base = self.api_base.trim_end_matches('/');
        if base.starts_with("http://") || base.starts_with("https://") {
            base.to_string()
        } else {
            format!(
                "{}/{}",
                origin.trim_end_matches('/'),
                base.trim_start_matches('/')
            )
        }
    }
}

/// Parse a TOML override document.
pub fn load_config(text: &str) -> Result<ClientConfig, ClientError> {
    let config: ClientConfig = toml::from_str(text)?;
    if config.refresh_interval_secs == 0 {
        return Err(ClientError::Config(
            "refresh_interval_secs must be greater than zero".to_string(),
        ));
    }
    Ok(config)
}

/// The defaults shipped with the crate.
///
/// Falls back to `ClientConfig::default()` if the embedded file were ever
/// unparseable; both describe the same values.
pub fn default_config() -> ClientConfig {
    load_config(DEFAULT_CONFIG).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults_match_struct_defaults() {
        assert_eq!(default_config(), ClientConfig::default());
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let config = load_config("refresh_interval_secs = 30\nfailed_roster_counts = \"reset\"").unwrap();
        assert_eq!(config.refresh_interval(), Duration::from_secs(30));
        assert_eq!(config.failed_roster_counts, FailedRosterCounts::Reset);
        assert_eq!(config.api_base, "/api");
        assert_eq!(config.delete_redirect_delay(), Duration::from_millis(1500));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = load_config("refresh_interval_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, ClientError::Config(_)), "got {:?}", err);
    }

    #[test]
    fn test_zero_refresh_interval_rejected() {
        assert!(load_config("refresh_interval_secs = 0").is_err());
    }

    #[test]
    fn test_unknown_policy_rejected() {
        assert!(load_config("failed_roster_counts = \"sometimes\"").is_err());
    }

    #[test]
    fn test_resolved_api_base() {
        let config = ClientConfig::default();
        assert_eq!(
            config.resolved_api_base("http://localhost:5000/"),
            "http://localhost:5000/api"
        );

        let absolute = ClientConfig {
            api_base: "https://api.example.com/v1/".to_string(),
            ..ClientConfig::default()
        };
        assert_eq!(
            absolute.resolved_api_base("http://localhost:5000"),
            "https://api.example.com/v1"
        );
    }
}
