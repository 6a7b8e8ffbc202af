//! Client Configuration Settings
//!
//! Configuration types for the bid client, loaded from environment variables.

use std::time::Duration;

use reqwest::Url;

use crate::infrastructure::http::{BodyFormat, DEFAULT_TIMEOUT};
use crate::infrastructure::websocket::DEFAULT_RECONNECT_DELAY;

/// Default live feed endpoint.
pub const DEFAULT_WS_URL: &str = "ws://localhost:4567/precios";

/// Default base URL of the price API.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:4567";

/// Live feed settings.
#[derive(Debug, Clone)]
pub struct FeedSettings {
    /// WebSocket endpoint.
    pub ws_url: String,
    /// Fixed delay before every reconnection attempt.
    pub reconnect_delay: Duration,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            ws_url: DEFAULT_WS_URL.to_string(),
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }
}

/// Price API settings.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Base URL; requests go to `{base}/api/items/{id}/price`.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Request body shape.
    pub body_format: BodyFormat,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            body_format: BodyFormat::default(),
        }
    }
}

/// Complete client configuration.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Live feed settings.
    pub feed: FeedSettings,
    /// Price API settings.
    pub api: ApiSettings,
    /// Prometheus metrics port (0 = disabled).
    pub metrics_port: u16,
}

impl ClientConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a URL or the body format is invalid, or a
    /// variable is set but empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let ws_url = url_var(&lookup, "BID_CLIENT_WS_URL", DEFAULT_WS_URL, &["ws", "wss"])?;
        let base_url = url_var(
            &lookup,
            "BID_CLIENT_API_BASE_URL",
            DEFAULT_API_BASE_URL,
            &["http", "https"],
        )?;

        let body_format = match non_empty(&lookup, "BID_CLIENT_BODY_FORMAT")? {
            Some(raw) => raw
                .parse::<BodyFormat>()
                .map_err(|message| ConfigError::InvalidValue {
                    key: "BID_CLIENT_BODY_FORMAT".to_string(),
                    message,
                })?,
            None => defaults.api.body_format,
        };

        let feed = FeedSettings {
            ws_url,
            reconnect_delay: parse_duration_millis(
                &lookup,
                "BID_CLIENT_RECONNECT_DELAY_MS",
                defaults.feed.reconnect_delay,
            ),
        };

        let api = ApiSettings {
            base_url,
            timeout: parse_duration_secs(
                &lookup,
                "BID_CLIENT_HTTP_TIMEOUT_SECS",
                defaults.api.timeout,
            ),
            body_format,
        };

        Ok(Self {
            feed,
            api,
            metrics_port: parse_u16(&lookup, "BID_CLIENT_METRICS_PORT", defaults.metrics_port),
        })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Environment variable has empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),
    /// Environment variable has an unusable value.
    #[error("invalid value for {key}: {message}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// Error details.
        message: String,
    },
}

fn non_empty<F>(lookup: &F, key: &str) -> Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if value.trim().is_empty() => Err(ConfigError::EmptyValue(key.to_string())),
        Some(value) => Ok(Some(value.trim().to_string())),
        None => Ok(None),
    }
}

fn url_var<F>(lookup: &F, key: &str, default: &str, schemes: &[&str]) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = non_empty(lookup, key)? else {
        return Ok(default.to_string());
    };

    let url = Url::parse(&raw).map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })?;

    if !schemes.contains(&url.scheme()) {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!(
                "scheme '{}' not allowed, expected one of {}",
                url.scheme(),
                schemes.join(", ")
            ),
        });
    }

    Ok(raw)
}

fn parse_u16<F>(lookup: &F, key: &str, default: u16) -> u16
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_duration_secs<F>(lookup: &F, key: &str, default: Duration) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map_or(default, Duration::from_secs)
}

fn parse_duration_millis<F>(lookup: &F, key: &str, default: Duration) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map_or(default, Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.feed.ws_url, "ws://localhost:4567/precios");
        assert_eq!(config.feed.reconnect_delay, Duration::from_millis(3000));
        assert_eq!(config.api.base_url, "http://localhost:4567");
        assert_eq!(config.api.timeout, Duration::from_secs(30));
        assert_eq!(config.api.body_format, BodyFormat::Raw);
        assert_eq!(config.metrics_port, 0);
    }

    #[test]
    fn overrides_from_lookup() {
        let config = config_from(&[
            ("BID_CLIENT_WS_URL", "wss://auction.example.com/precios"),
            ("BID_CLIENT_API_BASE_URL", "https://auction.example.com"),
            ("BID_CLIENT_RECONNECT_DELAY_MS", "250"),
            ("BID_CLIENT_HTTP_TIMEOUT_SECS", "5"),
            ("BID_CLIENT_BODY_FORMAT", "json"),
            ("BID_CLIENT_METRICS_PORT", "9464"),
        ])
        .unwrap();

        assert_eq!(config.feed.ws_url, "wss://auction.example.com/precios");
        assert_eq!(config.feed.reconnect_delay, Duration::from_millis(250));
        assert_eq!(config.api.base_url, "https://auction.example.com");
        assert_eq!(config.api.timeout, Duration::from_secs(5));
        assert_eq!(config.api.body_format, BodyFormat::Json);
        assert_eq!(config.metrics_port, 9464);
    }

    #[test]
    fn unparseable_numbers_fall_back() {
        let config = config_from(&[
            ("BID_CLIENT_RECONNECT_DELAY_MS", "soon"),
            ("BID_CLIENT_METRICS_PORT", "-1"),
        ])
        .unwrap();
        assert_eq!(config.feed.reconnect_delay, DEFAULT_RECONNECT_DELAY);
        assert_eq!(config.metrics_port, 0);
    }

    #[test]
    fn rejects_wrong_scheme() {
        let err = config_from(&[("BID_CLIENT_WS_URL", "http://localhost:4567/precios")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "BID_CLIENT_WS_URL"));

        let err = config_from(&[("BID_CLIENT_API_BASE_URL", "ws://localhost")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn rejects_empty_value() {
        let err = config_from(&[("BID_CLIENT_WS_URL", "  ")]).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyValue(ref key) if key == "BID_CLIENT_WS_URL"));
    }

    #[test]
    fn rejects_unknown_body_format() {
        let err = config_from(&[("BID_CLIENT_BODY_FORMAT", "xml")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
