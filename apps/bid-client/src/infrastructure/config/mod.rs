//! Configuration Module
//!
//! Environment-driven configuration for the bid client.

mod settings;

pub use settings::{
    ApiSettings, ClientConfig, ConfigError, DEFAULT_API_BASE_URL, DEFAULT_WS_URL, FeedSettings,
};
