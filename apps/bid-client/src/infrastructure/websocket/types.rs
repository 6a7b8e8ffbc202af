//! WebSocket Types and Configuration

use std::time::Duration;

use thiserror::Error;

/// Default delay between a close and the next connection attempt.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(3000);

/// Price feed connection configuration.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Fixed delay before every reconnection attempt.
    pub reconnect_delay: Duration,
}

impl ConnectionConfig {
    /// Create a configuration with a custom reconnect delay.
    #[must_use]
    pub const fn with_reconnect_delay(reconnect_delay: Duration) -> Self {
        Self { reconnect_delay }
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }
}

/// Current state of the price feed connection.
///
/// ```text
/// Idle -> Connecting -> Open -> Closed -> Connecting (after delay) -> ...
/// ```
///
/// `stop()` moves any state back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No connection and no reconnect loop.
    #[default]
    Idle,
    /// Opening a connection.
    Connecting,
    /// Connected; frames can be sent.
    Open,
    /// Connection lost; waiting for the reconnect delay.
    Closed,
}

impl ConnectionState {
    /// Check if frames can be sent.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// Get the state name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Details delivered to `on_close`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseEvent {
    /// Close code sent by the peer, if any.
    pub code: Option<u16>,
    /// Close reason.
    pub reason: String,
    /// Delay until the next attempt; `None` when the close came from `stop()`.
    pub reconnect_in: Option<Duration>,
}

impl CloseEvent {
    /// Check if a reconnect has been scheduled.
    #[must_use]
    pub const fn will_reconnect(&self) -> bool {
        self.reconnect_in.is_some()
    }
}

/// Connection errors.
#[derive(Debug, Clone, Error)]
pub enum ConnectionError {
    /// `start` was called while a connection is live or being opened.
    #[error("connection already started")]
    AlreadyConnected,

    /// The endpoint is not a `ws://` or `wss://` URL.
    #[error("invalid endpoint '{endpoint}': {message}")]
    InvalidEndpoint {
        /// The rejected endpoint.
        endpoint: String,
        /// Error details.
        message: String,
    },

    /// Transport-level failure. Always followed by a close.
    #[error("transport error: {message}")]
    Transport {
        /// Error details.
        message: String,
    },
}
