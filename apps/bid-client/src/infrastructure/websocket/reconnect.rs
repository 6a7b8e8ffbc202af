//! Reconnection Policy with a Fixed Delay

use std::time::Duration;

use super::ConnectionConfig;

/// Reconnection policy: unlimited attempts, each after the same fixed delay.
///
/// There is no backoff growth and no jitter. The attempt counter only feeds
/// logs; it never stops the loop.
#[derive(Debug)]
pub struct ReconnectPolicy {
    /// Delay before every attempt.
    delay: Duration,
    /// Attempts since the last successful open.
    current_attempt: u32,
    /// Attempts since the policy was created.
    total_attempts: u64,
}

impl ReconnectPolicy {
    /// Create a new reconnect policy from configuration.
    #[must_use]
    pub const fn new(config: &ConnectionConfig) -> Self {
        Self::with_delay(config.reconnect_delay)
    }

    /// Create with a custom delay.
    #[must_use]
    pub const fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            current_attempt: 0,
            total_attempts: 0,
        }
    }

    /// Register a new attempt and return the delay to wait before it.
    pub fn next_delay(&mut self) -> Duration {
        self.current_attempt = self.current_attempt.saturating_add(1);
        self.total_attempts = self.total_attempts.saturating_add(1);
        self.delay
    }

    /// Reset the per-outage counter after a successful open.
    pub const fn reset(&mut self) {
        self.current_attempt = 0;
    }

    /// Get the attempt count since the last successful open.
    #[must_use]
    pub const fn current_attempt(&self) -> u32 {
        self.current_attempt
    }

    /// Get the attempt count since the policy was created.
    #[must_use]
    pub const fn total_attempts(&self) -> u64 {
        self.total_attempts
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::new(&ConnectionConfig::default())
    }
}
