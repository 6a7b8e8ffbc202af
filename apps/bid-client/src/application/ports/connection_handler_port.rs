//! Connection Handler Port
//!
//! The fixed set of reactions a subscriber registers with the connection
//! manager. All four are invoked from the single connection task, one at a
//! time and never concurrently, so implementations need no extra locking
//! for ordering.

use crate::infrastructure::websocket::{CloseEvent, ConnectionError};

/// Reactions to connection lifecycle events.
///
/// Ordering guarantees:
/// - frames reach `on_message` in transport order within one connection;
/// - a transport failure calls `on_error` first and `on_close` afterwards;
/// - every connection attempt that was not cancelled by `stop()` ends with
///   exactly one `on_close`.
pub trait ConnectionHandler: Send + Sync {
    /// The connection is open and frames can be sent.
    fn on_open(&self) {}

    /// A text frame arrived.
    fn on_message(&self, raw: &str);

    /// A transport error occurred. A close always follows.
    fn on_error(&self, _error: &ConnectionError) {}

    /// The connection closed.
    fn on_close(&self, _event: &CloseEvent) {}
}
