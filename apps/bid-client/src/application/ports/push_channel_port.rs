//! Push Channel Port (Driven Port)
//!
//! What the bid submitter is allowed to see of the live connection: whether
//! it is open, and a best-effort send. It cannot open, close or replace the
//! connection.

/// Observed view of the live feed connection.
#[cfg_attr(test, mockall::automock)]
pub trait PushChannel: Send + Sync {
    /// Check if the connection is open.
    fn is_open(&self) -> bool;

    /// Write a frame if the connection is open.
    ///
    /// Returns `false` without side effects otherwise. Nothing is queued
    /// for later delivery.
    fn send(&self, frame: &str) -> bool;
}
