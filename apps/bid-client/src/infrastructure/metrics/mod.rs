//! Prometheus Metrics Module
//!
//! # Metrics Categories
//!
//! - **Frames**: Price frames received and discarded as malformed
//! - **Connection**: Feed open/closed gauge and reconnection attempts
//! - **Bids**: Submissions by outcome and skipped broadcasts
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to install metrics exporter.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

/// Start the Prometheus exporter, serving `/metrics` on `listen_addr`.
///
/// Must be called from within a Tokio runtime.
///
/// # Errors
///
/// Returns an error if the exporter cannot be installed (e.g. port in use,
/// or a recorder is already installed).
pub fn init_metrics(listen_addr: SocketAddr) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(listen_addr)
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    register_metrics();

    tracing::info!(addr = %listen_addr, "Prometheus metrics exporter started");

    Ok(())
}

fn register_metrics() {
    describe_counter!(
        "bid_client_frames_received_total",
        "Total price frames received from the feed"
    );
    describe_counter!(
        "bid_client_frames_malformed_total",
        "Total price frames discarded as malformed"
    );
    describe_counter!(
        "bid_client_reconnects_total",
        "Total feed reconnection attempts"
    );
    describe_gauge!(
        "bid_client_connection_open",
        "1 while the feed connection is open, 0 otherwise"
    );
    describe_counter!(
        "bid_client_bids_submitted_total",
        "Total bid submissions by outcome"
    );
    describe_counter!(
        "bid_client_broadcasts_skipped_total",
        "Total bids whose push broadcast was skipped"
    );
}

/// Outcome label for bid submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidOutcome {
    /// Accepted by the authoritative endpoint.
    Accepted,
    /// Rejected locally before any network call.
    Invalid,
    /// Rejected by the authoritative endpoint.
    Rejected,
    /// Endpoint unreachable or answered garbage.
    Failed,
}

impl BidOutcome {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Invalid => "invalid",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        }
    }
}

/// Record a price frame received from the feed.
pub fn record_frame_received() {
    counter!("bid_client_frames_received_total").increment(1);
}

/// Record a frame discarded as malformed.
pub fn record_frame_malformed() {
    counter!("bid_client_frames_malformed_total").increment(1);
}

/// Record a reconnection attempt.
pub fn record_reconnect() {
    counter!("bid_client_reconnects_total").increment(1);
}

/// Update the connection gauge.
pub fn set_connection_open(open: bool) {
    gauge!("bid_client_connection_open").set(if open { 1.0 } else { 0.0 });
}

/// Record a bid submission.
pub fn record_bid_submission(outcome: BidOutcome) {
    counter!(
        "bid_client_bids_submitted_total",
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

/// Record a bid whose broadcast was skipped.
pub fn record_broadcast_skipped() {
    counter!("bid_client_broadcasts_skipped_total").increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bid_outcome_as_str() {
        assert_eq!(BidOutcome::Accepted.as_str(), "accepted");
        assert_eq!(BidOutcome::Invalid.as_str(), "invalid");
        assert_eq!(BidOutcome::Rejected.as_str(), "rejected");
        assert_eq!(BidOutcome::Failed.as_str(), "failed");
    }

    #[test]
    fn recording_without_exporter_is_noop() {
        record_frame_received();
        record_frame_malformed();
        record_reconnect();
        set_connection_open(true);
        record_bid_submission(BidOutcome::Accepted);
        record_broadcast_skipped();
    }
}
