//! Price Feed Service
//!
//! Subscribes to the connection manager, decodes every inbound frame and
//! forwards well-formed updates to a [`PriceSink`]. Malformed frames are
//! logged and dropped; processing continues with the next frame.

use std::sync::Arc;

use crate::application::ports::{ConnectionHandler, PriceSink};
use crate::infrastructure::metrics;
use crate::infrastructure::websocket::{CloseEvent, ConnectionError, decode};

/// Connection handler that feeds decoded prices into a sink.
pub struct PriceFeed<S: PriceSink + ?Sized> {
    sink: Arc<S>,
}

impl<S: PriceSink + ?Sized> PriceFeed<S> {
    /// Create a feed that forwards to `sink`.
    #[must_use]
    pub const fn new(sink: Arc<S>) -> Self {
        Self { sink }
    }
}

impl<S: PriceSink + ?Sized> ConnectionHandler for PriceFeed<S> {
    fn on_open(&self) {
        metrics::set_connection_open(true);
        tracing::info!("Live price updates enabled");
    }

    fn on_message(&self, raw: &str) {
        metrics::record_frame_received();

        match decode(raw) {
            Ok(update) => {
                tracing::trace!(item_id = %update.item_id, price = %update.price, "Price update");
                self.sink.on_price_update(&update.item_id, update.price);
            }
            Err(e) => {
                metrics::record_frame_malformed();
                tracing::warn!(error = %e, "Discarding price frame");
            }
        }
    }

    fn on_error(&self, error: &ConnectionError) {
        tracing::debug!(error = %error, "Price feed error");
    }

    fn on_close(&self, event: &CloseEvent) {
        metrics::set_connection_open(false);

        match event.reconnect_in {
            Some(delay) => tracing::warn!(
                code = ?event.code,
                reason = %event.reason,
                retry_ms = delay.as_millis(),
                "Live price updates interrupted, retrying"
            ),
            None => tracing::info!("Live price updates disabled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use rust_decimal::Decimal;

    use super::*;
    use crate::application::ports::MockPriceSink;

    #[test]
    fn well_formed_frame_reaches_sink() {
        let mut sink = MockPriceSink::new();
        sink.expect_on_price_update()
            .with(eq("42"), eq(Decimal::new(1999, 2)))
            .times(1)
            .return_const(());

        let feed = PriceFeed::new(Arc::new(sink));
        feed.on_message("42:19.99");
    }

    #[test]
    fn malformed_frames_never_reach_sink() {
        let mut sink = MockPriceSink::new();
        sink.expect_on_price_update().times(0);

        let feed = PriceFeed::new(Arc::new(sink));
        feed.on_message("abc");
        feed.on_message("1:2:3");
        feed.on_message("x:notanumber");
    }

    #[test]
    fn processing_continues_after_malformed_frame() {
        let mut sink = MockPriceSink::new();
        sink.expect_on_price_update()
            .with(eq("7"), eq(Decimal::new(5, 0)))
            .times(1)
            .return_const(());

        let feed = PriceFeed::new(Arc::new(sink));
        feed.on_message("garbage");
        feed.on_message("7:5");
    }

    #[test]
    fn lifecycle_events_do_not_touch_sink() {
        let mut sink = MockPriceSink::new();
        sink.expect_on_price_update().times(0);

        let feed = PriceFeed::new(Arc::new(sink));
        feed.on_open();
        feed.on_error(&ConnectionError::Transport {
            message: "reset".to_string(),
        });
        feed.on_close(&CloseEvent {
            code: None,
            reason: "reset".to_string(),
            reconnect_in: None,
        });
    }
}
