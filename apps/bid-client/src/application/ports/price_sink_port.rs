//! Price Sink Port (Driven Port)
//!
//! Outward interface for decoded price updates. The core knows nothing about
//! how a sink renders or stores what it receives.

use rust_decimal::Decimal;

/// Receives one call per successfully decoded frame.
#[cfg_attr(test, mockall::automock)]
pub trait PriceSink: Send + Sync {
    /// A new price arrived for `item_id`.
    fn on_price_update(&self, item_id: &str, price: Decimal);
}
