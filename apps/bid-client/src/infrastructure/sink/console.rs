//! Line-per-update price sink for the CLI.

use std::io::{self, Stdout, Write};

use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::application::ports::PriceSink;
use crate::domain::pricing::price_label;

/// Writes `ITEM_ID $PRICE` lines.
pub struct ConsoleSink<W: Write + Send = Stdout> {
    out: Mutex<W>,
}

impl ConsoleSink<Stdout> {
    /// Sink writing to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    /// Sink writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Consume the sink and return the writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write + Send> PriceSink for ConsoleSink<W> {
    fn on_price_update(&self, item_id: &str, price: Decimal) {
        let mut out = self.out.lock();
        if let Err(e) = writeln!(out, "{item_id} {}", price_label(price)).and_then(|()| out.flush())
        {
            tracing::debug!(error = %e, "Failed to write price update");
        }
    }
}
