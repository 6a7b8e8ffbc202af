//! Pricing Types
//!
//! A [`PriceUpdate`] is what the live feed produces for every well-formed
//! frame. Prices are kept as [`Decimal`] end to end so the two-digit wire
//! format and the `$` labels never suffer float rounding.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of fraction digits used on the wire and in labels.
pub const PRICE_SCALE: u32 = 2;

/// A decoded price update for a single item.
///
/// The sign is not constrained: whatever finite value arrived on the wire is
/// passed through, and deciding whether it makes sense is up to the consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceUpdate {
    /// Item identifier (never empty).
    pub item_id: String,
    /// New price.
    pub price: Decimal,
}

impl PriceUpdate {
    /// Create a new price update.
    #[must_use]
    pub fn new(item_id: impl Into<String>, price: Decimal) -> Self {
        Self {
            item_id: item_id.into(),
            price,
        }
    }

    /// Display label for this update, e.g. `$19.99`.
    #[must_use]
    pub fn label(&self) -> String {
        price_label(self.price)
    }
}

/// Magnitudes below this cannot be represented as a [`Decimal`].
const SMALLEST_MAGNITUDE: f64 = 1e-28;

/// Parse a finite decimal number.
///
/// Accepts plain (`19.99`, `-5`, `+3.5`) and scientific (`1.5e3`) notation,
/// ignoring surrounding whitespace. Only digits, signs, `.` and `e`/`E` are
/// allowed, so `NaN`, infinities, digit separators (`1_000`) and trailing
/// garbage are rejected.
///
/// Magnitudes beyond [`Decimal::MAX`] are rejected. Magnitudes too small for
/// `Decimal` (below `1e-28`) parse as zero.
#[must_use]
pub fn parse_price(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(is_number_byte) {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
        .or_else(|| below_precision(trimmed))
}

const fn is_number_byte(b: u8) -> bool {
    matches!(b, b'0'..=b'9' | b'+' | b'-' | b'.' | b'e' | b'E')
}

fn below_precision(raw: &str) -> Option<Decimal> {
    let value: f64 = raw.parse().ok()?;
    (value.is_finite() && value.abs() < SMALLEST_MAGNITUDE).then_some(Decimal::ZERO)
}

/// Round a price to the wire scale (half away from zero).
#[must_use]
pub fn round_price(price: Decimal) -> Decimal {
    price.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Format a price with exactly two fraction digits, e.g. `19.90`.
#[must_use]
pub fn format_price(price: Decimal) -> String {
    let mut rounded = round_price(price);
    rounded.rescale(PRICE_SCALE);
    rounded.to_string()
}

/// Format a price as a display label, e.g. `$19.99`.
#[must_use]
pub fn price_label(price: Decimal) -> String {
    format!("${}", format_price(price))
}
