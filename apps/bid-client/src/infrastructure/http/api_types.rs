//! Price endpoint request and response types.

use serde::{Deserialize, Serialize};

/// Message used when a failure body carries no readable `message`.
pub const FALLBACK_ERROR_MESSAGE: &str = "failed to update price";

/// Structured request body, `{"price": 19.99}`.
#[derive(Debug, Serialize)]
pub struct PriceBody {
    /// Bid price.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: rust_decimal::Decimal,
}

/// Failure response body.
///
/// Servers also echo a `status`, either numeric or a reason phrase such as
/// `"BAD_REQUEST"`. It is ignored; the HTTP status line is authoritative.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable reason.
    #[serde(default)]
    pub message: Option<String>,
}

/// Extract the user-facing message from a failure body.
#[must_use]
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|err| err.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string())
}
