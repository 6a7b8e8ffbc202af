//! Price Update Port (Driven Port)
//!
//! The authoritative request/response path for a bid. Whatever the push
//! channel did, this is the call that decides whether a bid was accepted.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::bidding::BidRequest;

/// Price update errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceUpdateError {
    /// The endpoint answered with a non-success status.
    #[error("price update rejected ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Server-provided message, or a generic fallback.
        message: String,
    },

    /// The endpoint could not be reached.
    #[error("price endpoint unreachable: {message}")]
    Unreachable {
        /// Error details.
        message: String,
    },

    /// The endpoint answered success but the body is not JSON.
    #[error("invalid confirmation payload: {message}")]
    InvalidResponse {
        /// Error details.
        message: String,
    },
}

/// The updated item returned on success.
///
/// Every field is optional: only the fact that the body parsed as JSON is
/// required. The full payload is kept in `raw`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemConfirmation {
    /// Item id.
    pub id: Option<String>,
    /// Item name.
    pub name: Option<String>,
    /// Item category.
    pub category: Option<String>,
    /// Price now stored by the server.
    pub price: Option<f64>,
    /// Availability flag.
    pub available: Option<bool>,
    /// The JSON payload as received.
    pub raw: serde_json::Value,
}

impl ItemConfirmation {
    /// Build a confirmation from a parsed payload.
    ///
    /// Each field is read on its own, so one unexpected type only loses
    /// that field. Numeric ids are kept as text and prices may arrive as
    /// strings. Payloads that are not objects carry no typed fields.
    #[must_use]
    pub fn from_payload(raw: serde_json::Value) -> Self {
        Self {
            id: field(&raw, "id").and_then(text_or_number),
            name: field(&raw, "name").and_then(text),
            category: field(&raw, "category").and_then(text),
            price: field(&raw, "price").and_then(number),
            available: field(&raw, "available").and_then(Value::as_bool),
            raw,
        }
    }
}

fn field<'a>(raw: &'a Value, key: &str) -> Option<&'a Value> {
    raw.as_object().and_then(|object| object.get(key))
}

fn text(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn text_or_number(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|p| p.is_finite()),
        _ => None,
    }
}

/// Port for the authoritative price-update endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceUpdatePort: Send + Sync {
    /// Store `bid` as the item's new price.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint rejects the bid, cannot be reached,
    /// or answers with an unparseable body.
    async fn update_price(&self, bid: &BidRequest) -> Result<ItemConfirmation, PriceUpdateError>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn confirmation_from_item_payload() {
        let payload = json!({
            "id": "42",
            "name": "Lamp",
            "category": "home",
            "price": 19.99,
            "available": true
        });

        let confirmation = ItemConfirmation::from_payload(payload.clone());
        assert_eq!(confirmation.id.as_deref(), Some("42"));
        assert_eq!(confirmation.name.as_deref(), Some("Lamp"));
        assert_eq!(confirmation.price, Some(19.99));
        assert_eq!(confirmation.available, Some(true));
        assert_eq!(confirmation.raw, payload);
    }

    #[test]
    fn confirmation_from_non_object_payload() {
        let confirmation = ItemConfirmation::from_payload(json!("ok"));
        assert!(confirmation.id.is_none());
        assert!(confirmation.price.is_none());
        assert_eq!(confirmation.raw, json!("ok"));
    }

    #[test]
    fn confirmation_keeps_fields_around_a_mistyped_one() {
        let confirmation = ItemConfirmation::from_payload(json!({
            "id": 42,
            "name": "Lamp",
            "category": ["home"],
            "price": "19.99",
            "available": "yes"
        }));

        assert_eq!(confirmation.id.as_deref(), Some("42"));
        assert_eq!(confirmation.name.as_deref(), Some("Lamp"));
        assert!(confirmation.category.is_none());
        assert_eq!(confirmation.price, Some(19.99));
        assert!(confirmation.available.is_none());
    }
}
