//! Bid Requests
//!
//! A [`BidRequest`] only exists once user input has been validated: the item
//! id is non-empty and the price is a finite number strictly above zero.

use rust_decimal::Decimal;
use thiserror::Error;

use super::pricing::parse_price;

/// Validation errors for bid input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BidError {
    /// The item id was empty.
    #[error("item id cannot be empty")]
    EmptyItemId,

    /// The price input is not a finite number greater than zero.
    #[error("invalid price '{input}': enter a number greater than 0")]
    InvalidPrice {
        /// The rejected raw input.
        input: String,
    },
}

/// A validated bid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidRequest {
    item_id: String,
    price: Decimal,
}

impl BidRequest {
    /// Validate raw user input into a bid.
    ///
    /// The price check runs first, so a bad price is reported even when the
    /// item id is also missing.
    pub fn parse(item_id: &str, raw_price_input: &str) -> Result<Self, BidError> {
        let price = parse_price(raw_price_input)
            .filter(|p| *p > Decimal::ZERO)
            .ok_or_else(|| BidError::InvalidPrice {
                input: raw_price_input.to_string(),
            })?;

        if item_id.is_empty() {
            return Err(BidError::EmptyItemId);
        }

        Ok(Self {
            item_id: item_id.to_string(),
            price,
        })
    }

    /// Item being bid on.
    #[must_use]
    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    /// Bid price.
    #[must_use]
    pub const fn price(&self) -> Decimal {
        self.price
    }

    /// Price as plain numeric text (`19.99`, `20`), the shape the
    /// authoritative endpoint expects in its body.
    #[must_use]
    pub fn price_text(&self) -> String {
        self.price.normalize().to_string()
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn parse_valid_bid() {
        let bid = BidRequest::parse("42", "19.99").unwrap();
        assert_eq!(bid.item_id(), "42");
        assert_eq!(bid.price(), Decimal::new(1999, 2));
    }

    #[test_case("-5" ; "negative")]
    #[test_case("0" ; "zero")]
    #[test_case("0.00" ; "zero with fraction")]
    #[test_case("" ; "empty")]
    #[test_case("abc" ; "not a number")]
    #[test_case("NaN" ; "nan")]
    #[test_case("1_000" ; "digit separator")]
    #[test_case("1e-40" ; "below decimal precision")]
    fn parse_rejects_invalid_price(input: &str) {
        let err = BidRequest::parse("42", input).unwrap_err();
        assert_eq!(
            err,
            BidError::InvalidPrice {
                input: input.to_string()
            }
        );
    }

    #[test]
    fn parse_rejects_empty_item_id() {
        assert_eq!(
            BidRequest::parse("", "10").unwrap_err(),
            BidError::EmptyItemId
        );
    }

    #[test]
    fn price_text_is_plain_number() {
        assert_eq!(BidRequest::parse("1", "20.00").unwrap().price_text(), "20");
        assert_eq!(BidRequest::parse("1", "19.990").unwrap().price_text(), "19.99");
    }
}
