//! Price Frame Codec
//!
//! Frames are plain text `ITEM_ID:PRICE`. Exactly one `:` is allowed, both
//! sides must be non-empty and the price must be a finite number. Encoding
//! always writes two fraction digits; decoding accepts any finite decimal.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::pricing::{PriceUpdate, format_price, parse_price};

/// Field delimiter.
pub const DELIMITER: char = ':';

/// Frame decoding errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The frame is not `ITEM_ID:PRICE`.
    #[error("malformed frame '{frame}': {reason}")]
    MalformedFrame {
        /// The rejected frame.
        frame: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}

impl CodecError {
    fn malformed(frame: &str, reason: &'static str) -> Self {
        Self::MalformedFrame {
            frame: frame.to_string(),
            reason,
        }
    }
}

/// Decode a price frame.
///
/// # Errors
///
/// Returns [`CodecError::MalformedFrame`] when the frame has zero or several
/// delimiters, an empty segment, or a price that is not a finite number.
pub fn decode(frame: &str) -> Result<PriceUpdate, CodecError> {
    let (item_id, price) = frame
        .split_once(DELIMITER)
        .ok_or_else(|| CodecError::malformed(frame, "missing delimiter"))?;

    if price.contains(DELIMITER) {
        return Err(CodecError::malformed(frame, "more than one delimiter"));
    }
    if item_id.is_empty() {
        return Err(CodecError::malformed(frame, "empty item id"));
    }
    if price.is_empty() {
        return Err(CodecError::malformed(frame, "empty price"));
    }

    let price = parse_price(price).ok_or_else(|| CodecError::malformed(frame, "invalid price"))?;

    Ok(PriceUpdate::new(item_id, price))
}

/// Encode a price frame with two fraction digits.
///
/// `item_id` must not contain `:`; it is written as-is.
#[must_use]
pub fn encode(item_id: &str, price: Decimal) -> String {
    format!("{item_id}{DELIMITER}{}", format_price(price))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use test_case::test_case;

    use super::*;
    use crate::domain::pricing::round_price;

    #[test]
    fn decode_simple_frame() {
        let update = decode("42:19.99").unwrap();
        assert_eq!(update.item_id, "42");
        assert_eq!(update.price, Decimal::new(1999, 2));
        assert_eq!(update.label(), "$19.99");
    }

    #[test]
    fn decode_keeps_sign_and_uuid_ids() {
        let update = decode("uuid-1234-abcd:-150.5").unwrap();
        assert_eq!(update.item_id, "uuid-1234-abcd");
        assert_eq!(update.price, Decimal::new(-1505, 1));
    }

    #[test]
    fn decode_accepts_any_finite_representation() {
        assert_eq!(decode("7:20").unwrap().price, Decimal::new(20, 0));
        assert_eq!(decode("7:2.5e1").unwrap().price, Decimal::new(25, 0));
        assert_eq!(decode("7:1e-40").unwrap().price, Decimal::ZERO);
    }

    #[test_case("abc" ; "no delimiter")]
    #[test_case("1:2:3" ; "two delimiters")]
    #[test_case("x:notanumber" ; "price not numeric")]
    #[test_case(":10" ; "empty item id")]
    #[test_case("10:" ; "empty price")]
    #[test_case("" ; "empty frame")]
    #[test_case("1:NaN" ; "nan")]
    #[test_case("1:inf" ; "infinity")]
    #[test_case("1:1_000" ; "digit separator")]
    #[test_case("1:1e30" ; "beyond decimal range")]
    #[test_case("1:1e" ; "dangling exponent")]
    fn decode_rejects_malformed(frame: &str) {
        let err = decode(frame).unwrap_err();
        assert!(matches!(err, CodecError::MalformedFrame { .. }));
    }

    #[test]
    fn encode_uses_two_fraction_digits() {
        assert_eq!(encode("42", Decimal::new(1999, 2)), "42:19.99");
        assert_eq!(encode("42", Decimal::new(20, 0)), "42:20.00");
        assert_eq!(encode("42", Decimal::new(123_456, 4)), "42:12.35");
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(
            item_id in "[A-Za-z0-9-]{1,24}",
            cents in -10_000_000i64..10_000_000i64,
            extra in 0i64..100,
        ) {
            // Four fraction digits so rounding on encode is exercised.
            let price = Decimal::new(cents * 100 + extra, 4);
            let update = decode(&encode(&item_id, price)).unwrap();
            prop_assert_eq!(update.item_id, item_id);
            prop_assert_eq!(update.price, round_price(price));
        }
    }
}
