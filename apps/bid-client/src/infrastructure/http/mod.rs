//! Price-Update HTTP Adapter
//!
//! Implements [`PriceUpdatePort`](crate::application::ports::PriceUpdatePort)
//! against `POST /api/items/{itemId}/price`.

mod api_types;
mod client;

pub use api_types::{ErrorResponse, FALLBACK_ERROR_MESSAGE};
pub use client::{ApiClientError, BodyFormat, DEFAULT_TIMEOUT, PriceApiClient};
