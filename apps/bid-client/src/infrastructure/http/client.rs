//! HTTP client for the authoritative price-update endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};

use super::api_types::{PriceBody, error_message};
use crate::application::ports::{ItemConfirmation, PriceUpdateError, PriceUpdatePort};
use crate::domain::bidding::BidRequest;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Shape of the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyFormat {
    /// The bare number (`19.99`) under a JSON content type. A bare number
    /// is itself a valid JSON document.
    #[default]
    Raw,
    /// A JSON object, `{"price": 19.99}`.
    Json,
}

impl BodyFormat {
    /// Get the format name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Json => "json",
        }
    }
}

impl std::str::FromStr for BodyFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown body format '{other}', expected raw or json")),
        }
    }
}

/// Errors building the client.
#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    /// The base URL cannot hold path segments.
    #[error("invalid base url '{url}': {message}")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
        /// Error details.
        message: String,
    },

    /// The underlying HTTP client could not be built.
    #[error("failed to build http client: {0}")]
    Build(String),
}

/// Client for `POST /api/items/{itemId}/price`.
#[derive(Debug, Clone)]
pub struct PriceApiClient {
    client: Client,
    base_url: Url,
    body_format: BodyFormat,
}

impl PriceApiClient {
    /// Create a client for the API rooted at `base_url`.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        body_format: BodyFormat,
    ) -> Result<Self, ApiClientError> {
        let base_url = Url::parse(base_url).map_err(|e| ApiClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiClientError::InvalidBaseUrl {
                url: base_url.to_string(),
                message: "not a hierarchical url".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiClientError::Build(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            body_format,
        })
    }

    /// URL of the price resource for `item_id`, with the id percent-encoded
    /// as a single path segment.
    #[must_use]
    pub fn price_url(&self, item_id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["api", "items", item_id, "price"]);
        }
        url
    }

    fn body(&self, bid: &BidRequest) -> String {
        match self.body_format {
            BodyFormat::Raw => bid.price_text(),
            BodyFormat::Json => serde_json::to_string(&PriceBody { price: bid.price() })
                .unwrap_or_else(|_| format!("{{\"price\":{}}}", bid.price_text())),
        }
    }
}

#[async_trait]
impl PriceUpdatePort for PriceApiClient {
    async fn update_price(&self, bid: &BidRequest) -> Result<ItemConfirmation, PriceUpdateError> {
        let url = self.price_url(bid.item_id());
        tracing::debug!(%url, format = self.body_format.as_str(), "Posting price update");

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(self.body(bid))
            .send()
            .await
            .map_err(|e| PriceUpdateError::Unreachable {
                message: e.to_string(),
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| PriceUpdateError::Unreachable {
                message: e.to_string(),
            })?;

        if !status.is_success() {
            return Err(PriceUpdateError::Rejected {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        if text.trim().is_empty() {
            return Ok(ItemConfirmation::from_payload(serde_json::Value::Null));
        }

        let payload: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| PriceUpdateError::InvalidResponse {
                message: e.to_string(),
            })?;

        Ok(ItemConfirmation::from_payload(payload))
    }
}
