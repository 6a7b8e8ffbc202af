//! Bid Submitter Service
//!
//! A bid travels over two independent channels:
//!
//! 1. **Broadcast** (best effort): if the live feed is open the bid is
//!    written to it as an `ITEM_ID:PRICE` frame so other viewers see it
//!    immediately. A closed feed skips this step without failing the bid.
//! 2. **Authoritative update**: the price-update endpoint is always called
//!    once validation passes, and its answer alone decides the outcome.
//!
//! Invalid input fails before either channel is touched.

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use crate::application::ports::{ItemConfirmation, PriceUpdateError, PriceUpdatePort, PushChannel};
use crate::domain::bidding::{BidError, BidRequest};
use crate::infrastructure::metrics::{self, BidOutcome};
use crate::infrastructure::websocket::encode;

/// What happened to the broadcast step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastOutcome {
    /// The frame was written to the live feed.
    Sent,
    /// The feed was not open; nothing was written.
    Skipped,
}

/// A non-fatal condition attached to a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionWarning {
    /// The price was stored but not broadcast, so other viewers only see
    /// it after their own refresh.
    BroadcastSkipped,
}

impl fmt::Display for SubmissionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BroadcastSkipped => f.write_str(
                "price updated, but live updates are offline: other viewers will see it after refreshing",
            ),
        }
    }
}

/// A bid accepted by the authoritative endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    /// Correlation id for logs.
    pub submission_id: Uuid,
    /// Item the bid was for.
    pub item_id: String,
    /// Validated bid price.
    pub price: Decimal,
    /// Broadcast step outcome.
    pub broadcast: BroadcastOutcome,
    /// Updated item returned by the endpoint.
    pub item: ItemConfirmation,
}

impl Confirmation {
    /// Warning to show alongside the success, if any.
    #[must_use]
    pub const fn warning(&self) -> Option<SubmissionWarning> {
        match self.broadcast {
            BroadcastOutcome::Sent => None,
            BroadcastOutcome::Skipped => Some(SubmissionWarning::BroadcastSkipped),
        }
    }
}

/// Submission errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The price input is not a finite number greater than zero.
    #[error("invalid price '{input}': enter a number greater than 0")]
    InvalidPrice {
        /// The rejected raw input.
        input: String,
    },

    /// The item id was empty.
    #[error("item id cannot be empty")]
    InvalidItem,

    /// The endpoint refused the bid.
    #[error("{message}")]
    RemoteRejected {
        /// HTTP status code.
        status: u16,
        /// Server-provided message, or a generic fallback.
        message: String,
    },

    /// The endpoint could not be reached.
    #[error("could not reach the price service: {message}")]
    Unreachable {
        /// Error details.
        message: String,
    },

    /// The endpoint answered success with an unreadable body.
    #[error("unexpected response from the price service: {message}")]
    InvalidResponse {
        /// Error details.
        message: String,
    },
}

impl From<BidError> for SubmitError {
    fn from(err: BidError) -> Self {
        match err {
            BidError::InvalidPrice { input } => Self::InvalidPrice { input },
            BidError::EmptyItemId => Self::InvalidItem,
        }
    }
}

impl From<PriceUpdateError> for SubmitError {
    fn from(err: PriceUpdateError) -> Self {
        match err {
            PriceUpdateError::Rejected { status, message } => {
                Self::RemoteRejected { status, message }
            }
            PriceUpdateError::Unreachable { message } => Self::Unreachable { message },
            PriceUpdateError::InvalidResponse { message } => Self::InvalidResponse { message },
        }
    }
}

impl SubmitError {
    const fn outcome(&self) -> BidOutcome {
        match self {
            Self::InvalidPrice { .. } | Self::InvalidItem => BidOutcome::Invalid,
            Self::RemoteRejected { .. } => BidOutcome::Rejected,
            Self::Unreachable { .. } | Self::InvalidResponse { .. } => BidOutcome::Failed,
        }
    }
}

/// Flat result for callers that only display the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionResult {
    /// Whether the authoritative update succeeded.
    pub ok: bool,
    /// Text for the user: the error, or the warning on a degraded success.
    pub message: Option<String>,
    /// Set when `ok` is true but the broadcast was skipped.
    pub warning: Option<SubmissionWarning>,
}

impl From<&Result<Confirmation, SubmitError>> for SubmissionResult {
    fn from(result: &Result<Confirmation, SubmitError>) -> Self {
        match result {
            Ok(confirmation) => {
                let warning = confirmation.warning();
                Self {
                    ok: true,
                    message: warning.map(|w| w.to_string()),
                    warning,
                }
            }
            Err(e) => Self {
                ok: false,
                message: Some(e.to_string()),
                warning: None,
            },
        }
    }
}

impl From<Result<Confirmation, SubmitError>> for SubmissionResult {
    fn from(result: Result<Confirmation, SubmitError>) -> Self {
        Self::from(&result)
    }
}

/// Validates bids and sends them down both channels.
pub struct BidSubmitter<P: PriceUpdatePort> {
    api: P,
}

impl<P: PriceUpdatePort> BidSubmitter<P> {
    /// Create a submitter backed by `api`.
    #[must_use]
    pub const fn new(api: P) -> Self {
        Self { api }
    }

    /// Submit a bid of `raw_price_input` on `item_id`.
    ///
    /// `channel` is only observed: it is written to when open and otherwise
    /// left alone.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::InvalidPrice`] or [`SubmitError::InvalidItem`]
    /// without any channel or network activity when validation fails, and
    /// the mapped [`PriceUpdateError`] when the authoritative call fails.
    pub async fn submit<C>(
        &self,
        item_id: &str,
        raw_price_input: &str,
        channel: &C,
    ) -> Result<Confirmation, SubmitError>
    where
        C: PushChannel + ?Sized,
    {
        let submission_id = Uuid::new_v4();
        let span = tracing::info_span!("submit_bid", %submission_id, item_id);

        let result = self
            .submit_inner(submission_id, item_id, raw_price_input, channel)
            .instrument(span)
            .await;

        let outcome = match &result {
            Ok(_) => BidOutcome::Accepted,
            Err(e) => e.outcome(),
        };
        metrics::record_bid_submission(outcome);

        result
    }

    async fn submit_inner<C>(
        &self,
        submission_id: Uuid,
        item_id: &str,
        raw_price_input: &str,
        channel: &C,
    ) -> Result<Confirmation, SubmitError>
    where
        C: PushChannel + ?Sized,
    {
        let bid = BidRequest::parse(item_id, raw_price_input).inspect_err(|e| {
            tracing::info!(error = %e, "Bid rejected locally");
        })?;

        let broadcast = broadcast(&bid, channel);

        let item = self.api.update_price(&bid).await.map_err(|e| {
            tracing::warn!(error = %e, "Price update failed");
            SubmitError::from(e)
        })?;

        tracing::info!(price = %bid.price(), ?broadcast, "Bid accepted");

        Ok(Confirmation {
            submission_id,
            item_id: bid.item_id().to_string(),
            price: bid.price(),
            broadcast,
            item,
        })
    }
}

/// Best-effort write to the live feed. Never fails the submission.
fn broadcast<C: PushChannel + ?Sized>(bid: &BidRequest, channel: &C) -> BroadcastOutcome {
    if channel.is_open() && channel.send(&encode(bid.item_id(), bid.price())) {
        return BroadcastOutcome::Sent;
    }

    metrics::record_broadcast_skipped();
    tracing::warn!("Live feed not open, bid not broadcast");
    BroadcastOutcome::Skipped
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use serde_json::json;

    use super::*;
    use crate::application::ports::{MockPriceUpdatePort, MockPushChannel};

    fn confirmed(price: f64) -> ItemConfirmation {
        ItemConfirmation::from_payload(json!({ "id": "42", "price": price }))
    }

    #[tokio::test]
    async fn invalid_price_touches_nothing() {
        let mut api = MockPriceUpdatePort::new();
        api.expect_update_price().times(0);
        let mut channel = MockPushChannel::new();
        channel.expect_is_open().times(0);
        channel.expect_send().times(0);

        let submitter = BidSubmitter::new(api);
        let err = submitter.submit("42", "-5", &channel).await.unwrap_err();

        assert_eq!(
            err,
            SubmitError::InvalidPrice {
                input: "-5".to_string()
            }
        );
    }

    #[tokio::test]
    async fn empty_item_touches_nothing() {
        let mut api = MockPriceUpdatePort::new();
        api.expect_update_price().times(0);
        let mut channel = MockPushChannel::new();
        channel.expect_send().times(0);

        let submitter = BidSubmitter::new(api);
        let err = submitter.submit("", "10", &channel).await.unwrap_err();

        assert_eq!(err, SubmitError::InvalidItem);
    }

    #[tokio::test]
    async fn open_channel_broadcasts_then_updates() {
        let mut channel = MockPushChannel::new();
        channel.expect_is_open().return_const(true);
        channel
            .expect_send()
            .with(eq("42:19.99"))
            .times(1)
            .return_const(true);

        let mut api = MockPriceUpdatePort::new();
        api.expect_update_price()
            .withf(|bid| bid.item_id() == "42" && bid.price() == Decimal::new(1999, 2))
            .times(1)
            .returning(|_| Ok(confirmed(19.99)));

        let submitter = BidSubmitter::new(api);
        let confirmation = submitter.submit("42", "19.99", &channel).await.unwrap();

        assert_eq!(confirmation.broadcast, BroadcastOutcome::Sent);
        assert!(confirmation.warning().is_none());
        assert_eq!(confirmation.item.price, Some(19.99));

        let result = SubmissionResult::from(Ok(confirmation));
        assert!(result.ok);
        assert!(result.message.is_none());
    }

    #[tokio::test]
    async fn closed_channel_still_updates_with_warning() {
        let mut channel = MockPushChannel::new();
        channel.expect_is_open().return_const(false);
        channel.expect_send().times(0);

        let mut api = MockPriceUpdatePort::new();
        api.expect_update_price()
            .times(1)
            .returning(|_| Ok(confirmed(19.99)));

        let submitter = BidSubmitter::new(api);
        let confirmation = submitter.submit("42", "19.99", &channel).await.unwrap();

        assert_eq!(confirmation.broadcast, BroadcastOutcome::Skipped);
        assert_eq!(
            confirmation.warning(),
            Some(SubmissionWarning::BroadcastSkipped)
        );

        let result = SubmissionResult::from(Ok(confirmation));
        assert!(result.ok);
        assert_eq!(result.warning, Some(SubmissionWarning::BroadcastSkipped));
        assert!(result.message.is_some());
    }

    #[tokio::test]
    async fn failed_send_counts_as_skipped() {
        let mut channel = MockPushChannel::new();
        channel.expect_is_open().return_const(true);
        channel.expect_send().times(1).return_const(false);

        let mut api = MockPriceUpdatePort::new();
        api.expect_update_price()
            .times(1)
            .returning(|_| Ok(confirmed(5.0)));

        let submitter = BidSubmitter::new(api);
        let confirmation = submitter.submit("42", "5", &channel).await.unwrap();

        assert_eq!(confirmation.broadcast, BroadcastOutcome::Skipped);
    }

    #[tokio::test]
    async fn remote_rejection_surfaces_server_message() {
        let mut channel = MockPushChannel::new();
        channel.expect_is_open().return_const(true);
        channel.expect_send().return_const(true);

        let mut api = MockPriceUpdatePort::new();
        api.expect_update_price().times(1).returning(|_| {
            Err(PriceUpdateError::Rejected {
                status: 400,
                message: "too low".to_string(),
            })
        });

        let submitter = BidSubmitter::new(api);
        let result = SubmissionResult::from(submitter.submit("42", "19.99", &channel).await);

        assert!(!result.ok);
        assert_eq!(result.message.as_deref(), Some("too low"));
        assert!(result.warning.is_none());
    }

    #[tokio::test]
    async fn unreachable_endpoint_fails_submission() {
        let mut channel = MockPushChannel::new();
        channel.expect_is_open().return_const(false);

        let mut api = MockPriceUpdatePort::new();
        api.expect_update_price().returning(|_| {
            Err(PriceUpdateError::Unreachable {
                message: "connection refused".to_string(),
            })
        });

        let submitter = BidSubmitter::new(api);
        let err = submitter.submit("42", "1", &channel).await.unwrap_err();

        assert!(matches!(err, SubmitError::Unreachable { .. }));
    }

    #[test]
    fn submit_error_outcomes() {
        assert_eq!(SubmitError::InvalidItem.outcome(), BidOutcome::Invalid);
        assert_eq!(
            SubmitError::RemoteRejected {
                status: 409,
                message: "x".to_string()
            }
            .outcome(),
            BidOutcome::Rejected
        );
        assert_eq!(
            SubmitError::InvalidResponse {
                message: "x".to_string()
            }
            .outcome(),
            BidOutcome::Failed
        );
    }
}
