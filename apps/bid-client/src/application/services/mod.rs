//! Application Services
//!
//! Services that orchestrate domain logic and coordinate between ports.
//!
//! - `PriceFeed`: Decodes live feed frames into price sink updates
//! - `BidSubmitter`: Validates bids and sends them down both channels

mod bid_submitter;
mod price_feed;

pub use bid_submitter::{
    BidSubmitter, BroadcastOutcome, Confirmation, SubmissionResult, SubmissionWarning, SubmitError,
};
pub use price_feed::PriceFeed;
