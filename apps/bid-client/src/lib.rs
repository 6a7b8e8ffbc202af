#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value
    )
)]

//! Bid Client - Live Item Prices and Bid Submission
//!
//! Keeps one resilient WebSocket connection to the auction's price feed and
//! submits bids over two independent channels: a best-effort broadcast on
//! that connection and an authoritative HTTP price update.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Pure types with no I/O
//!   - `pricing`: Price updates, parsing and `$` labels
//!   - `bidding`: Validated bid requests
//!
//! - **Application**: Ports and services
//!   - `ports`: Connection handler, price sink, push channel, price endpoint
//!   - `services`: `PriceFeed` (frames → sink), `BidSubmitter`
//!
//! - **Infrastructure**: Adapters and external integrations
//!   - `websocket`: Frame codec, reconnect policy, `ConnectionManager`
//!   - `http`: reqwest client for `POST /api/items/{id}/price`
//!   - `sink`: Price board and console sink
//!   - `config`, `telemetry`, `metrics`: Ambient concerns
//!
//! # Data Flow
//!
//! ```text
//!                  frames           decode          on_price_update
//! price feed WS ──────────► Manager ──────► PriceFeed ──────────────► PriceSink
//!        ▲
//!        │ ITEM_ID:PRICE (if open)
//!        │
//!   BidSubmitter ───────────────────► POST /api/items/{id}/price (always)
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Domain layer - Prices and bids.
pub mod domain;

/// Application layer - Ports and services.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// Domain types
pub use domain::bidding::{BidError, BidRequest};
pub use domain::pricing::{PriceUpdate, price_label};

// Ports and services
pub use application::ports::{
    ConnectionHandler, ItemConfirmation, PriceSink, PriceUpdateError, PriceUpdatePort, PushChannel,
};
pub use application::services::{
    BidSubmitter, BroadcastOutcome, Confirmation, PriceFeed, SubmissionResult, SubmissionWarning,
    SubmitError,
};

// Live feed
pub use infrastructure::websocket::{
    CloseEvent, CodecError, ConnectionConfig, ConnectionError, ConnectionManager, ConnectionState,
    decode, encode,
};

// Price endpoint
pub use infrastructure::http::{ApiClientError, BodyFormat, PriceApiClient};

// Sinks
pub use infrastructure::sink::{ConsoleSink, PriceBoard};

// Config
pub use infrastructure::config::{ClientConfig, ConfigError};

// Metrics
pub use infrastructure::metrics::init_metrics;

// Telemetry
pub use infrastructure::telemetry::{TelemetryConfig, TelemetryGuard, init as init_telemetry};
