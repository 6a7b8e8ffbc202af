//! Application Layer - Use cases and port definitions.
//!
//! This layer contains the application services and port interfaces
//! that define how the bidding core interacts with external systems.

/// Port interfaces for external systems (live feed, price endpoint, sinks).
pub mod ports;

/// Application services for the price feed and bid submission.
pub mod services;
