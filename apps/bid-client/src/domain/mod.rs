//! Domain Layer - Core pricing and bidding types.
//!
//! Pure types with no I/O: decoded price updates, validated bid requests
//! and the price formatting rules shared by the wire codec and the sinks.

/// Price updates, price parsing and display labels.
pub mod pricing;

/// Bid requests and their validation.
pub mod bidding;
