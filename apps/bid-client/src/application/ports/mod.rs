//! Port Interfaces
//!
//! Defines the interfaces (ports) between the bidding core and the outside
//! world following the Hexagonal Architecture pattern.
//!
//! ## Driven Ports (Outbound)
//!
//! - `PriceSink`: Receives every decoded price update (UI side)
//! - `PushChannel`: Observed view of the live feed used for bid broadcasts
//! - `PriceUpdatePort`: Authoritative request/response price endpoint
//!
//! ## Driver Ports (Inbound)
//!
//! - `ConnectionHandler`: Reactions the connection manager invokes on
//!   open, message, error and close

mod connection_handler_port;
mod price_sink_port;
mod price_update_port;
mod push_channel_port;

pub use connection_handler_port::ConnectionHandler;
pub use price_sink_port::PriceSink;
pub use price_update_port::{ItemConfirmation, PriceUpdateError, PriceUpdatePort};
pub use push_channel_port::PushChannel;

#[cfg(test)]
pub use price_sink_port::MockPriceSink;
#[cfg(test)]
pub use price_update_port::MockPriceUpdatePort;
#[cfg(test)]
pub use push_channel_port::MockPushChannel;
