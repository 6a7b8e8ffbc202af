//! WebSocket Infrastructure for the Live Price Feed
//!
//! The feed is a text-only duplex channel (e.g. `ws://localhost:4567/precios`)
//! carrying `ITEM_ID:PRICE` frames in both directions.
//!
//! # Architecture
//!
//! - [`ConnectionManager`]: Owns the single connection and its reconnect loop
//! - [`ReconnectPolicy`]: Fixed delay, unlimited attempts
//! - [`decode`] / [`encode`]: The `ITEM_ID:PRICE` frame codec

mod codec;
mod manager;
mod reconnect;
mod types;

pub use codec::{CodecError, DELIMITER, decode, encode};
pub use manager::ConnectionManager;
pub use reconnect::ReconnectPolicy;
pub use types::{
    CloseEvent, ConnectionConfig, ConnectionError, ConnectionState, DEFAULT_RECONNECT_DELAY,
};
