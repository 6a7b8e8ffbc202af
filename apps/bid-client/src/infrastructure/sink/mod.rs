//! Price Sink Adapters
//!
//! - [`PriceBoard`]: In-memory board that renders only bound items
//! - [`ConsoleSink`]: Prints one line per update

mod board;
mod console;

pub use board::{BoardEntry, PriceBoard};
pub use console::ConsoleSink;
