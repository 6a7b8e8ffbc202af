//! In-memory price board.
//!
//! Mirrors a page of price elements: only items that were bound to the
//! board are rendered. Updates for anything else are logged and dropped.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;

use crate::application::ports::PriceSink;
use crate::domain::pricing::price_label;

/// The rendered state of one bound item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardEntry {
    /// Last received price, if any.
    pub price: Option<Decimal>,
    /// Display label, e.g. `$19.99`. Empty until the first update.
    pub label: String,
    /// When the last update arrived.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Price sink keyed by bound item id.
#[derive(Debug, Default)]
pub struct PriceBoard {
    entries: RwLock<HashMap<String, BoardEntry>>,
}

impl PriceBoard {
    /// Create an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `item_id` so its updates are rendered.
    ///
    /// `initial` is the label shown before the first update. Rebinding keeps
    /// the current entry.
    pub fn bind(&self, item_id: impl Into<String>, initial: Option<Decimal>) {
        self.entries
            .write()
            .entry(item_id.into())
            .or_insert_with(|| BoardEntry {
                price: initial,
                label: initial.map(price_label).unwrap_or_default(),
                updated_at: None,
            });
    }

    /// Check if `item_id` is bound.
    #[must_use]
    pub fn is_bound(&self, item_id: &str) -> bool {
        self.entries.read().contains_key(item_id)
    }

    /// Current label of `item_id`, if bound.
    #[must_use]
    pub fn label(&self, item_id: &str) -> Option<String> {
        self.entries.read().get(item_id).map(|e| e.label.clone())
    }

    /// Snapshot of one entry.
    #[must_use]
    pub fn entry(&self, item_id: &str) -> Option<BoardEntry> {
        self.entries.read().get(item_id).cloned()
    }

    /// Number of bound items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl PriceSink for PriceBoard {
    fn on_price_update(&self, item_id: &str, price: Decimal) {
        let mut entries = self.entries.write();
        let Some(entry) = entries.get_mut(item_id) else {
            tracing::warn!(item_id, "No price element bound for item");
            return;
        };

        entry.price = Some(price);
        entry.label = price_label(price);
        entry.updated_at = Some(Utc::now());
    }
}
