//! Prize model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A prize category with a stock of identical items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prize {
    pub id: String,
    pub name: String,
    /// Remaining items
    pub quantity: u32,
    /// Stock at creation, only used for progress display
    pub initial_quantity: u32,
    #[serde(default)]
    pub info: String,
    /// CSS-style color, e.g. `#FFD700`
    pub color: String,
}

impl Prize {
    pub fn new(name: impl Into<String>, quantity: u32, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            quantity,
            initial_quantity: quantity,
            info: String::new(),
            color: color.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = info.into();
        self
    }

    pub fn is_exhausted(&self) -> bool {
        self.quantity == 0
    }

    /// Remove one item after a confirmed win. Never goes below zero.
    pub fn decrement(&mut self) {
        self.quantity = self.quantity.saturating_sub(1);
    }

    /// Admin edit of the remaining stock; the initial stock grows to match
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
        self.initial_quantity = self.initial_quantity.max(quantity);
    }

    /// Fraction of the stock already given away, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        if self.initial_quantity == 0 {
            return 1.0;
        }
        let given = self.initial_quantity.saturating_sub(self.quantity);
        given as f64 / self.initial_quantity as f64
    }
}
