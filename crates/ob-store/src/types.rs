use std::fmt;

use serde::{Deserialize, Serialize};

/// Table label used when an order is created without one.
pub const DEFAULT_TABLE_NAME: &str = "ToGo";

/// Lifecycle status of an order.
///
/// The nominal flow is `New -> Preparing -> Completed`, but there is no
/// transition table: any status may be set from any other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    New,
    Preparing,
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validated line of an order. `qty` is always >= 1.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub qty: u32,
}

/// An active order as broadcast to every client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Store-assigned UUID; immutable.
    pub id: String,
    /// Human-facing sequential number; immutable.
    pub number: u64,
    /// Display order = insertion order. Replaced wholesale on edit.
    pub items: Vec<Item>,
    pub table_name: String,
    pub notes: String,
    pub status: OrderStatus,
    /// Epoch milliseconds at creation.
    pub created_at: i64,
}
