//! Order models - menu items, cart lines and live kitchen orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Something a venue sells for in-venue ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Identifier, unique within the venue's menu
    pub id: i64,
    pub name: String,
    /// Unit price in currency units
    pub price: f64,
    /// Menu section ("Coffee", "Pastries", ...)
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// One line of a cart or receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Menu item id this line was created from
    pub id: i64,
    pub name: String,
    /// Unit price in currency units
    pub price: f64,
    /// Always at least 1
    pub quantity: u32,
    /// Free-text request ("oat milk", "no sugar")
    #[serde(default)]
    pub note: Option<String>,
}

impl OrderItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

impl From<&MenuItem> for OrderItem {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            price: item.price,
            quantity: 1,
            note: None,
        }
    }
}

/// Preparation status of a live order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Lowercase name used in logs and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Completed and cancelled orders never change again.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An order shown on the venue's kitchen display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveOrder {
    /// Display id ("ORD-1042")
    pub id: String,
    /// Table or seat label the order is delivered to
    pub table: String,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    /// When the order was placed
    pub created_at: DateTime<Utc>,
    /// `"Xm Ys"` label, refreshed by the order board's tick
    #[serde(default)]
    pub time_since_creation: String,
}

impl LiveOrder {
    /// Creates an order with an empty elapsed-time label.
    pub fn new(
        id: impl Into<String>,
        table: impl Into<String>,
        items: Vec<OrderItem>,
        status: OrderStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            table: table.into(),
            items,
            status,
            created_at,
            time_since_creation: String::new(),
        }
    }

    /// Sum of the order's line totals.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.items.iter().map(OrderItem::line_total).sum()
    }
}
