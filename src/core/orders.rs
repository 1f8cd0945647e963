//! Live order state machine.
//!
//! Kitchen staff move orders through
//! `pending -> preparing -> (ready ->) completed`, or reject them straight to
//! `cancelled`. Completed and cancelled orders never change again. This module
//! only holds the board and its transitions; timers live in
//! [`crate::core::ticker`].

use crate::{
    errors::{Error, Result},
    models::{LiveOrder, OrderStatus},
};
use chrono::{DateTime, Utc};
use std::fmt;
use tracing::info;

/// Something a staff member can do to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffAction {
    Accept,
    Reject,
    MarkReady,
    Complete,
}

impl StaffAction {
    /// Status reached by applying this action to an order in `from`, if allowed.
    #[must_use]
    pub const fn apply_to(self, from: OrderStatus) -> Option<OrderStatus> {
        match (self, from) {
            (Self::Accept, OrderStatus::Pending) => Some(OrderStatus::Preparing),
            (Self::Reject, OrderStatus::Pending) => Some(OrderStatus::Cancelled),
            (Self::MarkReady, OrderStatus::Preparing) => Some(OrderStatus::Ready),
            (Self::Complete, OrderStatus::Preparing | OrderStatus::Ready) => {
                Some(OrderStatus::Completed)
            }
            _ => None,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::MarkReady => "mark ready",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for StaffAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formats whole seconds since `created_at` as `"Xm Ys"`. Future timestamps read as `0m 0s`.
#[must_use]
pub fn format_elapsed(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - created_at).num_seconds().max(0);
    format!("{}m {}s", seconds / 60, seconds % 60)
}

/// The set of orders currently shown on the kitchen display.
#[derive(Debug, Clone, Default)]
pub struct OrderBoard {
    orders: Vec<LiveOrder>,
}

impl OrderBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Orders in the order they were added.
    #[must_use]
    pub fn orders(&self) -> &[LiveOrder] {
        &self.orders
    }

    #[must_use]
    pub fn get(&self, order_id: &str) -> Option<&LiveOrder> {
        self.orders.iter().find(|order| order.id == order_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Puts a new order on the board.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if an order with the same id is already shown.
    pub fn add(&mut self, order: LiveOrder) -> Result<()> {
        if self.get(&order.id).is_some() {
            return Err(Error::validation(format!(
                "order {} is already on the board",
                order.id
            )));
        }
        self.orders.push(order);
        Ok(())
    }

    /// Applies a staff action and returns the order's new status.
    ///
    /// # Errors
    /// - [`Error::OrderNotFound`] if the order is not on the board
    /// - [`Error::InvalidTransition`] if the action is not allowed from the current status
    pub fn apply(&mut self, order_id: &str, action: StaffAction) -> Result<OrderStatus> {
        let order = self
            .orders
            .iter_mut()
            .find(|order| order.id == order_id)
            .ok_or_else(|| Error::OrderNotFound {
                id: order_id.to_string(),
            })?;

        let next = action
            .apply_to(order.status)
            .ok_or_else(|| Error::InvalidTransition {
                order_id: order_id.to_string(),
                from: order.status.to_string(),
                action: action.to_string(),
            })?;

        info!("Order {} {} -> {}", order.id, order.status, next);
        order.status = next;
        Ok(next)
    }

    /// Recomputes every order's elapsed-time label.
    pub fn refresh_elapsed(&mut self, now: DateTime<Utc>) {
        for order in &mut self.orders {
            order.time_since_creation = format_elapsed(order.created_at, now);
        }
    }

    /// Takes a completed or cancelled order off the board.
    ///
    /// Returns `None` (and leaves the board alone) if the order is gone or still active.
    pub fn remove_settled(&mut self, order_id: &str) -> Option<LiveOrder> {
        let index = self
            .orders
            .iter()
            .position(|order| order.id == order_id && order.status.is_terminal())?;
        Some(self.orders.remove(index))
    }
}
