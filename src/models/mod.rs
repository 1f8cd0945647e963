//! Domain models shared by the search, pricing and order modules.
//!
//! These types are plain serde-friendly records. Catalog entries are loaded from
//! configuration and never mutated afterwards; order types are ephemeral and live
//! only as long as the cart or kitchen display that owns them.

/// Cart lines, menu items and live kitchen orders
pub mod order;
/// Venue catalog entries and their nested records
pub mod venue;

pub use order::{LiveOrder, MenuItem, OrderItem, OrderStatus};
pub use venue::{Coordinates, DayHours, Feature, Features, Location, Venue};
