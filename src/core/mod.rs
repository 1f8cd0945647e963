//! Core business logic - framework-agnostic search, pricing, ordering and favorites.
//!
//! Everything in here works on plain domain models. Time is always injected
//! through [`clock::Clock`] and storage through [`crate::storage::KeyValueStore`],
//! so the same code runs against the system clock and SQLite in the binary and
//! against manual clocks and in-memory stores in tests.

/// Shopping cart, session credit and simulated checkout
pub mod cart;
/// Injected time sources
pub mod clock;
/// Favorite venues persisted through a key-value backend
pub mod favorites;
/// Per-criterion venue predicates and the criteria type
pub mod filter;
/// Live order state machine and elapsed-time formatting
pub mod orders;
/// Booking and cart price computation
pub mod pricing;
/// Venue catalog and the search orchestrator
pub mod search;
/// Timer-driven kitchen display view
pub mod ticker;
