use thiserror::Error;

/// Unified error type for venue search, pricing, orders and storage.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input to a filter, pricing or catalog operation
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable description of what was rejected
        message: String,
    },

    /// A time of day that is not a valid "HH:MM" string
    #[error("Invalid time of day: {value:?} (expected HH:MM)")]
    InvalidTime {
        /// The offending input
        value: String,
    },

    /// A price, bound or credit amount that is negative or not finite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The offending amount
        amount: f64,
    },

    #[error("Venue not found: {id}")]
    VenueNotFound {
        /// Requested venue id
        id: i64,
    },

    #[error("Order not found: {id}")]
    OrderNotFound {
        /// Requested order id
        id: String,
    },

    /// A staff action that the order's current status does not allow
    #[error("Cannot {action} order {order_id} while it is {from}")]
    InvalidTransition {
        /// Order the action was applied to
        order_id: String,
        /// Status the order was in
        from: String,
        /// Attempted action (accept, reject, ...)
        action: String,
    },

    #[error("Insufficient credit: available {available:.2}, required {required:.2}")]
    InsufficientCredit {
        /// Credit left in the session account
        available: f64,
        /// Total the checkout needed
        required: f64,
    },

    /// Persisted data that cannot be decoded
    #[error("Storage error: {message}")]
    Storage {
        /// What was wrong with the stored value
        message: String,
    },

    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong while loading configuration
        message: String,
    },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for building a [`Error::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
