//! Key-value storage backends.
//!
//! The favorites store (and anything else that used browser local storage)
//! talks to a [`KeyValueStore`] rather than a concrete backend, so the binary
//! can persist to SQLite while tests use [`MemoryStore`].

use crate::errors::Result;
use std::future::Future;

/// SQLite-backed store using the `storage_entries` table
pub mod database;
/// Process-local store
pub mod memory;

pub use database::DatabaseStore;
pub use memory::MemoryStore;

/// String-keyed, string-valued storage.
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, if any.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<()>> + Send;

    /// Deletes `key`. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> impl Future<Output = Result<()>> + Send;
}
