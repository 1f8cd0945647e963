use crate::{
    entities::{StorageEntry, storage_entry},
    errors::Result,
    storage::KeyValueStore,
};
use sea_orm::{Set, prelude::*};
use tracing::trace;

/// Key-value store persisted in the `storage_entries` table.
#[derive(Debug, Clone)]
pub struct DatabaseStore {
    db: DatabaseConnection,
}

impl DatabaseStore {
    /// Wraps a connection whose tables were created with
    /// [`crate::config::database::create_tables`].
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find(&self, key: &str) -> Result<Option<storage_entry::Model>> {
        StorageEntry::find()
            .filter(storage_entry::Column::Key.eq(key))
            .one(&self.db)
            .await
            .map_err(Into::into)
    }
}

impl KeyValueStore for DatabaseStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.find(key).await?.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let now = chrono::Utc::now().naive_utc();

        if let Some(entry) = self.find(key).await? {
            let mut active_model: storage_entry::ActiveModel = entry.into();
            active_model.value = Set(value.to_string());
            active_model.updated_at = Set(now);
            active_model.update(&self.db).await?;
        } else {
            let new_entry = storage_entry::ActiveModel {
                key: Set(key.to_string()),
                value: Set(value.to_string()),
                updated_at: Set(now),
                ..Default::default()
            };
            new_entry.insert(&self.db).await?;
        }

        trace!("Stored {} bytes under {key}", value.len());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        StorageEntry::delete_many()
            .filter(storage_entry::Column::Key.eq(key))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_set_inserts_then_updates() -> Result<()> {
        let db = setup_test_db().await?;
        let store = DatabaseStore::new(db.clone());

        assert_eq!(store.get("workoutFavorites").await?, None);

        store.set("workoutFavorites", "[1]").await?;
        store.set("workoutFavorites", "[1,2]").await?;
        assert_eq!(store.get("workoutFavorites").await?.as_deref(), Some("[1,2]"));

        // updated in place, not duplicated
        let rows = StorageEntry::find().all(&db).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key, "workoutFavorites");
        Ok(())
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let store = DatabaseStore::new(db);

        store.set("a", "1").await?;
        store.set("b", "2").await?;
        store.remove("a").await?;
        store.remove("a").await?;

        assert_eq!(store.get("a").await?, None);
        assert_eq!(store.get("b").await?.as_deref(), Some("2"));
        Ok(())
    }
}
