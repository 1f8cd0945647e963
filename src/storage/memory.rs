use crate::{errors::Result, storage::KeyValueStore};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

/// In-memory key-value store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() -> Result<()> {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").await?, None);

        store.set("k", "v1").await?;
        store.set("k", "v2").await?;
        assert_eq!(store.get("k").await?.as_deref(), Some("v2"));

        let shared = store.clone();
        shared.remove("k").await?;
        shared.remove("k").await?;
        assert_eq!(store.get("k").await?, None);
        Ok(())
    }
}
