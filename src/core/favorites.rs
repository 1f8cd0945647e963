//! Favorite venues.
//!
//! Favorites are a JSON array of venue ids stored under [`FAVORITES_KEY`].
//! A missing entry is an empty list. A malformed entry is logged and also
//! read as empty, then overwritten by the next toggle.

use crate::{
    core::search::Catalog,
    errors::{Error, Result},
    models::Venue,
    storage::KeyValueStore,
};
use tracing::{debug, warn};

/// Storage key holding the favorites list.
pub const FAVORITES_KEY: &str = "workoutFavorites";

/// Repository for the user's favorite venue ids.
#[derive(Debug, Clone)]
pub struct FavoritesStore<S> {
    storage: S,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Favorite venue ids in the order they were added.
    ///
    /// # Errors
    /// Returns an error only if the storage backend itself fails.
    pub async fn get(&self) -> Result<Vec<i64>> {
        let Some(raw) = self.storage.get(FAVORITES_KEY).await? else {
            return Ok(Vec::new());
        };

        match parse_favorites(&raw) {
            Ok(ids) => Ok(ids),
            Err(e) => {
                warn!("Ignoring {e}");
                Ok(Vec::new())
            }
        }
    }

    /// Adds `venue_id` if absent, removes it if present, and persists the list.
    ///
    /// Returns whether the venue is a favorite afterwards.
    ///
    /// # Errors
    /// Returns an error if the storage backend fails to read or write.
    pub async fn toggle(&self, venue_id: i64) -> Result<bool> {
        let mut ids = self.get().await?;

        let now_favorite = if ids.contains(&venue_id) {
            ids.retain(|id| *id != venue_id);
            false
        } else {
            ids.push(venue_id);
            true
        };

        self.storage
            .set(FAVORITES_KEY, &serde_json::to_string(&ids)?)
            .await?;
        debug!("Venue {venue_id} favorite: {now_favorite}");
        Ok(now_favorite)
    }

    /// # Errors
    /// Returns an error if the storage backend fails.
    pub async fn is_favorite(&self, venue_id: i64) -> Result<bool> {
        Ok(self.get().await?.contains(&venue_id))
    }

    /// Resolves the favorites against the catalog, skipping ids it no longer lists.
    ///
    /// # Errors
    /// Returns an error if the storage backend fails.
    pub async fn venues<'a>(&self, catalog: &'a Catalog) -> Result<Vec<&'a Venue>> {
        let ids = self.get().await?;
        Ok(ids
            .into_iter()
            .filter_map(|id| {
                let venue = catalog.get_venue_by_id(id);
                if venue.is_none() {
                    debug!("Favorite venue {id} is not in the catalog");
                }
                venue
            })
            .collect())
    }
}

/// Decodes a stored favorites list.
///
/// # Errors
/// Returns [`Error::Storage`] if `raw` is not a JSON array of venue ids.
pub fn parse_favorites(raw: &str) -> Result<Vec<i64>> {
    serde_json::from_str(raw).map_err(|e| Error::Storage {
        message: format!("malformed {FAVORITES_KEY} entry {raw:?}: {e}"),
    })
}
