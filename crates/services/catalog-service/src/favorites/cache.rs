//! Favorite listing ids for one session.
//!
//! The set is read from the client store on first access and mirrored in
//! memory afterwards. Writes push the whole set back as a JSON array in
//! ascending order.

use std::collections::BTreeSet;

use common::{AppError, AppResult};

use super::client_store::ClientStore;

/// Client store slot holding the favorites set
pub const FAVORITES_KEY: &str = "arh:favorites";

pub struct FavoritesCache<S: ClientStore> {
    store: S,
    mirror: Option<BTreeSet<i32>>,
}

impl<S: ClientStore> FavoritesCache<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            mirror: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Favorite ids in ascending order.
    pub async fn all(&mut self) -> Vec<i32> {
        self.loaded().await.iter().copied().collect()
    }

    pub async fn is_favorite(&mut self, id: i32) -> bool {
        self.loaded().await.contains(&id)
    }

    /// Add `id`. Persists only when the set changed.
    pub async fn add(&mut self, id: i32) -> AppResult<()> {
        if self.loaded().await.insert(id) {
            self.persist().await?;
        }
        Ok(())
    }

    /// Remove `id`. Persists only when the set changed.
    pub async fn remove(&mut self, id: i32) -> AppResult<()> {
        if self.loaded().await.remove(&id) {
            self.persist().await?;
        }
        Ok(())
    }

    /// Flip membership of `id`; returns whether it is now a favorite.
    pub async fn toggle(&mut self, id: i32) -> AppResult<bool> {
        let set = self.loaded().await;
        let present = if set.remove(&id) {
            false
        } else {
            set.insert(id);
            true
        };
        self.persist().await?;
        Ok(present)
    }

    async fn loaded(&mut self) -> &mut BTreeSet<i32> {
        if self.mirror.is_none() {
            let set = self.load().await;
            self.mirror = Some(set);
        }
        self.mirror.get_or_insert_with(BTreeSet::new)
    }

    async fn load(&self) -> BTreeSet<i32> {
        let raw = match self.store.get(FAVORITES_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return BTreeSet::new(),
            Err(e) => {
                tracing::warn!("Failed to read favorites: {}", e);
                self.discard().await;
                return BTreeSet::new();
            }
        };

        match serde_json::from_str::<Vec<i32>>(&raw) {
            Ok(ids) => ids.into_iter().collect(),
            Err(e) => {
                tracing::warn!("Discarding corrupt favorites: {}", e);
                self.discard().await;
                BTreeSet::new()
            }
        }
    }

    async fn discard(&self) {
        if let Err(e) = self.store.delete(FAVORITES_KEY).await {
            tracing::debug!("Failed to clear favorites slot: {}", e);
        }
    }

    async fn persist(&self) -> AppResult<()> {
        let ids: Vec<i32> = self
            .mirror
            .as_ref()
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        let json = serde_json::to_string(&ids)
            .map_err(|e| AppError::internal(format!("Serialization error: {}", e)))?;
        self.store.set(FAVORITES_KEY, &json).await.map_err(|e| {
            tracing::warn!("Failed to save favorites: {}", e);
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use mockall::Sequence;

    use super::*;
    use crate::favorites::client_store::MockClientStore;

    #[tokio::test]
    async fn test_toggle_persists_sorted_set() {
        let mut store = MockClientStore::new();
        let mut seq = Sequence::new();
        store
            .expect_get()
            .withf(|key| key == FAVORITES_KEY)
            .times(1)
            .returning(|_| Ok(None));
        store
            .expect_set()
            .withf(|key, value| key == FAVORITES_KEY && value == "[7]")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        store
            .expect_set()
            .withf(|key, value| key == FAVORITES_KEY && value == "[]")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        let mut favorites = FavoritesCache::new(store);

        assert!(favorites.toggle(7).await.unwrap());
        assert!(!favorites.toggle(7).await.unwrap());
        assert!(favorites.all().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_slot_is_discarded() {
        let mut store = MockClientStore::new();
        store
            .expect_get()
            .times(1)
            .returning(|_| Ok(Some("not json".to_string())));
        store
            .expect_delete()
            .withf(|key| key == FAVORITES_KEY)
            .times(1)
            .returning(|_| Err(AppError::internal("slot locked")));

        let mut favorites = FavoritesCache::new(store);

        assert!(favorites.all().await.is_empty());
        assert!(!favorites.is_favorite(1).await);
    }

    #[tokio::test]
    async fn test_load_failure_yields_empty_set() {
        let mut store = MockClientStore::new();
        store
            .expect_get()
            .times(1)
            .returning(|_| Err(AppError::storage_unavailable("offline")));
        store.expect_delete().times(1).returning(|_| Ok(()));

        let mut favorites = FavoritesCache::new(store);

        assert_eq!(favorites.all().await, Vec::<i32>::new());
    }

    #[tokio::test]
    async fn test_add_and_remove_skip_unchanged_writes() {
        let mut store = MockClientStore::new();
        store
            .expect_get()
            .times(1)
            .returning(|_| Ok(Some("[3,1]".to_string())));
        store
            .expect_set()
            .withf(|key, value| key == FAVORITES_KEY && value == "[1,2,3]")
            .times(1)
            .returning(|_, _| Ok(()));

        let mut favorites = FavoritesCache::new(store);

        favorites.add(3).await.unwrap();
        favorites.add(2).await.unwrap();
        favorites.remove(9).await.unwrap();
        assert_eq!(favorites.all().await, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_failed_persist_keeps_mirror() {
        let mut store = MockClientStore::new();
        store.expect_get().times(1).returning(|_| Ok(None));
        store
            .expect_set()
            .times(1)
            .returning(|_, _| Err(AppError::internal("quota exceeded")));

        let mut favorites = FavoritesCache::new(store);

        assert!(favorites.add(5).await.is_err());
        assert!(favorites.is_favorite(5).await);
    }
}
