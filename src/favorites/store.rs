//! The single authoritative favorites collection, shared by every command that reads or
//! changes favorites

use std::sync::{Arc, Mutex, MutexGuard};

use simplelog::{debug, error, info, warn};

use crate::catalog::MediaType;
use crate::favorites::{FavoriteEntry, FavoriteKey, Favorites, FAVORITES_KEY};
use crate::storage::KeyValueStore;

#[derive(Debug, Default)]
struct VersionedFavorites {
    favorites: Favorites,
    /// Bumped on every change
    version: u64,
}

/// Shared handle to the favorites collection.
///
/// Mutations apply to memory immediately and are then persisted as a full snapshot. Writes are
/// serialized, and a writer whose version has already been covered by a newer write skips, so
/// storage never regresses to an older collection.
#[derive(Debug)]
pub struct FavoritesStore<S: KeyValueStore> {
    storage: Arc<S>,
    state: Arc<Mutex<VersionedFavorites>>,
    /// Version of the last snapshot that reached storage
    persisted: Arc<tokio::sync::Mutex<u64>>,
}

impl<S: KeyValueStore> Clone for FavoritesStore<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            state: Arc::clone(&self.state),
            persisted: Arc::clone(&self.persisted),
        }
    }
}

impl<S: KeyValueStore> FavoritesStore<S> {
    /// Reads the stored collection. Missing or unreadable data yields an empty collection.
    pub async fn load(storage: S) -> Self {
        let favorites = match storage.get(FAVORITES_KEY).await {
            Ok(Some(contents)) => match serde_json::from_str::<Favorites>(&contents) {
                Ok(favorites) => favorites,
                Err(err) => {
                    warn!("Stored favorites could not be parsed and will be replaced: {err}");
                    Favorites::default()
                }
            },
            Ok(None) => {
                debug!("No stored favorites found");
                Favorites::default()
            }
            Err(err) => {
                error!("An error occurred while loading favorites: {err:#}");
                Favorites::default()
            }
        };

        info!("{} favorite(s) loaded", favorites.len());

        Self {
            storage: Arc::new(storage),
            state: Arc::new(Mutex::new(VersionedFavorites {
                favorites,
                version: 0,
            })),
            persisted: Arc::new(tokio::sync::Mutex::new(0)),
        }
    }

    /// An owned copy of the current collection
    pub fn snapshot(&self) -> Favorites {
        self.lock_state().favorites.clone()
    }

    pub fn contains(&self, id: u64, media_type: MediaType) -> bool {
        self.lock_state()
            .favorites
            .contains(FavoriteKey::new(id, media_type))
    }

    pub fn get(&self, id: u64, media_type: MediaType) -> Option<FavoriteEntry> {
        self.lock_state()
            .favorites
            .get(FavoriteKey::new(id, media_type))
            .cloned()
    }

    pub fn version(&self) -> u64 {
        self.lock_state().version
    }

    /// Adds `entry` unless an entry with the same id and media type exists.
    /// Returns whether the collection changed.
    pub async fn add(&self, entry: FavoriteEntry) -> bool {
        let key = entry.key();
        let changed = self.apply(|favorites| favorites.insert(entry));

        if changed {
            debug!("Added `{key}` to favorites");
            self.persist().await;
        }

        changed
    }

    /// Returns whether the collection changed
    pub async fn remove(&self, id: u64, media_type: MediaType) -> bool {
        let key = FavoriteKey::new(id, media_type);
        let changed = self.apply(|favorites| favorites.remove(key));

        if changed {
            debug!("Removed `{key}` from favorites");
            self.persist().await;
        }

        changed
    }

    /// Removes the matching entry if present, otherwise adds `entry`.
    /// Returns whether it is a favorite afterwards.
    pub async fn toggle(&self, entry: FavoriteEntry) -> bool {
        let key = entry.key();
        // Check and mutation happen under the same lock
        let now_favorite = self.apply_always(|favorites| favorites.toggle(entry));

        debug!(
            "Toggled `{key}`: {}",
            if now_favorite { "added" } else { "removed" }
        );
        self.persist().await;

        now_favorite
    }

    /// Writes the latest snapshot unless a write at least as new has already completed.
    /// Failures are logged; memory stays authoritative.
    async fn persist(&self) {
        let mut persisted = self.persisted.lock().await;

        let (version, favorites) = {
            let state = self.lock_state();
            (state.version, state.favorites.clone())
        };

        if version <= *persisted {
            debug!(
                "Skipping favorites write for version {version}; version {} is stored",
                *persisted
            );
            return;
        }

        let json = match serde_json::to_string(&favorites) {
            Ok(json) => json,
            Err(err) => {
                error!("Unable to serialize favorites: {err}");
                return;
            }
        };

        match self.storage.set(FAVORITES_KEY, json).await {
            Ok(()) => {
                debug!("Favorites version {version} saved");
                *persisted = version;
            }
            Err(err) => error!("An error occurred while saving favorites: {err:#}"),
        }
    }

    /// Runs `f` against the collection, bumping the version when it reports a change
    fn apply<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut Favorites) -> bool,
    {
        let mut state = self.lock_state();
        let changed = f(&mut state.favorites);
        if changed {
            state.version += 1;
        }
        changed
    }

    /// Like [`apply`](Self::apply) for mutations that always change the collection
    fn apply_always<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Favorites) -> R,
    {
        let mut state = self.lock_state();
        let result = f(&mut state.favorites);
        state.version += 1;
        result
    }

    fn lock_state(&self) -> MutexGuard<'_, VersionedFavorites> {
        // Every mutation leaves the collection whole, so a poisoned lock is still usable
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod favorites_store_tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::storage::MemoryStore;

    fn entry(id: u64, media_type: MediaType) -> FavoriteEntry {
        FavoriteEntry::new(id, media_type, &format!("Item {id}"), Some("/poster.jpg"))
    }

    fn stored(storage: &MemoryStore) -> Favorites {
        serde_json::from_str(&storage.peek(FAVORITES_KEY).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_load_without_stored_data_is_empty() {
        let store = FavoritesStore::load(MemoryStore::new()).await;
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_load_unparsable_data_is_empty() {
        let storage = MemoryStore::with_value(FAVORITES_KEY, "{not json");
        let store = FavoritesStore::load(storage).await;
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_load_read_failure_is_empty() {
        let storage = MemoryStore::with_value(FAVORITES_KEY, "[]");
        storage.set_failing(true);

        let store = FavoritesStore::load(storage).await;
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_load_existing_favorites() {
        let storage = MemoryStore::with_value(
            FAVORITES_KEY,
            r#"[{"id":550,"title":"Fight Club","posterPath":null,"media_type":"movie"}]"#,
        );
        let store = FavoritesStore::load(storage).await;

        assert_eq!(1, store.snapshot().len());
        assert!(store.contains(550, MediaType::Movie));
        assert!(!store.contains(550, MediaType::Tv));
    }

    #[tokio::test]
    async fn test_add_persists_full_collection() {
        let storage = MemoryStore::new();
        let store = FavoritesStore::load(storage.clone()).await;

        assert!(store.add(entry(5, MediaType::Movie)).await);
        assert!(store.add(entry(5, MediaType::Tv)).await);
        assert!(!store.add(entry(5, MediaType::Movie)).await);

        assert_eq!(2, store.snapshot().len());
        assert_eq!(store.snapshot(), stored(&storage));
        assert_eq!(2, storage.write_count());
    }

    #[tokio::test]
    async fn test_remove() {
        let storage = MemoryStore::new();
        let store = FavoritesStore::load(storage.clone()).await;
        store.add(entry(1, MediaType::Movie)).await;

        assert!(!store.remove(1, MediaType::Tv).await);
        assert!(store.remove(1, MediaType::Movie).await);
        assert!(stored(&storage).is_empty());
    }

    #[tokio::test]
    async fn test_remove_last_entry_is_persisted() {
        let storage = MemoryStore::new();
        let store = FavoritesStore::load(storage.clone()).await;

        store.add(entry(1, MediaType::Movie)).await;
        store.remove(1, MediaType::Movie).await;

        let reloaded = FavoritesStore::load(storage).await;
        assert!(reloaded.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_state() {
        let storage = MemoryStore::new();
        let store = FavoritesStore::load(storage.clone()).await;
        store.add(entry(1, MediaType::Movie)).await;
        let before = store.snapshot();

        assert!(store.toggle(entry(2, MediaType::Tv)).await);
        assert!(!store.toggle(entry(2, MediaType::Tv)).await);

        assert_eq!(before, store.snapshot());
        assert_eq!(before, stored(&storage));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = FavoritesStore::load(MemoryStore::new()).await;
        let details_view = store.clone();

        details_view.toggle(entry(7, MediaType::Movie)).await;
        assert!(store.contains(7, MediaType::Movie));
    }

    #[tokio::test]
    async fn test_concurrent_toggles_persist_latest_state() {
        let storage = MemoryStore::new();
        let store = FavoritesStore::load(storage.clone()).await;

        let (a, b, c) = tokio::join!(
            store.toggle(entry(1, MediaType::Movie)),
            store.toggle(entry(1, MediaType::Movie)),
            store.toggle(entry(2, MediaType::Tv)),
        );

        assert!(a);
        assert!(!b);
        assert!(c);
        assert_eq!(store.snapshot(), stored(&storage));
        assert_eq!(1, store.snapshot().len());
    }

    #[tokio::test]
    async fn test_stale_write_is_skipped() {
        let storage = MemoryStore::new();
        let store = FavoritesStore::load(storage.clone()).await;

        store.apply(|favorites| favorites.insert(entry(1, MediaType::Movie)));
        store.apply(|favorites| favorites.insert(entry(2, MediaType::Movie)));

        // The first writer stores the newest snapshot; the second has nothing newer to write
        store.persist().await;
        store.persist().await;

        assert_eq!(1, storage.write_count());
        assert_eq!(2, stored(&storage).len());
        assert_eq!(2, store.version());
    }

    #[tokio::test]
    async fn test_write_failure_keeps_memory_and_recovers() {
        let storage = MemoryStore::new();
        let store = FavoritesStore::load(storage.clone()).await;

        storage.set_failing(true);
        assert!(store.add(entry(1, MediaType::Movie)).await);
        assert!(store.contains(1, MediaType::Movie));
        assert_eq!(None, storage.peek(FAVORITES_KEY));

        storage.set_failing(false);
        store.add(entry(2, MediaType::Tv)).await;
        assert_eq!(2, stored(&storage).len());
    }
}
