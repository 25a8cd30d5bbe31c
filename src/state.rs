use anyhow::Result;
use simplelog::debug;

use crate::catalog::CatalogQuery;
use crate::config::Config;
use crate::favorites::store::FavoritesStore;
use crate::storage::FileStore;
use crate::tmdb::TmdbClient;

/// Represents the application state shared by every command
#[derive(Debug)]
pub struct AppState {
    tmdb: TmdbClient,
    favorites: FavoritesStore<FileStore>,
}

impl AppState {
    pub async fn initialize(config: &Config) -> Result<Self> {
        debug!("Initializing application state...");

        let tmdb = TmdbClient::initialize(config)?;
        let storage = FileStore::new(config.get_data_directory());
        debug!("Favorites are stored in `{}`", storage.get_directory().display());
        let favorites = FavoritesStore::load(storage).await;

        Ok(Self {
            tmdb,
            favorites,
        })
    }
}

// TMDB
impl AppState {
    pub fn get_tmdb(&self) -> &TmdbClient {
        &self.tmdb
    }

    /// A fresh listing query sharing this state's client
    pub fn new_catalog_query(&self) -> CatalogQuery {
        CatalogQuery::new(self.tmdb.clone())
    }
}

// Favorites
impl AppState {
    pub fn get_favorites(&self) -> &FavoritesStore<FileStore> {
        &self.favorites
    }
}
