use std::collections::HashMap;

use anyhow::Result;
use simplelog::debug;

use crate::catalog::genres::GenreId;
use crate::catalog::MediaType;
use crate::config::Config;
use crate::http_client::{HttpClient, Params};
use crate::tmdb::models::{PagedResponse, TmdbDetails, TmdbItem};

pub mod models;
pub mod types;

/// Thin wrapper over the TMDB v3 endpoints the application uses
#[derive(Clone, Debug, Default)]
pub struct TmdbClient {
    client: HttpClient,
}

impl TmdbClient {
    pub fn initialize(config: &Config) -> Result<Self> {
        debug!("Initializing TMDB client...");
        Self::new(config.get_tmdb_base_url(), config.get_tmdb_api_key())
    }

    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let client = HttpClient::new(base_url, api_key)?;
        Ok(Self { client })
    }

    /// Fetches the first page of a listing.
    ///
    /// With a genre this is a `discover` query filtered by that genre, otherwise the weekly
    /// trending list for the media type.
    pub async fn fetch_listing(
        &self,
        media_type: MediaType,
        genre: Option<GenreId>,
    ) -> Result<Vec<TmdbItem>> {
        let (path, params) = listing_request(media_type, genre);
        let resp: PagedResponse<TmdbItem> = self.client.get(&path, params).await?;

        debug!(
            "Fetched {} of {} `{media_type}` results",
            resp.results.len(),
            resp.total_results
        );

        Ok(resp.results)
    }

    pub async fn fetch_details(&self, id: u64, media_type: MediaType) -> Result<TmdbDetails> {
        self.client
            .get(&format!("{media_type}/{id}"), None)
            .await
    }

    /// Used by the configuration wizard to verify an API key before saving it
    pub async fn test_connection(&self) -> Result<()> {
        let _: serde_json::Value = self.client.get("configuration", None).await?;
        Ok(())
    }
}

fn listing_request(
    media_type: MediaType,
    genre: Option<GenreId>,
) -> (String, Params) {
    match genre {
        Some(genre) => (
            format!("discover/{media_type}"),
            Some(HashMap::from([(
                "with_genres".to_string(),
                genre.to_string(),
            )])),
        ),
        None => (format!("trending/{media_type}/week"), None),
    }
}

#[cfg(test)]
mod tmdb_client_tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_listing_request_with_genre() {
        let genre = GenreId::try_new(878).unwrap();
        let (path, params) = listing_request(MediaType::Movie, Some(genre));

        assert_eq!("discover/movie", path);
        assert_eq!(
            Some(&"878".to_string()),
            params.as_ref().and_then(|p| p.get("with_genres"))
        );
    }

    #[test]
    fn test_listing_request_without_genre() {
        let (path, params) = listing_request(MediaType::Tv, None);

        assert_eq!("trending/tv/week", path);
        assert!(params.is_none());
    }

    #[tokio::test]
    async fn test_fetch_details_surfaces_network_errors() {
        let client = TmdbClient::new("http://127.0.0.1:1", "abc").unwrap();
        let result = client.fetch_details(550, MediaType::Movie).await;

        assert!(result.is_err());
    }
}
