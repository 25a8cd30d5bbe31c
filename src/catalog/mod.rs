//! Listing retrieval and the catalog items it produces

use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::{Datelike, NaiveDate};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use simplelog::{debug, error, warn};
use strum::{Display, EnumString, VariantNames};

use crate::catalog::genres::GenreId;
use crate::catalog::sort::{sort_items, SortOption};
use crate::tmdb::models::TmdbItem;
use crate::tmdb::TmdbClient;

pub mod details;
pub mod genres;
pub mod sort;

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    EnumString,
    Eq,
    Hash,
    PartialEq,
    Serialize,
    VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MediaType {
    #[default]
    Movie,
    Tv,
}

impl MediaType {
    pub fn label(&self) -> &'static str {
        match self {
            MediaType::Movie => "Movies",
            MediaType::Tv => "TV Shows",
        }
    }
}

// CATALOG ITEM ################################################################

/// One movie or TV show from a listing.
///
/// `id` is only unique within a media type; `(id, media_type)` identifies an item.
#[derive(Builder, Clone, Debug, Default, PartialEq)]
#[builder(default, setter(into))]
pub struct CatalogItem {
    id: u64,
    media_type: MediaType,
    /// Canonical title: `title` for movies, `name` for shows
    title: String,
    #[builder(setter(into, strip_option))]
    poster_path: Option<String>,
    #[builder(setter(into, strip_option))]
    vote_average: Option<f64>,
    #[builder(setter(into, strip_option))]
    popularity: Option<f64>,
    #[builder(setter(into, strip_option))]
    release_date: Option<String>,
    #[builder(setter(into, strip_option))]
    first_air_date: Option<String>,
    #[builder(setter(into, strip_option))]
    overview: Option<String>,
}

impl CatalogItem {
    /// Converts a listing record, using `query_type` when the record does not name its own
    /// media type.
    pub fn from_tmdb(item: TmdbItem, query_type: MediaType) -> Self {
        let media_type = item
            .media_type
            .as_deref()
            .and_then(|t| t.parse::<MediaType>().ok())
            .unwrap_or(query_type);
        let title = canonical_title(media_type, item.title, item.name);

        Self {
            id: item.id,
            media_type,
            title,
            poster_path: item.poster_path,
            vote_average: item.vote_average,
            popularity: item.popularity,
            release_date: item.release_date,
            first_air_date: item.first_air_date,
            overview: item.overview,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn get_media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn get_title(&self) -> &str {
        &self.title
    }

    pub fn get_poster_path(&self) -> Option<&str> {
        self.poster_path.as_deref()
    }

    pub fn get_overview(&self) -> Option<&str> {
        self.overview.as_deref()
    }

    /// Rating out of 10, `0` when TMDB has none
    pub fn get_rating(&self) -> f64 {
        self.vote_average.unwrap_or_default()
    }

    pub fn get_popularity(&self) -> f64 {
        self.popularity.unwrap_or_default()
    }

    /// The date field matching `media_type`, empty when absent
    pub fn get_date_for(&self, media_type: MediaType) -> &str {
        match media_type {
            MediaType::Movie => self.release_date.as_deref(),
            MediaType::Tv => self.first_air_date.as_deref(),
        }
        .unwrap_or_default()
    }

    /// Release date for movies, first air date for shows
    pub fn get_date(&self) -> &str {
        self.get_date_for(self.media_type)
    }

    pub fn get_year(&self) -> Option<i32> {
        parse_year(self.get_date())
    }
}

impl Display for CatalogItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let year = self
            .get_year()
            .map(|y| y.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        write!(
            f,
            "{} ({year})  ★ {:.1}  [{} #{}]",
            self.title,
            self.get_rating(),
            self.media_type,
            self.id
        )
    }
}

/// `title` wins for movies and `name` for shows, falling back to the other field
pub(crate) fn canonical_title(
    media_type: MediaType,
    title: Option<String>,
    name: Option<String>,
) -> String {
    let (preferred, fallback) = match media_type {
        MediaType::Movie => (title, name),
        MediaType::Tv => (name, title),
    };

    preferred
        .filter(|t| !t.trim().is_empty())
        .or(fallback)
        .unwrap_or_default()
}

pub(crate) fn parse_year(date: &str) -> Option<i32> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .map(|d| d.year())
}

// SELECTION ###################################################################

/// Parameters of the listing route
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Selection {
    pub media_type: MediaType,
    pub genre: Option<GenreId>,
    pub sort: SortOption,
}

// QUERY #######################################################################

#[derive(Clone, Debug, Default, PartialEq)]
pub enum QueryState {
    #[default]
    Idle,
    Loading,
    Ready(Vec<CatalogItem>),
}

/// Fetches listings and tracks the state of the most recent load.
///
/// Every load takes a generation number; results from a load that has since been superseded
/// are dropped instead of overwriting newer results.
#[derive(Debug, Default)]
pub struct CatalogQuery {
    client: TmdbClient,
    generation: AtomicU64,
    state: Mutex<QueryState>,
}

impl CatalogQuery {
    pub fn new(client: TmdbClient) -> Self {
        Self {
            client,
            ..Default::default()
        }
    }

    /// Fetches the raw listing for `media_type` and `genre`.
    ///
    /// Failures are logged and produce an empty list.
    pub async fn fetch(&self, media_type: MediaType, genre: Option<GenreId>) -> Vec<CatalogItem> {
        match self.client.fetch_listing(media_type, genre).await {
            Ok(items) => items
                .into_iter()
                .map(|item| CatalogItem::from_tmdb(item, media_type))
                .collect(),
            Err(err) => {
                error!("An error occurred while fetching `{media_type}` listing: {err:#}");
                vec![]
            }
        }
    }

    /// Runs a full load for `selection`: fetch, sort, publish.
    ///
    /// Returns `None` when a newer load started before this one finished.
    pub async fn load(&self, selection: &Selection) -> Option<Vec<CatalogItem>> {
        let generation = self.begin();

        let items = self.fetch(selection.media_type, selection.genre).await;
        let items = sort_items(&items, selection.sort, selection.media_type);

        if self.complete(generation, items.clone()) {
            Some(items)
        } else {
            None
        }
    }

    /// Starts a load and returns its generation
    pub fn begin(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.set_state(QueryState::Loading);
        generation
    }

    /// Publishes `items` if `generation` is still the latest load
    pub fn complete(&self, generation: u64, items: Vec<CatalogItem>) -> bool {
        let latest = self.generation.load(Ordering::SeqCst);
        if generation != latest {
            debug!("Discarding results of load {generation}; load {latest} is newer");
            return false;
        }

        self.set_state(QueryState::Ready(items));
        true
    }

    pub fn get_state(&self) -> QueryState {
        match self.state.lock() {
            Ok(state) => state.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set_state(&self, new_state: QueryState) {
        match self.state.lock() {
            Ok(mut state) => *state = new_state,
            Err(poisoned) => {
                warn!("Catalog query state lock was poisoned; recovering");
                *poisoned.into_inner() = new_state
            }
        }
    }
}
