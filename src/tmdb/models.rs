use serde::Deserialize;

/// Envelope for every paginated TMDB listing (`discover`, `trending`)
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PagedResponse<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

/// A single listing record. Movies carry `title`/`release_date`, shows carry
/// `name`/`first_air_date`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct TmdbItem {
    pub id: u64,
    pub title: Option<String>,
    pub name: Option<String>,
    pub poster_path: Option<String>,
    pub vote_average: Option<f64>,
    pub popularity: Option<f64>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    pub overview: Option<String>,
    pub media_type: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct TmdbGenre {
    pub id: u32,
    pub name: String,
}

/// Response of `/{movie|tv}/{id}`
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct TmdbDetails {
    pub id: u64,
    pub title: Option<String>,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub vote_average: Option<f64>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    pub runtime: Option<u32>,
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    pub number_of_seasons: Option<u32>,
}

/// Body TMDB returns alongside non-success statuses
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TmdbStatus {
    #[serde(default)]
    pub status_code: i32,
    #[serde(default)]
    pub status_message: String,
}
