use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::catalog::{canonical_title, parse_year, CatalogItem, MediaType};
use crate::favorites::FavoriteEntry;
use crate::tmdb::models::TmdbDetails;
use crate::utils;

/// Everything the details view shows for one item
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ItemDetails {
    id: u64,
    media_type: MediaType,
    title: String,
    overview: Option<String>,
    poster_path: Option<String>,
    vote_average: Option<f64>,
    date: Option<String>,
    genres: Vec<String>,
    /// Minutes; a typical episode for shows
    runtime: Option<u32>,
    number_of_seasons: Option<u32>,
}

impl ItemDetails {
    pub fn from_tmdb(details: TmdbDetails, media_type: MediaType) -> Self {
        let (date, runtime) = match media_type {
            MediaType::Movie => (details.release_date, details.runtime),
            MediaType::Tv => (
                details.first_air_date,
                details.episode_run_time.first().copied(),
            ),
        };

        Self {
            id: details.id,
            media_type,
            title: canonical_title(media_type, details.title, details.name),
            overview: details.overview.filter(|o| !o.trim().is_empty()),
            poster_path: details.poster_path,
            vote_average: details.vote_average,
            date: date.filter(|d| !d.is_empty()),
            genres: details.genres.into_iter().map(|g| g.name).collect(),
            runtime: runtime.filter(|r| *r > 0),
            number_of_seasons: details.number_of_seasons,
        }
    }

    /// Details built from a listing record, used when the details route fails
    pub fn from_catalog_item(item: &CatalogItem) -> Self {
        let date = item.get_date();

        Self {
            id: item.id(),
            media_type: item.get_media_type(),
            title: item.get_title().to_owned(),
            overview: item
                .get_overview()
                .filter(|o| !o.trim().is_empty())
                .map(str::to_owned),
            poster_path: item.get_poster_path().map(str::to_owned),
            vote_average: Some(item.get_rating()),
            date: (!date.is_empty()).then(|| date.to_owned()),
            ..Default::default()
        }
    }

    /// Reduced details built from a stored favorite, used when TMDB cannot be reached
    pub fn from_favorite(entry: &FavoriteEntry) -> Self {
        Self {
            id: entry.id(),
            media_type: entry.get_media_type(),
            title: entry.get_title().to_owned(),
            poster_path: entry.get_poster_path().map(str::to_owned),
            ..Default::default()
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

    /// `8/10` style rating, rounded down
    pub fn get_rating_str(&self) -> String {
        match self.vote_average {
            Some(rating) if rating > 0.0 => format!("{}/10", rating.floor() as u32),
            _ => "N/A".to_string(),
        }
    }

    pub fn to_favorite(&self) -> FavoriteEntry {
        FavoriteEntry::new(
            self.id,
            self.media_type,
            &self.title,
            self.poster_path.as_deref(),
        )
    }
}

impl Display for ItemDetails {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let title = if self.title.is_empty() {
            "No title available"
        } else {
            &self.title
        };
        let date_label = match self.media_type {
            MediaType::Movie => "Release Date",
            MediaType::Tv => "First Air Date",
        };

        let mut output = String::default();
        output += title;
        if let Some(year) = self.date.as_deref().and_then(parse_year) {
            output += &format!(" ({year})");
        }
        output += "\n\n";
        output += &format!(
            "{}\n\n",
            self.overview
                .as_deref()
                .unwrap_or("No description available.")
        );
        output += &format!("Rating:         {}\n", self.get_rating_str());
        output += &format!(
            "{:<16}{}\n",
            format!("{date_label}:"),
            self.date.as_deref().unwrap_or("N/A")
        );
        if !self.genres.is_empty() {
            output += &format!("Genres:         {}\n", self.genres.iter().join(", "));
        }
        if let Some(runtime) = self.runtime {
            output += &format!("Runtime:        {}\n", utils::format_runtime(runtime));
        }
        if let Some(seasons) = self.number_of_seasons {
            output += &format!("Seasons:        {seasons}\n");
        }

        write!(f, "{}", output.trim_end())
    }
}
