use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantArray, VariantNames};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::catalog::{CatalogItem, MediaType};

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    EnumString,
    Eq,
    PartialEq,
    Serialize,
    VariantArray,
    VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SortOption {
    /// Oldest release (or first air) date first
    ReleaseDate,
    /// Highest rated first
    Rating,
    /// A to Z by title, ignoring case
    Alphabetical,
    /// Most popular first
    #[default]
    Popularity,
}

impl SortOption {
    pub fn label(&self) -> &'static str {
        match self {
            SortOption::ReleaseDate => "Release Date",
            SortOption::Rating => "Rating",
            SortOption::Alphabetical => "Alphabetical",
            SortOption::Popularity => "Popularity",
        }
    }
}

/// Returns a sorted copy of `items`; the input is left untouched.
///
/// Dates are read from the field matching `media_type`. Missing dates compare as the empty
/// string and missing numbers as zero. Equal items keep their fetched order.
pub fn sort_items(
    items: &[CatalogItem],
    sort: SortOption,
    media_type: MediaType,
) -> Vec<CatalogItem> {
    let mut sorted = items.to_vec();

    match sort {
        SortOption::ReleaseDate => {
            sorted.sort_by(|a, b| a.get_date_for(media_type).cmp(b.get_date_for(media_type)))
        }
        SortOption::Rating => sorted.sort_by(|a, b| b.get_rating().total_cmp(&a.get_rating())),
        SortOption::Popularity => {
            sorted.sort_by(|a, b| b.get_popularity().total_cmp(&a.get_popularity()))
        }
        SortOption::Alphabetical => {
            sorted.sort_by(|a, b| compare_titles(a.get_title(), b.get_title()))
        }
    }

    sorted
}

/// Collation-style title comparison.
///
/// Primary: base letters, ignoring accents and case. Then accents, then case with lowercase
/// first, so `apple < Apple < Élan < Zulu`.
fn compare_titles(a: &str, b: &str) -> Ordering {
    fold_title(a)
        .cmp(&fold_title(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| case_key(a).cmp(case_key(b)))
}

/// Decomposes, drops combining marks and lowercases
fn fold_title(title: &str) -> String {
    title
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn case_key(title: &str) -> impl Iterator<Item = (bool, char)> + '_ {
    title.chars().map(|c| (c.is_uppercase(), c))
}
