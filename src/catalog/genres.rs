// Derives inside the nutype macro are not recognized by the compiler so to suppress the warnings,
// allow "unused" imports
#![allow(unused_imports)]

use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

use nutype::nutype;
use serde::{Deserialize, Serialize};

use crate::catalog::MediaType;

/// A TMDB genre id as used by the `with_genres` discover filter
#[nutype(
    validate(greater = 0),
    derive(
        Clone,
        Copy,
        Debug,
        Deserialize,
        Display,
        Eq,
        Hash,
        PartialEq,
        Serialize,
        AsRef,
        Deref
    )
)]
pub struct GenreId(u32);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Genre {
    id: GenreId,
    name: &'static str,
}

impl Genre {
    pub fn id(&self) -> GenreId {
        self.id
    }

    pub fn get_name(&self) -> &'static str {
        self.name
    }
}

impl Display for Genre {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

static MOVIE_GENRES: LazyLock<Vec<Genre>> = LazyLock::new(|| {
    build_genres(&[
        (28, "Action"),
        (35, "Comedy"),
        (18, "Drama"),
        (27, "Horror"),
        (878, "Sci-Fi"),
    ])
});

// TMDB numbers several TV genres differently from their movie counterparts
static TV_GENRES: LazyLock<Vec<Genre>> = LazyLock::new(|| {
    build_genres(&[
        (10759, "Action & Adventure"),
        (35, "Comedy"),
        (18, "Drama"),
        (9648, "Mystery"),
        (10765, "Sci-Fi & Fantasy"),
    ])
});

fn build_genres(genres: &[(u32, &'static str)]) -> Vec<Genre> {
    genres
        .iter()
        .filter_map(|&(id, name)| GenreId::try_new(id).ok().map(|id| Genre { id, name }))
        .collect()
}

/// Genres offered by the interactive selector for `media_type`
pub fn genres_for(media_type: MediaType) -> &'static [Genre] {
    match media_type {
        MediaType::Movie => MOVIE_GENRES.as_slice(),
        MediaType::Tv => TV_GENRES.as_slice(),
    }
}

/// Looks up the display name of a built-in genre
pub fn genre_name(media_type: MediaType, id: GenreId) -> Option<&'static str> {
    genres_for(media_type)
        .iter()
        .find(|g| g.id == id)
        .map(|g| g.name)
}
