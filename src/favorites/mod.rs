//! Favorite entries and the ordered collection that holds them

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogItem, MediaType};

pub mod store;

/// Key of the stored favorites document
pub const FAVORITES_KEY: &str = "favorites";

/// Identity of a favorite. Ids collide across media types, so both parts are required.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct FavoriteKey {
    pub id: u64,
    pub media_type: MediaType,
}

impl FavoriteKey {
    pub fn new(id: u64, media_type: MediaType) -> Self {
        Self { id, media_type }
    }
}

impl Display for FavoriteKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.media_type, self.id)
    }
}

/// The reduced form of a catalog item that is kept on disk
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct FavoriteEntry {
    id: u64,
    title: String,
    #[serde(rename = "posterPath", default)]
    poster_path: Option<String>,
    media_type: MediaType,
}

impl FavoriteEntry {
    pub fn new(id: u64, media_type: MediaType, title: &str, poster_path: Option<&str>) -> Self {
        Self {
            id,
            title: title.to_owned(),
            poster_path: poster_path.map(str::to_owned),
            media_type,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn get_title(&self) -> &str {
        &self.title
    }

    pub fn get_poster_path(&self) -> Option<&str> {
        self.poster_path.as_deref()
    }

    pub fn get_media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn key(&self) -> FavoriteKey {
        FavoriteKey::new(self.id, self.media_type)
    }
}

impl From<&CatalogItem> for FavoriteEntry {
    fn from(item: &CatalogItem) -> Self {
        FavoriteEntry::new(
            item.id(),
            item.get_media_type(),
            item.get_title(),
            item.get_poster_path(),
        )
    }
}

impl Display for FavoriteEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}  [{}]", self.title, self.key())
    }
}

/// Favorites in the order they were added, at most one per [`FavoriteKey`]
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Favorites(Vec<FavoriteEntry>);

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: FavoriteKey) -> bool {
        self.0.iter().any(|e| e.key() == key)
    }

    pub fn get(&self, key: FavoriteKey) -> Option<&FavoriteEntry> {
        self.0.iter().find(|e| e.key() == key)
    }

    /// Appends `entry` unless its key is already present. Returns whether it was added.
    pub fn insert(&mut self, entry: FavoriteEntry) -> bool {
        if self.contains(entry.key()) {
            return false;
        }

        self.0.push(entry);
        true
    }

    /// Removes the entry with `key`. Returns whether one was removed.
    pub fn remove(&mut self, key: FavoriteKey) -> bool {
        let before = self.0.len();
        self.0.retain(|e| e.key() != key);
        self.0.len() != before
    }

    /// Removes the entry if present, otherwise adds it. Returns whether it is now a favorite.
    pub fn toggle(&mut self, entry: FavoriteEntry) -> bool {
        if self.remove(entry.key()) {
            false
        } else {
            self.0.push(entry);
            true
        }
    }

    pub fn entries(&self) -> &[FavoriteEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod favorites_tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn entry(id: u64, media_type: MediaType) -> FavoriteEntry {
        FavoriteEntry::new(id, media_type, &format!("Item {id}"), None)
    }

    #[test]
    fn test_same_id_different_media_type_are_distinct() {
        let mut favorites = Favorites::new();

        assert!(favorites.insert(entry(5, MediaType::Movie)));
        assert!(favorites.insert(entry(5, MediaType::Tv)));
        assert_eq!(2, favorites.len());

        assert!(favorites.remove(FavoriteKey::new(5, MediaType::Tv)));
        assert!(favorites.contains(FavoriteKey::new(5, MediaType::Movie)));
        assert!(!favorites.contains(FavoriteKey::new(5, MediaType::Tv)));
    }

    #[test]
    fn test_insert_duplicate_is_noop() {
        let mut favorites = Favorites::new();

        assert!(favorites.insert(entry(1, MediaType::Movie)));
        assert!(!favorites.insert(FavoriteEntry::new(1, MediaType::Movie, "Renamed", None)));
        assert_eq!(1, favorites.len());
        assert_eq!("Item 1", favorites.entries()[0].get_title());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut favorites = Favorites::new();
        favorites.insert(entry(1, MediaType::Movie));

        assert!(!favorites.remove(FavoriteKey::new(1, MediaType::Tv)));
        assert_eq!(1, favorites.len());
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut favorites = Favorites::new();
        for id in [3, 1, 2] {
            favorites.insert(entry(id, MediaType::Movie));
        }
        favorites.remove(FavoriteKey::new(1, MediaType::Movie));
        favorites.insert(entry(1, MediaType::Movie));

        let ids = favorites.entries().iter().map(|e| e.id()).collect::<Vec<_>>();
        assert_eq!(vec![3, 2, 1], ids);
    }

    #[test]
    fn test_toggle_twice_restores_collection() {
        let mut favorites = Favorites::new();
        favorites.insert(entry(1, MediaType::Movie));
        favorites.insert(entry(2, MediaType::Tv));
        let before = favorites.clone();

        assert!(favorites.toggle(entry(9, MediaType::Tv)));
        assert!(!favorites.toggle(entry(9, MediaType::Tv)));
        assert_eq!(before, favorites);
    }

    #[test]
    fn test_parity_of_mixed_operations() {
        #[derive(Clone, Copy)]
        enum Op {
            Add(u64, MediaType),
            Remove(u64, MediaType),
            Toggle(u64, MediaType),
        }

        let ops = [
            Op::Add(1, MediaType::Movie),
            Op::Add(1, MediaType::Movie),
            Op::Toggle(1, MediaType::Tv),
            Op::Add(2, MediaType::Movie),
            Op::Remove(2, MediaType::Movie),
            Op::Toggle(3, MediaType::Movie),
            Op::Toggle(3, MediaType::Movie),
            Op::Toggle(3, MediaType::Movie),
            Op::Remove(4, MediaType::Tv),
            Op::Add(4, MediaType::Tv),
        ];

        let mut favorites = Favorites::new();
        let mut present: HashMap<FavoriteKey, bool> = HashMap::new();

        for op in ops {
            match op {
                Op::Add(id, t) => {
                    favorites.insert(entry(id, t));
                    present.insert(FavoriteKey::new(id, t), true);
                }
                Op::Remove(id, t) => {
                    favorites.remove(FavoriteKey::new(id, t));
                    present.insert(FavoriteKey::new(id, t), false);
                }
                Op::Toggle(id, t) => {
                    let now = favorites.toggle(entry(id, t));
                    let was = present.get(&FavoriteKey::new(id, t)).copied().unwrap_or(false);
                    assert_eq!(!was, now);
                    present.insert(FavoriteKey::new(id, t), now);
                }
            }
        }

        let mut expected = present
            .into_iter()
            .filter(|(_, is_present)| *is_present)
            .map(|(key, _)| key)
            .collect::<Vec<_>>();
        expected.sort_by_key(|k| (k.id, k.media_type.to_string()));

        let mut actual = favorites.entries().iter().map(|e| e.key()).collect::<Vec<_>>();
        actual.sort_by_key(|k| (k.id, k.media_type.to_string()));

        assert_eq!(expected, actual);
    }

    #[test]
    fn test_serialized_form() {
        let mut favorites = Favorites::new();
        favorites.insert(FavoriteEntry::new(
            550,
            MediaType::Movie,
            "Fight Club",
            Some("/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg"),
        ));

        let json = serde_json::to_string(&favorites).unwrap();
        assert_eq!(
            r#"[{"id":550,"title":"Fight Club","posterPath":"/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg","media_type":"movie"}]"#,
            json
        );
    }

    #[test]
    fn test_deserialize_entry_without_poster() {
        let json = r#"[{"id":1399,"title":"Game of Thrones","media_type":"tv"}]"#;
        let favorites: Favorites = serde_json::from_str(json).unwrap();

        assert_eq!(1, favorites.len());
        assert_eq!(None, favorites.entries()[0].get_poster_path());
        assert!(favorites.contains(FavoriteKey::new(1399, MediaType::Tv)));
    }

    #[test]
    fn test_entry_from_catalog_item() {
        let item = crate::catalog::CatalogItemBuilder::default()
            .id(63639_u64)
            .media_type(MediaType::Tv)
            .title("The Expanse")
            .poster_path("/8djpxDeWpINnGhjpFXQjnBe6zbx.jpg")
            .build()
            .unwrap();

        let entry = FavoriteEntry::from(&item);
        assert_eq!(FavoriteKey::new(63639, MediaType::Tv), entry.key());
        assert_eq!("The Expanse", entry.get_title());
    }
}
