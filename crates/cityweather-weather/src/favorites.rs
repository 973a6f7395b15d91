//! Favorite cities, persisted through a small key-value store.
//!
//! The set is stored as a JSON list under a single fixed key and rewritten
//! in full on every change.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Key the favorites list is stored under
pub const FAVORITES_KEY: &str = "favoriteCities";

/// Errors that can occur while loading or saving favorites.
#[derive(Debug, Error)]
pub enum FavoritesError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored value (or the store file itself) could not be decoded.
    #[error("Corrupt value under {key}: {message}")]
    Corrupt { key: String, message: String },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type FavoritesResult<T> = Result<T, FavoritesError>;

/// String key-value storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> FavoritesResult<Option<String>>;

    /// Overwrite the value under `key`.
    fn set(&self, key: &str, value: &str) -> FavoritesResult<()>;
}

/// Key-value store backed by a JSON object file.
///
/// Every `set` rewrites the whole file.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    path: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> FavoritesResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents).map_err(|e| FavoritesError::Corrupt {
            key: self.path.display().to_string(),
            message: e.to_string(),
        })
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> FavoritesResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> FavoritesResult<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&entries)?;
        fs::write(&self.path, json)?;

        tracing::debug!("Wrote {} to {:?}", key, self.path);
        Ok(())
    }
}

/// In-process key-value store.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> FavoritesResult<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> FavoritesResult<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Set of favorite city names.
///
/// Serialized as a sorted JSON list, so equal sets always produce the same
/// stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteSet {
    names: BTreeSet<String>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, city: &str) -> bool {
        self.names.contains(city)
    }

    /// Add `city` if absent, remove it if present.
    /// Returns whether `city` is a favorite afterwards.
    pub fn toggle(&mut self, city: &str) -> bool {
        if self.names.remove(city) {
            false
        } else {
            self.names.insert(city.to_string());
            true
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Persistence for the favorites set.
pub trait FavoritesRepository: Send + Sync {
    fn load(&self) -> FavoritesResult<FavoriteSet>;

    fn save(&self, favorites: &FavoriteSet) -> FavoritesResult<()>;
}

/// Favorites stored as a JSON string under [`FAVORITES_KEY`].
#[derive(Debug)]
pub struct LocalFavoritesRepository<S> {
    store: S,
}

impl<S: KeyValueStore> LocalFavoritesRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[cfg(test)]
    fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> FavoritesRepository for LocalFavoritesRepository<S> {
    fn load(&self) -> FavoritesResult<FavoriteSet> {
        let Some(raw) = self.store.get(FAVORITES_KEY)? else {
            return Ok(FavoriteSet::default());
        };

        serde_json::from_str(&raw).map_err(|e| FavoritesError::Corrupt {
            key: FAVORITES_KEY.to_string(),
            message: e.to_string(),
        })
    }

    fn save(&self, favorites: &FavoriteSet) -> FavoritesResult<()> {
        let raw = serde_json::to_string(favorites)?;
        self.store.set(FAVORITES_KEY, &raw)?;
        tracing::debug!("Saved {} favorite cities", favorites.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_repo() -> LocalFavoritesRepository<MemoryKeyValueStore> {
        LocalFavoritesRepository::new(MemoryKeyValueStore::new())
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut set = FavoriteSet::new();
        assert!(set.toggle("Paris"));
        assert!(set.contains("Paris"));
        assert!(!set.toggle("Paris"));
        assert!(set.is_empty());
    }

    #[test]
    fn test_serialized_as_sorted_list() {
        let set: FavoriteSet = ["Oslo", "Berlin", "Lima"].into_iter().collect();
        assert_eq!(
            serde_json::to_string(&set).unwrap(),
            r#"["Berlin","Lima","Oslo"]"#
        );
    }

    #[test]
    fn test_load_missing_key_is_empty() {
        let repo = memory_repo();
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let repo = memory_repo();
        let set: FavoriteSet = ["Tokyo", "Kyoto"].into_iter().collect();
        repo.save(&set).unwrap();

        assert_eq!(repo.load().unwrap(), set);
        assert_eq!(
            repo.store().get(FAVORITES_KEY).unwrap().as_deref(),
            Some(r#"["Kyoto","Tokyo"]"#)
        );
    }

    #[test]
    fn test_double_toggle_restores_persisted_value() {
        let repo = memory_repo();
        let original: FavoriteSet = ["Berlin", "Paris", "Rome"].into_iter().collect();
        repo.save(&original).unwrap();
        let persisted_before = repo.store().get(FAVORITES_KEY).unwrap();

        for city in ["Paris", "Madrid"] {
            let mut set = repo.load().unwrap();
            set.toggle(city);
            repo.save(&set).unwrap();
            set.toggle(city);
            repo.save(&set).unwrap();

            assert_eq!(repo.load().unwrap(), original);
            assert_eq!(repo.store().get(FAVORITES_KEY).unwrap(), persisted_before);
        }
    }

    #[test]
    fn test_duplicates_in_stored_list_collapse() {
        let repo = memory_repo();
        repo.store()
            .set(FAVORITES_KEY, r#"["Paris","Paris","Oslo"]"#)
            .unwrap();
        assert_eq!(repo.load().unwrap().len(), 2);
    }

    #[test]
    fn test_corrupt_value_is_reported() {
        let repo = memory_repo();
        repo.store().set(FAVORITES_KEY, "{not json").unwrap();
        assert!(matches!(repo.load(), Err(FavoritesError::Corrupt { .. })));
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path().join("nested").join("local_storage.json"));

        assert_eq!(store.get(FAVORITES_KEY).unwrap(), None);
        store.set(FAVORITES_KEY, r#"["Quito"]"#).unwrap();
        store.set("other", "value").unwrap();

        assert_eq!(store.get(FAVORITES_KEY).unwrap().as_deref(), Some(r#"["Quito"]"#));
        assert_eq!(store.get("other").unwrap().as_deref(), Some("value"));
    }

    #[test]
    fn test_file_repository_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local_storage.json");

        let repo = LocalFavoritesRepository::new(FileKeyValueStore::new(&path));
        let mut set = repo.load().unwrap();
        set.toggle("Nairobi");
        repo.save(&set).unwrap();

        let reopened = LocalFavoritesRepository::new(FileKeyValueStore::new(&path));
        assert!(reopened.load().unwrap().contains("Nairobi"));
    }

    #[test]
    fn test_corrupt_store_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local_storage.json");
        fs::write(&path, "garbage").unwrap();

        let store = FileKeyValueStore::new(&path);
        assert!(matches!(
            store.get(FAVORITES_KEY),
            Err(FavoritesError::Corrupt { .. })
        ));
    }
}
