//! Persisted bookmark list: a JSON array of city records under the platform
//! data directory, read once at startup and rewritten whole on every toggle.
//!
//! Reads are lenient: an absent or malformed file loads as an empty list
//! (with a warning), never an error. Writes are synchronous and
//! last-writer-wins; concurrent processes sharing the file are not
//! coordinated.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::{Bookmark, CityRecord};

const BOOKMARKS_FILE: &str = "bookmarks.json";

#[derive(Debug)]
pub struct BookmarkStore {
    path: PathBuf,
    bookmarks: Vec<Bookmark>,
}

impl BookmarkStore {
    /// Open the store at an explicit path, loading whatever is there.
    pub fn open(path: PathBuf) -> Self {
        let bookmarks = read_list(&path);
        Self { path, bookmarks }
    }

    /// Open the store at the platform default location.
    pub fn open_default() -> anyhow::Result<Self> {
        Ok(Self::open(Self::default_path()?))
    }

    /// Path of the bookmark file under the platform data directory.
    pub fn default_path() -> anyhow::Result<PathBuf> {
        Ok(crate::config::project_dirs()?.data_dir().join(BOOKMARKS_FILE))
    }

    /// Remove the bookmark with the same `record_id` if present, append the
    /// record otherwise, then rewrite the whole file. Returns `true` when
    /// the record was added. Identity is `record_id` only.
    pub fn toggle(&mut self, city: &CityRecord) -> Result<bool> {
        let added = match self.bookmarks.iter().position(|b| b.record_id == city.record_id) {
            Some(index) => {
                self.bookmarks.remove(index);
                false
            }
            None => {
                self.bookmarks.push(city.clone());
                true
            }
        };
        self.persist()?;
        Ok(added)
    }

    pub fn list(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn is_bookmarked(&self, record_id: &str) -> bool {
        self.bookmarks.iter().any(|b| b.record_id == record_id)
    }

    fn persist(&self) -> Result<()> {
        let storage_error =
            |source: io::Error| Error::Storage { path: self.path.clone(), source };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(storage_error)?;
        }

        let json = serde_json::to_string_pretty(&self.bookmarks)
            .map_err(|err| storage_error(io::Error::other(err)))?;

        fs::write(&self.path, json).map_err(storage_error)
    }
}

fn read_list(path: &Path) -> Vec<Bookmark> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Vec::new(),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "could not read bookmarks");
            return Vec::new();
        }
    };

    match serde_json::from_str(&contents) {
        Ok(bookmarks) => bookmarks,
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "malformed bookmark file, starting empty"
            );
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coordinates;
    use tempfile::TempDir;

    fn city(record_id: &str, name: &str) -> CityRecord {
        CityRecord {
            record_id: record_id.to_string(),
            name: name.to_string(),
            country_name: "France".to_string(),
            timezone: "Europe/Paris".to_string(),
            coordinates: Coordinates { latitude: 48.85, longitude: 2.35 },
        }
    }

    fn store_in(dir: &TempDir) -> BookmarkStore {
        BookmarkStore::open(dir.path().join(BOOKMARKS_FILE))
    }

    #[test]
    fn absent_file_loads_empty() {
        let dir = TempDir::new().expect("tempdir");
        let store = store_in(&dir);
        assert!(store.list().is_empty());
    }

    #[test]
    fn malformed_file_loads_empty() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join(BOOKMARKS_FILE);
        fs::write(&path, "{{{ not json").expect("write");

        let store = BookmarkStore::open(path);
        assert!(store.list().is_empty());
    }

    #[test]
    fn toggle_adds_then_removes() {
        let dir = TempDir::new().expect("tempdir");
        let mut store = store_in(&dir);
        let paris = city("a", "Paris");

        assert!(store.toggle(&paris).expect("toggle"));
        assert!(store.is_bookmarked("a"));

        assert!(!store.toggle(&paris).expect("toggle"));
        assert!(!store.is_bookmarked("a"));
        assert!(store.list().is_empty());
    }

    #[test]
    fn identity_is_record_id_not_object_equality() {
        let dir = TempDir::new().expect("tempdir");
        let mut store = store_in(&dir);

        store.toggle(&city("a", "Paris")).expect("toggle");
        // Same id, different payload: still the same bookmark.
        store.toggle(&city("a", "Paname")).expect("toggle");

        assert!(store.list().is_empty());
    }

    #[test]
    fn list_survives_reopen() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join(BOOKMARKS_FILE);

        let mut store = BookmarkStore::open(path.clone());
        store.toggle(&city("a", "Paris")).expect("toggle");
        store.toggle(&city("b", "Lyon")).expect("toggle");
        drop(store);

        let reopened = BookmarkStore::open(path);
        assert_eq!(reopened.list().len(), 2);
        assert!(reopened.is_bookmarked("b"));
    }

    #[test]
    fn toggle_creates_missing_parent_directories() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("nested").join("deeper").join(BOOKMARKS_FILE);

        let mut store = BookmarkStore::open(path);
        store.toggle(&city("a", "Paris")).expect("toggle should create directories");
        assert_eq!(store.list().len(), 1);
    }
}
