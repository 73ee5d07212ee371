//! Untyped storage of JSON records in named collections.

use crate::error::StoreResult;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// The record collections shelfwise persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Shelves,
    Products,
    Users,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Shelves, Collection::Products, Collection::Users];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Collection::Shelves => "shelves",
            Collection::Products => "products",
            Collection::Users => "users",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Basic get/put/delete over named collections of JSON records.
///
/// Listing returns records in insertion order; `put` on an existing id
/// replaces the record in place.
pub trait Repository: Send + Sync {
    fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Value>>;
    fn put(&mut self, collection: Collection, id: &str, record: Value) -> StoreResult<()>;
    /// Returns whether a record was removed
    fn delete(&mut self, collection: Collection, id: &str) -> StoreResult<bool>;
    fn list(&self, collection: Collection) -> StoreResult<Vec<Value>>;
}

impl<R: Repository + ?Sized> Repository for Box<R> {
    fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Value>> {
        (**self).get(collection, id)
    }

    fn put(&mut self, collection: Collection, id: &str, record: Value) -> StoreResult<()> {
        (**self).put(collection, id, record)
    }

    fn delete(&mut self, collection: Collection, id: &str) -> StoreResult<bool> {
        (**self).delete(collection, id)
    }

    fn list(&self, collection: Collection) -> StoreResult<Vec<Value>> {
        (**self).list(collection)
    }
}

type Records = IndexMap<String, Value>;

/// Process-local repository.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    collections: HashMap<Collection, Records>,
}

impl MemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self, collection: Collection) -> Option<&Records> {
        self.collections.get(&collection)
    }
}

impl Repository for MemoryRepository {
    fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Value>> {
        Ok(self.records(collection).and_then(|r| r.get(id)).cloned())
    }

    fn put(&mut self, collection: Collection, id: &str, record: Value) -> StoreResult<()> {
        self.collections
            .entry(collection)
            .or_default()
            .insert(id.to_string(), record);
        Ok(())
    }

    fn delete(&mut self, collection: Collection, id: &str) -> StoreResult<bool> {
        Ok(self
            .collections
            .get_mut(&collection)
            .and_then(|r| r.shift_remove(id))
            .is_some())
    }

    fn list(&self, collection: Collection) -> StoreResult<Vec<Value>> {
        Ok(self
            .records(collection)
            .map(|r| r.values().cloned().collect())
            .unwrap_or_default())
    }
}

/// Repository backed by one `<collection>.json` file per collection.
///
/// Each file holds a JSON object mapping id to record. Files are read once
/// on open. A change is written to a temporary file in the same directory
/// and renamed over the collection file; the cache only sees the change
/// once that succeeds.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    dir: PathBuf,
    cache: MemoryRepository,
}

impl JsonFileRepository {
    /// Open (creating if needed) a repository rooted at `dir`
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let mut cache = MemoryRepository::new();
        for collection in Collection::ALL {
            let path = collection_path(&dir, collection);
            if !path.exists() {
                continue;
            }
            let content = fs::read_to_string(&path)?;
            let records: Records = serde_json::from_str(&content)?;
            tracing::debug!("loaded {} {} from {}", records.len(), collection, path.display());
            cache.collections.insert(collection, records);
        }

        Ok(JsonFileRepository { dir, cache })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn snapshot(&self, collection: Collection) -> Records {
        self.cache.records(collection).cloned().unwrap_or_default()
    }

    /// Write `records` as the new content of the collection file, then
    /// swap them into the cache.
    fn commit(&mut self, collection: Collection, records: Records) -> StoreResult<()> {
        let path = collection_path(&self.dir, collection);
        let content = serde_json::to_string_pretty(&records)?;

        let mut file = NamedTempFile::new_in(&self.dir)?;
        file.write_all(content.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&path).map_err(|e| e.error)?;

        self.cache.collections.insert(collection, records);
        Ok(())
    }
}

fn collection_path(dir: &Path, collection: Collection) -> PathBuf {
    dir.join(format!("{}.json", collection.name()))
}

impl Repository for JsonFileRepository {
    fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Value>> {
        self.cache.get(collection, id)
    }

    fn put(&mut self, collection: Collection, id: &str, record: Value) -> StoreResult<()> {
        let mut records = self.snapshot(collection);
        records.insert(id.to_string(), record);
        self.commit(collection, records)
    }

    fn delete(&mut self, collection: Collection, id: &str) -> StoreResult<bool> {
        let mut records = self.snapshot(collection);
        if records.shift_remove(id).is_none() {
            return Ok(false);
        }
        self.commit(collection, records)?;
        Ok(true)
    }

    fn list(&self, collection: Collection) -> StoreResult<Vec<Value>> {
        self.cache.list(collection)
    }
}
