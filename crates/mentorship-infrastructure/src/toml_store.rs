//! TOML-file-backed `RecordStore` implementation.
//!
//! Directory structure:
//! ```text
//! base_dir/
//! ├── persons.toml
//! ├── allocations.toml
//! ├── sessions.toml
//! └── venues.toml
//! ```
//!
//! Each file holds the whole collection as an ordered `[[records]]` array.
//! Writes rewrite the file through [`AtomicTomlFile`], so a reader never sees
//! a partially written collection.

use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use mentorship_core::error::{MentorshipError, Result};
use mentorship_core::store::{Collection, Filter, Record, RecordStore};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Default, Serialize, Deserialize)]
struct CollectionFile {
    #[serde(default)]
    records: Vec<Record>,
}

/// File-backed record store.
///
/// Cross-process exclusion comes from the file lock taken by
/// `AtomicTomlFile::update`; the in-process mutex keeps tokio's blocking
/// pool from piling up threads waiting on that lock.
pub struct TomlRecordStore {
    base_dir: Arc<PathBuf>,
    write_lock: Mutex<()>,
}

impl TomlRecordStore {
    /// Opens (and creates if needed) a store rooted at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        std::fs::create_dir_all(&base_dir)?;
        tracing::debug!(path = %base_dir.display(), "opened TOML record store");
        Ok(Self {
            base_dir: Arc::new(base_dir),
            write_lock: Mutex::new(()),
        })
    }

    fn file(base_dir: &Path, collection: Collection) -> AtomicTomlFile<CollectionFile> {
        AtomicTomlFile::new(base_dir.join(format!("{}.toml", collection.as_ref())))
    }

    async fn read<R, F>(&self, collection: Collection, f: F) -> Result<R>
    where
        F: FnOnce(Vec<Record>) -> R + Send + 'static,
        R: Send + 'static,
    {
        let base_dir = self.base_dir.clone();
        tokio::task::spawn_blocking(move || -> Result<R> {
            let file = Self::file(&base_dir, collection);
            let records = file.load_locked()?.unwrap_or_default().records;
            Ok(f(records))
        })
        .await
        .map_err(|e| MentorshipError::store_unavailable(format!("store task failed: {}", e)))?
    }

    async fn write<R, F>(&self, collection: Collection, f: F) -> Result<R>
    where
        F: FnOnce(&mut Vec<Record>) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let _guard = self.write_lock.lock().await;
        let base_dir = self.base_dir.clone();
        tokio::task::spawn_blocking(move || {
            let file = Self::file(&base_dir, collection);
            file.update(CollectionFile::default(), |data| f(&mut data.records))
        })
        .await
        .map_err(|e| MentorshipError::store_unavailable(format!("store task failed: {}", e)))?
    }
}

#[async_trait]
impl RecordStore for TomlRecordStore {
    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Record>> {
        let filter = filter.clone();
        self.read(collection, move |records| {
            records
                .into_iter()
                .filter(|record| record.matches(&filter))
                .collect()
        })
        .await
    }

    async fn find_by_id(&self, collection: Collection, id: &str) -> Result<Option<Record>> {
        let id = id.to_string();
        self.read(collection, move |records| {
            records.into_iter().find(|record| record.id == id)
        })
        .await
    }

    async fn create(
        &self,
        collection: Collection,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<Record> {
        let id = id.to_string();
        self.write(collection, move |records| {
            if records.iter().any(|record| record.id == id) {
                return Err(MentorshipError::conflict(collection.as_ref(), &id));
            }
            let record = Record {
                id,
                revision: 1,
                fields,
            };
            records.push(record.clone());
            Ok(record)
        })
        .await
    }

    async fn update(&self, collection: Collection, record: &Record) -> Result<Record> {
        let record = record.clone();
        self.write(collection, move |records| {
            let existing = records
                .iter_mut()
                .find(|r| r.id == record.id)
                .ok_or_else(|| MentorshipError::not_found("Record", &record.id))?;
            if existing.revision != record.revision {
                return Err(MentorshipError::conflict(collection.as_ref(), &record.id));
            }
            existing.fields = record.fields;
            existing.revision += 1;
            Ok(existing.clone())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn create_test_store() -> (TomlRecordStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = TomlRecordStore::new(temp_dir.path()).unwrap();
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_create_and_find_round_trip() {
        let (store, temp_dir) = create_test_store();

        store
            .create(
                Collection::Allocations,
                "a1",
                fields(json!({
                    "mentor_id": "m1",
                    "mentee_ids": ["x", "y"],
                    "status": "active",
                    "is_assigned": true,
                    "session_date": "2024-12-11T14:00:00Z",
                })),
            )
            .await
            .unwrap();

        assert!(temp_dir.path().join("allocations.toml").exists());

        let found = store
            .find(
                Collection::Allocations,
                &Filter::all().where_eq("mentor_id", "m1").where_eq("status", "active"),
            )
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].fields["mentee_ids"], json!(["x", "y"]));
        assert_eq!(found[0].fields["is_assigned"], json!(true));
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        {
            let store = TomlRecordStore::new(temp_dir.path()).unwrap();
            store
                .create(Collection::Venues, "v1", fields(json!({ "name": "Room 101" })))
                .await
                .unwrap();
        }

        let reopened = TomlRecordStore::new(temp_dir.path()).unwrap();
        let venue = reopened
            .find_by_id(Collection::Venues, "v1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(venue.fields["name"], "Room 101");
        assert_eq!(venue.revision, 1);
    }

    #[tokio::test]
    async fn test_missing_collection_is_empty() {
        let (store, _temp_dir) = create_test_store();
        assert!(store.find(Collection::Sessions, &Filter::all()).await.unwrap().is_empty());
        assert!(store.find_by_id(Collection::Sessions, "s1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stale_update_conflicts() {
        let (store, _temp_dir) = create_test_store();
        let created = store
            .create(Collection::Persons, "p1", fields(json!({ "role": "mentor" })))
            .await
            .unwrap();

        let mut renamed = created.clone();
        renamed.fields.insert("name".into(), json!("Ada"));
        let updated = store.update(Collection::Persons, &renamed).await.unwrap();
        assert_eq!(updated.revision, 2);

        let err = store.update(Collection::Persons, &created).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_duplicate_create_conflicts() {
        let (store, _temp_dir) = create_test_store();
        store
            .create(Collection::Persons, "p1", fields(json!({})))
            .await
            .unwrap();
        let err = store
            .create(Collection::Persons, "p1", fields(json!({})))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }
}
