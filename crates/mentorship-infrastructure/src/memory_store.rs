//! In-memory `RecordStore` implementation.

use async_trait::async_trait;
use mentorship_core::error::{MentorshipError, Result};
use mentorship_core::store::{Collection, Filter, Record, RecordStore};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local record store.
///
/// Records are kept per collection in insertion order, which is the stable
/// enumeration order `find` returns. Every call takes the lock once, so
/// each operation is atomic with respect to the records it touches.
#[derive(Default)]
pub struct InMemoryRecordStore {
    collections: RwLock<HashMap<Collection, Vec<Record>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    async fn len(&self, collection: Collection) -> usize {
        let collections = self.collections.read().await;
        collections.get(&collection).map_or(0, Vec::len)
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Record>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|record| record.matches(filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_by_id(&self, collection: Collection, id: &str) -> Result<Option<Record>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|records| records.iter().find(|record| record.id == id))
            .cloned())
    }

    async fn create(
        &self,
        collection: Collection,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<Record> {
        let mut collections = self.collections.write().await;
        let records = collections.entry(collection).or_default();

        if records.iter().any(|record| record.id == id) {
            tracing::debug!(collection = %collection, id, "create rejected: id exists");
            return Err(MentorshipError::conflict(collection.as_ref(), id));
        }

        let record = Record {
            id: id.to_string(),
            revision: 1,
            fields,
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, collection: Collection, record: &Record) -> Result<Record> {
        let mut collections = self.collections.write().await;
        let existing = collections
            .get_mut(&collection)
            .and_then(|records| records.iter_mut().find(|r| r.id == record.id))
            .ok_or_else(|| MentorshipError::not_found("Record", &record.id))?;

        if existing.revision != record.revision {
            tracing::debug!(
                collection = %collection,
                id = %record.id,
                stored = existing.revision,
                presented = record.revision,
                "update rejected: stale revision"
            );
            return Err(MentorshipError::conflict(collection.as_ref(), &record.id));
        }

        existing.fields = record.fields.clone();
        existing.revision += 1;
        Ok(existing.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_find_preserves_insertion_order() {
        let store = InMemoryRecordStore::new();
        for id in ["c", "a", "b"] {
            store
                .create(Collection::Persons, id, fields(json!({ "role": "mentor" })))
                .await
                .unwrap();
        }

        let ids: Vec<String> = store
            .find(Collection::Persons, &Filter::all())
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let store = InMemoryRecordStore::new();
        store
            .create(Collection::Persons, "x", fields(json!({})))
            .await
            .unwrap();

        assert!(store.find_by_id(Collection::Venues, "x").await.unwrap().is_none());
        store
            .create(Collection::Venues, "x", fields(json!({})))
            .await
            .unwrap();
        assert_eq!(store.len(Collection::Venues).await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_create_conflicts() {
        let store = InMemoryRecordStore::new();
        store
            .create(Collection::Allocations, "a1", fields(json!({ "n": 1 })))
            .await
            .unwrap();

        let err = store
            .create(Collection::Allocations, "a1", fields(json!({ "n": 2 })))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_update_bumps_revision_and_rejects_stale() {
        let store = InMemoryRecordStore::new();
        let created = store
            .create(Collection::Allocations, "a1", fields(json!({ "n": 1 })))
            .await
            .unwrap();

        let mut next = created.clone();
        next.fields = fields(json!({ "n": 2 }));
        let updated = store.update(Collection::Allocations, &next).await.unwrap();
        assert_eq!(updated.revision, 2);

        let err = store
            .update(Collection::Allocations, &created)
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        let stored = store
            .find_by_id(Collection::Allocations, "a1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.fields["n"], 2);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = InMemoryRecordStore::new();
        let ghost = Record {
            id: "ghost".to_string(),
            revision: 1,
            fields: Map::new(),
        };
        let err = store.update(Collection::Sessions, &ghost).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_one_winner() {
        let store = Arc::new(InMemoryRecordStore::new());
        let created = store
            .create(Collection::Allocations, "a1", fields(json!({ "n": 0 })))
            .await
            .unwrap();

        let attempts = (0..8).map(|i| {
            let store = store.clone();
            let mut record = created.clone();
            record.fields = fields(json!({ "n": i }));
            async move { store.update(Collection::Allocations, &record).await }
        });
        let results = futures::future::join_all(attempts).await;

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(
            results
                .iter()
                .filter_map(|r| r.as_ref().err())
                .all(MentorshipError::is_conflict)
        );
    }
}
