//! Typed access on top of [`RecordStore`].

use super::record::{Collection, Filter, Record, RecordStore};
use crate::error::{MentorshipError, Result};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// A domain type persisted as one record in a fixed collection.
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: Collection;
    /// Used in `NotFound` errors.
    const ENTITY_NAME: &'static str;
}

/// A document together with its record id and revision.
#[derive(Debug, Clone, PartialEq)]
pub struct Stored<T> {
    pub id: String,
    pub revision: u64,
    pub doc: T,
}

impl<T> Deref for Stored<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.doc
    }
}

impl<T> DerefMut for Stored<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.doc
    }
}

impl<T: Document> Stored<T> {
    fn from_record(record: Record) -> Result<Self> {
        let doc = serde_json::from_value(Value::Object(record.fields))?;
        Ok(Self {
            id: record.id,
            revision: record.revision,
            doc,
        })
    }

    fn to_record(&self) -> Result<Record> {
        Ok(Record {
            id: self.id.clone(),
            revision: self.revision,
            fields: to_fields(&self.doc)?,
        })
    }
}

fn to_fields<T: Serialize>(doc: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(doc)? {
        Value::Object(map) => Ok(map),
        other => Err(MentorshipError::internal(format!(
            "document did not serialize to an object: {}",
            other
        ))),
    }
}

/// Cloneable typed facade over a shared [`RecordStore`].
#[derive(Clone)]
pub struct DocumentStore {
    inner: Arc<dyn RecordStore>,
}

impl DocumentStore {
    pub fn new(inner: Arc<dyn RecordStore>) -> Self {
        Self { inner }
    }

    /// The underlying untyped store.
    pub fn raw(&self) -> &Arc<dyn RecordStore> {
        &self.inner
    }

    pub async fn find<T: Document>(&self, filter: &Filter) -> Result<Vec<Stored<T>>> {
        self.inner
            .find(T::COLLECTION, filter)
            .await?
            .into_iter()
            .map(Stored::from_record)
            .collect()
    }

    pub async fn find_by_id<T: Document>(&self, id: &str) -> Result<Option<Stored<T>>> {
        match self.inner.find_by_id(T::COLLECTION, id).await? {
            Some(record) => Ok(Some(Stored::from_record(record)?)),
            None => Ok(None),
        }
    }

    /// Like [`find_by_id`](Self::find_by_id) but maps absence to `NotFound`.
    pub async fn get<T: Document>(&self, id: &str) -> Result<Stored<T>> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| MentorshipError::not_found(T::ENTITY_NAME, id))
    }

    pub async fn create<T: Document>(&self, id: &str, doc: T) -> Result<Stored<T>> {
        let record = self.inner.create(T::COLLECTION, id, to_fields(&doc)?).await?;
        Ok(Stored {
            id: record.id,
            revision: record.revision,
            doc,
        })
    }

    /// Conditional write: fails with `Conflict` if `stored.revision` is stale.
    pub async fn update<T: Document>(&self, stored: Stored<T>) -> Result<Stored<T>> {
        let record = self.inner.update(T::COLLECTION, &stored.to_record()?).await?;
        Ok(Stored {
            id: record.id,
            revision: record.revision,
            doc: stored.doc,
        })
    }
}
