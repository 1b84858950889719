//! Untyped record store contract.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// The collections the engine reads and writes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Collection {
    Persons,
    Allocations,
    Sessions,
    Venues,
}

/// A stored document: id, store-managed revision, and the document body.
///
/// `revision` starts at 1 on create and is bumped by every successful
/// update. Updates are accepted only when the caller presents the revision
/// currently stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub revision: u64,
    pub fields: Map<String, Value>,
}

impl Record {
    /// Returns true when every filter condition matches a top-level field.
    pub fn matches(&self, filter: &Filter) -> bool {
        filter
            .conditions
            .iter()
            .all(|(field, expected)| self.fields.get(field) == Some(expected))
    }
}

/// Conjunction of top-level field equality conditions.
///
/// An empty filter matches every record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    /// Matches every record in a collection.
    pub fn all() -> Self {
        Self::default()
    }

    /// Adds a `field == value` condition.
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }
}

/// An abstract document store.
///
/// Each call is atomic with respect to a single record; no multi-record
/// transactions are assumed. `find` must return records in a stable
/// enumeration order (insertion order for the bundled adapters).
///
/// # Errors
///
/// - `create` fails with `Conflict` if `id` already exists in the collection.
/// - `update` fails with `Conflict` if the stored revision differs from
///   `record.revision`, and with `NotFound` if the record does not exist.
/// - Transient failures surface as `StoreUnavailable` or `Io`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Lists records of `collection` matching `filter`.
    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Record>>;

    /// Point lookup. `Ok(None)` when the record does not exist.
    async fn find_by_id(&self, collection: Collection, id: &str) -> Result<Option<Record>>;

    /// Inserts a new record with revision 1 and returns it.
    async fn create(
        &self,
        collection: Collection,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<Record>;

    /// Replaces the fields of an existing record if its revision is unchanged.
    ///
    /// Returns the stored record with its new revision.
    async fn update(&self, collection: Collection, record: &Record) -> Result<Record>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(fields: Value) -> Record {
        Record {
            id: "r1".to_string(),
            revision: 1,
            fields: fields.as_object().cloned().unwrap(),
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let rec = record(json!({ "role": "mentor" }));
        assert!(rec.matches(&Filter::all()));
    }

    #[test]
    fn test_filter_requires_all_conditions() {
        let rec = record(json!({ "mentor_id": "m1", "status": "active" }));
        assert!(rec.matches(&Filter::all().where_eq("mentor_id", "m1")));
        assert!(rec.matches(&Filter::all().where_eq("mentor_id", "m1").where_eq("status", "active")));
        assert!(!rec.matches(&Filter::all().where_eq("mentor_id", "m1").where_eq("status", "completed")));
        assert!(!rec.matches(&Filter::all().where_eq("missing", "x")));
    }

    #[test]
    fn test_collection_names() {
        assert_eq!(Collection::Allocations.as_ref(), "allocations");
        assert_eq!(Collection::Persons.to_string(), "persons");
        assert_eq!("venues".parse::<Collection>().unwrap(), Collection::Venues);
    }
}
