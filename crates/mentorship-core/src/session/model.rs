//! Session domain model.

use crate::store::{Collection, Document};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scheduled meeting built from a chunk of a mentor's allocations.
///
/// Created only by the session grouping job and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub mentor_id: String,
    /// Ids of the allocations folded into this session, in chunk order.
    pub session_students: Vec<String>,
    /// Venue id.
    pub venue: String,
    pub datetime: DateTime<Utc>,
}

impl Document for Session {
    const COLLECTION: Collection = Collection::Sessions;
    const ENTITY_NAME: &'static str = "Session";
}
