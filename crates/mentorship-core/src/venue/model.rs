//! Venue domain model.

use crate::store::{Collection, Document};
use serde::{Deserialize, Serialize};

/// A place sessions can be held. Read-only for the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Venue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: None,
        }
    }
}

impl Document for Venue {
    const COLLECTION: Collection = Collection::Venues;
    const ENTITY_NAME: &'static str = "Venue";
}
