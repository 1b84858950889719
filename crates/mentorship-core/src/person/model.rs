//! Person domain model.

use crate::store::{Collection, Document};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Which side of the mentoring relationship a person is on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Mentor,
    Mentee,
}

/// A registered participant. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub role: Role,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl Person {
    pub fn mentor(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            role: Role::Mentor,
            name: name.into(),
            email: email.into(),
        }
    }

    pub fn mentee(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            role: Role::Mentee,
            name: name.into(),
            email: email.into(),
        }
    }
}

impl Document for Person {
    const COLLECTION: Collection = Collection::Persons;
    const ENTITY_NAME: &'static str = "Person";
}
