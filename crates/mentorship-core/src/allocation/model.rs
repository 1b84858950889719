//! Allocation domain model.

use crate::error::{MentorshipError, Result};
use crate::store::{Collection, Document};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

/// Lifecycle of an allocation.
///
/// `Upcoming -> Active -> Completed`. Nothing leaves `Completed`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AllocationStatus {
    Upcoming,
    Active,
    Completed,
}

impl AllocationStatus {
    /// Whether `self -> next` is a legal transition.
    pub fn can_transition_to(self, next: AllocationStatus) -> bool {
        matches!(
            (self, next),
            (Self::Upcoming, Self::Active) | (Self::Active, Self::Completed)
        )
    }
}

/// The mentees assigned to one mentor within one scheduling cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub mentor_id: String,
    pub session_key: String,
    /// Assignment order, no duplicates.
    #[serde(default)]
    pub mentee_ids: Vec<String>,
    pub venue_id: String,
    pub session_date: DateTime<Utc>,
    pub status: AllocationStatus,
    pub is_assigned: bool,
    pub allocated_on: DateTime<Utc>,
}

impl Allocation {
    /// Namespace for deterministic allocation ids.
    const ID_NAMESPACE: Uuid = Uuid::from_u128(0x6d2c_8f1e_4b7a_4c3d_9e52_1a0b_7c64_f3d9);

    /// Starts a new, empty allocation in the `Upcoming` state.
    pub fn new(
        mentor_id: impl Into<String>,
        session_key: impl Into<String>,
        venue_id: impl Into<String>,
        session_date: DateTime<Utc>,
        allocated_on: DateTime<Utc>,
    ) -> Self {
        Self {
            mentor_id: mentor_id.into(),
            session_key: session_key.into(),
            mentee_ids: Vec::new(),
            venue_id: venue_id.into(),
            session_date,
            status: AllocationStatus::Upcoming,
            is_assigned: true,
            allocated_on,
        }
    }

    /// Id for the `generation`-th allocation of a mentor within a cycle.
    ///
    /// Two writers racing to create the same allocation derive the same id,
    /// so the store rejects the second create with `Conflict`.
    pub fn id_for(mentor_id: &str, session_key: &str, generation: usize) -> String {
        let name = format!("{}\u{1f}{}\u{1f}{}", mentor_id, session_key, generation);
        Uuid::new_v5(&Self::ID_NAMESPACE, name.as_bytes()).to_string()
    }

    pub fn contains(&self, mentee_id: &str) -> bool {
        self.mentee_ids.iter().any(|id| id == mentee_id)
    }

    pub fn len(&self) -> usize {
        self.mentee_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mentee_ids.is_empty()
    }

    pub fn is_full(&self, limit: usize) -> bool {
        self.mentee_ids.len() >= limit
    }

    /// Appends a mentee. Callers check `contains` and `is_full` first.
    /// Moves the allocation to `next` if the lifecycle allows it.
    ///
    /// `id` is only used for the error.
    pub fn transition_to(&mut self, id: &str, next: AllocationStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(MentorshipError::InvalidTransition {
                id: id.to_string(),
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    pub fn push_mentee(&mut self, mentee_id: impl Into<String>) {
        self.mentee_ids.push(mentee_id.into());
        self.is_assigned = true;
    }
}

impl Document for Allocation {
    const COLLECTION: Collection = Collection::Allocations;
    const ENTITY_NAME: &'static str = "Allocation";
}
