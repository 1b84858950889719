//! First-fit search for a mentor with spare capacity.

use mentorship_core::allocation::Allocation;
use mentorship_core::error::{MentorshipError, Result};
use mentorship_core::person::{Person, Role};
use mentorship_core::store::{DocumentStore, Filter, Stored};

pub struct MentorFinder {
    store: DocumentStore,
    max_mentees: usize,
}

impl MentorFinder {
    pub fn new(store: DocumentStore, max_mentees: usize) -> Self {
        Self { store, max_mentees }
    }

    /// Returns the first mentor, in store order, whose mentee count is
    /// strictly below the limit.
    ///
    /// The count sums `mentee_ids` over every allocation of the mentor,
    /// completed ones included. Costs one query per mentor scanned.
    ///
    /// # Errors
    ///
    /// - `NoMentorsExist` when no person has the mentor role.
    /// - `NoCapacityAvailable` when every mentor is saturated.
    /// - The last counting error, when no mentor qualified and at least one
    ///   mentor could not be counted.
    #[tracing::instrument(skip(self))]
    pub async fn find_available_mentor(&self) -> Result<Stored<Person>> {
        let mentors = self
            .store
            .find::<Person>(&Filter::all().where_eq("role", Role::Mentor.as_ref()))
            .await?;

        if mentors.is_empty() {
            tracing::warn!("no mentors registered");
            return Err(MentorshipError::NoMentorsExist);
        }

        let mut last_error = None;
        for mentor in mentors {
            match self.mentee_count(&mentor.id).await {
                Ok(count) if count < self.max_mentees => {
                    tracing::debug!(mentor_id = %mentor.id, count, "mentor has capacity");
                    return Ok(mentor);
                }
                Ok(count) => {
                    tracing::trace!(mentor_id = %mentor.id, count, "mentor saturated");
                }
                Err(e) => {
                    tracing::warn!(mentor_id = %mentor.id, error = %e, "could not count mentees, skipping mentor");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(MentorshipError::NoCapacityAvailable))
    }

    /// Total mentees across all allocations of `mentor_id`.
    pub async fn mentee_count(&self, mentor_id: &str) -> Result<usize> {
        let allocations = self
            .store
            .find::<Allocation>(&Filter::all().where_eq("mentor_id", mentor_id))
            .await?;
        Ok(allocations.iter().map(|a| a.len()).sum())
    }
}
