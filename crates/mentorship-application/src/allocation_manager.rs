//! Allocation Manager: attaches a mentee to a mentor's allocation for a
//! scheduling cycle.
//!
//! Every attempt performs at most one write. Updates carry the revision that
//! was read, and first-time creates use an id derived from
//! `(mentor_id, session_key, generation)`, so any interleaving of two
//! writers makes one of them fail with `Conflict`. A conflicting attempt is
//! re-run from the read, which re-checks duplicates and capacity against the
//! winner's state.

use crate::schedule::ScheduleCalculator;
use crate::venue_selector::VenueSelector;
use mentorship_core::allocation::{Allocation, AllocationStatus};
use mentorship_core::clock::Clock;
use mentorship_core::error::{MentorshipError, Result};
use mentorship_core::store::{DocumentStore, Filter, Stored};
use std::sync::Arc;

/// Result of looking up the open allocation of a `(mentor, session_key)` pair.
enum OpenAllocation {
    Found(Stored<Allocation>),
    /// No open allocation. `generation` counts the completed ones and feeds
    /// the id of the next create.
    Missing { generation: usize },
}

pub struct AllocationManager {
    store: DocumentStore,
    schedule: ScheduleCalculator,
    venues: Arc<VenueSelector>,
    clock: Arc<dyn Clock>,
    max_mentees: usize,
    max_attempts: u32,
}

impl AllocationManager {
    pub fn new(
        store: DocumentStore,
        schedule: ScheduleCalculator,
        venues: Arc<VenueSelector>,
        clock: Arc<dyn Clock>,
        max_mentees: usize,
        max_attempts: u32,
    ) -> Self {
        Self {
            store,
            schedule,
            venues,
            clock,
            max_mentees,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Adds `mentee_id` to the open allocation of `mentor_id` for
    /// `session_key`, creating the allocation on first use.
    ///
    /// # Errors
    ///
    /// - `AlreadyAssigned` if the mentee is already in the allocation
    ///   (callers may treat this as success).
    /// - `CapacityExceeded` if the allocation already holds the maximum.
    /// - `NoVenuesAvailable` if a new allocation is needed and no venue exists.
    /// - `Conflict` once every attempt lost a write race.
    #[tracing::instrument(skip(self))]
    pub async fn assign(
        &self,
        mentor_id: &str,
        mentee_id: &str,
        session_key: &str,
    ) -> Result<Stored<Allocation>> {
        let mut attempt = 1;
        loop {
            match self.try_assign(mentor_id, mentee_id, session_key).await {
                Err(e) if e.is_conflict() && attempt < self.max_attempts => {
                    tracing::debug!(attempt, error = %e, "allocation write lost a race, retrying");
                    attempt += 1;
                }
                Err(e) if e.is_conflict() => {
                    tracing::warn!(attempts = attempt, "giving up after repeated write conflicts");
                    return Err(e);
                }
                Ok(allocation) => {
                    tracing::info!(
                        allocation_id = %allocation.id,
                        mentees = allocation.len(),
                        "mentee assigned"
                    );
                    return Ok(allocation);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// One read-validate-write pass.
    async fn try_assign(
        &self,
        mentor_id: &str,
        mentee_id: &str,
        session_key: &str,
    ) -> Result<Stored<Allocation>> {
        match self.find_open(mentor_id, session_key).await? {
            OpenAllocation::Found(mut allocation) => {
                self.check_can_add(&allocation, mentee_id)?;
                allocation.push_mentee(mentee_id);
                self.store.update(allocation).await
            }
            OpenAllocation::Missing { generation } => {
                let venue = self.venues.pick_venue().await?;
                let now = self.clock.now();
                let mut allocation = Allocation::new(
                    mentor_id,
                    session_key,
                    venue.id,
                    self.schedule.next_session_slot(now),
                    now,
                );
                self.check_can_add(&allocation, mentee_id)?;
                allocation.push_mentee(mentee_id);

                let id = Allocation::id_for(mentor_id, session_key, generation);
                tracing::debug!(allocation_id = %id, generation, "creating allocation");
                self.store.create(&id, allocation).await
            }
        }
    }

    fn check_can_add(&self, allocation: &Allocation, mentee_id: &str) -> Result<()> {
        if allocation.contains(mentee_id) {
            return Err(MentorshipError::AlreadyAssigned {
                mentee_id: mentee_id.to_string(),
                mentor_id: allocation.mentor_id.clone(),
                session_key: allocation.session_key.clone(),
            });
        }
        if allocation.is_full(self.max_mentees) {
            return Err(MentorshipError::CapacityExceeded {
                mentor_id: allocation.mentor_id.clone(),
                session_key: allocation.session_key.clone(),
                limit: self.max_mentees,
            });
        }
        Ok(())
    }

    async fn find_open(&self, mentor_id: &str, session_key: &str) -> Result<OpenAllocation> {
        let allocations = self
            .store
            .find::<Allocation>(
                &Filter::all()
                    .where_eq("mentor_id", mentor_id)
                    .where_eq("session_key", session_key),
            )
            .await?;

        let generation = allocations
            .iter()
            .filter(|a| a.status == AllocationStatus::Completed)
            .count();

        Ok(allocations
            .into_iter()
            .find(|a| a.status != AllocationStatus::Completed)
            .map_or(OpenAllocation::Missing { generation }, OpenAllocation::Found))
    }
}
