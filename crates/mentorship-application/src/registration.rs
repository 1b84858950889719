//! Registration trigger: reacts to a newly created person.

use crate::allocation_manager::AllocationManager;
use crate::mentor_finder::MentorFinder;
use crate::schedule::ScheduleCalculator;
use mentorship_core::allocation::Allocation;
use mentorship_core::clock::Clock;
use mentorship_core::error::Result;
use mentorship_core::person::Role;
use mentorship_core::store::Stored;
use std::sync::Arc;

pub struct RegistrationHandler {
    finder: Arc<MentorFinder>,
    manager: Arc<AllocationManager>,
    schedule: ScheduleCalculator,
    clock: Arc<dyn Clock>,
}

impl RegistrationHandler {
    pub fn new(
        finder: Arc<MentorFinder>,
        manager: Arc<AllocationManager>,
        schedule: ScheduleCalculator,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            finder,
            manager,
            schedule,
            clock,
        }
    }

    /// Allocates a freshly created mentee to a mentor for the upcoming cycle.
    ///
    /// Mentors are ignored (`Ok(None)`). Errors are logged and returned as
    /// is, nothing is re-dispatched. `AlreadyAssigned` is logged at info
    /// level since callers treat it as success.
    #[tracing::instrument(skip(self))]
    pub async fn on_person_created(
        &self,
        person_id: &str,
        role: Role,
    ) -> Result<Option<Stored<Allocation>>> {
        if role != Role::Mentee {
            tracing::debug!("not a mentee, no allocation needed");
            return Ok(None);
        }

        let session_key = self.schedule.session_key_for(self.clock.now());

        let mentor = self.finder.find_available_mentor().await.map_err(|e| {
            tracing::error!(error = %e, "no mentor could be selected");
            e
        })?;

        match self.manager.assign(&mentor.id, person_id, &session_key).await {
            Ok(allocation) => {
                tracing::info!(
                    mentor_id = %mentor.id,
                    session_key = %session_key,
                    allocation_id = %allocation.id,
                    "mentee allocated"
                );
                Ok(Some(allocation))
            }
            Err(e) if e.is_success_equivalent() => {
                tracing::info!(mentor_id = %mentor.id, session_key = %session_key, "mentee was already allocated");
                Err(e)
            }
            Err(e) => {
                tracing::error!(mentor_id = %mentor.id, session_key = %session_key, error = %e, "allocation failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::venue_selector::VenueSelector;
    use chrono::{TimeZone, Utc};
    use mentorship_core::clock::FixedClock;
    use mentorship_core::config::SchedulePolicy;
    use mentorship_core::person::Person;
    use mentorship_core::store::{DocumentStore, Filter};
    use mentorship_core::venue::Venue;
    use mentorship_infrastructure::InMemoryRecordStore;

    async fn handler() -> (RegistrationHandler, DocumentStore) {
        let store = DocumentStore::new(Arc::new(InMemoryRecordStore::new()));
        store.create("venue-1", Venue::new("Room 1")).await.unwrap();
        store.create("m1", Person::mentor("Mia", "mia@example.com")).await.unwrap();

        let clock: Arc<dyn Clock> =
            Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 12, 6, 9, 0, 0).unwrap()));
        let schedule = ScheduleCalculator::new(SchedulePolicy::default());
        let manager = AllocationManager::new(
            store.clone(),
            schedule.clone(),
            Arc::new(VenueSelector::with_seed(store.clone(), 1)),
            clock.clone(),
            15,
            5,
        );
        let handler = RegistrationHandler::new(
            Arc::new(MentorFinder::new(store.clone(), 15)),
            Arc::new(manager),
            schedule,
            clock,
        );
        (handler, store)
    }

    #[tokio::test]
    async fn test_mentor_is_ignored() {
        let (handler, store) = handler().await;
        assert!(handler.on_person_created("m2", Role::Mentor).await.unwrap().is_none());
        assert!(store.find::<Allocation>(&Filter::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_event_is_success_equivalent() {
        let (handler, store) = handler().await;

        let allocation = handler
            .on_person_created("x", Role::Mentee)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(allocation.mentor_id, "m1");
        assert_eq!(allocation.session_key, "session_20241211_1400");

        let err = handler.on_person_created("x", Role::Mentee).await.unwrap_err();
        assert!(err.is_already_assigned());
        assert!(err.is_success_equivalent());

        let stored = store.get::<Allocation>(&allocation.id).await.unwrap();
        assert_eq!(stored.mentee_ids, vec!["x"]);
    }
}
