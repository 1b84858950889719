//! `MentorshipService`: wires the engine components over one store.

use crate::activation::{ActivationReport, AllocationActivator};
use crate::allocation_manager::AllocationManager;
use crate::mentor_finder::MentorFinder;
use crate::registration::RegistrationHandler;
use crate::schedule::ScheduleCalculator;
use crate::session_grouping::{GroupingReport, SessionGroupingJob};
use crate::session_query::SessionQuery;
use crate::venue_selector::VenueSelector;
use mentorship_core::allocation::Allocation;
use mentorship_core::clock::Clock;
use mentorship_core::config::MentorshipConfig;
use mentorship_core::error::Result;
use mentorship_core::person::{Person, Role};
use mentorship_core::session::SessionView;
use mentorship_core::store::{DocumentStore, RecordStore, Stored};
use mentorship_core::venue::Venue;
use std::sync::Arc;
use uuid::Uuid;

/// A person that was stored, and what the registration trigger made of it.
#[derive(Debug)]
pub struct Registration {
    pub person: Stored<Person>,
    /// `Ok(None)` for mentors. Failures here do not undo the person.
    pub allocation: Result<Option<Stored<Allocation>>>,
}

pub struct MentorshipService {
    config: MentorshipConfig,
    store: DocumentStore,
    clock: Arc<dyn Clock>,
    finder: Arc<MentorFinder>,
    manager: Arc<AllocationManager>,
    registration: RegistrationHandler,
    grouping: SessionGroupingJob,
    activator: AllocationActivator,
    query: SessionQuery,
}

impl MentorshipService {
    /// Builds the service with an entropy-seeded venue selector.
    pub fn new(
        config: MentorshipConfig,
        store: Arc<dyn RecordStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let documents = DocumentStore::new(store);
        let venues = VenueSelector::new(documents.clone());
        Self::build(config, documents, clock, venues)
    }

    /// Same as [`new`](Self::new) with a fixed venue seed.
    pub fn with_venue_seed(
        config: MentorshipConfig,
        store: Arc<dyn RecordStore>,
        clock: Arc<dyn Clock>,
        seed: u64,
    ) -> Result<Self> {
        let documents = DocumentStore::new(store);
        let venues = VenueSelector::with_seed(documents.clone(), seed);
        Self::build(config, documents, clock, venues)
    }

    fn build(
        config: MentorshipConfig,
        store: DocumentStore,
        clock: Arc<dyn Clock>,
        venues: VenueSelector,
    ) -> Result<Self> {
        config.validate()?;

        let allocation = &config.allocation;
        let schedule = ScheduleCalculator::new(config.schedule.clone());
        let finder = Arc::new(MentorFinder::new(
            store.clone(),
            allocation.max_mentees_per_mentor,
        ));
        let manager = Arc::new(AllocationManager::new(
            store.clone(),
            schedule.clone(),
            Arc::new(venues),
            clock.clone(),
            allocation.max_mentees_per_mentor,
            allocation.assign_max_attempts,
        ));
        let registration =
            RegistrationHandler::new(finder.clone(), manager.clone(), schedule, clock.clone());
        let grouping = SessionGroupingJob::new(store.clone(), allocation.students_per_session);
        let activator =
            AllocationActivator::new(store.clone(), config.schedule.activation_lead_days);
        let query = SessionQuery::new(store.clone());

        Ok(Self {
            config,
            store,
            clock,
            finder,
            manager,
            registration,
            grouping,
            activator,
            query,
        })
    }

    pub fn config(&self) -> &MentorshipConfig {
        &self.config
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Stores a new person under a fresh id and fires the registration trigger.
    pub async fn register_person(&self, person: Person) -> Result<Registration> {
        let role = person.role;
        let person = self.store.create(&Uuid::new_v4().to_string(), person).await?;
        tracing::info!(person_id = %person.id, role = %role, "person created");

        let allocation = self.registration.on_person_created(&person.id, role).await;
        Ok(Registration { person, allocation })
    }

    /// Registration trigger for a person created elsewhere.
    pub async fn on_person_created(
        &self,
        person_id: &str,
        role: Role,
    ) -> Result<Option<Stored<Allocation>>> {
        self.registration.on_person_created(person_id, role).await
    }

    pub async fn add_venue(&self, venue: Venue) -> Result<Stored<Venue>> {
        let venue = self.store.create(&Uuid::new_v4().to_string(), venue).await?;
        tracing::info!(venue_id = %venue.id, name = %venue.name, "venue added");
        Ok(venue)
    }

    pub async fn find_available_mentor(&self) -> Result<Stored<Person>> {
        self.finder.find_available_mentor().await
    }

    pub async fn assign(
        &self,
        mentor_id: &str,
        mentee_id: &str,
        session_key: &str,
    ) -> Result<Stored<Allocation>> {
        self.manager.assign(mentor_id, mentee_id, session_key).await
    }

    pub async fn run_session_grouping(&self) -> Result<GroupingReport> {
        self.grouping.run_for_all_mentors().await
    }

    /// Activates due allocations relative to the service clock.
    pub async fn activate_due_allocations(&self) -> Result<ActivationReport> {
        self.activator.activate_due_allocations(self.clock.now()).await
    }

    pub async fn sessions_for_mentor(&self, mentor_id: &str) -> Result<Vec<SessionView>> {
        self.query.sessions_for_mentor(mentor_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use mentorship_core::clock::FixedClock;
    use mentorship_infrastructure::InMemoryRecordStore;

    fn service(config: MentorshipConfig) -> Result<MentorshipService> {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 12, 6, 12, 0, 0).unwrap());
        MentorshipService::with_venue_seed(
            config,
            Arc::new(InMemoryRecordStore::new()),
            Arc::new(clock),
            3,
        )
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = MentorshipConfig::default();
        config.allocation.students_per_session = 0;
        assert!(service(config).is_err());
    }

    #[tokio::test]
    async fn test_register_mentor_has_no_allocation() {
        let service = service(MentorshipConfig::default()).unwrap();
        let registration = service
            .register_person(Person::mentor("Mia", "mia@example.com"))
            .await
            .unwrap();
        assert_eq!(registration.person.role, Role::Mentor);
        assert!(registration.allocation.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_register_mentee_is_allocated_to_next_slot() {
        let service = service(MentorshipConfig::default()).unwrap();
        service.add_venue(Venue::new("Hall")).await.unwrap();
        let mentor = service
            .register_person(Person::mentor("Mia", "mia@example.com"))
            .await
            .unwrap()
            .person;

        let registration = service
            .register_person(Person::mentee("Max", "max@example.com"))
            .await
            .unwrap();
        let allocation = registration.allocation.unwrap().unwrap();
        assert_eq!(allocation.mentor_id, mentor.id);
        assert_eq!(allocation.session_key, "session_20241211_1400");
        assert_eq!(allocation.mentee_ids, vec![registration.person.id.clone()]);
    }

    #[tokio::test]
    async fn test_mentee_without_mentors_keeps_person() {
        let service = service(MentorshipConfig::default()).unwrap();
        let registration = service
            .register_person(Person::mentee("Max", "max@example.com"))
            .await
            .unwrap();
        assert!(registration.allocation.unwrap_err().is_not_found());
        assert!(
            service
                .store()
                .find_by_id::<Person>(&registration.person.id)
                .await
                .unwrap()
                .is_some()
        );
    }
}
