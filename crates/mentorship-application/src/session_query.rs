//! Read path: a mentor's sessions with their resolved students.

use mentorship_core::allocation::Allocation;
use mentorship_core::error::Result;
use mentorship_core::person::Person;
use mentorship_core::session::{Session, SessionView, StudentInfo};
use mentorship_core::store::{DocumentStore, Filter, Stored};
use std::collections::HashSet;

pub struct SessionQuery {
    store: DocumentStore,
}

impl SessionQuery {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// Sessions of `mentor_id` in storage order.
    ///
    /// Students are resolved session -> allocation -> mentee ids -> person,
    /// deduplicated in first-seen order. Dangling references are logged and
    /// skipped; only listing the sessions themselves can fail.
    #[tracing::instrument(skip(self))]
    pub async fn sessions_for_mentor(&self, mentor_id: &str) -> Result<Vec<SessionView>> {
        let sessions = self
            .store
            .find::<Session>(&Filter::all().where_eq("mentor_id", mentor_id))
            .await?;

        let mut views = Vec::with_capacity(sessions.len());
        for session in sessions {
            let students = self.resolve_students(&session).await;
            views.push(SessionView {
                id: session.id,
                venue: session.doc.venue,
                datetime: session.doc.datetime,
                students,
            });
        }
        Ok(views)
    }

    async fn resolve_students(&self, session: &Stored<Session>) -> Vec<StudentInfo> {
        let mut seen = HashSet::new();
        let mut students = Vec::new();

        for allocation_id in &session.session_students {
            let allocation = match self.store.find_by_id::<Allocation>(allocation_id).await {
                Ok(Some(allocation)) if allocation.is_assigned => allocation,
                Ok(Some(_)) => continue,
                Ok(None) => {
                    tracing::warn!(session_id = %session.id, allocation_id, "session references a missing allocation");
                    continue;
                }
                Err(e) => {
                    tracing::warn!(session_id = %session.id, allocation_id, error = %e, "failed to load allocation");
                    continue;
                }
            };

            for mentee_id in &allocation.mentee_ids {
                if !seen.insert(mentee_id.clone()) {
                    continue;
                }
                match self.store.find_by_id::<Person>(mentee_id).await {
                    Ok(Some(person)) => students.push(StudentInfo {
                        id: person.id,
                        name: person.doc.name,
                        email: person.doc.email,
                    }),
                    Ok(None) => {
                        tracing::warn!(mentee_id = %mentee_id, "allocated mentee no longer exists");
                    }
                    Err(e) => {
                        tracing::warn!(mentee_id = %mentee_id, error = %e, "failed to load mentee");
                    }
                }
            }
        }
        students
    }
}
