//! Session Grouping Job.
//!
//! Turns each mentor's active allocations into sessions of
//! `students_per_session` allocations and completes the grouped
//! allocations. The chunk size counts allocations, not mentees: a session
//! lists allocation ids and its roster is resolved at query time.
//!
//! Failures are isolated per mentor, chunk and allocation. They are logged,
//! collected in the [`GroupingReport`] and do not stop the run.

use mentorship_core::allocation::{Allocation, AllocationStatus};
use mentorship_core::error::{MentorshipError, Result};
use mentorship_core::person::{Person, Role};
use mentorship_core::session::Session;
use mentorship_core::store::{DocumentStore, Filter, Stored};
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Attempts per allocation completion: the first write plus one re-read retry.
const COMPLETE_ATTEMPTS: u32 = 2;

/// The unit a grouping failure is attributed to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "unit", rename_all = "snake_case")]
pub enum GroupingUnit {
    /// Active allocations of the mentor could not be listed.
    Mentor,
    /// The session for this chunk (0-based, in storage order) was not created.
    Chunk { index: usize },
    /// The session exists but this allocation was not marked completed.
    Allocation { allocation_id: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupingFailure {
    pub mentor_id: String,
    #[serde(flatten)]
    pub unit: GroupingUnit,
    pub error: MentorshipError,
}

/// Outcome of one grouping run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupingReport {
    pub mentors_processed: usize,
    pub session_ids: Vec<String>,
    pub allocations_completed: usize,
    pub failures: Vec<GroupingFailure>,
}

impl GroupingReport {
    pub fn sessions_created(&self) -> usize {
        self.session_ids.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, mentor_id: &str, unit: GroupingUnit, error: MentorshipError) {
        self.failures.push(GroupingFailure {
            mentor_id: mentor_id.to_string(),
            unit,
            error,
        });
    }
}

pub struct SessionGroupingJob {
    store: DocumentStore,
    students_per_session: usize,
    running: Mutex<()>,
}

impl SessionGroupingJob {
    pub fn new(store: DocumentStore, students_per_session: usize) -> Self {
        Self {
            store,
            students_per_session: students_per_session.max(1),
            running: Mutex::new(()),
        }
    }

    /// Groups the active allocations of every mentor.
    ///
    /// Only listing the mentors can fail the whole run. A second call while
    /// a run is in flight on this instance fails with `JobAlreadyRunning`;
    /// runs from separate processes are not coordinated.
    #[tracing::instrument(skip(self))]
    pub async fn run_for_all_mentors(&self) -> Result<GroupingReport> {
        let _running = self.running.try_lock().map_err(|_| {
            tracing::warn!("grouping run requested while another is in progress");
            MentorshipError::JobAlreadyRunning
        })?;

        let mentors = self
            .store
            .find::<Person>(&Filter::all().where_eq("role", Role::Mentor.as_ref()))
            .await?;

        let mut report = GroupingReport::default();
        if mentors.is_empty() {
            tracing::info!("no mentors found, nothing to group");
            return Ok(report);
        }

        for mentor in &mentors {
            report.mentors_processed += 1;
            self.group_mentor(&mentor.id, &mut report).await;
        }

        tracing::info!(
            mentors = report.mentors_processed,
            sessions = report.sessions_created(),
            completed = report.allocations_completed,
            failures = report.failures.len(),
            "session grouping finished"
        );
        Ok(report)
    }

    async fn group_mentor(&self, mentor_id: &str, report: &mut GroupingReport) {
        let active = match self
            .store
            .find::<Allocation>(
                &Filter::all()
                    .where_eq("mentor_id", mentor_id)
                    .where_eq("status", AllocationStatus::Active.as_ref()),
            )
            .await
        {
            Ok(active) => active,
            Err(e) => {
                tracing::error!(mentor_id, error = %e, "failed to list active allocations");
                report.record(mentor_id, GroupingUnit::Mentor, e);
                return;
            }
        };

        if active.is_empty() {
            tracing::debug!(mentor_id, "no active allocations");
            return;
        }

        for (index, chunk) in active.chunks(self.students_per_session).enumerate() {
            let session = match self.create_session(mentor_id, chunk).await {
                Ok(session) => session,
                Err(e) => {
                    tracing::error!(mentor_id, chunk = index, error = %e, "failed to create session");
                    report.record(mentor_id, GroupingUnit::Chunk { index }, e);
                    continue;
                }
            };
            tracing::info!(
                mentor_id,
                session_id = %session.id,
                allocations = chunk.len(),
                "session created"
            );
            report.session_ids.push(session.id);

            for allocation in chunk {
                match self.mark_completed(&allocation.id).await {
                    Ok(true) => report.allocations_completed += 1,
                    Ok(false) => {
                        tracing::debug!(allocation_id = %allocation.id, "allocation already completed");
                    }
                    Err(e) => {
                        tracing::error!(
                            mentor_id,
                            allocation_id = %allocation.id,
                            error = %e,
                            "failed to complete allocation"
                        );
                        report.record(
                            mentor_id,
                            GroupingUnit::Allocation {
                                allocation_id: allocation.id.clone(),
                            },
                            e,
                        );
                    }
                }
            }
        }
    }

    async fn create_session(
        &self,
        mentor_id: &str,
        chunk: &[Stored<Allocation>],
    ) -> Result<Stored<Session>> {
        let first = chunk
            .first()
            .ok_or_else(|| MentorshipError::internal("empty allocation chunk"))?;

        let session = Session {
            mentor_id: mentor_id.to_string(),
            session_students: chunk.iter().map(|a| a.id.clone()).collect(),
            venue: first.venue_id.clone(),
            datetime: first.session_date,
        };
        self.store
            .create(&Uuid::new_v4().to_string(), session)
            .await
    }

    /// Marks an allocation completed from a fresh read.
    ///
    /// Returns `Ok(false)` if it was already completed, and
    /// `InvalidTransition` if it is no longer active.
    async fn mark_completed(&self, allocation_id: &str) -> Result<bool> {
        let mut attempt = 1;
        loop {
            let mut allocation = self.store.get::<Allocation>(allocation_id).await?;
            if allocation.status == AllocationStatus::Completed {
                return Ok(false);
            }

            allocation
                .doc
                .transition_to(&allocation.id, AllocationStatus::Completed)?;
            match self.store.update(allocation).await {
                Ok(_) => return Ok(true),
                Err(e) if e.is_conflict() && attempt < COMPLETE_ATTEMPTS => {
                    tracing::debug!(allocation_id, "completion conflicted, re-reading");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
