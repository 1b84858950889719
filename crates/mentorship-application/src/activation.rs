//! Upcoming -> active transition for allocations whose session is due.

use chrono::{DateTime, Duration, Utc};
use mentorship_core::allocation::{Allocation, AllocationStatus};
use mentorship_core::error::{MentorshipError, Result};
use mentorship_core::store::{DocumentStore, Filter};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ActivationReport {
    pub activated: Vec<String>,
    pub failures: Vec<ActivationFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivationFailure {
    pub allocation_id: String,
    pub error: MentorshipError,
}

pub struct AllocationActivator {
    store: DocumentStore,
    lead: Duration,
}

impl AllocationActivator {
    pub fn new(store: DocumentStore, activation_lead_days: u32) -> Self {
        Self {
            store,
            lead: Duration::days(i64::from(activation_lead_days)),
        }
    }

    /// Promotes every upcoming allocation with `session_date <= now + lead`.
    ///
    /// A lost write race is reported and left for the next run.
    #[tracing::instrument(skip(self))]
    pub async fn activate_due_allocations(&self, now: DateTime<Utc>) -> Result<ActivationReport> {
        let cutoff = now + self.lead;
        let upcoming = self
            .store
            .find::<Allocation>(
                &Filter::all().where_eq("status", AllocationStatus::Upcoming.as_ref()),
            )
            .await?;

        let mut report = ActivationReport::default();
        for mut allocation in upcoming {
            if allocation.session_date > cutoff {
                continue;
            }
            let id = allocation.id.clone();
            let written = match allocation.doc.transition_to(&id, AllocationStatus::Active) {
                Ok(()) => self.store.update(allocation).await,
                Err(e) => Err(e),
            };
            match written {
                Ok(_) => report.activated.push(id),
                Err(e) => {
                    tracing::warn!(allocation_id = %id, error = %e, "failed to activate allocation");
                    report.failures.push(ActivationFailure {
                        allocation_id: id,
                        error: e,
                    });
                }
            }
        }

        tracing::info!(
            activated = report.activated.len(),
            failures = report.failures.len(),
            %cutoff,
            "allocation activation finished"
        );
        Ok(report)
    }
}
