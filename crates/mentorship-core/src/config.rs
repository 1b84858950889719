//! Engine configuration.
//!
//! Every scheduling and capacity policy lives here so it can be injected
//! (and overridden in tests) instead of being baked into the services.

use crate::error::{MentorshipError, Result};
use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Default maximum number of mentees a mentor can hold.
pub const DEFAULT_MAX_MENTEES_PER_MENTOR: usize = 15;

/// Default number of allocations folded into one session.
pub const DEFAULT_STUDENTS_PER_SESSION: usize = 5;

/// Default bound on optimistic-concurrency attempts per assignment.
pub const DEFAULT_ASSIGN_MAX_ATTEMPTS: u32 = 5;

/// Root configuration, usually loaded from `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct MentorshipConfig {
    #[serde(default)]
    pub allocation: AllocationPolicy,
    #[serde(default)]
    pub schedule: SchedulePolicy,
}

/// Capacity and grouping tunables.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct AllocationPolicy {
    /// Upper bound on `mentee_ids` per allocation and on a mentor's total load.
    #[serde(default = "default_max_mentees")]
    pub max_mentees_per_mentor: usize,
    /// Chunk size used by the session grouping job. Counts allocations, not mentees.
    #[serde(default = "default_students_per_session")]
    pub students_per_session: usize,
    /// Attempts made by `assign` before surfacing a `Conflict`.
    #[serde(default = "default_assign_max_attempts")]
    pub assign_max_attempts: u32,
}

/// When sessions take place.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SchedulePolicy {
    #[serde(default = "default_target_weekday")]
    pub target_weekday: Weekday,
    /// Time of day in UTC.
    #[serde(default = "default_target_time")]
    pub target_time: NaiveTime,
    /// Upcoming allocations whose session date is within this many days
    /// of "now" are promoted to active.
    #[serde(default)]
    pub activation_lead_days: u32,
}

fn default_max_mentees() -> usize {
    DEFAULT_MAX_MENTEES_PER_MENTOR
}

fn default_students_per_session() -> usize {
    DEFAULT_STUDENTS_PER_SESSION
}

fn default_assign_max_attempts() -> u32 {
    DEFAULT_ASSIGN_MAX_ATTEMPTS
}

fn default_target_weekday() -> Weekday {
    Weekday::Wed
}

fn default_target_time() -> NaiveTime {
    NaiveTime::from_hms_opt(14, 0, 0).unwrap_or(NaiveTime::MIN)
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        Self {
            max_mentees_per_mentor: default_max_mentees(),
            students_per_session: default_students_per_session(),
            assign_max_attempts: default_assign_max_attempts(),
        }
    }
}

impl Default for SchedulePolicy {
    fn default() -> Self {
        Self {
            target_weekday: default_target_weekday(),
            target_time: default_target_time(),
            activation_lead_days: 0,
        }
    }
}

impl MentorshipConfig {
    /// Rejects values the engine cannot operate with.
    pub fn validate(&self) -> Result<()> {
        if self.allocation.max_mentees_per_mentor == 0 {
            return Err(MentorshipError::config(
                "allocation.max_mentees_per_mentor must be positive",
            ));
        }
        if self.allocation.students_per_session == 0 {
            return Err(MentorshipError::config(
                "allocation.students_per_session must be positive",
            ));
        }
        if self.allocation.assign_max_attempts == 0 {
            return Err(MentorshipError::config(
                "allocation.assign_max_attempts must be positive",
            ));
        }
        Ok(())
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MentorshipConfig::default();
        assert_eq!(config.allocation.max_mentees_per_mentor, 15);
        assert_eq!(config.allocation.students_per_session, 5);
        assert_eq!(config.schedule.target_weekday, Weekday::Wed);
        assert_eq!(
            config.schedule.target_time,
            NaiveTime::from_hms_opt(14, 0, 0).unwrap()
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = MentorshipConfig::from_toml_str(
            r#"
            [allocation]
            max_mentees_per_mentor = 3

            [schedule]
            target_weekday = "Fri"
            target_time = "09:30:00"
            "#,
        )
        .unwrap();

        assert_eq!(config.allocation.max_mentees_per_mentor, 3);
        assert_eq!(config.allocation.students_per_session, 5);
        assert_eq!(config.schedule.target_weekday, Weekday::Fri);
        assert_eq!(
            config.schedule.target_time,
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = MentorshipConfig::from_toml_str("").unwrap();
        assert_eq!(config, MentorshipConfig::default());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = MentorshipConfig::from_toml_str(
            r#"
            [allocation]
            students_per_session = 0
            "#,
        );
        assert!(matches!(result, Err(MentorshipError::Config(_))));
    }
}
