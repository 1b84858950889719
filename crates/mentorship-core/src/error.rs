//! Error types for the mentorship engine.

use crate::allocation::AllocationStatus;
use serde::Serialize;
use thiserror::Error;

/// A shared error type for the entire mentorship workspace.
///
/// Variants are grouped by how callers are expected to react:
/// the "not found" family (nothing to pick from), invariant guards
/// (`CapacityExceeded`, `AlreadyAssigned`), transient failures
/// (`Conflict`, `StoreUnavailable`) and everything else.
#[derive(Error, Debug, Clone, Serialize)]
pub enum MentorshipError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// No person with the mentor role exists.
    #[error("No mentors found")]
    NoMentorsExist,

    /// Every mentor is already at capacity.
    #[error("No mentors with available capacity")]
    NoCapacityAvailable,

    /// The venue collection is empty.
    #[error("No venues available")]
    NoVenuesAvailable,

    /// Adding the mentee would push the allocation past its limit.
    #[error("Mentor {mentor_id} has reached the maximum mentee limit of {limit} in session {session_key}")]
    CapacityExceeded {
        mentor_id: String,
        session_key: String,
        limit: usize,
    },

    /// The mentee is already part of the allocation.
    #[error("Mentee {mentee_id} is already assigned to mentor {mentor_id} in session {session_key}")]
    AlreadyAssigned {
        mentee_id: String,
        mentor_id: String,
        session_key: String,
    },

    /// The allocation lifecycle does not allow this status change.
    #[error("Allocation '{id}' cannot move from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: AllocationStatus,
        to: AllocationStatus,
    },

    /// A conditional write lost a race against another writer.
    #[error("Write conflict on {collection} '{id}'")]
    Conflict { collection: String, id: String },

    /// Transient store failure (I/O, timeout, lock contention)
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A grouping run is already in flight in this process.
    #[error("Session grouping job is already running")]
    JobAlreadyRunning,

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MentorshipError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Conflict error
    pub fn conflict(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Conflict {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Creates a StoreUnavailable error
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// True for every "nothing to pick from" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::NoMentorsExist | Self::NoVenuesAvailable
        )
    }

    /// Check if this is a write conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Check if this is a capacity violation
    pub fn is_capacity_exceeded(&self) -> bool {
        matches!(self, Self::CapacityExceeded { .. })
    }

    /// Check if this is a duplicate assignment
    pub fn is_already_assigned(&self) -> bool {
        matches!(self, Self::AlreadyAssigned { .. })
    }

    /// Errors that a caller may treat as "the desired state already holds".
    pub fn is_success_equivalent(&self) -> bool {
        self.is_already_assigned()
    }

    /// Errors worth retrying by re-running the triggering unit of work.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Conflict { .. } | Self::StoreUnavailable(_) | Self::Io { .. }
        )
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for MentorshipError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for MentorshipError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for MentorshipError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for MentorshipError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, MentorshipError>`.
pub type Result<T> = std::result::Result<T, MentorshipError>;
