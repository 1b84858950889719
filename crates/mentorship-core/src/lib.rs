//! Domain layer for the mentorship engine.
//!
//! Models, configuration, error type and the record store contract. No I/O
//! happens here; adapters live in `mentorship-infrastructure` and the
//! allocation/grouping services in `mentorship-application`.

pub mod allocation;
pub mod clock;
pub mod config;
pub mod error;
pub mod person;
pub mod session;
pub mod store;
pub mod venue;

// Re-export common error type
pub use error::{MentorshipError, Result};
