//! Allocation domain module.
//!
//! An allocation aggregates the mentees assigned to one mentor for one
//! scheduling cycle (`session_key`). It doubles as the mentor's capacity
//! counter, so every mutation goes through a revision-checked write.

mod model;

pub use model::{Allocation, AllocationStatus};
