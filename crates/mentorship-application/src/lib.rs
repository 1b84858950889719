//! Application layer: the allocation and session-grouping engine.
//!
//! - `mentor_finder`: first-fit mentor with spare capacity
//! - `schedule`: next session slot and session key
//! - `venue_selector`: random venue for new allocations
//! - `allocation_manager`: capacity-checked, conflict-retrying assignment
//! - `session_grouping`: batches active allocations into sessions
//! - `activation`: upcoming -> active promotion
//! - `registration`: mentee-created trigger
//! - `session_query`: sessions with resolved students
//! - `service`: `MentorshipService`, everything wired over one store

pub mod activation;
pub mod allocation_manager;
pub mod mentor_finder;
pub mod registration;
pub mod schedule;
pub mod service;
pub mod session_grouping;
pub mod session_query;
pub mod venue_selector;

pub use activation::{ActivationReport, AllocationActivator};
pub use allocation_manager::AllocationManager;
pub use mentor_finder::MentorFinder;
pub use registration::RegistrationHandler;
pub use schedule::ScheduleCalculator;
pub use service::{MentorshipService, Registration};
pub use session_grouping::{GroupingFailure, GroupingReport, GroupingUnit, SessionGroupingJob};
pub use session_query::SessionQuery;
pub use venue_selector::VenueSelector;
