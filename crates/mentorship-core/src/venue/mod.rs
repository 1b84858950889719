//! Venue domain module.

mod model;

pub use model::Venue;
