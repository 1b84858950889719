//! Session domain module.
//!
//! - `model`: the persisted `Session` record
//! - `view`: the read-only projection returned to session queries

mod model;
mod view;

pub use model::Session;
pub use view::{SessionView, StudentInfo};
