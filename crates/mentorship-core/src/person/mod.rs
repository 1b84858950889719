//! Person domain module.

mod model;

pub use model::{Person, Role};
