//! Infrastructure adapters for the mentorship engine.
//!
//! - `InMemoryRecordStore`: process-local store, used in tests and demos
//! - `TomlRecordStore`: one TOML file per collection, atomic rewrites
//! - `ConfigService` / `MentorshipPaths`: configuration loading

pub mod config_service;
pub mod memory_store;
pub mod paths;
pub mod storage;
pub mod toml_store;

pub use crate::config_service::ConfigService;
pub use crate::memory_store::InMemoryRecordStore;
pub use crate::paths::MentorshipPaths;
pub use crate::toml_store::TomlRecordStore;
