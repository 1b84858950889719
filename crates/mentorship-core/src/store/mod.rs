//! Record store seam.
//!
//! The engine treats persistence as an external document store. This module
//! defines the contract (`RecordStore`) and a typed facade (`DocumentStore`)
//! that maps records onto domain documents.

mod document;
mod record;

pub use document::{Document, DocumentStore, Stored};
pub use record::{Collection, Filter, Record, RecordStore};
