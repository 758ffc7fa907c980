//! # Alert Report Core Types
//!
//! The alert model shared by the data access layer and the renderer, along
//! with the schema-tolerant accessors used to resolve display fields from the
//! loosely structured `raw_payload` and `triage` documents.

pub mod alert;
pub mod payload;

// Re-export the core types to provide a clean public API.
pub use alert::{sort_newest_first, AlertRecord, AlertSource, PLACEHOLDER};
pub use payload::{column_path_text, first_present, json_path_text};
