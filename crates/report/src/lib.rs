//! # Alert Report Renderer
//!
//! Turns a list of `AlertRecord`s into the critical-alert PDF and writes it
//! to disk.
//!
//! ## Architectural Principles
//!
//! - **Content, layout, drawing:** `content` decides what the report says,
//!   `layout` decides where it goes (wrapping, pagination, header repetition)
//!   and `render` only draws what `layout` positioned. The first two are plain
//!   data and can be inspected in tests without parsing a PDF.
//! - **All or nothing:** the document is rendered fully in memory before the
//!   output file is touched.
//!
//! ## Public API
//!
//! - `build_pdf`: records and a generation timestamp in, PDF bytes out.
//! - `write_report`: persists the bytes at the fixed output path.
//! - `local_zone`: the named local time zone used to stamp the report.
//! - `ReportError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod content;
pub mod error;
pub mod layout;
pub mod metrics;
pub mod render;
pub mod writer;
pub mod zone;

// Re-export the key components to create a clean, public-facing API.
pub use content::{BodyRow, ReportContent};
pub use error::ReportError;
pub use layout::ReportLayout;
pub use render::render_pdf;
pub use writer::{output_path, write_report, OUTPUT_FILE_NAME};
pub use zone::local_zone;

use chrono::{DateTime, TimeZone};
use core_types::AlertRecord;
use std::fmt::Display;

/// Renders the report for `records`, stamped with `generated_at`.
pub fn build_pdf<Tz>(records: &[AlertRecord], generated_at: DateTime<Tz>) -> Result<Vec<u8>, ReportError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let content = ReportContent::new(records, generated_at);
    let layout = ReportLayout::build(&content);
    tracing::info!(
        rows = content.rows.len(),
        pages = layout.pages.len(),
        "Laid out alert report."
    );
    render_pdf(&layout)
}
