//! Report rendering.
//!
//! Both report formats are pure functions of the projected fields, the
//! statistics and the [`ReportMetadata`]; they never touch the clock or the
//! file system. Persisting the rendered text is left to [`write_report`].

mod plain;
mod sink;
mod structured;

pub use plain::{FIELD_RULE_WIDTH, SECTION_RULE_WIDTH, render_plain};
pub use sink::write_report;
pub use structured::render_structured;

use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::extraction::Statistics;
use crate::models::field::FieldResult;

/// Report output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable plain text.
    #[default]
    Text,
    /// Structured JSON document.
    Json,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Text => f.write_str("Text"),
            ReportFormat::Json => f.write_str("JSON"),
        }
    }
}

/// Document-level information shown in a report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportMetadata {
    /// Document file name.
    pub document: String,
    /// Zero-based page index that was requested.
    pub page_index: u32,
    /// When the document was parsed.
    pub timestamp: DateTime<Utc>,
    /// Offset used for the local timestamp in plain-text reports.
    pub local_offset: FixedOffset,
}

/// Render a report in the requested format.
pub fn render(
    format: ReportFormat,
    metadata: &ReportMetadata,
    stats: &Statistics,
    results: &[FieldResult],
) -> String {
    match format {
        ReportFormat::Json => render_structured(metadata, stats, results),
        ReportFormat::Text => render_plain(metadata, stats, results),
    }
}
