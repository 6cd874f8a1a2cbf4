//! Field projection and classification.

mod classifier;
mod projector;

pub use classifier::{TABLE_CELL_SEPARATOR, classify};
pub use projector::{FieldNamespace, Projection, project};

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Match statistics for one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Parsed fields seen on any page.
    pub total_fields_found: usize,
    /// Fields kept by projection.
    pub fields_matched: usize,
    /// Wall time of the parse stage.
    pub parse_time_seconds: f64,
}

impl Statistics {
    /// Combine projection counters with the parse stage duration.
    pub fn new(projection: &Projection, parse_time: Duration) -> Self {
        Self {
            total_fields_found: projection.total_found,
            fields_matched: projection.matched,
            parse_time_seconds: parse_time.as_secs_f64(),
        }
    }
}
