//! Structured (JSON) report.

use chrono::SecondsFormat;
use serde_json::{Value, json};

use super::ReportMetadata;
use crate::extraction::Statistics;
use crate::models::field::FieldResult;

/// Render the report as an indented JSON document.
pub fn render_structured(
    metadata: &ReportMetadata,
    stats: &Statistics,
    results: &[FieldResult],
) -> String {
    let fields: Vec<Value> = results
        .iter()
        .map(|r| {
            json!({
                "name": r.name,
                "type": r.field_type.as_str(),
                "value": r.value,
            })
        })
        .collect();

    let report = json!({
        "document": metadata.document,
        "pageIndex": metadata.page_index,
        "timestamp": metadata
            .timestamp
            .to_rfc3339_opts(SecondsFormat::AutoSi, true),
        "statistics": {
            "totalFieldsFound": stats.total_fields_found,
            "fieldsMatched": stats.fields_matched,
            "parseTimeSeconds": stats.parse_time_seconds,
        },
        "fields": fields,
    });

    format!("{report:#}")
}
