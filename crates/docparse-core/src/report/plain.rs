//! Plain-text report.

use super::ReportMetadata;
use crate::extraction::Statistics;
use crate::models::field::FieldResult;

/// Width of the `=` section rules.
pub const SECTION_RULE_WIDTH: usize = 60;

/// Width of the `-` rule under each field header.
pub const FIELD_RULE_WIDTH: usize = 40;

/// Render the report as human-readable text.
///
/// Pages are shown 1-based; the local timestamp uses the offset carried by
/// the metadata.
pub fn render_plain(
    metadata: &ReportMetadata,
    stats: &Statistics,
    results: &[FieldResult],
) -> String {
    let section_rule = "=".repeat(SECTION_RULE_WIDTH);
    let field_rule = "-".repeat(FIELD_RULE_WIDTH);
    let parsed_at = metadata
        .timestamp
        .with_timezone(&metadata.local_offset)
        .format("%Y-%m-%d %H:%M:%S");

    let mut output = String::new();

    output.push_str(&format!("{section_rule}\n"));
    output.push_str(&format!("Document: {}\n", metadata.document));
    output.push_str(&format!("Page: {}\n", u64::from(metadata.page_index) + 1));
    output.push_str(&format!("Parsed: {parsed_at}\n"));
    output.push_str(&format!("{section_rule}\n"));
    output.push('\n');

    if results.is_empty() {
        output.push_str("No fields matched on the specified page.\n");
    } else {
        for result in results {
            output.push('\n');
            output.push_str(&format!("Field: {} ({})\n", result.name, result.field_type));
            output.push_str(&format!("{field_rule}\n"));
            output.push_str(&format!("{}\n", result.value));
        }
    }

    output.push('\n');
    output.push_str(&format!("{section_rule}\n"));
    output.push_str(&format!(
        "Statistics: {} of {} fields matched\n",
        stats.fields_matched, stats.total_fields_found
    ));
    output.push_str(&format!(
        "Parse time: {:.2} seconds\n",
        stats.parse_time_seconds
    ));

    output
}
