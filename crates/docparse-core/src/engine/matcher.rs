//! Locating template fields in page text.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::models::field::{Area, RawField, TableCell};
use crate::template::{FieldRule, TemplateField, TemplateSet};

lazy_static! {
    /// Cell boundaries in a table row: a tab or a run of two or more spaces.
    static ref CELL_SEPARATOR: Regex = Regex::new(r"\s*\t\s*|\s{2,}").unwrap();
}

/// Match every field of the merged templates against one page of text.
///
/// Each field yields at most one [`RawField`] per page.
pub fn match_page(text: &str, page_index: u32, templates: &TemplateSet) -> Vec<RawField> {
    templates
        .fields()
        .filter_map(|field| {
            let area = match_field(field, text)?;
            trace!("Matched '{}' on page {}", field.name, page_index);
            Some(RawField::new(field.name.clone(), page_index, area))
        })
        .collect()
}

/// Locate one field in page text.
pub fn match_field(field: &TemplateField, text: &str) -> Option<Area> {
    match &field.rule {
        FieldRule::Pattern(regex) => capture(regex, text).map(Area::Text),
        FieldRule::Barcode(regex) => capture(regex, text).map(Area::Barcode),
        FieldRule::Label(label) => after_label(label, text).map(Area::Text),
        FieldRule::Table { start, end } => table_cells(start, end.as_ref(), text).map(Area::Table),
    }
}

/// Group 1 when it participated in the match, otherwise the whole match.
fn capture(regex: &Regex, text: &str) -> Option<String> {
    let caps = regex.captures(text)?;
    let matched = caps.get(1).or_else(|| caps.get(0))?;
    let value = matched.as_str().trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Remainder of the first line holding `label` with something after it.
fn after_label(label: &str, text: &str) -> Option<String> {
    if label.is_empty() {
        return None;
    }

    text.lines().find_map(|line| {
        let pos = line.find(label)?;
        let rest = line[pos + label.len()..]
            .trim_start()
            .trim_start_matches(':')
            .trim();
        (!rest.is_empty()).then(|| rest.to_string())
    })
}

/// Row-major cells from the `start` line up to, not including, the `end` line.
fn table_cells(start: &Regex, end: Option<&Regex>, text: &str) -> Option<Vec<TableCell>> {
    let mut lines = text.lines().skip_while(|line| !start.is_match(line));
    let header = lines.next()?;

    let rows = std::iter::once(header)
        .chain(lines.take_while(|line| !end.is_some_and(|e| e.is_match(line))))
        .map(str::trim)
        .filter(|line| !line.is_empty());

    Some(
        rows.flat_map(|row| CELL_SEPARATOR.split(row).map(TableCell::new))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Template;
    use pretty_assertions::assert_eq;

    const PAGE: &str = "\
ACME Corp
Invoice No: INV-001
Customer: Jane Doe
Date:

Description    Qty   Price
Widget         2     10.00
Gadget\t1\t5.50

Total          25.50
TRK-0042
";

    fn cells(values: &[&str]) -> Area {
        Area::Table(values.iter().map(|v| TableCell::new(*v)).collect())
    }

    #[test]
    fn test_pattern_uses_first_group() {
        let field = TemplateField::pattern("InvoiceNo", r"Invoice No:\s*(\S+)").unwrap();
        assert_eq!(match_field(&field, PAGE), Some(Area::Text("INV-001".to_string())));
    }

    #[test]
    fn test_pattern_without_group_uses_whole_match() {
        let field = TemplateField::pattern("Number", r"INV-\d+").unwrap();
        assert_eq!(match_field(&field, PAGE), Some(Area::Text("INV-001".to_string())));
    }

    #[test]
    fn test_pattern_anchors_are_per_line() {
        let field = TemplateField::pattern("Company", r"^(\w+) Corp$").unwrap();
        assert_eq!(match_field(&field, PAGE), Some(Area::Text("ACME".to_string())));
    }

    #[test]
    fn test_label() {
        let field = TemplateField::label("Customer", "Customer:");
        assert_eq!(match_field(&field, PAGE), Some(Area::Text("Jane Doe".to_string())));

        let loose = TemplateField::label("Customer", "Customer");
        assert_eq!(match_field(&loose, PAGE), Some(Area::Text("Jane Doe".to_string())));
    }

    #[test]
    fn test_label_with_empty_value() {
        let field = TemplateField::label("Date", "Date:");
        assert_eq!(match_field(&field, PAGE), None);
    }

    #[test]
    fn test_missing_label() {
        let field = TemplateField::label("Vat", "VAT ID:");
        assert_eq!(match_field(&field, PAGE), None);
    }

    #[test]
    fn test_table_between_start_and_end() {
        let field = TemplateField::table("Items", "^Description", Some("^Total")).unwrap();
        assert_eq!(
            match_field(&field, PAGE),
            Some(cells(&[
                "Description", "Qty", "Price",
                "Widget", "2", "10.00",
                "Gadget", "1", "5.50",
            ]))
        );
    }

    #[test]
    fn test_table_runs_to_end_of_page() {
        let field = TemplateField::table("Tail", "^Total", None).unwrap();
        assert_eq!(
            match_field(&field, PAGE),
            Some(cells(&["Total", "25.50", "TRK-0042"]))
        );
    }

    #[test]
    fn test_table_start_not_found() {
        let field = TemplateField::table("Items", "^Line items", None).unwrap();
        assert_eq!(match_field(&field, PAGE), None);
    }

    #[test]
    fn test_barcode() {
        let field = TemplateField::barcode("Tracking", r"TRK-\d+").unwrap();
        assert_eq!(match_field(&field, PAGE), Some(Area::Barcode("TRK-0042".to_string())));
    }

    #[test]
    fn test_match_page_uses_first_declaration() {
        let first = Template::new(
            "first",
            vec![TemplateField::label("Customer", "Customer:")],
        )
        .unwrap();
        let second = Template::new(
            "second",
            vec![
                TemplateField::pattern("Customer", r"ACME").unwrap(),
                TemplateField::label("Missing", "Nope:"),
            ],
        )
        .unwrap();
        let set = TemplateSet::merge(vec![first, second]);

        let fields = match_page(PAGE, 3, &set);

        assert_eq!(
            fields,
            vec![RawField::new("Customer", 3, Area::Text("Jane Doe".to_string()))]
        );
    }
}
