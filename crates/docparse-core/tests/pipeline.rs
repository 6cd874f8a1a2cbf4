//! End-to-end: XML templates, a text document, projection and both reports.

use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono::{FixedOffset, TimeZone, Utc};
use pretty_assertions::assert_eq;

use docparse_core::{
    FieldType, ParseEngine, ParseRequest, ReportFormat, ReportMetadata, Statistics, Template,
    TemplateEngine, TemplateSet, project, render, write_report,
};

const INVOICE_TEMPLATE: &str = r#"<template name="invoice">
  <field name="InvoiceNo" pattern="Invoice\s+No\.?\s*:?\s*(\S+)"/>
  <field name="Customer" label="Customer:"/>
  <table name="Items" start="^Description" end="^Total"/>
  <barcode name="Tracking" pattern="TRK-\d+"/>
</template>"#;

const TOTALS_TEMPLATE: &str = r#"<template name="totals">
  <field name="Total" label="Total:"/>
  <field name="Customer" label="Bill to:"/>
</template>"#;

const DOCUMENT: &str = "Invoice No: INV-001\n\
Customer: ACME Corp\n\
Bill to: Someone Else\n\
Description    Qty    Price\n\
Widget    2    10.00\n\
Total: 20.00\n\
TRK-123456\n\
\u{0C}Invoice No: INV-002\n";

fn load(dir: &Path) -> TemplateSet {
    let invoice = dir.join("invoice.xml");
    let totals = dir.join("totals.xml");
    fs::write(&invoice, INVOICE_TEMPLATE).unwrap();
    fs::write(&totals, TOTALS_TEMPLATE).unwrap();

    TemplateSet::merge(vec![
        Template::load(&invoice).unwrap(),
        Template::load(&totals).unwrap(),
    ])
}

fn metadata(page_index: u32) -> ReportMetadata {
    ReportMetadata {
        document: "invoice.txt".to_string(),
        page_index,
        timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap(),
        local_offset: FixedOffset::east_opt(0).unwrap(),
    }
}

#[test]
fn test_text_document_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let templates = load(dir.path());
    let document = dir.path().join("invoice.txt");
    fs::write(&document, DOCUMENT).unwrap();

    let output = TemplateEngine::default()
        .parse(&ParseRequest::new(&document), &templates)
        .unwrap();
    assert_eq!(output.page_count, 2);

    let projection = project(&output.fields, &templates, 0);
    let names: Vec<_> = projection.results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["InvoiceNo", "Customer", "Items", "Tracking", "Total"]);
    assert_eq!(projection.matched, 5);
    assert_eq!(projection.total_found, 6);

    let customer = &projection.results[1];
    assert_eq!(customer.value, "ACME Corp");

    let items = &projection.results[2];
    assert_eq!(items.field_type, FieldType::Table);
    assert_eq!(items.value, "Description\tQty\tPrice\tWidget\t2\t10.00");

    let tracking = &projection.results[3];
    assert_eq!(tracking.field_type, FieldType::Barcode);
    assert_eq!(tracking.value, "TRK-123456");

    let stats = Statistics::new(&projection, Duration::from_millis(250));
    let report = render(ReportFormat::Json, &metadata(0), &stats, &projection.results);
    let path = dir.path().join("out").join("report.json");
    write_report(&path, &report).unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["document"], "invoice.txt");
    assert_eq!(json["statistics"]["fieldsMatched"], 5);
    assert_eq!(json["statistics"]["totalFieldsFound"], 6);
    assert_eq!(json["fields"][0]["name"], "InvoiceNo");
    assert_eq!(json["fields"][0]["value"], "INV-001");
}

#[test]
fn test_other_page_in_plain_text() {
    let dir = tempfile::tempdir().unwrap();
    let templates = load(dir.path());
    let document = dir.path().join("invoice.txt");
    fs::write(&document, DOCUMENT).unwrap();

    let request = ParseRequest::new(&document).with_page_index(1);
    let output = TemplateEngine::default().parse(&request, &templates).unwrap();
    let projection = project(&output.fields, &templates, 1);

    assert_eq!(projection.matched, 1);
    assert_eq!(projection.results[0].value, "INV-002");

    let stats = Statistics::new(&projection, Duration::ZERO);
    let report = render(ReportFormat::Text, &metadata(1), &stats, &projection.results);
    assert!(report.contains("Page: 2\n"));
    assert!(report.contains("Parsed: 2024-01-01 09:30:00\n"));
    assert!(report.contains("Field: InvoiceNo (Text)\n"));
    assert!(report.contains("Statistics: 1 of 6 fields matched\n"));
}

#[test]
fn test_page_beyond_document() {
    let dir = tempfile::tempdir().unwrap();
    let templates = load(dir.path());
    let document = dir.path().join("invoice.txt");
    fs::write(&document, DOCUMENT).unwrap();

    let output = TemplateEngine::default()
        .parse(&ParseRequest::new(&document).with_page_index(7), &templates)
        .unwrap();
    let projection = project(&output.fields, &templates, 7);

    assert!(projection.results.is_empty());
    assert_eq!(projection.total_found, 6);

    let stats = Statistics::new(&projection, Duration::ZERO);
    let report = render(ReportFormat::Text, &metadata(7), &stats, &projection.results);
    assert!(report.contains("No fields matched on the specified page.\n"));
}
