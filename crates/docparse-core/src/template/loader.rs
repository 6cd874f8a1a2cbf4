//! XML template loading.
//!
//! ```xml
//! <template name="invoice">
//!   <field name="InvoiceNo" pattern="Invoice\s+No\.?\s*:?\s*(\S+)"/>
//!   <field name="Customer" label="Customer:"/>
//!   <table name="Items" start="^Description" end="^Total"/>
//!   <barcode name="Tracking" pattern="TRK-\d+"/>
//! </template>
//! ```

use std::collections::HashMap;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use super::{Result, Template, TemplateField};
use crate::error::TemplateError;

impl Template {
    /// Load a template from an XML file. The file stem names the template
    /// unless the root element carries a `name` attribute.
    pub fn load(path: &Path) -> Result<Self> {
        let xml = std::fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let default_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("template");

        let template = Self::from_xml(&xml, default_name)?;
        debug!(
            "Loaded template '{}' from {} ({} fields)",
            template.name(),
            path.display(),
            template.len()
        );
        Ok(template)
    }

    /// Parse a template from XML text.
    pub fn from_xml(xml: &str, default_name: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut name: Option<String> = None;
        let mut fields = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    let element = element_name(e);
                    let attrs = attributes(e, &reader)?;

                    match (element.as_str(), name.is_some()) {
                        ("template", false) => {
                            name = Some(
                                attrs
                                    .get("name")
                                    .cloned()
                                    .unwrap_or_else(|| default_name.to_string()),
                            );
                        }
                        ("field", true) => fields.push(parse_field(&attrs)?),
                        ("table", true) => {
                            let field_name = required(&attrs, "table", "name")?;
                            let start = required(&attrs, "table", "start")?;
                            let end = attrs.get("end").map(String::as_str);
                            fields.push(TemplateField::table(field_name, start, end)?);
                        }
                        ("barcode", true) => {
                            let field_name = required(&attrs, "barcode", "name")?;
                            let pattern = required(&attrs, "barcode", "pattern")?;
                            fields.push(TemplateField::barcode(field_name, pattern)?);
                        }
                        _ => return Err(TemplateError::UnexpectedElement(element)),
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(TemplateError::Xml {
                        position: reader.error_position(),
                        message: e.to_string(),
                    });
                }
                _ => {}
            }
        }

        let name = name.ok_or_else(|| TemplateError::Xml {
            position: 0,
            message: "missing <template> root element".to_string(),
        })?;

        Template::new(name, fields)
    }
}

fn parse_field(attrs: &HashMap<String, String>) -> Result<TemplateField> {
    let name = required(attrs, "field", "name")?;

    match (attrs.get("pattern"), attrs.get("label")) {
        (Some(pattern), None) => TemplateField::pattern(name, pattern),
        (None, Some(label)) => Ok(TemplateField::label(name, label.as_str())),
        _ => Err(TemplateError::AmbiguousRule(name.to_string())),
    }
}

fn required<'a>(
    attrs: &'a HashMap<String, String>,
    element: &str,
    attribute: &str,
) -> Result<&'a str> {
    attrs
        .get(attribute)
        .map(String::as_str)
        .ok_or_else(|| TemplateError::MissingAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
        })
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn attributes(e: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<HashMap<String, String>> {
    let xml_error = |message: String| TemplateError::Xml {
        position: reader.buffer_position(),
        message,
    };

    let mut attrs = HashMap::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| xml_error(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| xml_error(err.to_string()))?
            .into_owned();
        attrs.insert(key, value);
    }
    Ok(attrs)
}
