//! Extraction templates.
//!
//! A template is an ordered list of named field rules. Several templates can
//! be merged into a [`TemplateSet`]; when two templates declare the same field
//! name, the template supplied first wins.

mod loader;

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use regex::{Regex, RegexBuilder};

use crate::error::TemplateError;

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// How a field is located in page text.
#[derive(Debug, Clone)]
pub enum FieldRule {
    /// Text captured by a regular expression (group 1 if present).
    Pattern(Regex),
    /// Text following a literal label on the same line.
    Label(String),
    /// Table rows from the `start` line up to the `end` line.
    Table { start: Regex, end: Option<Regex> },
    /// Barcode payload captured by a regular expression.
    Barcode(Regex),
}

/// A named field declared by a template.
#[derive(Debug, Clone)]
pub struct TemplateField {
    /// Field name, compared case-sensitively.
    pub name: String,
    /// Location rule.
    pub rule: FieldRule,
}

impl TemplateField {
    pub fn new(name: impl Into<String>, rule: FieldRule) -> Self {
        Self {
            name: name.into(),
            rule,
        }
    }

    /// A text field located by a regular expression.
    pub fn pattern(name: impl Into<String>, pattern: &str) -> Result<Self> {
        let name = name.into();
        let regex = compile(&name, pattern)?;
        Ok(Self::new(name, FieldRule::Pattern(regex)))
    }

    /// A text field located by a literal label.
    pub fn label(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, FieldRule::Label(label.into()))
    }

    /// A table field bounded by `start` and optional `end` line patterns.
    pub fn table(name: impl Into<String>, start: &str, end: Option<&str>) -> Result<Self> {
        let name = name.into();
        let start = compile(&name, start)?;
        let end = end.map(|e| compile(&name, e)).transpose()?;
        Ok(Self::new(name, FieldRule::Table { start, end }))
    }

    /// A barcode field located by a regular expression.
    pub fn barcode(name: impl Into<String>, pattern: &str) -> Result<Self> {
        let name = name.into();
        let regex = compile(&name, pattern)?;
        Ok(Self::new(name, FieldRule::Barcode(regex)))
    }
}

/// Compile a template pattern with `^`/`$` matching at line boundaries.
pub(crate) fn compile(field: &str, pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .multi_line(true)
        .build()
        .map_err(|source| TemplateError::Pattern {
            field: field.to_string(),
            source,
        })
}

/// A named, ordered declaration of fields.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    fields: Vec<TemplateField>,
}

impl Template {
    /// Create a template, rejecting empty templates and duplicate names.
    pub fn new(name: impl Into<String>, fields: Vec<TemplateField>) -> Result<Self> {
        let name = name.into();
        if fields.is_empty() {
            return Err(TemplateError::Empty(name));
        }

        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(TemplateError::DuplicateField(field.name.clone()));
            }
        }

        Ok(Self { name, fields })
    }

    /// Template name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared fields in declaration order.
    pub fn fields(&self) -> &[TemplateField] {
        &self.fields
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a field by exact name.
    pub fn field(&self, name: &str) -> Option<&TemplateField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Several templates merged into one field namespace.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    templates: Vec<Template>,
    /// Field name -> index of the first template declaring it.
    owners: HashMap<String, usize>,
    /// Distinct field names in merge order.
    order: Vec<String>,
}

impl TemplateSet {
    /// Merge templates in the order they were supplied.
    pub fn merge(templates: Vec<Template>) -> Self {
        let mut owners = HashMap::new();
        let mut order = Vec::new();

        for (index, template) in templates.iter().enumerate() {
            for field in template.fields() {
                if let Entry::Vacant(slot) = owners.entry(field.name.clone()) {
                    slot.insert(index);
                    order.push(field.name.clone());
                }
            }
        }

        Self {
            templates,
            owners,
            order,
        }
    }

    /// The merged templates, in supply order.
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Whether any template declares `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.owners.contains_key(name)
    }

    /// The first template declaring `name`.
    pub fn declaring_template(&self, name: &str) -> Option<&Template> {
        self.owners.get(name).map(|&i| &self.templates[i])
    }

    /// The winning declaration of `name`.
    pub fn field(&self, name: &str) -> Option<&TemplateField> {
        self.declaring_template(name).and_then(|t| t.field(name))
    }

    /// Each distinct field once, first declaration wins.
    pub fn fields(&self) -> impl Iterator<Item = &TemplateField> + '_ {
        self.order.iter().filter_map(|name| self.field(name))
    }

    /// Distinct field names in merge order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().map(String::as_str)
    }

    /// Number of distinct field names.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
