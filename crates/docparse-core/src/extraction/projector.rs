//! Field projection: filter parsed fields down to template fields on one page.

use tracing::trace;

use super::classifier::classify;
use crate::models::field::{FieldResult, RawField};
use crate::template::TemplateSet;

/// A set of declared field names.
pub trait FieldNamespace {
    /// Whether `name` is declared (exact, case-sensitive match).
    fn declares(&self, name: &str) -> bool;
}

impl FieldNamespace for TemplateSet {
    fn declares(&self, name: &str) -> bool {
        self.contains(name)
    }
}

#[cfg(test)]
impl FieldNamespace for std::collections::HashSet<String> {
    fn declares(&self, name: &str) -> bool {
        self.contains(name)
    }
}

#[cfg(test)]
impl FieldNamespace for [&str] {
    fn declares(&self, name: &str) -> bool {
        self.contains(&name)
    }
}

/// Output of [`project`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    /// Matched fields in input order.
    pub results: Vec<FieldResult>,
    /// Every parsed field seen, on any page.
    pub total_found: usize,
    /// Fields declared by a template and located on the requested page.
    pub matched: usize,
}

/// Keep the fields that a template declares and that sit on `page_index`.
///
/// `total_found` counts the whole input regardless of page or name, while
/// `matched` only counts what was kept.
pub fn project<N>(raw_fields: &[RawField], templates: &N, page_index: u32) -> Projection
where
    N: FieldNamespace + ?Sized,
{
    let mut projection = Projection::default();

    for field in raw_fields {
        projection.total_found += 1;

        if !templates.declares(&field.name) || field.page_index != page_index {
            trace!(
                "Skipping field '{}' on page {}",
                field.name, field.page_index
            );
            continue;
        }

        let (field_type, value) = classify(&field.area);
        projection.results.push(FieldResult {
            name: field.name.clone(),
            page_index: field.page_index,
            value,
            field_type,
        });
        projection.matched += 1;
    }

    projection
}
