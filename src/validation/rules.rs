//! Built-in validation rules

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

use super::{Diagnostic, Severity};
use crate::models::{Document, Property, Section, SectionContainer, TreePath};
use crate::values::{DATE_FORMAT, DATETIME_FORMAT, Dtype, TIME_FORMAT, TypedPayload};

static INT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?\d+$").expect("valid regex"));
static FLOAT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(\d+\.\d*|\.\d+|\d+[eE][+-]?\d+)([eE][+-]?\d+)?$").expect("valid regex"));

fn section_path(doc: &Document, path: &TreePath) -> String {
    doc.section_path_str(path).unwrap_or_else(|_| "?".to_string())
}

fn property_path(doc: &Document, path: &TreePath) -> String {
    doc.property_path_str(path)
        .unwrap_or_else(|_| "?".to_string())
}

/// Warning: a section whose type was never set
pub fn section_type_undefined(
    doc: &Document,
    path: &TreePath,
    section: &Section,
) -> Vec<Diagnostic> {
    if section.is_type_undefined() {
        vec![Diagnostic {
            path: section_path(doc, path),
            message: format!("section {:?} has an undefined type", section.name),
            severity: Severity::Warning,
        }]
    } else {
        Vec::new()
    }
}

/// Error: duplicate sibling names within a kind
///
/// Sections and properties are compared separately; the diagnostic anchors
/// at the second and later occurrences.
pub fn duplicate_sibling_names(doc: &Document) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    fn check_level(
        doc: &Document,
        parent: &TreePath,
        sections: &[Section],
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let mut seen: HashSet<&str> = HashSet::new();
        for (index, section) in sections.iter().enumerate() {
            if !seen.insert(&section.name) {
                diagnostics.push(Diagnostic {
                    path: section_path(doc, &parent.child_section(index)),
                    message: format!("duplicate section name {:?} among siblings", section.name),
                    severity: Severity::Error,
                });
            }
        }
        for (index, section) in sections.iter().enumerate() {
            let path = parent.child_section(index);
            let mut seen_props: HashSet<&str> = HashSet::new();
            for (property_index, property) in section.properties().iter().enumerate() {
                if !seen_props.insert(&property.name) {
                    diagnostics.push(Diagnostic {
                        path: property_path(doc, &path.child_property(property_index)),
                        message: format!(
                            "duplicate property name {:?} in section {:?}",
                            property.name, section.name
                        ),
                        severity: Severity::Error,
                    });
                }
            }
            check_level(doc, &path, section.sections(), diagnostics);
        }
    }

    check_level(doc, &TreePath::root(), doc.sections(), &mut diagnostics);
    diagnostics
}

/// Error: the same id on more than one section or property
///
/// Typically the aftermath of an id-keeping clone.
pub fn duplicate_ids(doc: &Document) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut seen = HashSet::new();
    for path in doc.section_paths() {
        let Ok(section) = doc.section_at(&path) else {
            continue;
        };
        if !seen.insert(section.id()) {
            diagnostics.push(Diagnostic {
                path: section_path(doc, &path),
                message: format!("section {:?} repeats id {}", section.name, section.id()),
                severity: Severity::Error,
            });
        }
        for (property_index, property) in section.properties().iter().enumerate() {
            if !seen.insert(property.id()) {
                diagnostics.push(Diagnostic {
                    path: property_path(doc, &path.child_property(property_index)),
                    message: format!(
                        "property {:?} repeats id {}",
                        property.name,
                        property.id()
                    ),
                    severity: Severity::Error,
                });
            }
        }
    }
    diagnostics
}

/// Warning: a section name equal to its own id, i.e. auto-generated
pub fn section_name_equals_id(
    doc: &Document,
    path: &TreePath,
    section: &Section,
) -> Vec<Diagnostic> {
    if section.name == section.id().to_string() {
        vec![Diagnostic {
            path: section_path(doc, path),
            message: format!("section name {:?} looks auto-generated", section.name),
            severity: Severity::Warning,
        }]
    } else {
        Vec::new()
    }
}

/// Warning: a property name equal to its own id
pub fn property_name_equals_id(
    doc: &Document,
    path: &TreePath,
    property: &Property,
) -> Vec<Diagnostic> {
    if property.name == property.id().to_string() {
        vec![Diagnostic {
            path: property_path(doc, path),
            message: format!("property name {:?} looks auto-generated", property.name),
            severity: Severity::Warning,
        }]
    } else {
        Vec::new()
    }
}

/// Narrower dtypes a string literal would also satisfy, in reporting order
fn detect_narrower(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    let mut detected = Vec::new();
    if INT_RE.is_match(trimmed) {
        detected.push("int".to_string());
    }
    if !INT_RE.is_match(trimmed) && FLOAT_RE.is_match(trimmed) {
        detected.push("float".to_string());
    }
    if NaiveDate::parse_from_str(trimmed, DATE_FORMAT).is_ok() {
        detected.push("date".to_string());
    }
    if NaiveDateTime::parse_from_str(trimmed, DATETIME_FORMAT).is_ok() {
        detected.push("datetime".to_string());
    }
    if NaiveTime::parse_from_str(trimmed, TIME_FORMAT).is_ok() {
        detected.push("time".to_string());
    }
    if matches!(
        trimmed.to_lowercase().as_str(),
        "true" | "false" | "t" | "f"
    ) {
        detected.push("boolean".to_string());
    }
    if text.contains('\n') {
        detected.push("text".to_string());
    }
    if let Some(inner) = trimmed.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
        let arity = inner.split(';').count();
        detected.push(format!("{}-tuple", arity));
    }
    detected
}

/// Warning: string-typed values that also satisfy a narrower dtype
///
/// One warning per detected dtype per property, naming the property and the
/// suggested dtype.
pub fn narrower_dtype_candidates(
    doc: &Document,
    path: &TreePath,
    property: &Property,
) -> Vec<Diagnostic> {
    if property.dtype() != Dtype::String {
        return Vec::new();
    }
    let mut detected: Vec<String> = Vec::new();
    for value in property.values() {
        let TypedPayload::Str(text) = value.payload() else {
            continue;
        };
        for candidate in detect_narrower(text) {
            if !detected.contains(&candidate) {
                detected.push(candidate);
            }
        }
    }
    let path_str = property_path(doc, path);
    detected
        .into_iter()
        .map(|dtype| Diagnostic {
            path: path_str.clone(),
            message: format!(
                "property {:?} is string-typed but its values also parse as {}",
                property.name, dtype
            ),
            severity: Severity::Warning,
        })
        .collect()
}

/// Warning: value count outside the declared cardinality bound
pub fn cardinality_violated(
    doc: &Document,
    path: &TreePath,
    property: &Property,
) -> Vec<Diagnostic> {
    let Some(cardinality) = property.val_cardinality else {
        return Vec::new();
    };
    let count = property.values().len();
    if cardinality.accepts(count) {
        return Vec::new();
    }
    let bound = if let Some(min) = cardinality.min
        && count < min
    {
        format!("minimum {}", min)
    } else {
        // accepts() failed and the minimum holds, so the maximum is set
        format!("maximum {}", cardinality.max.unwrap_or(0))
    };
    vec![Diagnostic {
        path: property_path(doc, path),
        message: format!(
            "property {:?} holds {} values, violating its cardinality ({})",
            property.name, count, bound
        ),
        severity: Severity::Warning,
    }]
}
