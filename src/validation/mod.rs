//! Validation functionality
//!
//! A [`Validator`] holds rule sets per entity kind (document, section,
//! property, value) and traverses the tree in a fixed order: document rules
//! first, then sections depth-first pre-order, each section's properties in
//! declaration order, each property's values in declaration order.
//! Diagnostics come out in that order and are never re-sorted.
//!
//! Diagnostics are advisory and never block save/load; duplicate-name and
//! duplicate-id findings indicate structural corruption but are still only
//! reported, so independent subtrees keep validating.

pub mod rules;

use std::fmt;

use crate::models::{Document, Property, TreePath, Section, Value};

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single validation finding, anchored at an entity's string path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub path: String,
    pub message: String,
    pub severity: Severity,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.severity, self.message, self.path)
    }
}

type DocumentRule = Box<dyn Fn(&Document) -> Vec<Diagnostic>>;
type SectionRule = Box<dyn Fn(&Document, &TreePath, &Section) -> Vec<Diagnostic>>;
type PropertyRule = Box<dyn Fn(&Document, &TreePath, &Property) -> Vec<Diagnostic>>;
type ValueRule = Box<dyn Fn(&Document, &TreePath, usize, &Value) -> Vec<Diagnostic>>;

/// Registry of validation rules, keyed by entity kind
pub struct Validator {
    document_rules: Vec<DocumentRule>,
    section_rules: Vec<SectionRule>,
    property_rules: Vec<PropertyRule>,
    value_rules: Vec<ValueRule>,
}

impl Validator {
    /// A validator with no rules registered
    pub fn empty() -> Self {
        Self {
            document_rules: Vec::new(),
            section_rules: Vec::new(),
            property_rules: Vec::new(),
            value_rules: Vec::new(),
        }
    }

    /// A validator with the built-in rules installed
    pub fn new() -> Self {
        let mut validator = Self::empty();
        validator.add_document_rule(rules::duplicate_sibling_names);
        validator.add_document_rule(rules::duplicate_ids);
        validator.add_section_rule(rules::section_type_undefined);
        validator.add_section_rule(rules::section_name_equals_id);
        validator.add_property_rule(rules::property_name_equals_id);
        validator.add_property_rule(rules::narrower_dtype_candidates);
        validator.add_property_rule(rules::cardinality_violated);
        validator
    }

    pub fn add_document_rule(
        &mut self,
        rule: impl Fn(&Document) -> Vec<Diagnostic> + 'static,
    ) {
        self.document_rules.push(Box::new(rule));
    }

    pub fn add_section_rule(
        &mut self,
        rule: impl Fn(&Document, &TreePath, &Section) -> Vec<Diagnostic> + 'static,
    ) {
        self.section_rules.push(Box::new(rule));
    }

    pub fn add_property_rule(
        &mut self,
        rule: impl Fn(&Document, &TreePath, &Property) -> Vec<Diagnostic> + 'static,
    ) {
        self.property_rules.push(Box::new(rule));
    }

    pub fn add_value_rule(
        &mut self,
        rule: impl Fn(&Document, &TreePath, usize, &Value) -> Vec<Diagnostic> + 'static,
    ) {
        self.value_rules.push(Box::new(rule));
    }

    /// Run every registered rule over the document
    pub fn validate(&self, doc: &Document) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for rule in &self.document_rules {
            diagnostics.extend(rule(doc));
        }
        for path in doc.section_paths() {
            let Ok(section) = doc.section_at(&path) else {
                continue;
            };
            for rule in &self.section_rules {
                diagnostics.extend(rule(doc, &path, section));
            }
            for (property_index, property) in section.properties().iter().enumerate() {
                let property_path = path.child_property(property_index);
                for rule in &self.property_rules {
                    diagnostics.extend(rule(doc, &property_path, property));
                }
                for (value_index, value) in property.values().iter().enumerate() {
                    for rule in &self.value_rules {
                        diagnostics.extend(rule(doc, &property_path, value_index, value));
                    }
                }
            }
        }
        diagnostics
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SectionContainer;

    #[test]
    fn test_custom_rule_registration() {
        let mut validator = Validator::empty();
        validator.add_section_rule(|doc, path, section| {
            if section.name.starts_with('_') {
                vec![Diagnostic {
                    path: doc.section_path_str(path).unwrap_or_default(),
                    message: format!("section name {:?} starts with underscore", section.name),
                    severity: Severity::Warning,
                }]
            } else {
                Vec::new()
            }
        });

        let mut doc = Document::new();
        doc.append_section(Section::new("_private")).unwrap();
        doc.append_section(Section::new("public")).unwrap();

        let diagnostics = validator.validate(&doc);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].path, "/_private");
    }

    #[test]
    fn test_empty_validator_is_silent() {
        let mut doc = Document::new();
        doc.append_section(Section::new("s")).unwrap();
        assert!(Validator::empty().validate(&doc).is_empty());
    }
}
