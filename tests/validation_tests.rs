//! Validation engine integration tests

use odml_sdk::{
    Cardinality, Document, Property, Section, SectionContainer, Severity, TypedPayload, Validator,
    Value,
};

mod cardinality_tests {
    use super::*;

    fn doc_with_cardinality(value_count: usize) -> Document {
        let mut doc = Document::new();
        let mut section = Section::with_type("s", "t");
        let values: Vec<Value> = (0..value_count)
            .map(|i| Value::new(TypedPayload::Int(i as i64)))
            .collect();
        let mut property = Property::with_values("p", values).unwrap();
        property.val_cardinality = Some(Cardinality::new(Some(2), None));
        section.append_property(property).unwrap();
        doc.append_section(section).unwrap();
        doc
    }

    #[test]
    fn test_undershoot_yields_exactly_one_warning() {
        let diagnostics = Validator::new().validate(&doc_with_cardinality(1));
        let hits: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.message.contains("cardinality"))
            .collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].severity, Severity::Warning);
        assert!(hits[0].message.contains("minimum 2"));
        assert!(hits[0].message.contains("1 values"));
        assert_eq!(hits[0].path, "/s:p");
    }

    #[test]
    fn test_satisfied_bound_is_silent() {
        let diagnostics = Validator::new().validate(&doc_with_cardinality(3));
        assert!(diagnostics.iter().all(|d| !d.message.contains("cardinality")));
    }

    #[test]
    fn test_maximum_overshoot() {
        let mut doc = Document::new();
        let mut section = Section::with_type("s", "t");
        let mut property = Property::with_values(
            "p",
            vec![
                Value::new(TypedPayload::Int(1)),
                Value::new(TypedPayload::Int(2)),
                Value::new(TypedPayload::Int(3)),
            ],
        )
        .unwrap();
        property.val_cardinality = Some(Cardinality::new(None, Some(2)));
        section.append_property(property).unwrap();
        doc.append_section(section).unwrap();

        let diagnostics = Validator::new().validate(&doc);
        let hits: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.message.contains("cardinality"))
            .collect();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].message.contains("maximum 2"));
    }
}

mod structural_rule_tests {
    use super::*;

    #[test]
    fn test_duplicate_sibling_names_are_errors() {
        let mut doc = Document::new();
        doc.append_section(Section::with_type("a", "t")).unwrap();
        doc.append_section(Section::with_type("b", "t")).unwrap();
        // renaming after the append bypasses the uniqueness check
        doc.find_section_mut("b").unwrap().name = "a".to_string();

        let diagnostics = Validator::new().validate(&doc);
        let hits: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .collect();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].message.contains("duplicate section name"));
    }

    #[test]
    fn test_unsafe_clone_triggers_duplicate_id_error() {
        let mut doc = Document::new();
        let mut section = Section::with_type("original", "t");
        section
            .append_property(Property::new("p", Value::new(TypedPayload::Int(1))))
            .unwrap();
        doc.append_section(section).unwrap();

        // id-keeping clone under a different name
        let mut unsafe_clone = doc.find_section("original").unwrap().clone_tree(true);
        unsafe_clone.name = "copy".to_string();
        doc.append_section(unsafe_clone).unwrap();

        let diagnostics = Validator::new().validate(&doc);
        let id_errors: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.message.contains("repeats id"))
            .collect();
        // the cloned section and its cloned property both repeat ids
        assert_eq!(id_errors.len(), 2);
        assert!(id_errors.iter().all(|d| d.severity == Severity::Error));
    }

    #[test]
    fn test_safe_clone_is_silent() {
        let mut doc = Document::new();
        doc.append_section(Section::with_type("original", "t")).unwrap();
        let mut safe_clone = doc.find_section("original").unwrap().clone_tree(false);
        safe_clone.name = "copy".to_string();
        doc.append_section(safe_clone).unwrap();

        let diagnostics = Validator::new().validate(&doc);
        assert!(diagnostics.iter().all(|d| !d.message.contains("repeats id")));
    }
}

mod advisory_rule_tests {
    use super::*;

    #[test]
    fn test_undefined_section_type_warns() {
        let mut doc = Document::new();
        doc.append_section(Section::new("untyped")).unwrap();
        doc.append_section(Section::with_type("typed", "setup")).unwrap();

        let diagnostics = Validator::new().validate(&doc);
        let hits: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.message.contains("undefined type"))
            .collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].path, "/untyped");
        assert_eq!(hits[0].severity, Severity::Warning);
    }

    #[test]
    fn test_auto_generated_name_warns() {
        let mut doc = Document::new();
        let mut section = Section::with_type("s", "t");
        section.name = section.id().to_string();
        doc.append_section(section).unwrap();

        let diagnostics = Validator::new().validate(&doc);
        assert!(
            diagnostics
                .iter()
                .any(|d| d.message.contains("auto-generated"))
        );
    }

    #[test]
    fn test_narrower_dtype_warnings_one_per_dtype() {
        let mut doc = Document::new();
        let mut section = Section::with_type("s", "t");
        let property = Property::with_values(
            "p",
            vec![
                Value::new(TypedPayload::Str("42".to_string())),
                Value::new(TypedPayload::Str("2011-12-01".to_string())),
                Value::new(TypedPayload::Str("43".to_string())),
            ],
        )
        .unwrap();
        section.append_property(property).unwrap();
        doc.append_section(section).unwrap();

        let diagnostics = Validator::new().validate(&doc);
        let hits: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.message.contains("also parse as"))
            .collect();
        // "42" and "43" fold into one int warning; the date adds another
        assert_eq!(hits.len(), 2);
        assert!(hits[0].message.contains("parse as int"));
        assert!(hits[1].message.contains("parse as date"));
        assert!(hits.iter().all(|d| d.message.contains("\"p\"")));
    }

    #[test]
    fn test_non_string_properties_not_probed() {
        let mut doc = Document::new();
        let mut section = Section::with_type("s", "t");
        section
            .append_property(Property::new("n", Value::new(TypedPayload::Int(42))))
            .unwrap();
        doc.append_section(section).unwrap();

        let diagnostics = Validator::new().validate(&doc);
        assert!(diagnostics.iter().all(|d| !d.message.contains("also parse as")));
    }
}

mod traversal_order_tests {
    use super::*;

    #[test]
    fn test_diagnostics_follow_traversal_order() {
        // two findings on different entities: the section-level warning on
        // the first section must precede the property-level warning inside
        // the second section
        let mut doc = Document::new();
        doc.append_section(Section::new("first")).unwrap();

        let mut second = Section::with_type("second", "t");
        let mut property = Property::new("p", Value::new(TypedPayload::Int(1)));
        property.val_cardinality = Some(Cardinality::new(Some(2), None));
        second.append_property(property).unwrap();
        doc.append_section(second).unwrap();

        let diagnostics = Validator::new().validate(&doc);
        let undefined_pos = diagnostics
            .iter()
            .position(|d| d.message.contains("undefined type"))
            .unwrap();
        let cardinality_pos = diagnostics
            .iter()
            .position(|d| d.message.contains("cardinality"))
            .unwrap();
        assert!(undefined_pos < cardinality_pos);
    }
}
