//! Terminology mapping module
//!
//! Rewrites a document's section/property graph against externally supplied
//! terminology documents. Every section or property carrying a
//! `url#type[:name]` mapping attribute is retyped, renamed or relocated to
//! match the terminology's structure:
//! - sections adopt the target's type and repository;
//! - properties are renamed in place when their section already has the
//!   target type, moved into a unique child or sibling of that type, or
//!   given a freshly synthesized section when nothing matches.
//!
//! Terminologies are fetched through the injected [`TerminologyLoader`] and
//! memoized in a [`TerminologyCache`]; an unreachable terminology skips the
//! affected entities without failing the run.

mod engine;
mod error;

pub use engine::{MappingEngine, MappingReport, MappingTarget};
pub use error::{MappingError, MappingResult};

use crate::models::Document;
use crate::terminology::{TerminologyCache, TerminologyLoader};

/// Map a document with a throwaway cache
///
/// This is a convenience function for one-shot mapping; callers that map
/// many documents against the same terminologies should hold their own
/// [`TerminologyCache`] and use [`MappingEngine`] directly.
pub fn map_document(doc: &mut Document, loader: &dyn TerminologyLoader) -> MappingReport {
    let mut cache = TerminologyCache::new();
    MappingEngine::new(loader, &mut cache).map_document(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Property, Section, SectionContainer, Value};
    use crate::terminology::InMemoryLoader;
    use crate::values::TypedPayload;

    const TERM_URL: &str = "http://terminologies.example.org/amplifier.xml";

    /// Terminology: section "Amplifier" (type T3) with properties P2, P3
    fn terminology() -> Document {
        let mut doc = Document::new();
        let mut amp = Section::with_type("Amplifier", "T3");
        amp.append_property(Property::new("P2", Value::new(TypedPayload::Str("".into()))))
            .unwrap();
        amp.append_property(Property::new("P3", Value::new(TypedPayload::Str("".into()))))
            .unwrap();
        doc.append_section(amp).unwrap();
        doc
    }

    #[test]
    fn test_co_located_rename() {
        let mut loader = InMemoryLoader::new();
        loader.insert(TERM_URL, terminology());

        let mut doc = Document::new();
        let mut s3 = Section::with_type("s3", "t3");
        s3.mapping = Some(format!("{}#T3", TERM_URL));
        let mut p_a = Property::new("a", Value::new(TypedPayload::Int(1)));
        p_a.mapping = Some(format!("{}#T3:P2", TERM_URL));
        let mut p_b = Property::new("b", Value::new(TypedPayload::Int(2)));
        p_b.mapping = Some(format!("{}#T3:P3", TERM_URL));
        s3.append_property(p_a).unwrap();
        s3.append_property(p_b).unwrap();
        doc.append_section(s3).unwrap();

        let report = map_document(&mut doc, &loader);
        assert!(report.is_clean(), "unexpected errors: {:?}", report.errors);

        let s3 = doc.find_section("s3").unwrap();
        assert_eq!(s3.section_type, "T3");
        assert_eq!(s3.mapping, None);
        let names: Vec<&str> = s3.properties().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["P2", "P3"]);
        // values traveled unchanged
        assert_eq!(
            s3.properties()[0].values()[0].payload(),
            &TypedPayload::Int(1)
        );
    }

    #[test]
    fn test_mapping_is_idempotent() {
        let mut loader = InMemoryLoader::new();
        loader.insert(TERM_URL, terminology());

        let mut doc = Document::new();
        let mut s3 = Section::with_type("s3", "t3");
        s3.mapping = Some(format!("{}#T3", TERM_URL));
        let mut p = Property::new("a", Value::new(TypedPayload::Int(1)));
        p.mapping = Some(format!("{}#T3:P2", TERM_URL));
        s3.append_property(p).unwrap();
        doc.append_section(s3).unwrap();

        map_document(&mut doc, &loader);
        let snapshot = doc.clone();
        let second = map_document(&mut doc, &loader);
        assert!(second.is_clean());
        assert_eq!(second.sections_retyped, 0);
        assert_eq!(second.properties_renamed + second.properties_moved, 0);
        assert_eq!(doc, snapshot);
    }

    #[test]
    fn test_unloadable_terminology_is_skipped() {
        let loader = InMemoryLoader::new();

        let mut doc = Document::new();
        let mut s = Section::with_type("s", "t");
        s.mapping = Some("http://gone.example.org/x.xml#T".to_string());
        doc.append_section(s).unwrap();

        let report = map_document(&mut doc, &loader);
        assert!(report.is_clean());
        assert_eq!(report.skipped.len(), 1);
        // the attribute survives for a later retry
        assert!(doc.find_section("s").unwrap().mapping.is_some());
    }
}
