//! YAML codec

use super::DocumentCodec;
use super::error::ParserError;
use super::wire::{WireDocument, document_from_wire, document_to_wire};
use crate::models::Document;

/// YAML reader/writer over the shared wire schema
#[derive(Debug, Default)]
pub struct YamlCodec;

impl DocumentCodec for YamlCodec {
    fn write(&self, doc: &Document) -> Result<String, ParserError> {
        serde_yaml::to_string(&document_to_wire(doc))
            .map_err(|e| ParserError::Serialize(e.to_string()))
    }

    fn read(&self, text: &str) -> Result<Document, ParserError> {
        let wire: WireDocument =
            serde_yaml::from_str(text).map_err(|e| ParserError::Malformed {
                format: "yaml",
                detail: e.to_string(),
            })?;
        document_from_wire(wire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Property, Section, SectionContainer, Value};
    use crate::values::TypedPayload;

    #[test]
    fn test_yaml_round_trip() {
        let mut doc = Document::new();
        doc.version = Some("0.1".to_string());
        let mut section = Section::with_type("subject", "subject");
        section
            .append_property(Property::new(
                "Species",
                Value::new(TypedPayload::Str("Mus musculus".to_string())),
            ))
            .unwrap();
        doc.append_section(section).unwrap();

        let codec = YamlCodec;
        let text = codec.write(&doc).unwrap();
        assert_eq!(codec.read(&text).unwrap(), doc);
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(matches!(
            YamlCodec.read(": [unbalanced"),
            Err(ParserError::Malformed { format: "yaml", .. })
        ));
    }
}
