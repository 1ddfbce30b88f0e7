//! XML codec

use super::DocumentCodec;
use super::error::ParserError;
use super::wire::{WireDocument, document_from_wire, document_to_wire};
use crate::models::Document;

/// XML reader/writer over the shared wire schema
///
/// The wire struct is renamed `odML`, so documents serialize under an
/// `<odML>` root element with sections, properties and values as ordered
/// repeated child elements.
#[derive(Debug, Default)]
pub struct XmlCodec;

impl DocumentCodec for XmlCodec {
    fn write(&self, doc: &Document) -> Result<String, ParserError> {
        quick_xml::se::to_string(&document_to_wire(doc))
            .map_err(|e| ParserError::Serialize(e.to_string()))
    }

    fn read(&self, text: &str) -> Result<Document, ParserError> {
        let wire: WireDocument =
            quick_xml::de::from_str(text).map_err(|e| ParserError::Malformed {
                format: "xml",
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
    fn test_xml_round_trip() {
        let mut doc = Document::new();
        doc.author = Some("ada".to_string());
        let mut outer = Section::with_type("setup", "hardware");
        let mut inner = Section::with_type("amplifier", "amplifier");
        inner
            .append_property(Property::new(
                "Gain",
                Value::new(TypedPayload::Int(1000)),
            ))
            .unwrap();
        outer.append_section(inner).unwrap();
        doc.append_section(outer).unwrap();

        let codec = XmlCodec;
        let text = codec.write(&doc).unwrap();
        assert!(text.starts_with("<odML>"));
        assert_eq!(codec.read(&text).unwrap(), doc);
    }

    #[test]
    fn test_escaped_content_round_trips() {
        let mut doc = Document::new();
        let mut section = Section::new("notes");
        section
            .append_property(Property::new(
                "Comment",
                Value::new(TypedPayload::Str("a < b & c > d".to_string())),
            ))
            .unwrap();
        doc.append_section(section).unwrap();

        let codec = XmlCodec;
        let text = codec.write(&doc).unwrap();
        assert_eq!(codec.read(&text).unwrap(), doc);
    }

    #[test]
    fn test_malformed_xml() {
        assert!(matches!(
            XmlCodec.read("<odML><unclosed></odML>"),
            Err(ParserError::Malformed { format: "xml", .. })
        ));
    }
}
