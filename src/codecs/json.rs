//! JSON codec

use super::DocumentCodec;
use super::error::ParserError;
use super::wire::{WireDocument, document_from_wire, document_to_wire};
use crate::models::Document;

/// JSON reader/writer over the shared wire schema
#[derive(Debug, Default)]
pub struct JsonCodec;

impl DocumentCodec for JsonCodec {
    fn write(&self, doc: &Document) -> Result<String, ParserError> {
        serde_json::to_string_pretty(&document_to_wire(doc))
            .map_err(|e| ParserError::Serialize(e.to_string()))
    }

    fn read(&self, text: &str) -> Result<Document, ParserError> {
        let wire: WireDocument =
            serde_json::from_str(text).map_err(|e| ParserError::Malformed {
                format: "json",
                detail: e.to_string(),
            })?;
        document_from_wire(wire)
    }
}
