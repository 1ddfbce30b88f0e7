//! Document codecs
//!
//! Readers and writers for the supported serialization formats, all built
//! on one wire schema. The contract every codec honors is
//! `read(write(doc)) == doc` under entity content equality, with ids
//! preserved exactly, given the typed value engine's canonical string
//! forms. An RDF rendition is out of scope here; it would have to honor the
//! same contract.
//!
//! Reading a document that declares a different `odml-version` fails with
//! [`ParserError::UnsupportedVersion`]; such documents need a version
//! migration before they can be loaded.

pub mod error;
pub mod json;
pub mod wire;
pub mod xml;
pub mod yaml;

pub use error::ParserError;
pub use json::JsonCodec;
pub use wire::ODML_VERSION;
pub use xml::XmlCodec;
pub use yaml::YamlCodec;

use crate::models::Document;

/// A format reader/writer satisfying the round-trip contract
pub trait DocumentCodec {
    fn write(&self, doc: &Document) -> Result<String, ParserError>;
    fn read(&self, text: &str) -> Result<Document, ParserError>;
}
