//! odML SDK - Shared library for hierarchical metadata documents
//!
//! Provides unified interfaces for:
//! - The odML entity model (Document/Section/Property/Value) with path
//!   addressing
//! - Typed value coercion (dtypes, tuples, binary encodings, checksums)
//! - Link/include resolution with one-level merge overlays
//! - Terminology-driven structural mapping
//! - Rule-based validation
//! - Format codecs (XML/JSON/YAML) with a strict round-trip contract

pub mod codecs;
pub mod link;
pub mod mapping;
pub mod models;
pub mod terminology;
pub mod validation;
pub mod values;

// Re-export commonly used types
pub use codecs::{DocumentCodec, JsonCodec, ODML_VERSION, ParserError, XmlCodec, YamlCodec};
pub use mapping::{MappingEngine, MappingError, MappingReport, MappingTarget, map_document};
pub use models::{
    Cardinality, Document, FindOptions, FindSpec, PathError, Property, Section, SectionContainer,
    StructuralError, TreePath, UNDEFINED_TYPE, Value, relative_path,
};
pub use terminology::{InMemoryLoader, TerminologyCache, TerminologyLoader};
pub use validation::{Diagnostic, Severity, Validator};
pub use values::{ChecksumAlgo, Dtype, Encoding, TypedPayload, ValueError};
