//! Error types for document codecs

use thiserror::Error;

use crate::models::StructuralError;
use crate::values::ValueError;

/// Errors raised while reading or writing a document
#[derive(Error, Debug)]
pub enum ParserError {
    /// Input that does not parse as the expected format
    #[error("malformed {format} input: {detail}")]
    Malformed {
        format: &'static str,
        detail: String,
    },

    /// The document declares a format version this codec does not speak;
    /// the caller must run a version migration before loading
    #[error("unsupported odML version {found:?}; run a version migration before loading")]
    UnsupportedVersion { found: String },

    /// Writing failed at the serializer level
    #[error("serialization failed: {0}")]
    Serialize(String),

    #[error(transparent)]
    Value(#[from] ValueError),

    #[error(transparent)]
    Structural(#[from] StructuralError),
}
