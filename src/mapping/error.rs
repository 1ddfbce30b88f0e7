//! Error types for terminology mapping

use thiserror::Error;

use crate::models::{PathError, StructuralError};

/// Errors that can occur while mapping a document against a terminology
///
/// A mapping error is fatal for the affected property only; processing of
/// unrelated branches continues and the errors are surfaced in the report.
#[derive(Error, Debug)]
pub enum MappingError {
    /// Mapping attribute not of the `url#type[:name]` form
    #[error("invalid mapping target {0:?} (expected url#type[:name])")]
    InvalidTarget(String),

    /// The terminology loaded, but holds no matching entity
    #[error("unresolved terminology target {target:?} for {path}")]
    UnresolvedTarget { path: String, target: String },

    /// More than one destination section qualifies
    #[error(
        "ambiguous mapping target for {path}: {candidates} candidate sections of type {dest_type:?}"
    )]
    AmbiguousTarget {
        path: String,
        dest_type: String,
        candidates: usize,
    },

    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error(transparent)]
    Path(#[from] PathError),
}

/// Result type for mapping operations
pub type MappingResult<T> = Result<T, MappingError>;
