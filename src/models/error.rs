//! Error types for the entity model

use thiserror::Error;

/// Violations of the tree's structural invariants
#[derive(Error, Debug)]
pub enum StructuralError {
    /// Sibling names must be unique within a kind
    #[error("duplicate {kind} name {name:?} among siblings")]
    DuplicateName { kind: &'static str, name: String },

    /// A property always holds at least one value
    #[error("property {property:?} must keep at least one value")]
    LastValue { property: String },

    /// A property cannot be constructed without values
    #[error("property {property:?} cannot be created with an empty value list")]
    EmptyValues { property: String },

    /// Child index outside the container's range
    #[error("child index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// `link` and `include` are mutually exclusive on a section
    #[error("section {section:?} cannot carry both link and include")]
    LinkIncludeConflict { section: String },

    /// Neither an own child nor an overlay child has this name
    #[error("no child named {name:?}")]
    UnknownChild { name: String },

    #[error(transparent)]
    Path(#[from] PathError),
}

/// Failures while addressing entities by path
#[derive(Error, Debug)]
pub enum PathError {
    /// A path segment did not name a child section
    #[error("unknown segment {segment:?} in path {path:?}")]
    UnknownSegment { segment: String, path: String },

    /// A property path was handed to a section resolver
    #[error("path {0:?} addresses a property, not a section")]
    NotASection(String),

    /// A section path was handed to a property resolver
    #[error("path {0:?} addresses a section, not a property")]
    NotAProperty(String),

    /// Too many `..` segments
    #[error("path {0:?} escapes above the document root")]
    AboveRoot(String),

    /// An index path that does not address an existing entity
    #[error("index path {0:?} does not resolve")]
    InvalidIndexPath(String),
}

/// Result type for structural mutations
pub type StructuralResult<T> = Result<T, StructuralError>;
