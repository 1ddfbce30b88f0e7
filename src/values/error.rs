//! Error types for typed value operations

use thiserror::Error;

use super::dtype::Dtype;

/// Errors that can occur when coercing or converting typed values
#[derive(Error, Debug)]
pub enum ValueError {
    /// Malformed input for the requested dtype
    #[error("cannot parse {input:?} as {dtype}")]
    Coercion { input: String, dtype: Dtype },

    /// Tuple literal with the wrong element count
    #[error("tuple literal {input:?} has {found} elements, expected {expected}")]
    TupleArity {
        input: String,
        expected: usize,
        found: usize,
    },

    /// Unknown dtype name
    #[error("unknown dtype name: {0:?}")]
    UnknownDtype(String),

    /// Unknown binary encoding name
    #[error("unknown binary encoding: {0:?}")]
    UnknownEncoding(String),

    /// Unknown checksum algorithm name
    #[error("unknown checksum algorithm: {0:?}")]
    UnknownChecksum(String),

    /// Text that is not valid for the declared binary encoding
    #[error("invalid {encoding} data: {detail}")]
    Encoding { encoding: String, detail: String },

    /// Dtype change would lose the value; the mutation is refused
    #[error("cannot convert value from {from} to {to}")]
    DtypeConversion { from: Dtype, to: Dtype },
}

/// Result type for typed value operations
pub type ValueResult<T> = Result<T, ValueError>;
