//! Typed value engine
//!
//! Provides the odML dtype system:
//! - dtype enum and inference ([`Dtype`], [`TypedPayload`])
//! - bidirectional string/typed coercion ([`parse`], [`format`], [`convert`])
//! - tuple types with declared arity
//! - binary encodings and checksums ([`Encoding`], [`ChecksumAlgo`])

pub mod binary;
pub mod dtype;
pub mod error;

pub use binary::{ChecksumAlgo, Encoding};
pub use dtype::{
    DATE_FORMAT, DATETIME_FORMAT, Dtype, TIME_FORMAT, TypedPayload, convert, format, parse,
};
pub use error::{ValueError, ValueResult};
