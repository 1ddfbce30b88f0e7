//! Textual encodings and checksums for binary values
//!
//! Binary payloads always hold raw bytes; the encoding only governs the
//! textual form used for round-tripping, so changing it never alters the
//! underlying data. Checksums are computed over the raw bytes on demand.

use std::fmt;
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use md5::{Digest, Md5};

use super::error::{ValueError, ValueResult};

/// Textual encoding of a binary payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Base64,
    Hex,
    QuotedPrintable,
}

impl Encoding {
    /// Encode raw bytes into this encoding's textual form
    pub fn encode(&self, raw: &[u8]) -> String {
        match self {
            Encoding::Base64 => BASE64.encode(raw),
            Encoding::Hex => hex::encode(raw),
            Encoding::QuotedPrintable => quoted_printable::encode_to_str(raw),
        }
    }

    /// Decode this encoding's textual form back into raw bytes
    pub fn decode(&self, text: &str) -> ValueResult<Vec<u8>> {
        let invalid = |detail: String| ValueError::Encoding {
            encoding: self.to_string(),
            detail,
        };
        match self {
            Encoding::Base64 => BASE64.decode(text.trim()).map_err(|e| invalid(e.to_string())),
            Encoding::Hex => hex::decode(text.trim()).map_err(|e| invalid(e.to_string())),
            Encoding::QuotedPrintable => {
                quoted_printable::decode(text.as_bytes(), quoted_printable::ParseMode::Robust)
                    .map_err(|e| invalid(e.to_string()))
            }
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Base64 => write!(f, "base64"),
            Encoding::Hex => write!(f, "hex"),
            Encoding::QuotedPrintable => write!(f, "quoted-printable"),
        }
    }
}

impl FromStr for Encoding {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base64" => Ok(Encoding::Base64),
            "hex" => Ok(Encoding::Hex),
            "quoted-printable" => Ok(Encoding::QuotedPrintable),
            other => Err(ValueError::UnknownEncoding(other.to_string())),
        }
    }
}

/// Checksum algorithm for binary payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumAlgo {
    Crc32,
    Md5,
}

impl ChecksumAlgo {
    /// Compute the digest over raw bytes, rendered as `"<algo>$<hex>"`
    pub fn digest(&self, raw: &[u8]) -> String {
        match self {
            ChecksumAlgo::Crc32 => {
                let mut hasher = crc32fast::Hasher::new();
                hasher.update(raw);
                format!("crc32${:08x}", hasher.finalize())
            }
            ChecksumAlgo::Md5 => {
                let mut hasher = Md5::new();
                hasher.update(raw);
                format!("md5${}", hex::encode(hasher.finalize()))
            }
        }
    }
}

impl fmt::Display for ChecksumAlgo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChecksumAlgo::Crc32 => write!(f, "crc32"),
            ChecksumAlgo::Md5 => write!(f, "md5"),
        }
    }
}

impl FromStr for ChecksumAlgo {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "crc32" => Ok(ChecksumAlgo::Crc32),
            "md5" => Ok(ChecksumAlgo::Md5),
            other => Err(ValueError::UnknownChecksum(other.to_string())),
        }
    }
}
