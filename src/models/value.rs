//! Value model

use crate::values::{
    self, ChecksumAlgo, Dtype, Encoding, TypedPayload, ValueError, ValueResult,
};

/// A single typed value owned by a property
///
/// The payload is kept typed; its canonical textual form comes from the
/// typed value engine. Unit and uncertainty override the owning property's
/// defaults when set. Binary payloads may carry a textual encoding and a
/// checksum algorithm; both describe presentation only, the payload always
/// holds raw bytes.
#[derive(Debug, Clone)]
pub struct Value {
    payload: TypedPayload,
    pub unit: Option<String>,
    pub uncertainty: Option<f64>,
    encoding: Option<Encoding>,
    checksum: Option<ChecksumAlgo>,
}

impl Value {
    /// Wrap a typed payload
    pub fn new(payload: TypedPayload) -> Self {
        Self {
            payload,
            unit: None,
            uncertainty: None,
            encoding: None,
            checksum: None,
        }
    }

    /// Parse a textual form into a value of the given dtype
    pub fn parse(text: &str, dtype: Dtype) -> ValueResult<Self> {
        Ok(Self::new(values::parse(text, dtype)?))
    }

    /// Parse an encoded textual form into a binary value
    pub fn parse_encoded(text: &str, encoding: Encoding) -> ValueResult<Self> {
        let bytes = encoding.decode(text)?;
        let mut value = Self::new(TypedPayload::Binary(bytes));
        value.encoding = Some(encoding);
        Ok(value)
    }

    pub fn payload(&self) -> &TypedPayload {
        &self.payload
    }

    pub fn dtype(&self) -> Dtype {
        self.payload.dtype()
    }

    /// Canonical textual form; binary payloads honor the encoding
    pub fn export_string(&self) -> String {
        match (&self.payload, self.encoding) {
            (TypedPayload::Binary(bytes), Some(encoding)) => encoding.encode(bytes),
            _ => values::format(&self.payload),
        }
    }

    /// Change the dtype, converting the payload
    ///
    /// Conversion goes through the canonical string, with a payload-level
    /// fallback. On failure the value is left unchanged.
    pub fn set_dtype(&mut self, new_dtype: Dtype) -> ValueResult<()> {
        let converted = values::convert(&self.payload, new_dtype)?;
        self.payload = converted;
        Ok(())
    }

    /// Replace the payload outright
    pub fn set_payload(&mut self, payload: TypedPayload) {
        self.payload = payload;
    }

    pub fn encoding(&self) -> Option<Encoding> {
        self.encoding
    }

    /// Change the textual encoding; the underlying bytes are untouched
    pub fn set_encoding(&mut self, encoding: Option<Encoding>) -> ValueResult<()> {
        if encoding.is_some() && self.payload.dtype() != Dtype::Binary {
            return Err(ValueError::DtypeConversion {
                from: self.payload.dtype(),
                to: Dtype::Binary,
            });
        }
        self.encoding = encoding;
        Ok(())
    }

    pub fn checksum_algo(&self) -> Option<ChecksumAlgo> {
        self.checksum
    }

    pub fn set_checksum(&mut self, algo: Option<ChecksumAlgo>) {
        self.checksum = algo;
    }

    /// Compute the checksum over the raw payload bytes, `"<algo>$<hex>"` form
    pub fn checksum(&self) -> Option<String> {
        let algo = self.checksum?;
        match &self.payload {
            TypedPayload::Binary(bytes) => Some(algo.digest(bytes)),
            other => Some(algo.digest(values::format(other).as_bytes())),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.payload == other.payload
            && self.unit == other.unit
            && self.uncertainty == other.uncertainty
            && self.encoding == other.encoding
            && self.checksum == other.checksum
    }
}

impl From<TypedPayload> for Value {
    fn from(payload: TypedPayload) -> Self {
        Value::new(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_dtype_refused_keeps_state() {
        let mut value = Value::new(TypedPayload::Boolean(true));
        assert!(value.set_dtype(Dtype::Date).is_err());
        assert_eq!(value.payload(), &TypedPayload::Boolean(true));
    }

    #[test]
    fn test_encoding_round_trip() {
        let mut value = Value::new(TypedPayload::Binary(b"\x01\x02\x03".to_vec()));
        value.set_encoding(Some(Encoding::Base64)).unwrap();
        let text = value.export_string();
        let back = Value::parse_encoded(&text, Encoding::Base64).unwrap();
        assert_eq!(back.payload(), value.payload());

        // re-encoding leaves the bytes alone
        value.set_encoding(Some(Encoding::Hex)).unwrap();
        assert_eq!(value.export_string(), "010203");
        assert_eq!(value.payload(), &TypedPayload::Binary(b"\x01\x02\x03".to_vec()));
    }

    #[test]
    fn test_encoding_requires_binary() {
        let mut value = Value::new(TypedPayload::Int(1));
        assert!(value.set_encoding(Some(Encoding::Hex)).is_err());
    }

    #[test]
    fn test_checksum_over_raw_bytes() {
        let mut value = Value::new(TypedPayload::Binary(b"abc".to_vec()));
        value.set_checksum(Some(ChecksumAlgo::Crc32));
        assert_eq!(value.checksum().unwrap(), "crc32$352441c2");

        // encoding changes must not change the checksum
        value.set_encoding(Some(Encoding::Base64)).unwrap();
        assert_eq!(value.checksum().unwrap(), "crc32$352441c2");
    }

    #[test]
    fn test_content_equality() {
        let a = Value::new(TypedPayload::Int(5));
        let b = Value::new(TypedPayload::Int(5));
        assert_eq!(a, b);

        let mut c = Value::new(TypedPayload::Int(5));
        c.unit = Some("mV".to_string());
        assert_ne!(a, c);
    }
}
