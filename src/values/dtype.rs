//! odML dtypes and string/typed coercion
//!
//! Every value a property holds is typed by a [`Dtype`] and carried as a
//! [`TypedPayload`]. The two directions of coercion are [`parse`] (string to
//! payload) and [`format`] (payload to canonical string); for every
//! representable payload `x`, `parse(&format(&x), x.dtype())` returns `x`.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::error::{ValueError, ValueResult};

/// Canonical date format (`2011-12-01`)
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Canonical time format (`13:37:00`)
pub const TIME_FORMAT: &str = "%H:%M:%S";
/// Canonical datetime format (`2011-12-01 13:37:00`)
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The closed set of odML value types
///
/// Tuples are parameterized by arity; their dtype name is `"<n>-tuple"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dtype {
    String,
    Text,
    Int,
    Float,
    Boolean,
    Date,
    Time,
    DateTime,
    Url,
    Person,
    Binary,
    Tuple(usize),
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dtype::String => write!(f, "string"),
            Dtype::Text => write!(f, "text"),
            Dtype::Int => write!(f, "int"),
            Dtype::Float => write!(f, "float"),
            Dtype::Boolean => write!(f, "boolean"),
            Dtype::Date => write!(f, "date"),
            Dtype::Time => write!(f, "time"),
            Dtype::DateTime => write!(f, "datetime"),
            Dtype::Url => write!(f, "url"),
            Dtype::Person => write!(f, "person"),
            Dtype::Binary => write!(f, "binary"),
            Dtype::Tuple(arity) => write!(f, "{}-tuple", arity),
        }
    }
}

impl FromStr for Dtype {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "string" => Dtype::String,
            "text" => Dtype::Text,
            "int" => Dtype::Int,
            "float" => Dtype::Float,
            "boolean" | "bool" => Dtype::Boolean,
            "date" => Dtype::Date,
            "time" => Dtype::Time,
            "datetime" => Dtype::DateTime,
            "url" => Dtype::Url,
            "person" => Dtype::Person,
            "binary" => Dtype::Binary,
            other => {
                let arity = other
                    .strip_suffix("-tuple")
                    .and_then(|n| n.parse::<usize>().ok())
                    .ok_or_else(|| ValueError::UnknownDtype(other.to_string()))?;
                Dtype::Tuple(arity)
            }
        })
    }
}

/// A typed value payload, one variant per [`Dtype`]
#[derive(Debug, Clone, PartialEq)]
pub enum TypedPayload {
    Str(String),
    Text(String),
    Int(i64),
    Float(f64),
    Boolean(bool),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Url(String),
    Person(String),
    Binary(Vec<u8>),
    Tuple(Vec<String>),
}

impl TypedPayload {
    /// The dtype this payload carries
    pub fn dtype(&self) -> Dtype {
        match self {
            TypedPayload::Str(_) => Dtype::String,
            TypedPayload::Text(_) => Dtype::Text,
            TypedPayload::Int(_) => Dtype::Int,
            TypedPayload::Float(_) => Dtype::Float,
            TypedPayload::Boolean(_) => Dtype::Boolean,
            TypedPayload::Date(_) => Dtype::Date,
            TypedPayload::Time(_) => Dtype::Time,
            TypedPayload::DateTime(_) => Dtype::DateTime,
            TypedPayload::Url(_) => Dtype::Url,
            TypedPayload::Person(_) => Dtype::Person,
            TypedPayload::Binary(_) => Dtype::Binary,
            TypedPayload::Tuple(parts) => Dtype::Tuple(parts.len()),
        }
    }
}

impl Dtype {
    /// Infer a dtype from an existing payload
    ///
    /// Variant-driven, with one heuristic on top: a string payload containing
    /// a newline infers `text` rather than `string`.
    pub fn infer(payload: &TypedPayload) -> Dtype {
        match payload {
            TypedPayload::Str(s) if s.contains('\n') => Dtype::Text,
            other => other.dtype(),
        }
    }
}

/// Parse a string into a typed payload of the given dtype
///
/// Boolean parsing accepts case-insensitive `true/1/t` and `false/0/f`.
/// Int parsing falls back to float truncation (`"3.7"` parses to 3).
/// Tuple parsing requires the `"(a;b;...)"` form with exactly the declared
/// element count.
pub fn parse(input: &str, dtype: Dtype) -> ValueResult<TypedPayload> {
    let coerce_err = || ValueError::Coercion {
        input: input.to_string(),
        dtype,
    };

    Ok(match dtype {
        Dtype::String => TypedPayload::Str(input.to_string()),
        Dtype::Text => TypedPayload::Text(input.to_string()),
        Dtype::Url => TypedPayload::Url(input.trim().to_string()),
        Dtype::Person => TypedPayload::Person(input.trim().to_string()),
        Dtype::Int => {
            let trimmed = input.trim();
            if let Ok(i) = trimmed.parse::<i64>() {
                TypedPayload::Int(i)
            } else {
                let f: f64 = trimmed.parse().map_err(|_| coerce_err())?;
                TypedPayload::Int(f.trunc() as i64)
            }
        }
        Dtype::Float => TypedPayload::Float(input.trim().parse().map_err(|_| coerce_err())?),
        Dtype::Boolean => match input.trim().to_lowercase().as_str() {
            "true" | "1" | "t" => TypedPayload::Boolean(true),
            "false" | "0" | "f" => TypedPayload::Boolean(false),
            _ => return Err(coerce_err()),
        },
        Dtype::Date => TypedPayload::Date(
            NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|_| coerce_err())?,
        ),
        Dtype::Time => TypedPayload::Time(
            NaiveTime::parse_from_str(input.trim(), TIME_FORMAT).map_err(|_| coerce_err())?,
        ),
        Dtype::DateTime => TypedPayload::DateTime(
            NaiveDateTime::parse_from_str(input.trim(), DATETIME_FORMAT)
                .map_err(|_| coerce_err())?,
        ),
        Dtype::Binary => TypedPayload::Binary(input.as_bytes().to_vec()),
        Dtype::Tuple(arity) => {
            let inner = input
                .trim()
                .strip_prefix('(')
                .and_then(|r| r.strip_suffix(')'))
                .ok_or_else(coerce_err)?;
            let parts: Vec<String> = inner.split(';').map(|p| p.trim().to_string()).collect();
            if parts.len() != arity {
                return Err(ValueError::TupleArity {
                    input: input.to_string(),
                    expected: arity,
                    found: parts.len(),
                });
            }
            TypedPayload::Tuple(parts)
        }
    })
}

/// Render a payload in its canonical string form
pub fn format(payload: &TypedPayload) -> String {
    match payload {
        TypedPayload::Str(s)
        | TypedPayload::Text(s)
        | TypedPayload::Url(s)
        | TypedPayload::Person(s) => s.clone(),
        TypedPayload::Int(i) => i.to_string(),
        TypedPayload::Float(f) => f.to_string(),
        TypedPayload::Boolean(b) => b.to_string(),
        TypedPayload::Date(d) => d.format(DATE_FORMAT).to_string(),
        TypedPayload::Time(t) => t.format(TIME_FORMAT).to_string(),
        TypedPayload::DateTime(dt) => dt.format(DATETIME_FORMAT).to_string(),
        TypedPayload::Binary(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        TypedPayload::Tuple(parts) => format!("({})", parts.join(";")),
    }
}

/// Convert a payload to a new dtype
///
/// First attempt goes through the old payload's canonical string; if that
/// string does not parse under the new dtype, a direct payload-level
/// conversion is attempted. If both fail the conversion is refused with
/// `DtypeConversion` and the caller keeps the previous state.
pub fn convert(payload: &TypedPayload, new_dtype: Dtype) -> ValueResult<TypedPayload> {
    if payload.dtype() == new_dtype {
        return Ok(payload.clone());
    }
    if let Ok(converted) = parse(&format(payload), new_dtype) {
        return Ok(converted);
    }
    direct_convert(payload, new_dtype).ok_or(ValueError::DtypeConversion {
        from: payload.dtype(),
        to: new_dtype,
    })
}

/// Payload-level conversions that have no string-form equivalent
fn direct_convert(payload: &TypedPayload, new_dtype: Dtype) -> Option<TypedPayload> {
    match (payload, new_dtype) {
        (TypedPayload::DateTime(dt), Dtype::Date) => Some(TypedPayload::Date(dt.date())),
        (TypedPayload::DateTime(dt), Dtype::Time) => Some(TypedPayload::Time(dt.time())),
        (TypedPayload::Boolean(b), Dtype::Int) => Some(TypedPayload::Int(i64::from(*b))),
        (TypedPayload::Boolean(b), Dtype::Float) => {
            Some(TypedPayload::Float(f64::from(u8::from(*b))))
        }
        (TypedPayload::Binary(bytes), Dtype::String) => String::from_utf8(bytes.clone())
            .ok()
            .map(TypedPayload::Str),
        _ => None,
    }
}
