//! Wire schema and converters
//!
//! The serde DTOs here are the on-the-wire shape shared by every codec;
//! the converters translate between them and the entity model. Values
//! travel as `{dtype, canonical string}` pairs using the typed value
//! engine's canonical forms; list-valued attributes are ordered repeated
//! nodes. Overlay state never reaches the wire.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ParserError;
use crate::models::{Cardinality, Document, Property, Section, SectionContainer, Value};
use crate::values::{DATE_FORMAT, Dtype, Encoding};

/// The format version this crate reads and writes
pub const ODML_VERSION: &str = "1.1";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "odML")]
pub struct WireDocument {
    #[serde(rename = "odml-version")]
    pub odml_version: String,
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(rename = "section", default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<WireSection>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WireSection {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub section_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<String>,
    #[serde(rename = "section", default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<WireSection>,
    #[serde(rename = "property", default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<WireProperty>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WireProperty {
    pub id: Uuid,
    pub name: String,
    pub dtype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncertainty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardinality_min: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardinality_max: Option<usize>,
    #[serde(rename = "value", default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<WireValue>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WireValue {
    pub dtype: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncertainty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

pub fn document_to_wire(doc: &Document) -> WireDocument {
    WireDocument {
        odml_version: ODML_VERSION.to_string(),
        id: doc.id(),
        author: doc.author.clone(),
        date: doc.date.map(|d| d.format(DATE_FORMAT).to_string()),
        version: doc.version.clone(),
        repository: doc.repository.clone(),
        sections: doc.sections().iter().map(section_to_wire).collect(),
    }
}

fn section_to_wire(section: &Section) -> WireSection {
    WireSection {
        id: section.id(),
        name: section.name.clone(),
        section_type: section.section_type.clone(),
        definition: section.definition.clone(),
        reference: section.reference.clone(),
        repository: section.repository.clone(),
        link: section.link().map(str::to_string),
        include: section.include().map(str::to_string),
        mapping: section.mapping.clone(),
        sections: section.sections().iter().map(section_to_wire).collect(),
        properties: section.properties().iter().map(property_to_wire).collect(),
    }
}

fn property_to_wire(property: &Property) -> WireProperty {
    WireProperty {
        id: property.id(),
        name: property.name.clone(),
        dtype: property.dtype().to_string(),
        definition: property.definition.clone(),
        dependency: property.dependency.clone(),
        dependency_value: property.dependency_value.clone(),
        unit: property.unit.clone(),
        uncertainty: property.uncertainty,
        reference: property.reference.clone(),
        mapping: property.mapping.clone(),
        cardinality_min: property.val_cardinality.and_then(|c| c.min),
        cardinality_max: property.val_cardinality.and_then(|c| c.max),
        values: property.values().iter().map(value_to_wire).collect(),
    }
}

fn value_to_wire(value: &Value) -> WireValue {
    WireValue {
        dtype: value.dtype().to_string(),
        content: value.export_string(),
        unit: value.unit.clone(),
        uncertainty: value.uncertainty,
        encoding: value.encoding().map(|e| e.to_string()),
        checksum: value.checksum_algo().map(|c| c.to_string()),
    }
}

pub fn document_from_wire(wire: WireDocument) -> Result<Document, ParserError> {
    if wire.odml_version != ODML_VERSION {
        return Err(ParserError::UnsupportedVersion {
            found: wire.odml_version,
        });
    }
    let mut doc = Document::with_id(wire.id);
    doc.author = wire.author;
    doc.date = wire
        .date
        .map(|d| {
            NaiveDate::parse_from_str(&d, DATE_FORMAT).map_err(|e| ParserError::Malformed {
                format: "document date",
                detail: e.to_string(),
            })
        })
        .transpose()?;
    doc.version = wire.version;
    doc.repository = wire.repository;
    for section in wire.sections {
        doc.append_section(section_from_wire(section)?)?;
    }
    Ok(doc)
}

fn section_from_wire(wire: WireSection) -> Result<Section, ParserError> {
    let mut section = Section::with_id(wire.id, wire.name);
    section.section_type = wire.section_type;
    section.definition = wire.definition;
    section.reference = wire.reference;
    section.repository = wire.repository;
    section.mapping = wire.mapping;
    section.set_link(wire.link)?;
    section.set_include(wire.include)?;
    for child in wire.sections {
        section.append_section(section_from_wire(child)?)?;
    }
    for property in wire.properties {
        section.append_property(property_from_wire(property)?)?;
    }
    Ok(section)
}

fn property_from_wire(wire: WireProperty) -> Result<Property, ParserError> {
    let dtype: Dtype = wire.dtype.parse()?;
    let mut values = Vec::with_capacity(wire.values.len());
    for value in wire.values {
        values.push(value_from_wire(value)?);
    }
    let mut property = Property::with_id(wire.id, wire.name, values)?;
    property.force_dtype(dtype);
    property.definition = wire.definition;
    property.dependency = wire.dependency;
    property.dependency_value = wire.dependency_value;
    property.unit = wire.unit;
    property.uncertainty = wire.uncertainty;
    property.reference = wire.reference;
    property.mapping = wire.mapping;
    if wire.cardinality_min.is_some() || wire.cardinality_max.is_some() {
        property.val_cardinality =
            Some(Cardinality::new(wire.cardinality_min, wire.cardinality_max));
    }
    Ok(property)
}

fn value_from_wire(wire: WireValue) -> Result<Value, ParserError> {
    let dtype: Dtype = wire.dtype.parse()?;
    let mut value = match (&wire.encoding, dtype) {
        (Some(name), Dtype::Binary) => {
            let encoding: Encoding = name.parse()?;
            Value::parse_encoded(&wire.content, encoding)?
        }
        _ => Value::parse(&wire.content, dtype)?,
    };
    value.unit = wire.unit;
    value.uncertainty = wire.uncertainty;
    if let Some(name) = wire.checksum {
        value.set_checksum(Some(name.parse()?));
    }
    Ok(value)
}
