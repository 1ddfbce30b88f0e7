//! Property model

use uuid::Uuid;

use super::error::{StructuralError, StructuralResult};
use super::value::Value;
use crate::values::{Dtype, ValueResult};

/// Declared (min, max) bound on the number of values a property may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cardinality {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl Cardinality {
    pub fn new(min: Option<usize>, max: Option<usize>) -> Self {
        Self { min, max }
    }

    /// Whether a value count satisfies the bound
    pub fn accepts(&self, count: usize) -> bool {
        if let Some(min) = self.min
            && count < min
        {
            return false;
        }
        if let Some(max) = self.max
            && count > max
        {
            return false;
        }
        true
    }
}

/// A named, typed property owned by a section
///
/// A property always holds at least one value; removing the last one is
/// rejected. The declared dtype governs all values, and changing it converts
/// every value or refuses the mutation entirely.
#[derive(Debug, Clone)]
pub struct Property {
    pub(crate) id: Uuid,
    pub name: String,
    pub definition: Option<String>,
    pub dependency: Option<String>,
    pub dependency_value: Option<String>,
    pub unit: Option<String>,
    pub uncertainty: Option<f64>,
    pub reference: Option<String>,
    pub mapping: Option<String>,
    pub val_cardinality: Option<Cardinality>,
    dtype: Dtype,
    values: Vec<Value>,
}

impl Property {
    /// Create a property holding a single value; the dtype is taken from it
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        let dtype = value.dtype();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            definition: None,
            dependency: None,
            dependency_value: None,
            unit: None,
            uncertainty: None,
            reference: None,
            mapping: None,
            val_cardinality: None,
            dtype,
            values: vec![value],
        }
    }

    /// Create a property holding the given values (must be non-empty)
    pub fn with_values(name: impl Into<String>, values: Vec<Value>) -> StructuralResult<Self> {
        let name = name.into();
        let first = values
            .first()
            .ok_or_else(|| StructuralError::EmptyValues {
                property: name.clone(),
            })?;
        let dtype = first.dtype();
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            definition: None,
            dependency: None,
            dependency_value: None,
            unit: None,
            uncertainty: None,
            reference: None,
            mapping: None,
            val_cardinality: None,
            dtype,
            values,
        })
    }

    /// Create a property with an explicitly supplied id
    pub fn with_id(
        id: Uuid,
        name: impl Into<String>,
        values: Vec<Value>,
    ) -> StructuralResult<Self> {
        let mut property = Self::with_values(name, values)?;
        property.id = id;
        Ok(property)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn dtype(&self) -> Dtype {
        self.dtype
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// In-place access to the values; the slice form keeps the list non-empty
    pub fn values_mut(&mut self) -> &mut [Value] {
        &mut self.values
    }

    pub fn append_value(&mut self, value: Value) {
        self.values.push(value);
    }

    /// Remove a value by index; removing the last value is rejected
    pub fn remove_value(&mut self, index: usize) -> StructuralResult<Value> {
        if index >= self.values.len() {
            return Err(StructuralError::IndexOutOfRange {
                index,
                len: self.values.len(),
            });
        }
        if self.values.len() == 1 {
            return Err(StructuralError::LastValue {
                property: self.name.clone(),
            });
        }
        Ok(self.values.remove(index))
    }

    /// Change the declared dtype, converting every value
    ///
    /// All-or-nothing: if any value refuses conversion the property and all
    /// its values are left unchanged.
    pub fn set_dtype(&mut self, new_dtype: Dtype) -> ValueResult<()> {
        let mut converted = self.values.clone();
        for value in &mut converted {
            value.set_dtype(new_dtype)?;
        }
        self.values = converted;
        self.dtype = new_dtype;
        Ok(())
    }

    /// Set the declared dtype without touching the values (codec use)
    pub(crate) fn force_dtype(&mut self, dtype: Dtype) {
        self.dtype = dtype;
    }

    /// Clone this property; a fresh id is assigned unless `keep_id`
    pub fn clone_entity(&self, keep_id: bool) -> Property {
        let mut cloned = self.clone();
        if !keep_id {
            cloned.id = Uuid::new_v4();
        }
        cloned
    }
}

impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.definition == other.definition
            && self.dependency == other.dependency
            && self.dependency_value == other.dependency_value
            && self.unit == other.unit
            && self.uncertainty == other.uncertainty
            && self.reference == other.reference
            && self.mapping == other.mapping
            && self.val_cardinality == other.val_cardinality
            && self.dtype == other.dtype
            && self.values == other.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::TypedPayload;

    #[test]
    fn test_empty_values_rejected() {
        assert!(Property::with_values("p", Vec::new()).is_err());
    }

    #[test]
    fn test_last_value_kept() {
        let mut p = Property::new("p", Value::new(TypedPayload::Int(1)));
        match p.remove_value(0) {
            Err(StructuralError::LastValue { property }) => assert_eq!(property, "p"),
            other => panic!("expected LastValue error, got {:?}", other),
        }
        p.append_value(Value::new(TypedPayload::Int(2)));
        assert!(p.remove_value(0).is_ok());
        assert_eq!(p.values().len(), 1);
    }

    #[test]
    fn test_set_dtype_all_or_nothing() {
        let mut p = Property::with_values(
            "p",
            vec![
                Value::new(TypedPayload::Str("1".to_string())),
                Value::new(TypedPayload::Str("nope".to_string())),
            ],
        )
        .unwrap();
        assert!(p.set_dtype(Dtype::Int).is_err());
        // nothing changed
        assert_eq!(p.dtype(), Dtype::String);
        assert_eq!(
            p.values()[0].payload(),
            &TypedPayload::Str("1".to_string())
        );

        let mut q = Property::with_values(
            "q",
            vec![
                Value::new(TypedPayload::Str("1".to_string())),
                Value::new(TypedPayload::Str("2".to_string())),
            ],
        )
        .unwrap();
        assert!(q.set_dtype(Dtype::Int).is_ok());
        assert_eq!(q.dtype(), Dtype::Int);
        assert_eq!(q.values()[1].payload(), &TypedPayload::Int(2));
    }

    #[test]
    fn test_clone_entity_ids() {
        let p = Property::new("p", Value::new(TypedPayload::Int(1)));
        let fresh = p.clone_entity(false);
        let kept = p.clone_entity(true);
        assert_ne!(fresh.id(), p.id());
        assert_eq!(kept.id(), p.id());
        // content equality ignores the id either way
        assert_eq!(fresh, p);
        assert_eq!(kept, p);
    }

    #[test]
    fn test_cardinality_accepts() {
        let bound = Cardinality::new(Some(2), None);
        assert!(!bound.accepts(1));
        assert!(bound.accepts(2));
        assert!(bound.accepts(30));

        let closed = Cardinality::new(Some(1), Some(3));
        assert!(!closed.accepts(0));
        assert!(closed.accepts(3));
        assert!(!closed.accepts(4));
    }
}
