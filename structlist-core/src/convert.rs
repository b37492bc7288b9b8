//! Element conversion from dynamic values to typed storage
//!
//! Each storage type declares which field types it can back and how a
//! [`Value`] is coerced into it. The synchronized list only ever calls
//! [`ElementStorage::from_value`]; it never inspects the rules.

use crate::error::ListError;
use crate::types::{EnumValue, FieldType};
use crate::value::Value;
use crate::Result;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::Debug;

/// A typed element of a backing store
pub trait ElementStorage: Clone + PartialEq + Debug {
    /// Name used in storage mismatch errors
    const STORAGE_NAME: &'static str;

    /// True if this storage can hold elements of `field_type`
    fn supports(field_type: &FieldType) -> bool;

    /// Coerce a dynamic value to the declared type
    fn from_value(value: &Value, field_type: &FieldType) -> Result<Self>;

    /// The dynamic form of a stored element
    fn to_value(&self) -> Value;

    /// Equality used when checking the mirror against the front view
    fn same(&self, other: &Self) -> bool {
        self == other
    }
}

fn mismatch(value: &Value, field_type: &FieldType) -> ListError {
    ListError::Conversion {
        expected: field_type.to_string(),
        found: describe(value),
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Str(s) => format!("str '{}'", s),
        Value::List(items) => format!("list of {} items", items.len()),
        other => format!("{} {}", other.type_name(), other),
    }
}

impl ElementStorage for bool {
    const STORAGE_NAME: &'static str = "bool";

    fn supports(field_type: &FieldType) -> bool {
        matches!(field_type, FieldType::Bool)
    }

    fn from_value(value: &Value, field_type: &FieldType) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(*b),
            other => Err(mismatch(other, field_type)),
        }
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl ElementStorage for i64 {
    const STORAGE_NAME: &'static str = "i64";

    fn supports(field_type: &FieldType) -> bool {
        matches!(field_type, FieldType::Int)
    }

    fn from_value(value: &Value, field_type: &FieldType) -> Result<Self> {
        match value {
            Value::Int(i) => Ok(*i),
            other => Err(mismatch(other, field_type)),
        }
    }

    fn to_value(&self) -> Value {
        Value::Int(*self)
    }
}

impl ElementStorage for f64 {
    const STORAGE_NAME: &'static str = "f64";

    fn supports(field_type: &FieldType) -> bool {
        matches!(field_type, FieldType::Float)
    }

    fn from_value(value: &Value, field_type: &FieldType) -> Result<Self> {
        match value {
            Value::Float(x) => Ok(*x),
            Value::Int(i) => Ok(*i as f64),
            other => Err(mismatch(other, field_type)),
        }
    }

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn same(&self, other: &Self) -> bool {
        self == other || (self.is_nan() && other.is_nan())
    }
}

impl ElementStorage for String {
    const STORAGE_NAME: &'static str = "String";

    fn supports(field_type: &FieldType) -> bool {
        matches!(field_type, FieldType::Str)
    }

    fn from_value(value: &Value, field_type: &FieldType) -> Result<Self> {
        match value {
            Value::Str(s) => Ok(s.clone()),
            other => Err(mismatch(other, field_type)),
        }
    }

    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl ElementStorage for EnumValue {
    const STORAGE_NAME: &'static str = "EnumValue";

    fn supports(field_type: &FieldType) -> bool {
        matches!(field_type, FieldType::Enum(_))
    }

    fn from_value(value: &Value, field_type: &FieldType) -> Result<Self> {
        match (value, field_type) {
            (Value::Str(name), FieldType::Enum(meta)) => {
                meta.variant(name).ok_or_else(|| mismatch(value, field_type))
            }
            (other, _) => Err(mismatch(other, field_type)),
        }
    }

    fn to_value(&self) -> Value {
        Value::Str(self.name.clone())
    }
}

impl ElementStorage for Value {
    const STORAGE_NAME: &'static str = "Value";

    fn supports(field_type: &FieldType) -> bool {
        matches!(field_type, FieldType::Object)
    }

    fn from_value(value: &Value, _field_type: &FieldType) -> Result<Self> {
        Ok(value.clone())
    }

    fn to_value(&self) -> Value {
        self.clone()
    }

    fn same(&self, other: &Self) -> bool {
        self.is_identical(other)
    }
}

impl<T: ElementStorage> ElementStorage for Vec<T> {
    const STORAGE_NAME: &'static str = "Vec";

    fn supports(field_type: &FieldType) -> bool {
        match field_type {
            FieldType::List(inner) => T::supports(inner),
            _ => false,
        }
    }

    fn from_value(value: &Value, field_type: &FieldType) -> Result<Self> {
        match (value, field_type) {
            (Value::List(items), FieldType::List(inner)) => items
                .iter()
                .map(|item| T::from_value(item, inner))
                .collect(),
            (other, _) => Err(mismatch(other, field_type)),
        }
    }

    fn to_value(&self) -> Value {
        Value::List(self.iter().map(ElementStorage::to_value).collect())
    }

    fn same(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.same(b))
    }
}

/// Convert every value, failing on the first one that does not fit
///
/// Nothing is returned unless all conversions succeed, so callers can
/// commit the result wholesale.
pub fn convert_all<S: ElementStorage>(values: &[Value], field_type: &FieldType) -> Result<Vec<S>> {
    values
        .iter()
        .map(|value| S::from_value(value, field_type))
        .collect()
}
