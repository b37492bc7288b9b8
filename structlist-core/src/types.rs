//! Field type descriptors supplied by the owning record

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Declared element type of a list field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// `bool` elements
    Bool,
    /// 64-bit signed integers
    Int,
    /// Doubles; integers widen
    Float,
    /// Strings
    Str,
    /// Members of a named enum, given by variant name
    Enum(EnumMeta),
    /// Nested lists with a declared element type
    List(Box<FieldType>),
    /// Any dynamic value, stored as-is
    Object,
}

/// Metadata for an enum-typed field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMeta {
    /// Enum type name
    pub name: String,

    /// Variant names in declaration order
    pub variants: Vec<String>,
}

/// A resolved enum member
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    /// Position of the variant in [`EnumMeta::variants`]
    pub ordinal: usize,

    /// Variant name
    pub name: String,
}

impl EnumMeta {
    /// Describe an enum by name and variants
    pub fn new<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }

    /// Look up a variant by name
    pub fn variant(&self, name: &str) -> Option<EnumValue> {
        self.variants
            .iter()
            .position(|v| v == name)
            .map(|ordinal| EnumValue {
                ordinal,
                name: self.variants[ordinal].clone(),
            })
    }
}

impl FieldType {
    /// Nested list of `inner`
    pub fn list_of(inner: FieldType) -> Self {
        FieldType::List(Box::new(inner))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Bool => write!(f, "bool"),
            FieldType::Int => write!(f, "int"),
            FieldType::Float => write!(f, "float"),
            FieldType::Str => write!(f, "str"),
            FieldType::Enum(meta) => write!(f, "{}", meta.name),
            FieldType::List(inner) => write!(f, "List[{}]", inner),
            FieldType::Object => write!(f, "object"),
        }
    }
}
