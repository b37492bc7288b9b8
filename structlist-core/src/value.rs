//! Dynamic element values held by the front view

use crate::error::ListError;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;
use serde::{Deserialize, Serialize};

/// A type-erased list element
///
/// Serializes untagged, so `null`, `true`, `5`, `2.5`, `"text"` and
/// `[...]` map directly onto the variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// The absent value
    None,
    /// Boolean
    Bool(bool),
    /// Signed 64-bit integer
    Int(i64),
    /// Double precision float
    Float(f64),
    /// UTF-8 string
    Str(String),
    /// Nested list of values
    List(Vec<Value>),
}

impl Value {
    /// Name of the dynamic type, as used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
        }
    }

    /// Expand an iterable value into its items
    ///
    /// Lists yield their elements and strings yield one-character strings;
    /// every other value is not iterable.
    pub fn iter_items(&self) -> Result<Vec<Value>, ListError> {
        match self {
            Value::List(items) => Ok(items.clone()),
            Value::Str(s) => Ok(s.chars().map(|c| Value::Str(c.to_string())).collect()),
            other => Err(ListError::NotIterable(other.type_name())),
        }
    }

    /// Integer payload, if this is an `Int`
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Structural identity: same variant and payload, with `NaN` identical to itself
    pub fn is_identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.is_identical(y))
            }
            (Value::Int(_), Value::Float(_)) | (Value::Float(_), Value::Int(_)) => false,
            (a, b) => a == b,
        }
    }

    /// Order two values for sorting
    ///
    /// Numbers compare by exact numeric value and agree with `==`, so `0`,
    /// `0.0` and `-0.0` are equal. `NaN` sorts after every number and equal
    /// to another `NaN`. Strings and lists compare lexicographically, bools
    /// `false < true`. Any other pairing is an error naming both types.
    pub fn try_cmp(&self, other: &Value) -> Result<Ordering, ListError> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => Ok(cmp_floats(*a, *b)),
            (Value::Int(a), Value::Float(b)) => Ok(cmp_int_float(*a, *b)),
            (Value::Float(a), Value::Int(b)) => Ok(cmp_int_float(*b, *a).reverse()),
            (Value::Bool(a), Value::Bool(b)) => Ok(a.cmp(b)),
            (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
            (Value::List(a), Value::List(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    match x.try_cmp(y)? {
                        Ordering::Equal => continue,
                        unequal => return Ok(unequal),
                    }
                }
                Ok(a.len().cmp(&b.len()))
            }
            (left, right) => Err(ListError::Incomparable {
                left: left.type_name(),
                right: right.type_name(),
            }),
        }
    }
}

/// `2^63`, the first float above every `i64`
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn cmp_floats(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Compare an int against a float without rounding the int
fn cmp_int_float(i: i64, x: f64) -> Ordering {
    if x.is_nan() || x >= I64_BOUND {
        return Ordering::Less;
    }
    if x < -I64_BOUND {
        return Ordering::Greater;
    }
    // In range, so the cast truncates toward zero and `whole` is exact
    let whole = x as i64;
    match i.cmp(&whole) {
        Ordering::Equal => {
            let fraction = x - whole as f64;
            if fraction > 0.0 {
                Ordering::Less
            } else if fraction < 0.0 {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        }
        unequal => unequal,
    }
}

/// Python `repr` layout: exponent form outside `[1e-4, 1e16)`, `.0` on whole numbers
fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_nan() {
        return f.write_str("nan");
    }
    if x.is_infinite() {
        return f.write_str(if x > 0.0 { "inf" } else { "-inf" });
    }
    let magnitude = if x < 0.0 { -x } else { x };
    if magnitude >= 1e16 || (magnitude != 0.0 && magnitude < 1e-4) {
        let text = alloc::format!("{:e}", x);
        return match text.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                write!(f, "{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => f.write_str(&text),
        };
    }
    // Below 1e16 the cast cannot saturate
    if x == (x as i64) as f64 {
        write!(f, "{:.1}", x)
    } else {
        write!(f, "{}", x)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                cmp_int_float(*a, *b) == Ordering::Equal
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write_float(f, *x),
            Value::Str(s) => write!(f, "'{}'", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}
