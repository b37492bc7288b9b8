//! Name-based invocation of list operations
//!
//! Callers that only hold dynamic values (scripts, bindings, the replay
//! CLI) reach the list through this module. Every entry point validates
//! arity, keywords and argument types before touching the list, so a usage
//! error never leaves a partial mutation behind.

use crate::constants::LIST_TYPE_NAME;
use crate::engine::{DynamicList, SortOptions};
use crate::error::ListError;
use crate::sequence::Sequence;
use crate::slice::SliceSpec;
use crate::value::Value;
use crate::Result;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

#[cfg(feature = "logging")]
use tracing::debug;

/// Keyword arguments, in call order
pub type Kwargs = [(String, Value)];

/// The key of a subscript expression: `list[i]` or `list[a:b:c]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Subscript {
    /// Single position, negative counts from the end
    Index(i64),
    /// Slice with optional bounds and step
    Slice(SliceSpec),
}

impl Subscript {
    /// Interpret a dynamic value as a subscript key
    pub fn from_value(key: &Value) -> Result<Self> {
        match key {
            Value::Int(i) => Ok(Subscript::Index(*i)),
            other => Err(ListError::usage(format!(
                "list indices must be integers or slices, not {}",
                other.type_name()
            ))),
        }
    }
}

fn exactly_one<'a>(method: &str, args: &'a [Value]) -> Result<&'a Value> {
    match args {
        [single] => Ok(single),
        _ => Err(ListError::usage(format!(
            "{}.{}() takes exactly one argument ({} given)",
            LIST_TYPE_NAME,
            method,
            args.len()
        ))),
    }
}

fn no_arguments(method: &str, args: &[Value]) -> Result<()> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(ListError::usage(format!(
            "{}.{}() takes no arguments ({} given)",
            LIST_TYPE_NAME,
            method,
            args.len()
        )))
    }
}

fn integer_arg(value: &Value) -> Result<i64> {
    value.as_int().ok_or_else(|| {
        ListError::usage(format!(
            "'{}' object cannot be interpreted as an integer",
            value.type_name()
        ))
    })
}

fn optional_bound(value: Option<&Value>) -> Result<Option<i64>> {
    match value {
        None | Some(Value::None) => Ok(None),
        Some(Value::Int(i)) => Ok(Some(*i)),
        Some(_) => Err(ListError::usage(
            "slice indices must be integers or have an __index__ method",
        )),
    }
}

fn sort_options(args: &[Value], kwargs: &Kwargs) -> Result<bool> {
    if !args.is_empty() {
        return Err(ListError::usage("sort() takes no positional arguments"));
    }

    let mut reverse = false;
    for (name, value) in kwargs {
        match (name.as_str(), value) {
            ("key", Value::None) => {}
            ("key", other) => {
                return Err(ListError::usage(format!(
                    "'{}' object is not callable",
                    other.type_name()
                )))
            }
            ("reverse", Value::Bool(b)) => reverse = *b,
            ("reverse", Value::Int(i)) => reverse = *i != 0,
            ("reverse", other) => {
                return Err(ListError::usage(format!(
                    "'{}' object cannot be interpreted as an integer",
                    other.type_name()
                )))
            }
            (unknown, _) => {
                return Err(ListError::usage(format!(
                    "'{}' is an invalid keyword argument for sort()",
                    unknown
                )))
            }
        }
    }
    Ok(reverse)
}

/// Invoke the list method `name` with positional `args` and keyword `kwargs`
///
/// Returns what the method returns (`None` for mutators).
pub fn call_method<L: Sequence + ?Sized>(
    list: &mut L,
    name: &str,
    args: &[Value],
    kwargs: &Kwargs,
) -> Result<Value> {
    #[cfg(feature = "logging")]
    debug!(
        "Dispatching {}.{}() with {} positional and {} keyword arguments",
        LIST_TYPE_NAME,
        name,
        args.len(),
        kwargs.len()
    );

    if name != "sort" && !kwargs.is_empty() {
        return Err(ListError::usage(format!(
            "{}.{}() takes no keyword arguments",
            LIST_TYPE_NAME, name
        )));
    }

    match name {
        "append" => {
            let value = exactly_one(name, args)?;
            list.append(value.clone())?;
            Ok(Value::None)
        }
        "insert" => {
            let [index, value] = args else {
                return Err(ListError::usage(format!(
                    "insert expected 2 arguments, got {}",
                    args.len()
                )));
            };
            list.insert(integer_arg(index)?, value.clone())?;
            Ok(Value::None)
        }
        "pop" => {
            let index = match args {
                [] => None,
                [index] => Some(integer_arg(index)?),
                _ => {
                    return Err(ListError::usage(format!(
                        "pop expected at most 1 argument, got {}",
                        args.len()
                    )))
                }
            };
            list.pop(index)
        }
        "remove" => {
            let value = exactly_one(name, args)?;
            list.remove(value)?;
            Ok(Value::None)
        }
        "reverse" => {
            no_arguments(name, args)?;
            list.reverse();
            Ok(Value::None)
        }
        "clear" => {
            no_arguments(name, args)?;
            list.clear();
            Ok(Value::None)
        }
        "copy" => {
            no_arguments(name, args)?;
            Ok(Value::List(list.copy().into_vec()))
        }
        "sort" => {
            let reverse = sort_options(args, kwargs)?;
            list.sort(&SortOptions::new().reverse(reverse))?;
            Ok(Value::None)
        }
        "extend" => {
            let items = exactly_one(name, args)?.iter_items()?;
            list.extend(items)?;
            Ok(Value::None)
        }
        "index" => {
            if args.is_empty() || args.len() > 3 {
                let bound = if args.is_empty() { "at least 1 argument" } else { "at most 3 arguments" };
                return Err(ListError::usage(format!(
                    "index expected {}, got {}",
                    bound,
                    args.len()
                )));
            }
            let start = optional_bound(args.get(1))?;
            let stop = optional_bound(args.get(2))?;
            let at = list.index_of(&args[0], start, stop)?;
            Ok(Value::Int(at as i64))
        }
        "count" => {
            let value = exactly_one(name, args)?;
            Ok(Value::Int(list.count(value) as i64))
        }
        unknown => Err(ListError::usage(format!(
            "'{}' object has no attribute '{}'",
            LIST_TYPE_NAME, unknown
        ))),
    }
}

/// `list[key]`
pub fn get_subscript<L: Sequence + ?Sized>(list: &L, key: &Subscript) -> Result<Value> {
    match key {
        Subscript::Index(index) => list.get(*index).cloned(),
        Subscript::Slice(spec) => Ok(Value::List(list.slice(spec)?.into_vec())),
    }
}

/// `list[key] = value`, or `del list[key]` when `value` is `None`
pub fn assign_subscript<L: Sequence + ?Sized>(
    list: &mut L,
    key: &Subscript,
    value: Option<Value>,
) -> Result<()> {
    match (key, value) {
        (Subscript::Index(index), Some(value)) => list.set_item(*index, value),
        (Subscript::Index(index), None) => list.del_item(*index),
        (Subscript::Slice(spec), Some(value)) => {
            let items = value
                .iter_items()
                .map_err(|_| ListError::usage("can only assign an iterable"))?;
            list.set_slice(spec, items)
        }
        (Subscript::Slice(spec), None) => list.del_slice(spec),
    }
}

fn repeat_count(operand: &Value) -> Result<i64> {
    operand.as_int().ok_or_else(|| {
        ListError::usage(format!(
            "can't multiply sequence by non-int of type '{}'",
            operand.type_name()
        ))
    })
}

/// `list += operand`; any iterable operand is accepted
pub fn inplace_concat<L: Sequence + ?Sized>(list: &mut L, operand: &Value) -> Result<()> {
    let items = operand.iter_items()?;
    list.extend(items)
}

/// `list *= operand`
pub fn inplace_repeat<L: Sequence + ?Sized>(list: &mut L, operand: &Value) -> Result<()> {
    let n = repeat_count(operand)?;
    list.repeat_in_place(n)
}

/// `list + operand`; the operand must itself be a list
pub fn concat<L: Sequence + ?Sized>(list: &L, operand: &Value) -> Result<DynamicList> {
    match operand {
        Value::List(items) => list.concat(items),
        other => Err(ListError::usage(format!(
            "can only concatenate list (not \"{}\") to list",
            other.type_name()
        ))),
    }
}

/// `list * operand`
pub fn repeat<L: Sequence + ?Sized>(list: &L, operand: &Value) -> Result<DynamicList> {
    let n = repeat_count(operand)?;
    list.repeat(n)
}

/// Collect `(name, value)` pairs into owned keyword arguments
pub fn kwargs<'a>(pairs: impl IntoIterator<Item = (&'a str, Value)>) -> Vec<(String, Value)> {
    pairs
        .into_iter()
        .map(|(name, value)| (String::from(name), value))
        .collect()
}
