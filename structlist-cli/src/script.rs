//! JSON operation scripts

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use structlist_core::dispatch::{self, Subscript};
use structlist_core::{Sequence, Value};

/// One operation applied to the list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// `list.method(*args, **kwargs)`
    Call {
        /// Method name
        method: String,
        /// Positional arguments
        #[serde(default)]
        args: Vec<Value>,
        /// Keyword arguments
        #[serde(default)]
        kwargs: BTreeMap<String, Value>,
    },
    /// `list[key] = value`
    SetItem {
        /// Index or slice
        key: Subscript,
        /// New element, or iterable for a slice
        value: Value,
    },
    /// `del list[key]`
    DelItem {
        /// Index or slice
        key: Subscript,
    },
    /// `list += value`
    Iadd {
        /// Iterable operand
        value: Value,
    },
    /// `list *= value`
    Imul {
        /// Repeat count
        value: Value,
    },
}

/// A script: optional initial elements and the steps to replay
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Elements the list starts with
    #[serde(default)]
    pub initial: Vec<Value>,
    /// Operations in order
    pub steps: Vec<Step>,
}

fn render_key(key: &Subscript) -> String {
    match key {
        Subscript::Index(i) => i.to_string(),
        Subscript::Slice(spec) => {
            let part = |v: Option<i64>| v.map(|x| x.to_string()).unwrap_or_default();
            match spec.step {
                Some(step) => format!("{}:{}:{}", part(spec.start), part(spec.stop), step),
                None => format!("{}:{}", part(spec.start), part(spec.stop)),
            }
        }
    }
}

impl Step {
    /// Python-like rendering, for reports
    pub fn describe(&self) -> String {
        match self {
            Step::Call {
                method,
                args,
                kwargs,
            } => {
                let mut parts: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                parts.extend(kwargs.iter().map(|(k, v)| format!("{}={}", k, v)));
                format!("{}({})", method, parts.join(", "))
            }
            Step::SetItem { key, value } => format!("[{}] = {}", render_key(key), value),
            Step::DelItem { key } => format!("del [{}]", render_key(key)),
            Step::Iadd { value } => format!("+= {}", value),
            Step::Imul { value } => format!("*= {}", value),
        }
    }

    /// Apply to `list`, returning what the operation returns
    pub fn apply(&self, list: &mut dyn Sequence) -> structlist_core::Result<Value> {
        match self {
            Step::Call {
                method,
                args,
                kwargs,
            } => {
                let kwargs: Vec<(String, Value)> =
                    kwargs.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
                dispatch::call_method(list, method, args, &kwargs)
            }
            Step::SetItem { key, value } => {
                dispatch::assign_subscript(list, key, Some(value.clone())).map(|_| Value::None)
            }
            Step::DelItem { key } => dispatch::assign_subscript(list, key, None).map(|_| Value::None),
            Step::Iadd { value } => dispatch::inplace_concat(list, value).map(|_| Value::None),
            Step::Imul { value } => dispatch::inplace_repeat(list, value).map(|_| Value::None),
        }
    }
}

/// Parse a script from JSON text
pub fn parse(text: &str) -> Result<Script> {
    serde_json::from_str(text).with_context(|| "Failed to parse script JSON")
}

/// Load a script from a file, or stdin when `input` is `-`
pub fn load(input: &str) -> Result<Script> {
    let text = if input == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(input)
            .with_context(|| format!("Failed to read script file: {}", input))?
    };
    parse(&text)
}
