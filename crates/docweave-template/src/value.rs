/*
 * value.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Dynamic values for template data contexts.
//!
//! [`Value`] is the tagged-variant type every expression evaluates against
//! and into. Caller data enters through the `From` conversions,
//! [`Value::from_serialize`] (any `serde::Serialize` record becomes a map),
//! or directly from `serde_json::Value`. Injector capabilities travel inside
//! contexts as [`Value::Injector`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::error::RenderResult;
use crate::injector::Injector;

static NULL: Value = Value::Null;

/// A dynamically typed template value.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(HashMap<String, Value>),
    /// One level of indirection around another value. Present so data can
    /// distinguish "absent" from "present but zero": an occupied optional is
    /// truthy regardless of what it wraps.
    Optional(Option<Box<Value>>),
    /// A caller-supplied injector capability (see `{{ inject .value }}`).
    Injector(Arc<dyn Injector>),
}

impl Value {
    /// The truthiness table used by `{{if}}` blocks: null and empty
    /// optionals are false, booleans are themselves, strings are true when
    /// non-empty, numbers when non-zero, and everything else is true by
    /// presence alone.
    #[allow(clippy::float_cmp_const)]
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Uint(u) => *u != 0,
            Value::Float(x) => *x != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::Optional(inner) => inner.is_some(),
            Value::List(_) | Value::Map(_) | Value::Injector(_) => true,
        }
    }

    /// Removes one level of indirection: an occupied optional yields its
    /// contents, an empty one yields null, anything else yields itself.
    pub fn dereference(&self) -> &Value {
        match self {
            Value::Optional(Some(inner)) => inner,
            Value::Optional(None) => &NULL,
            other => other,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Key lookup on a mapping value; `None` for any other variant.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// The string form used by interpolation: strings verbatim, numbers and
    /// booleans via their display forms, lists joined with `", "`, null,
    /// mappings, and injectors as the empty string.
    pub fn render(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Uint(u) => u.to_string(),
            Value::Float(x) => x.to_string(),
            Value::Str(s) => s.clone(),
            Value::List(items) => items
                .iter()
                .map(Value::render)
                .collect::<Vec<_>>()
                .join(", "),
            Value::Map(_) => String::new(),
            Value::Optional(inner) => match inner {
                Some(v) => v.render(),
                None => String::new(),
            },
            Value::Injector(_) => String::new(),
        }
    }

    /// Wraps an injector capability so it can live inside a data context.
    pub fn injector(injector: impl Injector + 'static) -> Value {
        Value::Injector(Arc::new(injector))
    }

    /// Converts any serializable record into a value; structs become maps,
    /// which is how record field lookup is implemented.
    pub fn from_serialize<T: Serialize>(value: &T) -> RenderResult<Value> {
        Ok(Value::from(serde_json::to_value(value)?))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Value::Uint(u) => f.debug_tuple("Uint").field(u).finish(),
            Value::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Map(map) => f.debug_tuple("Map").field(map).finish(),
            Value::Optional(inner) => f.debug_tuple("Optional").field(inner).finish(),
            Value::Injector(i) => f.debug_tuple("Injector").field(&i.name()).finish(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Uint(a), Value::Uint(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Optional(a), Value::Optional(b)) => a == b,
            // Injectors compare by instance identity.
            (Value::Injector(a), Value::Injector(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::Uint(u)
    }
}

impl From<usize> for Value {
    fn from(u: usize) -> Self {
        Value::Uint(u as u64)
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

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<HashMap<String, Value>> for Value {
    fn from(map: HashMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        Value::Optional(opt.map(|v| Box::new(v.into())))
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::Uint(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or_default())
                }
            }
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}
