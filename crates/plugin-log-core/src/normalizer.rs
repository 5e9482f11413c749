//! Normalizer — turns a [`Payload`] graph into JSON that always serializes.
//!
//! Rules, applied depth-first:
//!
//! - errors become `{name, message, stack?, cause?}` with the cause normalized
//! - null, booleans, text and finite numbers pass through
//! - non-finite floats become `null`
//! - big integers, symbols and callables become text
//! - lists and maps are expanded unless already visited in this call, in
//!   which case they become [`CIRCULAR_MARKER`]
//! - opaque values are already text
//! - lists, maps and errors nested more than [`MAX_DEPTH`] levels down become
//!   [`MAX_DEPTH_MARKER`]
//!
//! The visited-set belongs to one [`Normalizer`]; [`normalize`] builds a fresh
//! one per call, so a node shared between two log calls is expanded both times.

use std::collections::HashSet;

use serde_json::{Map, Number, Value};

use crate::payload::{ErrorValue, Payload};

/// Emitted in place of a list or map that was already visited.
pub const CIRCULAR_MARKER: &str = "[Circular]";

/// Emitted in place of a list, map or error nested deeper than [`MAX_DEPTH`].
pub const MAX_DEPTH_MARKER: &str = "[MaxDepth]";

/// Container levels expanded before the walk stops. Kept below serde_json's
/// parser recursion limit so a written line reads back with the same crate.
pub const MAX_DEPTH: usize = 64;

/// Normalize `value` with a fresh visited-set.
pub fn normalize(value: &Payload) -> Value {
    Normalizer::new().normalize(value)
}

/// Visited-set plus the recursive walk.
///
/// Reuse one instance when several values belong to the same document (the
/// fields of one snapshot) and cycles between them should be caught.
#[derive(Debug, Default)]
pub struct Normalizer {
    visited: HashSet<usize>,
    depth: usize,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize(&mut self, value: &Payload) -> Value {
        match value {
            Payload::Error(err) => self.nested(|this| this.error(err)),
            Payload::Null => Value::Null,
            Payload::Bool(b) => Value::Bool(*b),
            Payload::Number(n) => Value::Number(n.clone()),
            Payload::Float(x) => Number::from_f64(*x).map_or(Value::Null, Value::Number),
            Payload::Text(s) => Value::String(s.clone()),
            Payload::BigInt(n) => Value::String(n.to_string()),
            Payload::Symbol(description) => {
                Value::String(format!("Symbol({})", description.as_deref().unwrap_or("")))
            }
            Payload::Callable(name) if name.is_empty() => {
                Value::String("[Function (anonymous)]".to_string())
            }
            Payload::Callable(name) => Value::String(format!("[Function: {name}]")),
            Payload::List(list) => self.nested(|this| {
                if !this.visited.insert(list.identity()) {
                    return Value::String(CIRCULAR_MARKER.to_string());
                }
                Value::Array(list.items().iter().map(|item| this.normalize(item)).collect())
            }),
            Payload::Map(map) => self.nested(|this| {
                if !this.visited.insert(map.identity()) {
                    return Value::String(CIRCULAR_MARKER.to_string());
                }
                let out: Map<String, Value> = map
                    .entries()
                    .iter()
                    .map(|(key, item)| (key.clone(), this.normalize(item)))
                    .collect();
                Value::Object(out)
            }),
            Payload::Opaque(s) => Value::String(s.clone()),
        }
    }

    /// Run `expand` one level further down, or emit the depth marker.
    fn nested(&mut self, expand: impl FnOnce(&mut Self) -> Value) -> Value {
        if self.depth >= MAX_DEPTH {
            return Value::String(MAX_DEPTH_MARKER.to_string());
        }
        self.depth += 1;
        let out = expand(self);
        self.depth -= 1;
        out
    }

    fn error(&mut self, err: &ErrorValue) -> Value {
        let mut out = Map::new();
        out.insert("name".to_string(), Value::String(err.name.clone()));
        out.insert("message".to_string(), Value::String(err.message.clone()));
        if let Some(stack) = &err.stack {
            out.insert("stack".to_string(), Value::String(stack.clone()));
        }
        if let Some(cause) = &err.cause {
            out.insert("cause".to_string(), self.normalize(cause));
        }
        Value::Object(out)
    }
}
