//! Payload — the dynamic value graph attached to log calls.
//!
//! A log payload can be anything the host has in hand: plain JSON, an error
//! with a cause chain, a big integer, or a structure that refers back to
//! itself. Lists and maps are shared handles ([`ListRef`], [`MapRef`]) so a
//! graph can alias nodes and contain cycles; [`normalize`](crate::normalizer::normalize)
//! turns any of it into plain JSON.
//!
//! `Debug` output is deliberately shallow: printing a cyclic graph must not
//! recurse.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

/// A value of unconstrained shape.
#[derive(Clone, Default)]
pub enum Payload {
    #[default]
    Null,
    Bool(bool),
    /// A number JSON can hold exactly.
    Number(serde_json::Number),
    /// A float that may be NaN or infinite.
    Float(f64),
    Text(String),
    /// An integer outside the range JSON numbers carry exactly.
    BigInt(i128),
    /// A unique token with an optional description.
    Symbol(Option<String>),
    /// Something callable, identified by name.
    Callable(String),
    Error(Rc<ErrorValue>),
    List(ListRef),
    Map(MapRef),
    /// Anything else, already rendered as text.
    Opaque(String),
}

impl Payload {
    /// Short name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Null => "null",
            Payload::Bool(_) => "bool",
            Payload::Number(_) | Payload::Float(_) => "number",
            Payload::Text(_) => "text",
            Payload::BigInt(_) => "bigint",
            Payload::Symbol(_) => "symbol",
            Payload::Callable(_) => "callable",
            Payload::Error(_) => "error",
            Payload::List(_) => "list",
            Payload::Map(_) => "map",
            Payload::Opaque(_) => "opaque",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Payload::Null)
    }

    pub fn opaque(value: impl fmt::Display) -> Self {
        Payload::Opaque(value.to_string())
    }

    pub fn symbol(description: impl Into<String>) -> Self {
        Payload::Symbol(Some(description.into()))
    }

    pub fn callable(name: impl Into<String>) -> Self {
        Payload::Callable(name.into())
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Null => f.write_str("Null"),
            Payload::Bool(b) => write!(f, "Bool({b})"),
            Payload::Number(n) => write!(f, "Number({n})"),
            Payload::Float(x) => write!(f, "Float({x})"),
            Payload::Text(s) => write!(f, "Text({s:?})"),
            Payload::BigInt(n) => write!(f, "BigInt({n})"),
            Payload::Symbol(d) => write!(f, "Symbol({d:?})"),
            Payload::Callable(name) => write!(f, "Callable({name:?})"),
            Payload::Error(e) => write!(f, "Error({}: {:?})", e.name, e.message),
            Payload::List(l) => write!(f, "List(len={})", l.len()),
            Payload::Map(m) => write!(f, "Map(len={})", m.len()),
            Payload::Opaque(s) => write!(f, "Opaque({s:?})"),
        }
    }
}

// ---------------------------------------------------------------------------
// Shared containers
// ---------------------------------------------------------------------------

/// Shared, mutable sequence. Clones share the same storage.
#[derive(Clone, Default)]
pub struct ListRef(Rc<RefCell<Vec<Payload>>>);

impl ListRef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, value: impl Into<Payload>) {
        self.0.borrow_mut().push(value.into());
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn items(&self) -> Ref<'_, Vec<Payload>> {
        self.0.borrow()
    }

    /// Pointer identity of the underlying storage.
    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl<T: Into<Payload>> FromIterator<T> for ListRef {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        ListRef(Rc::new(RefCell::new(iter.into_iter().map(Into::into).collect())))
    }
}

/// Shared, mutable mapping that keeps keys in insertion order.
#[derive(Clone, Default)]
pub struct MapRef(Rc<RefCell<IndexMap<String, Payload>>>);

impl MapRef {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. A replaced key keeps its original position.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Payload>) {
        self.0.borrow_mut().insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<Payload> {
        self.0.borrow().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn entries(&self) -> Ref<'_, IndexMap<String, Payload>> {
        self.0.borrow()
    }

    /// Pointer identity of the underlying storage.
    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl<K: Into<String>, V: Into<Payload>> FromIterator<(K, V)> for MapRef {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let entries = iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        MapRef(Rc::new(RefCell::new(entries)))
    }
}

// Dropping a deeply nested graph must not recurse once per level. The last
// handle to a container moves its children onto a work list instead.

impl Drop for ListRef {
    fn drop(&mut self) {
        if let Some(children) = take_children_of_list(&self.0) {
            dismantle(children);
        }
    }
}

impl Drop for MapRef {
    fn drop(&mut self) {
        if let Some(children) = take_children_of_map(&self.0) {
            dismantle(children);
        }
    }
}

impl Drop for ErrorValue {
    fn drop(&mut self) {
        if let Some(cause) = self.cause.take() {
            dismantle(vec![cause]);
        }
    }
}

fn take_children_of_list(cell: &Rc<RefCell<Vec<Payload>>>) -> Option<Vec<Payload>> {
    if Rc::strong_count(cell) != 1 {
        return None;
    }
    let mut items = cell.try_borrow_mut().ok()?;
    if items.is_empty() {
        return None;
    }
    Some(std::mem::take(&mut *items))
}

fn take_children_of_map(cell: &Rc<RefCell<IndexMap<String, Payload>>>) -> Option<Vec<Payload>> {
    if Rc::strong_count(cell) != 1 {
        return None;
    }
    let mut entries = cell.try_borrow_mut().ok()?;
    if entries.is_empty() {
        return None;
    }
    Some(std::mem::take(&mut *entries).into_values().collect())
}

fn dismantle(mut pending: Vec<Payload>) {
    while let Some(value) = pending.pop() {
        match value {
            Payload::List(list) => pending.extend(take_children_of_list(&list.0).unwrap_or_default()),
            Payload::Map(map) => pending.extend(take_children_of_map(&map.0).unwrap_or_default()),
            Payload::Error(err) => {
                if let Ok(mut err) = Rc::try_unwrap(err) {
                    pending.extend(err.cause.take());
                }
            }
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// An error captured as data.
///
/// Immutable once built, so any cycle in a payload graph has to pass through
/// a [`ListRef`] or [`MapRef`].
#[derive(Clone, Debug)]
pub struct ErrorValue {
    pub name: String,
    pub message: String,
    pub stack: Option<String>,
    pub cause: Option<Payload>,
}

impl ErrorValue {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            stack: None,
            cause: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    pub fn with_cause(mut self, cause: impl Into<Payload>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Capture `err` and its `source()` chain; each source becomes the
    /// `cause` of the one before it.
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut value = ErrorValue::new("Error", err.to_string());
        if let Some(source) = err.source() {
            value.cause = Some(Payload::from(ErrorValue::from_error(source)));
        }
        value
    }

    /// Like [`from_error`](Self::from_error), also recording the backtrace
    /// when one was captured (`RUST_BACKTRACE` / `RUST_LIB_BACKTRACE`).
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let mut value = ErrorValue::from_error(&**err);
        let backtrace = err.backtrace();
        if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
            value.stack = Some(backtrace.to_string());
        }
        value
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Payload::Null,
            Value::Bool(b) => Payload::Bool(b),
            Value::Number(n) => Payload::Number(n),
            Value::String(s) => Payload::Text(s),
            Value::Array(items) => Payload::List(items.into_iter().collect()),
            Value::Object(map) => Payload::Map(map.into_iter().collect()),
        }
    }
}

impl From<&serde_json::Value> for Payload {
    fn from(value: &serde_json::Value) -> Self {
        Payload::from(value.clone())
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Payload::Text(s.to_string())
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Payload::Text(s)
    }
}

impl From<bool> for Payload {
    fn from(b: bool) -> Self {
        Payload::Bool(b)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Payload {
            fn from(n: $t) -> Self {
                Payload::Number(n.into())
            }
        })*
    };
}

impl_from_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<f64> for Payload {
    fn from(x: f64) -> Self {
        Payload::Float(x)
    }
}

impl From<f32> for Payload {
    fn from(x: f32) -> Self {
        Payload::Float(f64::from(x))
    }
}

impl From<i128> for Payload {
    fn from(n: i128) -> Self {
        if let Ok(small) = i64::try_from(n) {
            Payload::Number(small.into())
        } else if let Ok(small) = u64::try_from(n) {
            Payload::Number(small.into())
        } else {
            Payload::BigInt(n)
        }
    }
}

impl From<u128> for Payload {
    fn from(n: u128) -> Self {
        if let Ok(small) = u64::try_from(n) {
            Payload::Number(small.into())
        } else if let Ok(big) = i128::try_from(n) {
            Payload::BigInt(big)
        } else {
            Payload::Opaque(n.to_string())
        }
    }
}

impl<T: Into<Payload>> From<Option<T>> for Payload {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Payload::Null)
    }
}

impl From<Vec<Payload>> for Payload {
    fn from(items: Vec<Payload>) -> Self {
        Payload::List(ListRef(Rc::new(RefCell::new(items))))
    }
}

impl From<ListRef> for Payload {
    fn from(list: ListRef) -> Self {
        Payload::List(list)
    }
}

impl From<MapRef> for Payload {
    fn from(map: MapRef) -> Self {
        Payload::Map(map)
    }
}

impl From<ErrorValue> for Payload {
    fn from(err: ErrorValue) -> Self {
        Payload::Error(Rc::new(err))
    }
}

impl From<Rc<ErrorValue>> for Payload {
    fn from(err: Rc<ErrorValue>) -> Self {
        Payload::Error(err)
    }
}

impl From<&anyhow::Error> for Payload {
    fn from(err: &anyhow::Error) -> Self {
        Payload::from(ErrorValue::from_anyhow(err))
    }
}

impl From<anyhow::Error> for Payload {
    fn from(err: anyhow::Error) -> Self {
        Payload::from(&err)
    }
}
