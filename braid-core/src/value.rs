//! Displayable values and the signal variant.
//!
//! `Value` is the one type that flows through props and children. It is a
//! plain displayable tree (nulls, booleans, numbers, text, lists, maps,
//! nested elements) with a single reactive escape hatch: [`Value::Signal`]
//! wraps a [`Handle`] to a live cell, and can sit anywhere a displayable
//! value can. Consumers discriminate explicitly; there is no structural
//! sneaking of capabilities through a narrower type.
//!
//! # Sharing
//!
//! Composite variants (`Text`, `List`, `Map`, `Element`) are `Arc`-shared.
//! Substitution returns the original allocation untouched when nothing
//! inside it changed, and callers can observe that with `Arc::ptr_eq`.
//! A `Value` is an immutable tree: once built it cannot be mutated, which
//! also means cyclic values cannot be constructed.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::bridge::Handle;
use crate::render::Element;

/// Property map for an element. Insertion order is iteration order, which
/// fixes the encounter order of the structural scanner.
pub type Props = IndexMap<String, Value>;

/// A displayable value, possibly holding live signals.
#[derive(Clone)]
pub enum Value {
    /// Absent value. Displays as the empty string.
    Null,

    /// Boolean.
    Bool(bool),

    /// Integer.
    Int(i64),

    /// Floating-point number.
    Float(f64),

    /// Text.
    Text(Arc<str>),

    /// Ordered sequence of values.
    List(Arc<Vec<Value>>),

    /// Keyed structure of values.
    Map(Arc<IndexMap<String, Value>>),

    /// A nested element. Opaque to the scanner and to substitution.
    Element(Arc<Element>),

    /// A live signal handle embedded where a displayable value is expected.
    Signal(Handle),
}

impl Value {
    /// Build a list value.
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Arc::new(items))
    }

    /// Build a map value.
    pub fn map(entries: IndexMap<String, Value>) -> Self {
        Value::Map(Arc::new(entries))
    }

    /// Build a text value.
    pub fn text(text: impl Into<Arc<str>>) -> Self {
        Value::Text(text.into())
    }

    /// Wrap a nested element.
    pub fn element(element: Element) -> Self {
        Value::Element(Arc::new(element))
    }

    /// Whether this value is a signal handle.
    ///
    /// Total over every value shape; never panics.
    pub fn is_signal(&self) -> bool {
        matches!(self, Value::Signal(_))
    }

    /// The embedded handle, if this value is a signal.
    pub fn as_signal(&self) -> Option<&Handle> {
        match self {
            Value::Signal(handle) => Some(handle),
            _ => None,
        }
    }

    /// The nested element, if this value is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Value::Element(element) => Some(element),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    /// Renders the value as text content. Lists concatenate their items;
    /// maps and unsubstituted signals render as opaque markers.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(t) => write!(f, "{t}"),
            Value::List(items) => {
                for item in items.iter() {
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Value::Map(_) => write!(f, "[object]"),
            Value::Element(_) => write!(f, "[element]"),
            Value::Signal(_) => write!(f, "[signal]"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(i) => write!(f, "Int({i})"),
            Value::Float(x) => write!(f, "Float({x})"),
            Value::Text(t) => write!(f, "Text({t:?})"),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Map(map) => f.debug_tuple("Map").field(map).finish(),
            Value::Element(el) => f.debug_tuple("Element").field(el).finish(),
            Value::Signal(handle) => f.debug_tuple("Signal").field(handle).finish(),
        }
    }
}

impl PartialEq for Value {
    /// Structural equality. Signals compare by handle identity, nested
    /// elements by allocation identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::List(a), Value::List(b)) => Arc::ptr_eq(a, b) || a == b,
            (Value::Map(a), Value::Map(b)) => Arc::ptr_eq(a, b) || a == b,
            (Value::Element(a), Value::Element(b)) => Arc::ptr_eq(a, b),
            (Value::Signal(a), Value::Signal(b)) => a.same(b),
            _ => false,
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
        Value::Text(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(Arc::from(s.as_str()))
    }
}

impl From<Handle> for Value {
    fn from(handle: Handle) -> Self {
        Value::Signal(handle)
    }
}
