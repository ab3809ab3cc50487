//! Runtime values for the Loka evaluator.
//!
//! Values follow the host document's scripting model: primitives are copied,
//! arrays and objects are shared by reference (mutations through one handle
//! are visible through every other), and elements are opaque handles owned
//! by the host.
//!
//! # Construction
//!
//! Heap-backed variants are built through factory methods so the sharing
//! strategy stays an implementation detail:
//!
//! ```text
//! let s = Value::string("hello");
//! let items = Value::array(vec![Value::number(1.0)]);
//! let obj = Value::object([("x", Value::number(1.0))]);
//! ```
//!
//! # Thread Safety
//!
//! Values use `Rc` and are not `Send`. The runtime evaluates one context on a
//! single logical thread with cooperative suspension.

mod convert;
mod function;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::host::ElementRef;

pub use convert::{format_number, parse_number, str_to_number};
pub use function::{FunctionValue, Invocation, NativeFn};

/// Shared, mutable array storage.
pub type ArrayRef = Rc<RefCell<Vec<Value>>>;

/// Shared, mutable object storage. Keys keep insertion order.
pub type ObjectRef = Rc<RefCell<IndexMap<String, Value>>>;

/// Runtime value.
#[derive(Clone, Default)]
pub enum Value {
    /// Absence of a binding or property.
    #[default]
    Undefined,
    /// Explicit null.
    Null,
    Bool(bool),
    /// All numbers are IEEE doubles.
    Number(f64),
    Str(Rc<str>),
    Array(ArrayRef),
    Object(ObjectRef),
    /// A single document element.
    Element(ElementRef),
    /// A query result: an ordered, immutable snapshot of elements.
    NodeList(Rc<[ElementRef]>),
    /// Native callable, possibly bound to a receiver.
    Function(FunctionValue),
}

// Factory Methods

impl Value {
    #[inline]
    pub fn number(n: f64) -> Self {
        Value::Number(n)
    }

    #[inline]
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Value::Str(s.into())
    }

    #[inline]
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    /// Create an object from `(key, value)` pairs, keeping their order.
    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        let map: IndexMap<String, Value> = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value))
            .collect();
        Value::Object(Rc::new(RefCell::new(map)))
    }

    #[inline]
    pub fn element(element: ElementRef) -> Self {
        Value::Element(element)
    }

    #[inline]
    pub fn node_list(elements: Vec<ElementRef>) -> Self {
        Value::NodeList(elements.into())
    }

    #[inline]
    pub fn function(function: FunctionValue) -> Self {
        Value::Function(function)
    }
}

// Value Methods

impl Value {
    /// `null` or `undefined`.
    #[inline]
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&ElementRef> {
        match self {
            Value::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionValue> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Whether this is textual for the purposes of `+`.
    pub fn is_textual(&self) -> bool {
        matches!(self, Value::Str(_) | Value::Array(_) | Value::Object(_))
    }

    /// Items of a sequence value (array or node collection).
    pub fn sequence_items(&self) -> Option<Vec<Value>> {
        match self {
            Value::Array(items) => Some(items.borrow().clone()),
            Value::NodeList(nodes) => Some(nodes.iter().cloned().map(Value::Element).collect()),
            _ => None,
        }
    }

    /// Length of a sequence value.
    pub fn sequence_len(&self) -> Option<usize> {
        match self {
            Value::Array(items) => Some(items.borrow().len()),
            Value::NodeList(nodes) => Some(nodes.len()),
            _ => None,
        }
    }

    /// The sole item of a one-element array or node collection.
    pub fn single_item(&self) -> Option<Value> {
        match self {
            Value::Array(items) => {
                let items = items.borrow();
                if items.len() == 1 {
                    items.first().cloned()
                } else {
                    None
                }
            }
            Value::NodeList(nodes) if nodes.len() == 1 => {
                nodes.first().cloned().map(Value::Element)
            }
            _ => None,
        }
    }

    /// Name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Element(_) => "element",
            Value::NodeList(_) => "node list",
            Value::Function(_) => "function",
        }
    }

    /// The primitive `typeof` answer.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Function(_) => "function",
            Value::Null
            | Value::Array(_)
            | Value::Object(_)
            | Value::Element(_)
            | Value::NodeList(_) => "object",
        }
    }

    /// The runtime type tag (`Object.prototype.toString` without brackets).
    pub fn type_tag(&self) -> &'static str {
        match self {
            Value::Undefined => "Undefined",
            Value::Null => "Null",
            Value::Bool(_) => "Boolean",
            Value::Number(_) => "Number",
            Value::Str(_) => "String",
            Value::Array(_) => "Array",
            Value::Object(_) => "Object",
            Value::Element(_) => "Element",
            Value::NodeList(_) => "NodeList",
            Value::Function(_) => "Function",
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Undefined"),
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Number(n) => write!(f, "Number({n})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Array(_) | Value::Object(_) => fmt::Debug::fmt(
                &Nested {
                    value: self,
                    open: &RefCell::new(Vec::new()),
                },
                f,
            ),
            Value::Element(el) => write!(f, "Element(<{}> #{})", el.tag_name(), el.node_id()),
            Value::NodeList(nodes) => write!(f, "NodeList(len={})", nodes.len()),
            Value::Function(func) => write!(f, "Function({})", func.name()),
        }
    }
}

/// Debug view of a container that prints `[Circular]` instead of
/// descending into a container already being printed.
struct Nested<'a> {
    value: &'a Value,
    open: &'a RefCell<Vec<*const ()>>,
}

impl Nested<'_> {
    fn child<'b>(&'b self, value: &'b Value) -> Nested<'b> {
        Nested {
            value,
            open: self.open,
        }
    }
}

impl fmt::Debug for Nested<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(ptr) = self.value.container_ptr() else {
            return fmt::Debug::fmt(self.value, f);
        };
        if self.open.borrow().contains(&ptr) {
            return f.write_str("[Circular]");
        }
        self.open.borrow_mut().push(ptr);
        let result = match self.value {
            Value::Array(items) => f
                .debug_list()
                .entries(items.borrow().iter().map(|v| self.child(v)))
                .finish(),
            Value::Object(map) => f
                .debug_map()
                .entries(map.borrow().iter().map(|(k, v)| (k, self.child(v))))
                .finish(),
            _ => Ok(()),
        };
        self.open.borrow_mut().pop();
        result
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

/// Structural equality, used by tests and by `includes`-style checks on
/// primitives. Arrays and objects compare by content here; the language's
/// own `===` (see [`Value::strict_equals`]) compares them by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.eq_in(other, &mut Vec::new())
    }
}

impl Value {
    fn container_ptr(&self) -> Option<*const ()> {
        match self {
            Value::Array(items) => Some(Rc::as_ptr(items).cast()),
            Value::Object(map) => Some(Rc::as_ptr(map).cast()),
            _ => None,
        }
    }

    /// Structural equality. `open` holds the container pairs already under
    /// comparison; meeting one again counts as equal, so cycles terminate.
    fn eq_in(&self, other: &Value, open: &mut Vec<(*const (), *const ())>) -> bool {
        if let (Some(left), Some(right)) = (self.container_ptr(), other.container_ptr()) {
            if left == right || open.contains(&(left, right)) {
                return true;
            }
            open.push((left, right));
            let equal = match (self, other) {
                (Value::Array(a), Value::Array(b)) => {
                    let (a, b) = (a.borrow(), b.borrow());
                    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.eq_in(y, open))
                }
                (Value::Object(a), Value::Object(b)) => {
                    let (a, b) = (a.borrow(), b.borrow());
                    a.len() == b.len()
                        && a.iter()
                            .all(|(key, x)| b.get(key).is_some_and(|y| x.eq_in(y, open)))
                }
                _ => false,
            };
            open.pop();
            return equal;
        }
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Element(a), Value::Element(b)) => a.node_id() == b.node_id(),
            (Value::NodeList(a), Value::NodeList(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b.iter()).all(|(x, y)| x.node_id() == y.node_id())
            }
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests;
