//! Unary operator fallbacks.
//!
//! `not`, `no`, `exists` and `does not exist` can be overridden by registered
//! expressions (see [`registry_name`]); the interpreter consults the registry
//! first and lands here only when nothing is registered.

use loka_ir::UnaryOp;
use loka_value::Value;

/// Evaluate a unary operation using direct pattern matching.
pub fn evaluate_unary(value: &Value, op: UnaryOp) -> Value {
    match op {
        UnaryOp::Not | UnaryOp::No => Value::Bool(!value.is_truthy()),
        UnaryOp::Some | UnaryOp::IsNotEmpty => Value::Bool(!is_empty(value)),
        UnaryOp::IsEmpty => Value::Bool(is_empty(value)),
        UnaryOp::Exists => Value::Bool(!value.is_nullish()),
        UnaryOp::NotExists => Value::Bool(value.is_nullish()),
        UnaryOp::Neg => Value::number(-value.to_number()),
        UnaryOp::Plus => Value::number(value.to_number()),
    }
}

/// The registry entry that overrides `op`, if any may.
pub const fn registry_name(op: UnaryOp) -> Option<&'static str> {
    match op {
        UnaryOp::Not => Some("not"),
        UnaryOp::No => Some("no"),
        UnaryOp::Exists => Some("exists"),
        UnaryOp::NotExists => Some("doesNotExist"),
        _ => None,
    }
}

/// Emptiness for `some` / `is empty`: strings, arrays, node collections and
/// objects by size; anything else is empty only when nullish.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Str(s) => s.is_empty(),
        Value::Array(items) => items.borrow().is_empty(),
        Value::NodeList(nodes) => nodes.is_empty(),
        Value::Object(map) => map.borrow().is_empty(),
        other => other.is_nullish(),
    }
}
