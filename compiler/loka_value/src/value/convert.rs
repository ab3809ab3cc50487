//! Primitive conversions: truthiness, `ToNumber`, display, equality, ordering.
//!
//! These follow the host scripting model's abstract operations so values
//! produced by collaborators and by the document behave the same way they
//! would in the page.

use std::cmp::Ordering;
use std::rc::Rc;

use super::Value;

impl Value {
    /// Truthiness: `false`, `0`, `NaN`, `""`, `null` and `undefined` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            Value::Array(_)
            | Value::Object(_)
            | Value::Element(_)
            | Value::NodeList(_)
            | Value::Function(_) => true,
        }
    }

    /// Numeric conversion. Failed conversions produce `NaN`.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::Str(s) => str_to_number(s),
            Value::Array(_) => str_to_number(&self.to_display_string()),
            Value::Object(_) | Value::Element(_) | Value::NodeList(_) | Value::Function(_) => {
                f64::NAN
            }
        }
    }

    /// String conversion as the page would render the value.
    ///
    /// An array nested inside itself renders as `""` at the inner level.
    pub fn to_display_string(&self) -> String {
        self.display_in(&mut Vec::new())
    }

    /// `open` holds the arrays currently being rendered.
    fn display_in(&self, open: &mut Vec<*const ()>) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::Str(s) => s.to_string(),
            Value::Array(items) => {
                let ptr = Rc::as_ptr(items).cast::<()>();
                if open.contains(&ptr) {
                    return String::new();
                }
                open.push(ptr);
                let text = items
                    .borrow()
                    .iter()
                    .map(|item| {
                        if item.is_nullish() {
                            String::new()
                        } else {
                            item.display_in(open)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(",");
                open.pop();
                text
            }
            Value::Object(_) => "[object Object]".to_string(),
            Value::Element(_) => "[object Element]".to_string(),
            Value::NodeList(_) => "[object NodeList]".to_string(),
            Value::Function(func) => format!("function {}() {{ [native code] }}", func.name()),
        }
    }

    /// `===`: primitives by value, everything else by identity.
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Element(a), Value::Element(b)) => a.node_id() == b.node_id(),
            (Value::NodeList(a), Value::NodeList(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// `==`: `null == undefined`, numbers and strings meet as numbers,
    /// booleans convert to numbers, references convert to primitives.
    pub fn loose_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (a, b) if a.is_nullish() || b.is_nullish() => a.is_nullish() && b.is_nullish(),
            (Value::Number(a), Value::Str(b)) => *a == str_to_number(b),
            (Value::Str(a), Value::Number(b)) => str_to_number(a) == *b,
            (Value::Bool(a), b) => Value::Number(f64::from(u8::from(*a))).loose_equals(b),
            (a, Value::Bool(b)) => a.loose_equals(&Value::Number(f64::from(u8::from(*b)))),
            (a, b) if a.is_reference() != b.is_reference() => {
                a.to_primitive().loose_equals(&b.to_primitive())
            }
            (a, b) => a.strict_equals(b),
        }
    }

    /// Relational ordering. Two strings compare by code unit order; anything
    /// else compares numerically. `None` when either side is `NaN`.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        let left = self.to_primitive();
        let right = other.to_primitive();
        match (&left, &right) {
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            _ => left.to_number().partial_cmp(&right.to_number()),
        }
    }

    fn is_reference(&self) -> bool {
        matches!(
            self,
            Value::Array(_)
                | Value::Object(_)
                | Value::Element(_)
                | Value::NodeList(_)
                | Value::Function(_)
        )
    }

    fn to_primitive(&self) -> Value {
        if self.is_reference() {
            Value::string(self.to_display_string())
        } else {
            self.clone()
        }
    }
}

/// Format a number the way the page prints it: integral values drop the
/// fractional part, `-0` prints as `0`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        format!("{n}")
    }
}

/// Strict decimal parse of already-trimmed text.
///
/// Accepts what a numeric literal in the page accepts (`12`, `-3.5`, `.5`,
/// `1e3`, `Infinity`) and rejects everything else, including the Rust-only
/// spellings `inf` and `nan` that `str::parse` would take.
pub fn parse_number(text: &str) -> Option<f64> {
    let (sign, digits) = match text.as_bytes().first() {
        Some(b'-') => (-1.0, &text[1..]),
        Some(b'+') => (1.0, &text[1..]),
        _ => (1.0, text),
    };
    if digits == "Infinity" {
        return Some(sign * f64::INFINITY);
    }
    let valid = !digits.is_empty()
        && !digits.starts_with(['+', '-'])
        && digits.bytes().any(|b| b.is_ascii_digit())
        && digits
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !valid {
        return None;
    }
    digits.parse::<f64>().ok().map(|n| sign * n)
}

/// `ToNumber` applied to a string: surrounding whitespace is ignored, the
/// empty string is `0`, hex literals are accepted, anything else is `NaN`.
#[expect(
    clippy::cast_precision_loss,
    reason = "hex literals above 2^53 round like any other double"
)]
pub fn str_to_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        return u64::from_str_radix(hex, 16).map_or(f64::NAN, |n| n as f64);
    }
    parse_number(trimmed).unwrap_or(f64::NAN)
}
