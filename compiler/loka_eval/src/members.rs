//! Native member surface of strings, arrays, node collections and objects.
//!
//! Property reads return plain values; methods come back as native
//! functions that read their receiver from the invocation, so the
//! interpreter only has to bind them to the object they were read from.

use loka_value::{
    expression_failed, not_a_function, ArrayRef, EvalError, FunctionValue, Invocation, Value,
};

use crate::operators::same_value_zero;

/// Methods every array answers to.
const ARRAY_METHODS: &[&str] = &[
    "push", "pop", "shift", "unshift", "includes", "indexOf", "join", "slice", "concat", "reverse",
    "at", "map", "filter", "forEach", "find", "some", "every",
];

const STRING_METHODS: &[&str] = &[
    "toUpperCase",
    "toLowerCase",
    "trim",
    "includes",
    "startsWith",
    "endsWith",
    "indexOf",
    "slice",
    "split",
    "charAt",
];

/// Whether `name` is a property or method of arrays themselves.
///
/// Member access keeps a one-item collection intact for these names.
pub fn is_array_native(name: &str) -> bool {
    name == "length" || ARRAY_METHODS.contains(&name)
}

/// Read `name` from `object`. Missing properties are `undefined`.
pub fn get_property(object: &Value, name: &str) -> Value {
    match object {
        Value::Undefined | Value::Null => Value::Undefined,
        Value::Str(s) => string_property(s, name),
        Value::Array(items) => array_property(items, name),
        Value::NodeList(nodes) => match name {
            "length" => count(nodes.len()),
            "item" => Value::function(FunctionValue::native("item", |inv| {
                node_list_item(&inv)
            })),
            _ => match name.parse::<usize>() {
                Ok(index) => nodes
                    .get(index)
                    .map_or(Value::Undefined, |el| Value::Element(el.clone())),
                Err(_) => Value::array(
                    nodes
                        .iter()
                        .map(|el| el.property(name).unwrap_or_default())
                        .collect(),
                ),
            },
        },
        Value::Object(map) => map.borrow().get(name).cloned().unwrap_or_default(),
        Value::Element(element) => element.property(name).unwrap_or_default(),
        Value::Function(func) if name == "name" => Value::string(func.name()),
        Value::Bool(_) | Value::Number(_) | Value::Function(_) => Value::Undefined,
    }
}

fn string_property(s: &str, name: &str) -> Value {
    if name == "length" {
        return count(s.chars().count());
    }
    if let Some(method) = STRING_METHODS.iter().copied().find(|m| *m == name) {
        return Value::function(FunctionValue::native(method, move |inv| {
            string_method(method, &inv)
        }));
    }
    match name.parse::<usize>() {
        Ok(index) => s
            .chars()
            .nth(index)
            .map_or(Value::Undefined, |c| Value::string(c.to_string())),
        Err(_) => Value::Undefined,
    }
}

fn array_property(items: &ArrayRef, name: &str) -> Value {
    if name == "length" {
        return count(items.borrow().len());
    }
    if let Some(method) = ARRAY_METHODS.iter().copied().find(|m| *m == name) {
        return Value::function(FunctionValue::native(method, move |inv| {
            array_method(method, &inv)
        }));
    }
    match name.parse::<usize>() {
        Ok(index) => items.borrow().get(index).cloned().unwrap_or_default(),
        Err(_) => Value::Undefined,
    }
}

// Strings

fn string_method(method: &str, inv: &Invocation<'_>) -> Result<Value, EvalError> {
    let Value::Str(s) = inv.receiver else {
        return Err(wrong_receiver(method, inv.receiver));
    };
    let arg = |i: usize| inv.arg(i).to_display_string();
    let value = match method {
        "toUpperCase" => Value::string(s.to_uppercase()),
        "toLowerCase" => Value::string(s.to_lowercase()),
        "trim" => Value::string(s.trim()),
        "includes" => Value::Bool(s.contains(arg(0).as_str())),
        "startsWith" => Value::Bool(s.starts_with(arg(0).as_str())),
        "endsWith" => Value::Bool(s.ends_with(arg(0).as_str())),
        "indexOf" => {
            let needle = arg(0);
            s.find(needle.as_str())
                .map_or(Value::number(-1.0), |byte| count(s[..byte].chars().count()))
        }
        "slice" => {
            let chars: Vec<char> = s.chars().collect();
            let (start, end) = slice_bounds(inv, chars.len());
            Value::string(chars[start..end].iter().collect::<String>())
        }
        "split" => {
            let parts: Vec<Value> = match inv.arg(0) {
                Value::Undefined => vec![Value::string(&**s)],
                separator => {
                    let separator = separator.to_display_string();
                    if separator.is_empty() {
                        s.chars().map(|c| Value::string(c.to_string())).collect()
                    } else {
                        s.split(separator.as_str()).map(Value::string).collect()
                    }
                }
            };
            Value::array(parts)
        }
        "charAt" => {
            let index = to_index(&inv.arg(0)).unwrap_or(0);
            Value::string(s.chars().nth(index).map(String::from).unwrap_or_default())
        }
        _ => return Err(not_a_function(method)),
    };
    Ok(value)
}

// Arrays

fn array_method(method: &str, inv: &Invocation<'_>) -> Result<Value, EvalError> {
    let Value::Array(items) = inv.receiver else {
        return Err(wrong_receiver(method, inv.receiver));
    };
    let value = match method {
        "push" => {
            let mut items = items.borrow_mut();
            items.extend(inv.args.iter().cloned());
            count(items.len())
        }
        "pop" => items.borrow_mut().pop().unwrap_or_default(),
        "shift" => {
            let mut items = items.borrow_mut();
            if items.is_empty() {
                Value::Undefined
            } else {
                items.remove(0)
            }
        }
        "unshift" => {
            let mut items = items.borrow_mut();
            let tail = std::mem::take(&mut *items);
            items.extend(inv.args.iter().cloned());
            items.extend(tail);
            count(items.len())
        }
        "includes" => {
            let needle = inv.arg(0);
            Value::Bool(items.borrow().iter().any(|item| same_value_zero(item, &needle)))
        }
        "indexOf" => {
            let needle = inv.arg(0);
            let position = items.borrow().iter().position(|item| item.strict_equals(&needle));
            position.map_or(Value::number(-1.0), count)
        }
        "join" => {
            let separator = match inv.arg(0) {
                Value::Undefined => ",".to_string(),
                other => other.to_display_string(),
            };
            let joined = items
                .borrow()
                .iter()
                .map(|item| {
                    if item.is_nullish() {
                        String::new()
                    } else {
                        item.to_display_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(&separator);
            Value::string(joined)
        }
        "slice" => {
            let items = items.borrow();
            let (start, end) = slice_bounds(inv, items.len());
            Value::array(items[start..end].to_vec())
        }
        "concat" => {
            let mut out = items.borrow().clone();
            for arg in inv.args {
                match arg {
                    Value::Array(more) => out.extend(more.borrow().iter().cloned()),
                    other => out.push(other.clone()),
                }
            }
            Value::array(out)
        }
        "reverse" => {
            items.borrow_mut().reverse();
            inv.receiver.clone()
        }
        "at" => {
            let items = items.borrow();
            let n = inv.arg(0).to_number();
            let n = if n.is_nan() { 0.0 } else { n.trunc() };
            let n = if n < 0.0 { n + count_f64(items.len()) } else { n };
            to_index(&Value::number(n))
                .and_then(|index| items.get(index))
                .cloned()
                .unwrap_or_default()
        }
        "map" | "filter" | "forEach" | "find" | "some" | "every" => {
            iterate(method, items, inv)?
        }
        _ => return Err(not_a_function(method)),
    };
    Ok(value)
}

/// The callback operations. The callback sees `(item, index, array)`; a
/// snapshot of the items is iterated, so callbacks may mutate the array.
fn iterate(method: &str, items: &ArrayRef, inv: &Invocation<'_>) -> Result<Value, EvalError> {
    let callback = inv.arg(0);
    let Some(callback) = callback.as_function() else {
        return Err(not_a_function(&callback.to_display_string()));
    };
    let snapshot = items.borrow().clone();
    let mut mapped = Vec::new();
    for (index, item) in snapshot.into_iter().enumerate() {
        let keep = callback.call(&[item.clone(), count(index), inv.receiver.clone()])?;
        match method {
            "map" => mapped.push(keep),
            "filter" if keep.is_truthy() => mapped.push(item),
            "find" if keep.is_truthy() => return Ok(item),
            "some" if keep.is_truthy() => return Ok(Value::Bool(true)),
            "every" if !keep.is_truthy() => return Ok(Value::Bool(false)),
            _ => {}
        }
    }
    Ok(match method {
        "map" | "filter" => Value::array(mapped),
        "some" => Value::Bool(false),
        "every" => Value::Bool(true),
        _ => Value::Undefined,
    })
}

// Node collections

fn node_list_item(inv: &Invocation<'_>) -> Result<Value, EvalError> {
    let Value::NodeList(nodes) = inv.receiver else {
        return Err(wrong_receiver("item", inv.receiver));
    };
    Ok(to_index(&inv.arg(0))
        .and_then(|index| nodes.get(index))
        .map_or(Value::Null, |el| Value::Element(el.clone())))
}

// Index helpers

/// `start`/`end` arguments of `slice`, negative values counting from the end.
fn slice_bounds(inv: &Invocation<'_>, len: usize) -> (usize, usize) {
    let start = relative_index(&inv.arg(0), len);
    let end = match inv.arg(1) {
        Value::Undefined => len,
        end => relative_index(&end, len),
    };
    (start, end.max(start))
}

/// Clamp a possibly negative index argument into `0..=len`.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is truncated, non-negative and clamped to len first"
)]
fn relative_index(arg: &Value, len: usize) -> usize {
    let n = arg.to_number();
    if n.is_nan() {
        return 0;
    }
    let n = n.trunc();
    let len_f = count_f64(len);
    let absolute = if n < 0.0 { (len_f + n).max(0.0) } else { n.min(len_f) };
    absolute as usize
}

/// A non-negative integral index argument.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "checked non-negative and integral"
)]
fn to_index(arg: &Value) -> Option<usize> {
    let n = arg.to_number();
    let n = if n.is_nan() { 0.0 } else { n.trunc() };
    (n >= 0.0 && n <= count_f64(usize::MAX)).then_some(n as usize)
}

fn count_f64(n: usize) -> f64 {
    f64::from(u32::try_from(n).unwrap_or(u32::MAX))
}

/// A length or index as a number value.
pub(crate) fn count(n: usize) -> Value {
    Value::number(count_f64(n))
}

#[cold]
fn wrong_receiver(method: &str, receiver: &Value) -> EvalError {
    expression_failed(
        method,
        format!("cannot be called on {}", receiver.type_name()),
    )
}

#[cfg(test)]
mod tests;
