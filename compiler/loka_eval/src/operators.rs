//! Binary operator implementations on evaluated operands.
//!
//! Everything here works on values alone. Operators whose meaning depends on
//! the operand *nodes* (selector-scoped `in`, `has` dispatch on the right
//! node kind, `as` with a bare type name, assignment, short-circuit logic)
//! are routed by the interpreter before falling back to this table.

use std::cmp::Ordering;

use loka_ir::BinaryOp;
use loka_value::{
    invalid_assignment_target, invalid_membership_operand, ElementRef, EvalError, Value,
};

use crate::coerce::coerce_operand;

/// Evaluate a binary operation with direct dispatch on the operator.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Operands are produced fresh by the evaluator and consumed here"
)]
pub fn evaluate_binary(left: Value, right: Value, op: BinaryOp) -> Result<Value, EvalError> {
    let result = match op {
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
            return Ok(eval_arithmetic(
                coerce_operand(left),
                coerce_operand(right),
                op,
            ));
        }

        BinaryOp::Eq => left.loose_equals(&right),
        BinaryOp::NotEq => !left.loose_equals(&right),
        BinaryOp::StrictEq => left.strict_equals(&right),
        BinaryOp::StrictNotEq => !left.strict_equals(&right),
        BinaryOp::Lt => left.compare(&right) == Some(Ordering::Less),
        BinaryOp::LtEq => matches!(
            left.compare(&right),
            Some(Ordering::Less | Ordering::Equal)
        ),
        BinaryOp::Gt => left.compare(&right) == Some(Ordering::Greater),
        BinaryOp::GtEq => matches!(
            left.compare(&right),
            Some(Ordering::Greater | Ordering::Equal)
        ),

        BinaryOp::And => {
            return Ok(if left.is_truthy() { right } else { left });
        }
        BinaryOp::Or => {
            return Ok(if left.is_truthy() { left } else { right });
        }

        BinaryOp::Matches => matches_pattern(&left, &right)?,
        BinaryOp::Has => has(&left, &right)?,
        BinaryOp::Contains => contains(&left, &right)?,
        BinaryOp::In => return membership(&left, &right),
        BinaryOp::NotMatches | BinaryOp::NotHas | BinaryOp::NotContains | BinaryOp::NotIn => {
            let positive = op.positive().unwrap_or(op);
            let value = evaluate_binary(left, right, positive)?;
            !value.is_truthy()
        }
        BinaryOp::StartsWith => left
            .to_display_string()
            .starts_with(right.to_display_string().as_str()),
        BinaryOp::EndsWith => left
            .to_display_string()
            .ends_with(right.to_display_string().as_str()),

        BinaryOp::IsA => is_a(&left, &right.to_display_string()),
        BinaryOp::IsNotA => !is_a(&left, &right.to_display_string()),
        BinaryOp::As => return Ok(left),

        BinaryOp::Assign => return Err(invalid_assignment_target(left.type_name())),
    };
    Ok(Value::Bool(result))
}

// Arithmetic

/// `+` concatenates when either coerced operand is textual; everything else
/// is IEEE double math (`1 / 0` is `Infinity`, `0 / 0` is `NaN`).
fn eval_arithmetic(left: Value, right: Value, op: BinaryOp) -> Value {
    if op == BinaryOp::Add && (left.is_textual() || right.is_textual()) {
        return concatenate(&left, &right);
    }
    let (a, b) = (left.to_number(), right.to_number());
    Value::number(match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        _ => a % b,
    })
}

/// String concatenation of two already-coerced operands.
pub fn concatenate(left: &Value, right: &Value) -> Value {
    let mut out = left.to_display_string();
    out.push_str(&right.to_display_string());
    Value::string(out)
}

/// Numeric addition of two already-coerced operands.
pub fn add_numbers(left: &Value, right: &Value) -> Value {
    Value::number(left.to_number() + right.to_number())
}

// Document-aware predicates

/// `left matches right`.
///
/// Elements test the selector; strings test a regular expression. A
/// one-item collection stands for its item. Anything else never matches.
pub fn matches_pattern(left: &Value, right: &Value) -> Result<bool, EvalError> {
    if let Some(item) = left.single_item() {
        return matches_pattern(&item, right);
    }
    let pattern = right.to_display_string();
    match left {
        Value::Element(element) => Ok(element.matches(&pattern)?),
        Value::Str(text) => {
            let regex = fancy_regex::Regex::new(&pattern)
                .map_err(|err| EvalError::new(format!("invalid pattern `{pattern}`: {err}")))?;
            regex
                .is_match(text)
                .map_err(|err| EvalError::new(format!("pattern `{pattern}` failed: {err}")))
        }
        _ => Ok(false),
    }
}

/// `left has right` when the right operand is a value rather than a
/// selector node.
pub fn has(left: &Value, right: &Value) -> Result<bool, EvalError> {
    if let Some(item) = left.single_item() {
        if matches!(item, Value::Element(_)) {
            return has(&item, right);
        }
    }
    match (left, right) {
        (Value::Element(element), Value::Element(other)) => Ok(element.contains(&**other)),
        (Value::Element(element), Value::Str(text)) => element_has(element, text),
        (Value::Element(_), _) => Ok(false),
        (Value::Object(map), key) => Ok(map.borrow().contains_key(&key.to_display_string())),
        _ => contains(left, right),
    }
}

/// Class (`.name`), attribute (`@name`) or descendant (any other selector).
pub fn element_has(element: &ElementRef, text: &str) -> Result<bool, EvalError> {
    let text = text.trim();
    if let Some(class) = simple_class(text) {
        return Ok(element.has_class(class));
    }
    if let Some(attribute) = text.strip_prefix('@') {
        return Ok(element.has_attribute(attribute));
    }
    Ok(element.query_first(text)?.is_some())
}

/// `.name` with no further selector syntax.
pub fn simple_class(selector: &str) -> Option<&str> {
    let class = selector.strip_prefix('.')?;
    let simple = !class.is_empty()
        && class
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_');
    simple.then_some(class)
}

/// `left contains right`.
pub fn contains(left: &Value, right: &Value) -> Result<bool, EvalError> {
    match (left, right) {
        (Value::Array(items), needle) => Ok(items
            .borrow()
            .iter()
            .any(|item| same_value_zero(item, needle))),
        (Value::NodeList(nodes), Value::Element(needle)) => {
            Ok(nodes.iter().any(|node| node.node_id() == needle.node_id()))
        }
        (Value::Str(haystack), needle) => {
            Ok(haystack.contains(needle.to_display_string().as_str()))
        }
        (Value::Element(element), Value::Element(other)) => Ok(element.contains(&**other)),
        (Value::Element(element), Value::NodeList(others)) => {
            Ok(!others.is_empty() && others.iter().all(|other| element.contains(&**other)))
        }
        (Value::Element(element), Value::Str(selector)) => Ok(element.matches(selector)?),
        _ => Ok(false),
    }
}

/// Generic `left in right` (the left operand is not a selector node).
pub fn membership(left: &Value, right: &Value) -> Result<Value, EvalError> {
    match right {
        Value::Element(element) => {
            let found = element.query_all(&left.to_display_string())?;
            Ok(Value::node_list(found))
        }
        Value::Array(items) => Ok(Value::Bool(
            items.borrow().iter().any(|item| same_value_zero(item, left)),
        )),
        Value::NodeList(nodes) => Ok(Value::Bool(left.as_element().is_some_and(|needle| {
            nodes.iter().any(|node| node.node_id() == needle.node_id())
        }))),
        Value::Object(map) => Ok(Value::Bool(
            map.borrow().contains_key(&left.to_display_string()),
        )),
        other => Err(invalid_membership_operand(other.type_name())),
    }
}

/// `===`, except `NaN` equals `NaN` (the rule array search uses).
pub fn same_value_zero(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) if x.is_nan() && y.is_nan() => true,
        _ => a.strict_equals(b),
    }
}

// Type predicates

/// `value is a type_name`.
pub fn is_a(value: &Value, type_name: &str) -> bool {
    let name = type_name.trim().to_ascii_lowercase();
    match name.as_str() {
        "string" => matches!(value, Value::Str(_)),
        "number" => matches!(value, Value::Number(_)),
        "boolean" => matches!(value, Value::Bool(_)),
        "object" => value.type_of() == "object" && !matches!(value, Value::Null),
        "array" => matches!(value, Value::Array(_)),
        "function" => matches!(value, Value::Function(_)),
        "null" => matches!(value, Value::Null),
        "undefined" => matches!(value, Value::Undefined),
        _ => value.type_tag().eq_ignore_ascii_case(&name),
    }
}
