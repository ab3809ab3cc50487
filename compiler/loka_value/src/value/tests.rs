use std::cmp::Ordering;

use pretty_assertions::assert_eq;

use super::*;

// Truthiness

#[test]
fn falsy_values() {
    for value in [
        Value::Undefined,
        Value::Null,
        Value::Bool(false),
        Value::number(0.0),
        Value::number(f64::NAN),
        Value::string(""),
    ] {
        assert!(!value.is_truthy(), "{value:?} should be falsy");
    }
}

#[test]
fn truthy_values() {
    for value in [
        Value::Bool(true),
        Value::number(-1.0),
        Value::string("0"),
        Value::array(vec![]),
        Value::object(Vec::<(String, Value)>::new()),
    ] {
        assert!(value.is_truthy(), "{value:?} should be truthy");
    }
}

// ToNumber

#[test]
fn string_to_number() {
    assert_eq!(str_to_number("  42 "), 42.0);
    assert_eq!(str_to_number(""), 0.0);
    assert_eq!(str_to_number("-3.5"), -3.5);
    assert_eq!(str_to_number(".5"), 0.5);
    assert_eq!(str_to_number("1e3"), 1000.0);
    assert_eq!(str_to_number("0x1F"), 31.0);
    assert_eq!(str_to_number("-Infinity"), f64::NEG_INFINITY);
    assert!(str_to_number("12px").is_nan());
    assert!(str_to_number("inf").is_nan());
    assert!(str_to_number("nan").is_nan());
    assert!(str_to_number("--5").is_nan());
}

#[test]
fn parse_number_rejects_empty_and_words() {
    assert_eq!(parse_number("7"), Some(7.0));
    assert_eq!(parse_number(""), None);
    assert_eq!(parse_number("seven"), None);
    assert_eq!(parse_number("."), None);
}

#[test]
fn value_to_number() {
    assert!(Value::Undefined.to_number().is_nan());
    assert_eq!(Value::Null.to_number(), 0.0);
    assert_eq!(Value::Bool(true).to_number(), 1.0);
    assert_eq!(Value::array(vec![]).to_number(), 0.0);
    assert_eq!(Value::array(vec![Value::string("8")]).to_number(), 8.0);
    assert!(Value::array(vec![Value::number(1.0), Value::number(2.0)])
        .to_number()
        .is_nan());
}

// Display

#[test]
fn number_formatting() {
    assert_eq!(format_number(7.0), "7");
    assert_eq!(format_number(-0.0), "0");
    assert_eq!(format_number(2.5), "2.5");
    assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
    assert_eq!(format_number(f64::NAN), "NaN");
    assert_eq!(format_number(f64::INFINITY), "Infinity");
}

#[test]
fn display_strings() {
    let arr = Value::array(vec![
        Value::number(1.0),
        Value::Null,
        Value::string("x"),
    ]);
    assert_eq!(arr.to_string(), "1,,x");
    assert_eq!(
        Value::object([("a", Value::number(1.0))]).to_string(),
        "[object Object]"
    );
    assert_eq!(Value::Undefined.to_string(), "undefined");
    assert_eq!(Value::Bool(false).to_string(), "false");
}

// Equality

#[test]
fn strict_equality_is_identity_for_references() {
    let a = Value::array(vec![Value::number(1.0)]);
    let b = Value::array(vec![Value::number(1.0)]);
    assert!(a.strict_equals(&a.clone()));
    assert!(!a.strict_equals(&b));
    assert_eq!(a, b);
    assert!(!Value::number(f64::NAN).strict_equals(&Value::number(f64::NAN)));
    assert!(!Value::number(1.0).strict_equals(&Value::string("1")));
}

#[test]
fn loose_equality_coerces() {
    assert!(Value::Null.loose_equals(&Value::Undefined));
    assert!(!Value::Null.loose_equals(&Value::number(0.0)));
    assert!(Value::number(1.0).loose_equals(&Value::string("1")));
    assert!(Value::Bool(true).loose_equals(&Value::number(1.0)));
    assert!(Value::Bool(false).loose_equals(&Value::string("")));
    assert!(Value::array(vec![Value::number(3.0)]).loose_equals(&Value::string("3")));
}

// Ordering

#[test]
fn comparison_rules() {
    assert_eq!(
        Value::string("apple").compare(&Value::string("banana")),
        Some(Ordering::Less)
    );
    assert_eq!(
        Value::string("10").compare(&Value::number(9.0)),
        Some(Ordering::Greater)
    );
    assert_eq!(Value::number(f64::NAN).compare(&Value::number(1.0)), None);
    assert_eq!(Value::string("10").compare(&Value::string("9")), Some(Ordering::Less));
}

// Type names

#[test]
fn type_names() {
    assert_eq!(Value::Null.type_of(), "object");
    assert_eq!(Value::array(vec![]).type_of(), "object");
    assert_eq!(Value::array(vec![]).type_tag(), "Array");
    assert_eq!(Value::string("s").type_of(), "string");
    assert_eq!(Value::Undefined.type_name(), "undefined");
}

// Collections

#[test]
fn single_item_unwraps_only_singletons() {
    let one = Value::array(vec![Value::number(5.0)]);
    assert_eq!(one.single_item(), Some(Value::number(5.0)));
    assert_eq!(Value::array(vec![]).single_item(), None);
    assert_eq!(Value::number(5.0).single_item(), None);
}

#[test]
fn arrays_share_storage() {
    let a = Value::array(vec![]);
    let b = a.clone();
    if let Value::Array(items) = &a {
        items.borrow_mut().push(Value::number(1.0));
    }
    assert_eq!(b.sequence_len(), Some(1));
}

fn self_containing(first: f64) -> Value {
    let xs = Value::array(vec![Value::number(first)]);
    if let Value::Array(items) = &xs {
        items.borrow_mut().push(xs.clone());
    }
    xs
}

#[test]
fn cyclic_arrays_terminate() {
    let xs = self_containing(1.0);
    assert_eq!(xs.to_display_string(), "1,");
    assert_eq!(Value::array(vec![xs.clone(), Value::number(2.0)]).to_display_string(), "1,,2");
    assert!(xs.to_number().is_nan());

    assert_eq!(format!("{xs:?}"), "[Number(1), [Circular]]");

    assert!(xs == xs.clone());
    assert!(xs == self_containing(1.0));
    assert!(xs != self_containing(2.0));
}

#[test]
fn cyclic_objects_debug_and_compare() {
    let obj = Value::object([("n", Value::number(1.0))]);
    if let Value::Object(map) = &obj {
        map.borrow_mut().insert("me".to_string(), obj.clone());
    }
    assert_eq!(format!("{obj:?}"), r#"{"n": Number(1), "me": [Circular]}"#);
    assert!(obj == obj.clone());
}

// Functions

#[test]
fn bound_function_sees_receiver() {
    let describe = FunctionValue::native("describe", |call| {
        Ok(Value::string(format!(
            "{}:{}",
            call.receiver,
            call.args.len()
        )))
    });
    let bound = describe.bind(Value::string("me"));
    assert_eq!(
        bound.call(&[Value::Null]),
        Ok(Value::string("me:1"))
    );
    assert_eq!(describe.call(&[]), Ok(Value::string("undefined:0")));

    let rebound = bound.bind(Value::string("other"));
    assert_eq!(rebound.call(&[]), Ok(Value::string("me:0")));
    assert!(rebound.ptr_eq(&describe));
}

#[test]
fn construct_flag_reaches_body() {
    let probe = FunctionValue::native("Probe", |call| Ok(Value::Bool(call.construct)));
    assert_eq!(probe.construct(&[]), Ok(Value::Bool(true)));
    assert_eq!(probe.call(&[]), Ok(Value::Bool(false)));
}
