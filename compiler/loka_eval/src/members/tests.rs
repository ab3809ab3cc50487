#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;

use super::*;

fn call(receiver: &Value, name: &str, args: &[Value]) -> Value {
    let method = get_property(receiver, name);
    let method = method.as_function().unwrap().bind(receiver.clone());
    method.call(args).unwrap()
}

fn numbers(ns: &[f64]) -> Value {
    Value::array(ns.iter().copied().map(Value::number).collect())
}

// Strings

#[test]
fn string_length_and_index() {
    let s = Value::string("héllo");
    assert_eq!(get_property(&s, "length"), Value::number(5.0));
    assert_eq!(get_property(&s, "1"), Value::string("é"));
    assert_eq!(get_property(&s, "9"), Value::Undefined);
    assert_eq!(get_property(&s, "bogus"), Value::Undefined);
}

#[test]
fn string_methods() {
    let s = Value::string("  Hello World ");
    assert_eq!(call(&s, "trim", &[]), Value::string("Hello World"));
    assert_eq!(call(&s, "toUpperCase", &[]), Value::string("  HELLO WORLD "));
    assert_eq!(
        call(&s, "includes", &[Value::string("World")]),
        Value::Bool(true)
    );
    assert_eq!(call(&s, "indexOf", &[Value::string("W")]), Value::number(8.0));
    assert_eq!(call(&s, "indexOf", &[Value::string("x")]), Value::number(-1.0));

    let word = Value::string("loka");
    assert_eq!(
        call(&word, "slice", &[Value::number(1.0), Value::number(-1.0)]),
        Value::string("ok")
    );
    assert_eq!(call(&word, "charAt", &[Value::number(3.0)]), Value::string("a"));
    assert_eq!(call(&word, "charAt", &[Value::number(7.0)]), Value::string(""));
}

#[test]
fn string_split() {
    let s = Value::string("a,b,,c");
    assert_eq!(
        call(&s, "split", &[Value::string(",")]),
        Value::array(vec![
            Value::string("a"),
            Value::string("b"),
            Value::string(""),
            Value::string("c"),
        ])
    );
    assert_eq!(
        call(&Value::string("ab"), "split", &[Value::string("")]),
        Value::array(vec![Value::string("a"), Value::string("b")])
    );
    assert_eq!(
        call(&Value::string("ab"), "split", &[]),
        Value::array(vec![Value::string("ab")])
    );
}

// Arrays

#[test]
fn array_mutation_is_shared() {
    let items = numbers(&[1.0, 2.0]);
    let alias = items.clone();
    assert_eq!(call(&items, "push", &[Value::number(3.0)]), Value::number(3.0));
    assert_eq!(call(&items, "unshift", &[Value::number(0.0)]), Value::number(4.0));
    assert_eq!(alias, numbers(&[0.0, 1.0, 2.0, 3.0]));
    assert_eq!(call(&items, "shift", &[]), Value::number(0.0));
    assert_eq!(call(&items, "pop", &[]), Value::number(3.0));
    assert_eq!(alias, numbers(&[1.0, 2.0]));
    assert_eq!(call(&numbers(&[]), "pop", &[]), Value::Undefined);
}

#[test]
fn array_queries() {
    let items = numbers(&[1.0, f64::NAN, 3.0]);
    assert_eq!(get_property(&items, "length"), Value::number(3.0));
    assert_eq!(get_property(&items, "2"), Value::number(3.0));
    assert_eq!(
        call(&items, "includes", &[Value::number(f64::NAN)]),
        Value::Bool(true)
    );
    assert_eq!(
        call(&items, "indexOf", &[Value::number(f64::NAN)]),
        Value::number(-1.0)
    );
    assert_eq!(call(&items, "at", &[Value::number(-1.0)]), Value::number(3.0));
    assert_eq!(call(&items, "at", &[Value::number(5.0)]), Value::Undefined);
}

#[test]
fn array_copies() {
    let items = numbers(&[1.0, 2.0, 3.0]);
    assert_eq!(call(&items, "slice", &[Value::number(1.0)]), numbers(&[2.0, 3.0]));
    assert_eq!(
        call(&items, "concat", &[numbers(&[4.0]), Value::number(5.0)]),
        numbers(&[1.0, 2.0, 3.0, 4.0, 5.0])
    );
    assert_eq!(
        call(
            &Value::array(vec![Value::number(1.0), Value::Null, Value::string("x")]),
            "join",
            &[Value::string("-")]
        ),
        Value::string("1--x")
    );
    let reversed = call(&items, "reverse", &[]);
    assert_eq!(items, numbers(&[3.0, 2.0, 1.0]));
    assert!(reversed.strict_equals(&items));
}

#[test]
fn array_callbacks() {
    let items = numbers(&[1.0, 2.0, 3.0, 4.0]);
    let double = Value::function(FunctionValue::native("double", |inv| {
        Ok(Value::number(inv.arg(0).to_number() * 2.0))
    }));
    let even = Value::function(FunctionValue::native("even", |inv| {
        Ok(Value::Bool(inv.arg(0).to_number() % 2.0 == 0.0))
    }));
    let index_of = Value::function(FunctionValue::native("index", |inv| Ok(inv.arg(1))));

    assert_eq!(call(&items, "map", &[double]), numbers(&[2.0, 4.0, 6.0, 8.0]));
    assert_eq!(call(&items, "filter", &[even.clone()]), numbers(&[2.0, 4.0]));
    assert_eq!(call(&items, "find", &[even.clone()]), Value::number(2.0));
    assert_eq!(call(&items, "some", &[even.clone()]), Value::Bool(true));
    assert_eq!(call(&items, "every", &[even]), Value::Bool(false));
    assert_eq!(
        call(&items, "map", &[index_of]),
        numbers(&[0.0, 1.0, 2.0, 3.0])
    );
}

#[test]
fn callback_must_be_a_function() {
    let items = numbers(&[1.0]);
    let map = get_property(&items, "map");
    let map = map.as_function().unwrap().bind(items);
    let err = map.call(&[Value::number(1.0)]).unwrap_err();
    assert_eq!(err.to_string(), "`1` is not a function");
}

#[test]
fn array_native_names() {
    assert!(is_array_native("length"));
    assert!(is_array_native("forEach"));
    assert!(!is_array_native("textContent"));
}

// Objects and others

#[test]
fn object_keys() {
    let obj = Value::object([("x", Value::number(1.0))]);
    assert_eq!(get_property(&obj, "x"), Value::number(1.0));
    assert_eq!(get_property(&obj, "y"), Value::Undefined);
}

#[test]
fn nullish_reads_are_soft() {
    assert_eq!(get_property(&Value::Null, "x"), Value::Undefined);
    assert_eq!(get_property(&Value::Undefined, "length"), Value::Undefined);
    assert_eq!(get_property(&Value::number(1.0), "x"), Value::Undefined);
}

#[test]
fn detached_method_reports_receiver() {
    let trim = get_property(&Value::string("x"), "trim");
    let err = trim.as_function().unwrap().call(&[]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "expression `trim` failed: cannot be called on undefined"
    );
}
