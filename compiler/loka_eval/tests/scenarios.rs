//! End-to-end evaluation of parser-shaped JSON ASTs against an in-memory
//! document.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::cell::Cell;
use std::rc::Rc;

use futures::executor::block_on;
use pretty_assertions::assert_eq;

use loka_dom::Document;
use loka_eval::{
    Completion, ControlFlowSignal, EvalResult, Evaluator, ExecutionContext, ExpressionCategory,
    ExpressionRegistry, Value,
};
use loka_ir::Node;

fn parse(json: &str) -> Node {
    serde_json::from_str(json).expect("valid AST JSON")
}

/// ```text
/// <body>
///   <form id="signup">
///     <input id="age" class="field" value="41">
///     <span class="hint">years</span>
///   </form>
/// </body>
/// ```
fn document() -> Rc<Document> {
    let doc = Document::new();
    let form = doc.create_element("form").with_id("signup");
    doc.body_element().append_child(&form);
    form.append_child(
        &doc.create_element("input")
            .with_id("age")
            .with_class("field")
            .with_attr("value", "41"),
    );
    form.append_child(&doc.create_element("span").with_class("hint").with_text("years"));
    Rc::new(doc)
}

fn evaluator() -> Evaluator {
    Evaluator::new(ExpressionRegistry::new(), document())
}

fn run(evaluator: &Evaluator, json: &str, ctx: &mut ExecutionContext) -> EvalResult {
    block_on(evaluator.evaluate(&parse(json), ctx))
}

fn value_of(json: &str) -> Value {
    run(&evaluator(), json, &mut ExecutionContext::new()).unwrap()
}

// Scenarios

#[test]
fn string_plus_number_concatenates() {
    let json = r#"{"type":"binaryExpression","operator":"+",
        "left":{"type":"literal","value":"a"},
        "right":{"type":"literal","value":1}}"#;
    assert_eq!(value_of(json), Value::string("a1"));
}

#[test]
fn result_is_the_context_pronoun() {
    let evaluator = evaluator();
    let mut ctx = ExecutionContext::new();
    ctx.set_result(Value::number(5.0));
    ctx.set_local("result", Value::string("local"));
    ctx.set_global("result", Value::string("global"));

    let json = r#"{"type":"identifier","name":"result"}"#;
    assert_eq!(run(&evaluator, json, &mut ctx).unwrap(), Value::number(5.0));
}

#[test]
fn object_literal_keeps_key_order() {
    let json = r#"{"type":"objectLiteral","properties":[
        {"key":{"type":"identifier","name":"x"},"value":{"type":"literal","value":1}},
        {"key":{"type":"literal","value":"b"},"value":{"type":"literal","value":true}}]}"#;
    let Value::Object(object) = value_of(json) else {
        panic!("expected an object");
    };
    let object = object.borrow();
    let entries: Vec<(&str, &Value)> = object.iter().map(|(k, v)| (k.as_str(), v)).collect();
    assert_eq!(
        entries,
        vec![("x", &Value::number(1.0)), ("b", &Value::Bool(true))]
    );
}

#[test]
fn exists_tests_existence_not_truthiness() {
    let on_undefined = r#"{"type":"unaryExpression","operator":"exists",
        "argument":{"type":"identifier","name":"missing"}}"#;
    let on_zero = r#"{"type":"unaryExpression","operator":"exists",
        "argument":{"type":"literal","value":0}}"#;
    assert_eq!(value_of(on_undefined), Value::Bool(false));
    assert_eq!(value_of(on_zero), Value::Bool(true));
}

// Scopes

#[test]
fn local_bindings_are_invisible_to_global_lookup() {
    let evaluator = evaluator();
    let mut ctx = ExecutionContext::new();
    ctx.set_local("count", Value::number(3.0));

    let global = r#"{"type":"identifier","name":"count","scope":"global"}"#;
    let unscoped = r#"{"type":"identifier","name":"count"}"#;
    assert_eq!(run(&evaluator, global, &mut ctx).unwrap(), Value::Undefined);
    assert_eq!(run(&evaluator, unscoped, &mut ctx).unwrap(), Value::number(3.0));
}

#[test]
fn local_shadows_global() {
    let evaluator = evaluator();
    let mut ctx = ExecutionContext::new();
    let x = r#"{"type":"identifier","name":"x"}"#;

    ctx.set_global("x", Value::string("global"));
    assert_eq!(run(&evaluator, x, &mut ctx).unwrap(), Value::string("global"));

    ctx.set_local("x", Value::string("local"));
    assert_eq!(run(&evaluator, x, &mut ctx).unwrap(), Value::string("local"));
}

#[test]
fn assignments_are_visible_to_later_reads() {
    let evaluator = evaluator();
    let mut ctx = ExecutionContext::new();
    let assign = r#"{"type":"binaryExpression","operator":"=",
        "left":{"type":"identifier","name":"x"},
        "right":{"type":"literal","value":5}}"#;
    assert_eq!(run(&evaluator, assign, &mut ctx).unwrap(), Value::number(5.0));

    let read = r#"{"type":"identifier","name":"x"}"#;
    assert_eq!(run(&evaluator, read, &mut ctx).unwrap(), Value::number(5.0));

    let mut child = ctx.child();
    assert_eq!(run(&evaluator, read, &mut child).unwrap(), Value::number(5.0));
}

// Control flow

#[test]
fn signals_short_circuit_array_elements() {
    let reached = Rc::new(Cell::new(false));
    let mut registry = ExpressionRegistry::new();
    registry
        .register_fn("bail", ExpressionCategory::Special, |_, _| {
            Err(ControlFlowSignal::Return(Value::string("early")).into())
        })
        .unwrap();
    let seen = Rc::clone(&reached);
    registry
        .register_fn("mark", ExpressionCategory::Special, move |_, _| {
            seen.set(true);
            Ok(Value::Null)
        })
        .unwrap();
    let evaluator = Evaluator::new(registry, document());

    let json = r#"{"type":"arrayLiteral","elements":[
        {"type":"literal","value":1},
        {"type":"callExpression","callee":{"type":"identifier","name":"bail"}},
        {"type":"callExpression","callee":{"type":"identifier","name":"mark"}}]}"#;
    let node = parse(json);
    let mut ctx = ExecutionContext::new();
    let completion = block_on(evaluator.evaluate_with_result(&node, &mut ctx)).unwrap();

    assert_eq!(
        completion,
        Completion::Signal(ControlFlowSignal::Return(Value::string("early")))
    );
    assert!(!reached.get());
}

// Documents

#[test]
fn possessive_reads_element_properties() {
    let json = r#"{"type":"possessiveExpression",
        "object":{"type":"idSelector","value":"age"},
        "property":{"type":"identifier","name":"value"}}"#;
    assert_eq!(value_of(json), Value::string("41"));
}

#[test]
fn arithmetic_on_an_element_uses_its_number() {
    let doc = document();
    doc.body_element()
        .append_child(&doc.create_element("b").with_id("total").with_text(" 41 "));
    let evaluator = Evaluator::new(ExpressionRegistry::new(), doc);

    let json = r##"{"type":"binaryExpression","operator":"+",
        "left":{"type":"selector","value":"#total"},
        "right":{"type":"literal","value":1}}"##;
    let sum = run(&evaluator, json, &mut ExecutionContext::new()).unwrap();
    assert_eq!(sum, Value::number(42.0));
}

#[test]
fn scoped_query_with_word_operators() {
    let json = r##"{"type":"binaryExpression","operator":"in",
        "left":{"type":"queryReference","selector":"<span.hint/>"},
        "right":{"type":"idSelector","value":"#signup"}}"##;
    assert_eq!(value_of(json).sequence_len(), Some(1));

    let has = r#"{"type":"binaryExpression","operator":"has",
        "left":{"type":"idSelector","value":"age"},
        "right":{"type":"cssSelector","selector":".field"}}"#;
    assert_eq!(value_of(has), Value::Bool(true));
}

#[test]
fn malformed_selectors_make_soft_operators_false() {
    let json = r#"{"type":"binaryExpression","operator":"matches",
        "left":{"type":"idSelector","value":"age"},
        "right":{"type":"selector","value":"input[value"}}"#;
    assert_eq!(value_of(json), Value::Bool(false));
}

#[test]
fn template_interpolates_the_scope() {
    let evaluator = evaluator();
    let mut ctx = ExecutionContext::new();
    ctx.set_local("name", Value::string("Ada"));
    let json = r#"{"type":"templateLiteral","value":"hi $name, ${1 + 2}"}"#;
    assert_eq!(
        run(&evaluator, json, &mut ctx).unwrap(),
        Value::string("hi Ada, 3")
    );
}

#[test]
fn unknown_node_kinds_are_structural_errors() {
    let json = r#"{"type":"waitExpression","duration":10}"#;
    let err = run(&evaluator(), json, &mut ExecutionContext::new())
        .unwrap_err()
        .into_error()
        .expect("a genuine error");
    assert_eq!(err.category(), loka_eval::ErrorCategory::Structural);
}
