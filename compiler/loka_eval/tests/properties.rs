//! Property-based tests for the evaluator.
//!
//! Literal identity, coercion idempotence, and the guarantee that the soft
//! operators (`has`, `matches`, `contains` and their negations) produce a
//! boolean for any operands instead of an error.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use std::rc::Rc;

use futures::executor::block_on;
use proptest::prelude::*;

use loka_dom::Document;
use loka_eval::{coerce_operand, Evaluator, ExecutionContext, ExpressionRegistry, Value};
use loka_ir::{BinaryOp, LiteralValue, Node};

fn evaluator() -> Evaluator {
    let doc = Document::new();
    let list = doc.create_element("ul").with_id("items").with_class("list");
    doc.body_element().append_child(&list);
    list.append_child(&doc.create_element("li").with_attr("data-id", "1").with_text("one"));
    Evaluator::new(ExpressionRegistry::new(), Rc::new(doc))
}

fn eval(evaluator: &Evaluator, node: &Node) -> Value {
    block_on(evaluator.evaluate(node, &mut ExecutionContext::new())).expect("evaluates")
}

// -- Strategies --

fn literal_strategy() -> impl Strategy<Value = LiteralValue> {
    prop_oneof![
        Just(LiteralValue::Null),
        any::<bool>().prop_map(LiteralValue::Bool),
        // NaN never equals itself
        any::<f64>()
            .prop_filter("not NaN", |n| !n.is_nan())
            .prop_map(LiteralValue::Number),
        "[ -~]{0,16}".prop_map(LiteralValue::Str),
    ]
}

fn primitive_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Undefined),
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<f64>().prop_map(Value::number),
        "[ -~]{0,16}".prop_map(Value::string),
    ]
}

/// Operand nodes: literals, selectors with arbitrary text, the list
/// element, and an array.
fn operand_strategy() -> impl Strategy<Value = Node> {
    prop_oneof![
        literal_strategy().prop_map(|value| Node::Literal { value }),
        "[ -~]{0,12}".prop_map(|value| Node::Selector { value }),
        "[ -~]{0,12}".prop_map(|selector| Node::CssSelector { selector }),
        "[ -~]{0,12}".prop_map(|selector| Node::QueryReference { selector }),
        Just(Node::IdSelector {
            value: "items".to_string()
        }),
        Just(Node::array(vec![Node::literal(1), Node::literal("x")])),
    ]
}

fn soft_operator_strategy() -> impl Strategy<Value = BinaryOp> {
    prop::sample::select(vec![
        BinaryOp::Has,
        BinaryOp::NotHas,
        BinaryOp::Matches,
        BinaryOp::NotMatches,
        BinaryOp::Contains,
        BinaryOp::NotContains,
    ])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn literals_evaluate_to_themselves(value in literal_strategy()) {
        let expected = match &value {
            LiteralValue::Null => Value::Null,
            LiteralValue::Bool(b) => Value::Bool(*b),
            LiteralValue::Number(n) => Value::number(*n),
            LiteralValue::Str(s) => Value::string(s.as_str()),
            LiteralValue::Undefined => Value::Undefined,
        };
        let node = Node::Literal { value };
        prop_assert_eq!(eval(&evaluator(), &node), expected);
    }

    #[test]
    fn coercing_primitives_is_identity(value in primitive_strategy()) {
        let coerced = coerce_operand(value.clone());
        match (&value, &coerced) {
            (Value::Number(a), Value::Number(b)) if a.is_nan() => prop_assert!(b.is_nan()),
            _ => prop_assert_eq!(coerced, value),
        }
    }

    #[test]
    fn coercing_a_single_item_array_coerces_the_item(value in primitive_strategy()) {
        let wrapped = coerce_operand(Value::array(vec![value.clone()]));
        let direct = coerce_operand(value);
        match (&wrapped, &direct) {
            (Value::Number(a), Value::Number(b)) if a.is_nan() => prop_assert!(b.is_nan()),
            _ => prop_assert_eq!(wrapped, direct),
        }
    }

    #[test]
    fn numeric_plus_is_a_sum(a in -1.0e9..1.0e9f64, b in -1.0e9..1.0e9f64) {
        let node = Node::binary(BinaryOp::Add, Node::literal(a), Node::literal(b));
        prop_assert_eq!(eval(&evaluator(), &node), Value::number(a + b));
    }

    #[test]
    fn textual_plus_concatenates(a in "[a-z]{1,8}", b in -1000i32..1000) {
        let node = Node::binary(BinaryOp::Add, Node::literal(a.as_str()), Node::literal(f64::from(b)));
        prop_assert_eq!(eval(&evaluator(), &node), Value::string(format!("{a}{b}")));
    }

    #[test]
    fn soft_operators_always_produce_booleans(
        left in operand_strategy(),
        op in soft_operator_strategy(),
        right in operand_strategy(),
    ) {
        let node = Node::binary(op, left, right);
        let result = block_on(evaluator().evaluate(&node, &mut ExecutionContext::new()));
        prop_assert!(matches!(result, Ok(Value::Bool(_))), "{:?} gave {:?}", node, result);
    }
}
