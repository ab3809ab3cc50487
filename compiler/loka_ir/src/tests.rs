use pretty_assertions::assert_eq;

use crate::{BinaryOp, Node, UnaryOp};

#[test]
fn test_binary_word_forms_fold_onto_symbols() {
    assert_eq!(BinaryOp::from_token("is greater than"), Some(BinaryOp::Gt));
    assert_eq!(BinaryOp::from_token("mod"), Some(BinaryOp::Mod));
    assert_eq!(BinaryOp::from_token("have"), Some(BinaryOp::Has));
    assert_eq!(BinaryOp::from_token("include"), Some(BinaryOp::Contains));
    assert_eq!(BinaryOp::from_token("is an"), Some(BinaryOp::IsA));
    assert_eq!(BinaryOp::from_token("is not an"), Some(BinaryOp::IsNotA));
    assert_eq!(BinaryOp::from_token(" === "), Some(BinaryOp::StrictEq));
    assert_eq!(BinaryOp::from_token("<=>"), None);
}

#[test]
fn test_negated_predicates_have_positive_forms() {
    assert_eq!(BinaryOp::NotHas.positive(), Some(BinaryOp::Has));
    assert_eq!(BinaryOp::NotIn.positive(), Some(BinaryOp::In));
    assert_eq!(BinaryOp::Add.positive(), None);
}

#[test]
fn test_unary_tokens() {
    assert_eq!(UnaryOp::from_token("!"), Some(UnaryOp::Not));
    assert_eq!(UnaryOp::from_token("does not exist"), Some(UnaryOp::NotExists));
    assert_eq!(UnaryOp::from_token("nope"), None);
}

#[test]
fn test_selector_text() {
    let query = Node::QueryReference {
        selector: "<div.item/>".to_string(),
    };
    assert_eq!(query.selector_text().as_deref(), Some("div.item"));

    let id = Node::IdSelector {
        value: "main".to_string(),
    };
    assert_eq!(id.selector_text().as_deref(), Some("#main"));

    let id = Node::IdSelector {
        value: "#main".to_string(),
    };
    assert_eq!(id.selector_text().as_deref(), Some("#main"));

    assert_eq!(Node::identifier("x").selector_text(), None);
}

#[test]
fn test_kind_names() {
    assert_eq!(Node::identifier("x").kind_name(), "identifier");
    assert_eq!(Node::array(vec![]).kind_name(), "arrayLiteral");
    assert_eq!(Node::Unsupported.kind_name(), "unsupported");
}

#[cfg(feature = "serde")]
mod json {
    use pretty_assertions::assert_eq;

    use crate::{BinaryOp, LiteralValue, Node, ObjectProperty, ScopeKind};

    #[test]
    fn test_binary_expression_from_json() {
        let node: Node = serde_json::from_str(
            r#"{"type":"binaryExpression","operator":"+",
                "left":{"type":"literal","value":"a"},
                "right":{"type":"literal","value":1}}"#,
        )
        .unwrap_or(Node::Unsupported);
        assert_eq!(
            node,
            Node::binary(BinaryOp::Add, Node::literal("a"), Node::literal(1))
        );
    }

    #[test]
    fn test_scoped_identifier_from_json() {
        let node: Node =
            serde_json::from_str(r#"{"type":"identifier","name":"x","scope":"global"}"#)
                .unwrap_or(Node::Unsupported);
        assert_eq!(node, Node::scoped_identifier("x", ScopeKind::Global));
    }

    #[test]
    fn test_object_literal_from_json() {
        let node: Node = serde_json::from_str(
            r#"{"type":"objectLiteral","properties":[
                {"key":{"type":"identifier","name":"x"},"value":{"type":"literal","value":1}}]}"#,
        )
        .unwrap_or(Node::Unsupported);
        assert_eq!(
            node,
            Node::ObjectLiteral {
                properties: vec![ObjectProperty {
                    key: Node::identifier("x"),
                    value: Node::literal(1),
                }],
            }
        );
    }

    #[test]
    fn test_literal_shapes() {
        let null: Node = serde_json::from_str(r#"{"type":"literal","value":null}"#)
            .unwrap_or(Node::Unsupported);
        assert_eq!(
            null,
            Node::Literal {
                value: LiteralValue::Null
            }
        );

        let missing: Node =
            serde_json::from_str(r#"{"type":"literal"}"#).unwrap_or(Node::Unsupported);
        assert_eq!(
            missing,
            Node::Literal {
                value: LiteralValue::Undefined
            }
        );
    }

    #[test]
    fn test_unknown_kind_is_unsupported() {
        let node: Node = serde_json::from_str(r#"{"type":"waitExpression"}"#)
            .unwrap_or(Node::literal("parse failed"));
        assert_eq!(node, Node::Unsupported);
    }

    #[test]
    fn test_untyped_objects_are_unsupported() {
        let node: Node =
            serde_json::from_str(r#"{"name":"x"}"#).unwrap_or(Node::literal("parse failed"));
        assert_eq!(node, Node::Unsupported);

        let nested: Node = serde_json::from_str(
            r#"{"type":"unaryExpression","operator":"not","argument":{}}"#,
        )
        .unwrap_or(Node::literal("parse failed"));
        assert_eq!(nested.kind_name(), "unaryExpression");
        let Node::UnaryExpression { argument, .. } = nested else {
            panic!("expected a unary expression");
        };
        assert_eq!(*argument, Node::Unsupported);
    }

    #[test]
    fn test_non_objects_are_rejected() {
        let parsed: Result<Node, _> = serde_json::from_str("42");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_unknown_operator_is_rejected() {
        let parsed: Result<Node, _> = serde_json::from_str(
            r#"{"type":"binaryExpression","operator":"<=>",
                "left":{"type":"literal","value":1},
                "right":{"type":"literal","value":2}}"#,
        );
        assert!(parsed.is_err());
    }
}
