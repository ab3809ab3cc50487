use pretty_assertions::assert_eq;

use super::*;

// Kind → message

#[test]
fn unsupported_node_kind_has_correct_kind() {
    let err = unsupported_node_kind("waitExpression");
    assert_eq!(
        err.kind,
        EvalErrorKind::UnsupportedNodeKind {
            kind: "waitExpression".to_string()
        }
    );
    assert_eq!(err.to_string(), "unsupported node kind `waitExpression`");
}

#[test]
fn unknown_function_has_correct_kind() {
    let err = unknown_function("frobnicate");
    assert_eq!(
        err.kind,
        EvalErrorKind::UnknownFunction {
            name: "frobnicate".to_string()
        }
    );
    assert_eq!(err.to_string(), "unknown function `frobnicate`");
}

#[test]
fn unterminated_template_reports_offset() {
    let err = unterminated_template_expression(7);
    assert_eq!(
        err.to_string(),
        "unterminated template expression starting at offset 7"
    );
}

#[test]
fn notes_are_rendered_after_message() {
    let err = not_a_function("value").with_note("while evaluating callExpression");
    assert_eq!(
        err.to_string(),
        "`value` is not a function\n  note: while evaluating callExpression"
    );
}

#[test]
fn dom_errors_convert() {
    let err: EvalError = DomError::InvalidSelector("..".to_string()).into();
    assert_eq!(
        err.kind,
        EvalErrorKind::Dom {
            message: "invalid selector `..`".to_string()
        }
    );
    assert_eq!(err.category(), ErrorCategory::Host);
}

// Categories

#[test]
fn structural_errors_are_classified() {
    assert_eq!(
        unsupported_node_kind("x").category(),
        ErrorCategory::Structural
    );
    assert_eq!(
        invalid_assignment_target("literal").category(),
        ErrorCategory::Structural
    );
    assert_eq!(
        missing_property_name("memberExpression").category(),
        ErrorCategory::Structural
    );
    assert_eq!(
        unterminated_template_expression(0).category(),
        ErrorCategory::Structural
    );
}

#[test]
fn resolution_errors_are_classified() {
    assert_eq!(unknown_function("f").category(), ErrorCategory::Resolution);
    assert_eq!(not_a_function("f").category(), ErrorCategory::Resolution);
    assert_eq!(
        invalid_scope_operand("number").category(),
        ErrorCategory::Resolution
    );
    assert_eq!(
        invalid_membership_operand("number").category(),
        ErrorCategory::Resolution
    );
}

#[test]
fn limit_errors_are_classified() {
    assert_eq!(depth_limit_exceeded(10).category(), ErrorCategory::Limit);
    assert_eq!(budget_exhausted(5).category(), ErrorCategory::Limit);
    assert_eq!(EvalError::new("boom").category(), ErrorCategory::Host);
}

// ControlFlowSignal tests

#[test]
fn signal_payloads() {
    let ret = ControlFlowSignal::Return(Value::number(42.0));
    assert_eq!(ret.payload(), Some(&Value::number(42.0)));
    assert_eq!(ret.kind_name(), "return");
    assert!(ret.is_terminal());

    assert_eq!(ControlFlowSignal::Break.payload(), None);
    assert!(!ControlFlowSignal::Continue.is_terminal());
    assert_eq!(
        ControlFlowSignal::Exit(Value::string("done")).to_string(),
        "exit(done)"
    );
}

#[test]
fn signal_from_flags_precedence() {
    let flags = ControlFlags::HALTED | ControlFlags::RETURNING;
    assert_eq!(
        ControlFlowSignal::from_flags(flags, Value::Undefined),
        Some(ControlFlowSignal::Halt)
    );

    let flags = ControlFlags::RETURNING | ControlFlags::BREAKING;
    assert_eq!(
        ControlFlowSignal::from_flags(flags, Value::number(1.0)),
        Some(ControlFlowSignal::Return(Value::number(1.0)))
    );

    assert_eq!(
        ControlFlowSignal::from_flags(ControlFlags::CONTINUING, Value::Undefined),
        Some(ControlFlowSignal::Continue)
    );
    assert_eq!(
        ControlFlowSignal::from_flags(ControlFlags::ASYNC, Value::Undefined),
        None
    );
}

// ControlAction tests

#[test]
fn control_action_from_signal_and_error() {
    let action: ControlAction = ControlFlowSignal::Break.into();
    assert!(action.is_signal());
    assert_eq!(action.into_error(), None);

    let action: ControlAction = unknown_function("f").into();
    assert!(!action.is_signal());
    assert_eq!(action.into_error(), Some(unknown_function("f")));
}

#[test]
fn question_mark_propagates_signals() {
    fn inner() -> EvalResult {
        Err(ControlFlowSignal::Return(Value::number(1.0)).into())
    }
    fn outer() -> EvalResult {
        let value = inner()?;
        Ok(Value::array(vec![value]))
    }

    assert_eq!(
        outer(),
        Err(ControlAction::Signal(ControlFlowSignal::Return(
            Value::number(1.0)
        )))
    );
}
