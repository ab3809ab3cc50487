//! Tests for `Completion` and the context's control flags.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;

use loka_value::{unknown_function, ControlAction, ControlFlags, ControlFlowSignal, Value};

use crate::{Completion, ExecutionContext};

#[test]
fn values_and_signals_complete() {
    let done = Completion::from_result(Ok(Value::number(1.0))).unwrap();
    assert_eq!(done.value(), Some(&Value::number(1.0)));
    assert_eq!(done.signal(), None);
    assert!(!done.is_terminal());

    let stopped =
        Completion::from_result(Err(ControlFlowSignal::Exit(Value::string("bye")).into())).unwrap();
    assert_eq!(stopped.value(), None);
    assert_eq!(
        stopped.signal().and_then(ControlFlowSignal::payload),
        Some(&Value::string("bye"))
    );
    assert!(stopped.is_terminal());
}

#[test]
fn genuine_errors_are_not_completions() {
    let err = Completion::from_result(Err(unknown_function("nope").into())).unwrap_err();
    assert_eq!(err, unknown_function("nope"));
}

#[test]
fn loop_signals_are_not_terminal() {
    for signal in [ControlFlowSignal::Break, ControlFlowSignal::Continue] {
        assert!(!Completion::from(signal).is_terminal());
    }
    for signal in [
        ControlFlowSignal::Halt,
        ControlFlowSignal::Return(Value::Null),
    ] {
        assert!(Completion::from(signal).is_terminal());
    }
}

#[test]
fn into_result_restores_the_propagating_form() {
    assert_eq!(
        Completion::from(Value::Bool(true)).into_result(),
        Ok(Value::Bool(true))
    );
    assert_eq!(
        Completion::from(ControlFlowSignal::Break).into_result(),
        Err(ControlAction::Signal(ControlFlowSignal::Break))
    );
}

// Context flags

#[test]
fn pending_signal_follows_flag_precedence() {
    let mut ctx = ExecutionContext::new();
    assert_eq!(ctx.pending_signal(), None);

    ctx.set_result(Value::number(9.0));
    ctx.flags.insert(ControlFlags::CONTINUING);
    assert_eq!(ctx.pending_signal(), Some(ControlFlowSignal::Continue));

    ctx.flags.insert(ControlFlags::BREAKING);
    assert_eq!(ctx.pending_signal(), Some(ControlFlowSignal::Break));

    ctx.flags.insert(ControlFlags::RETURNING);
    assert_eq!(
        ctx.pending_signal(),
        Some(ControlFlowSignal::Return(Value::number(9.0)))
    );

    ctx.halt();
    assert!(ctx.is_halted());
    assert_eq!(ctx.pending_signal(), Some(ControlFlowSignal::Halt));
}

#[test]
fn async_flag_alone_is_not_a_signal() {
    let mut ctx = ExecutionContext::new();
    ctx.flags.insert(ControlFlags::ASYNC);
    assert_eq!(ctx.pending_signal(), None);
}

#[test]
fn signals_display_their_payload() {
    assert_eq!(ControlFlowSignal::Break.to_string(), "break");
    assert_eq!(
        ControlFlowSignal::Return(Value::number(3.0)).to_string(),
        "return(3)"
    );
}
