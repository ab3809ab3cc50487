//! Tagged completion for the result-wrapping entry point.
//!
//! Inside the evaluator a control-flow signal travels as
//! `Err(ControlAction::Signal(..))` so `?` unwinds sibling evaluation.
//! Command executors running hot loops prefer a value they can match on
//! without treating signals as failures; [`Completion`] is that value.

use loka_value::{ControlAction, ControlFlowSignal, EvalError, EvalResult, Value};

/// Outcome of an evaluation that finished without a genuine error.
#[derive(Clone, Debug, PartialEq)]
pub enum Completion {
    Value(Value),
    Signal(ControlFlowSignal),
}

impl Completion {
    /// Split an evaluation result into a completion or a genuine error.
    pub fn from_result(result: EvalResult) -> Result<Self, EvalError> {
        match result {
            Ok(value) => Ok(Completion::Value(value)),
            Err(ControlAction::Signal(signal)) => Ok(Completion::Signal(signal)),
            Err(ControlAction::Error(err)) => Err(*err),
        }
    }

    /// Back to the propagating form.
    pub fn into_result(self) -> EvalResult {
        match self {
            Completion::Value(value) => Ok(value),
            Completion::Signal(signal) => Err(ControlAction::Signal(signal)),
        }
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Completion::Value(value) => Some(value),
            Completion::Signal(_) => None,
        }
    }

    pub fn signal(&self) -> Option<&ControlFlowSignal> {
        match self {
            Completion::Signal(signal) => Some(signal),
            Completion::Value(_) => None,
        }
    }

    /// Whether a command sequence must stop here.
    pub fn is_terminal(&self) -> bool {
        self.signal().is_some_and(ControlFlowSignal::is_terminal)
    }
}

impl From<Value> for Completion {
    fn from(value: Value) -> Self {
        Completion::Value(value)
    }
}

impl From<ControlFlowSignal> for Completion {
    fn from(signal: ControlFlowSignal) -> Self {
        Completion::Signal(signal)
    }
}
