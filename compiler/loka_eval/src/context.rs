//! Execution context threaded through every evaluation.

use loka_value::{ControlFlags, ControlFlowSignal, Value};

use crate::environment::{Environment, LocalScope, Scope};

/// Mutable evaluation state: pronouns, scopes, triggering event, control
/// flags.
///
/// One context is evaluated by at most one evaluation at a time; the
/// evaluator takes `&mut ExecutionContext` for the whole recursion.
#[derive(Clone, Debug, Default)]
pub struct ExecutionContext {
    /// The active subject (`me`, `my`, `I`).
    pub me: Value,
    /// The active object (`you`, `your`).
    pub you: Value,
    /// The last result (`it`, `its`, `result`).
    pub it: Value,
    /// The triggering event inside an event handler.
    pub event: Option<Value>,
    pub env: Environment,
    /// Set by collaborators; the evaluator stops recursing once `HALTED`.
    pub flags: ControlFlags,
    pub(crate) depth: usize,
    pub(crate) nodes_evaluated: u64,
}

impl ExecutionContext {
    pub fn new() -> Self {
        ExecutionContext::default()
    }

    /// A context whose subject is `me`.
    pub fn for_subject(me: Value) -> Self {
        ExecutionContext {
            me,
            ..ExecutionContext::default()
        }
    }

    /// A context sharing an existing global scope.
    pub fn with_global(global: LocalScope<Scope>) -> Self {
        ExecutionContext {
            env: Environment::with_global(global),
            ..ExecutionContext::default()
        }
    }

    #[must_use]
    pub fn with_me(mut self, me: Value) -> Self {
        self.me = me;
        self
    }

    #[must_use]
    pub fn with_you(mut self, you: Value) -> Self {
        self.you = you;
        self
    }

    #[must_use]
    pub fn with_event(mut self, event: Value) -> Self {
        self.event = Some(event);
        self
    }

    /// Context for a nested invocation: fresh local scope, shared global and
    /// general-variables scopes, same pronouns and event, cleared flags.
    #[must_use]
    pub fn child(&mut self) -> Self {
        ExecutionContext {
            me: self.me.clone(),
            you: self.you.clone(),
            it: self.it.clone(),
            event: self.event.clone(),
            env: self.env.child(),
            flags: ControlFlags::empty(),
            depth: 0,
            nodes_evaluated: 0,
        }
    }

    /// The `result` pronoun; an alias of `it`.
    pub fn result(&self) -> &Value {
        &self.it
    }

    pub fn set_result(&mut self, value: Value) {
        self.it = value;
    }

    /// The pronoun reference `name` stands for, if it is one.
    pub fn pronoun(&self, name: &str) -> Option<&Value> {
        match name {
            "me" | "my" | "I" => Some(&self.me),
            "you" | "your" => Some(&self.you),
            "it" | "its" | "result" => Some(&self.it),
            _ => None,
        }
    }

    pub fn is_halted(&self) -> bool {
        self.flags.contains(ControlFlags::HALTED)
    }

    pub fn halt(&mut self) {
        self.flags.insert(ControlFlags::HALTED);
    }

    /// The signal equivalent to the current flags, using `it` as the
    /// return payload.
    pub fn pending_signal(&self) -> Option<ControlFlowSignal> {
        ControlFlowSignal::from_flags(self.flags, self.it.clone())
    }

    /// Current nesting depth of the evaluation in progress.
    pub fn depth(&self) -> usize {
        self.depth
    }

    // Scope shorthands

    pub fn set_local(&mut self, name: impl Into<String>, value: Value) {
        self.env.set_local(name, value);
    }

    pub fn set_global(&self, name: impl Into<String>, value: Value) {
        self.env.set_global(name, value);
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: Value) {
        self.env.set_variable(name, value);
    }
}
