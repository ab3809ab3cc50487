//! Error and control-flow types for evaluation.
//!
//! # Structured Error Categories
//!
//! `EvalErrorKind` carries typed data for each failure. Factory functions
//! (e.g. `unknown_function()`) are the construction API; they are `#[cold]`
//! because every one of them sits on a failure path.
//!
//! Failures fall into four classes (see [`ErrorCategory`]): structural
//! errors mean the AST broke its contract, resolution errors mean a name or
//! operand could not be resolved, host errors come from the document, and
//! limit errors come from the evaluator's own resource limits.
//!
//! # Control Flow
//!
//! `halt`, `exit`, `break`, `continue` and `return` are not errors. They
//! travel as [`ControlAction::Signal`] alongside errors in the `Err` arm of
//! [`EvalResult`], so `?` unwinds both without any exception machinery.

use std::fmt;

use bitflags::bitflags;

use crate::host::DomError;
use crate::value::Value;

/// Result of evaluating one node.
pub type EvalResult = Result<Value, ControlAction>;

/// Typed failure kind.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalErrorKind {
    // Structural
    #[error("unsupported node kind `{kind}`")]
    UnsupportedNodeKind { kind: String },
    #[error("missing property name in {node}")]
    MissingPropertyName { node: String },
    #[error("invalid assignment target: expected an identifier, found {kind}")]
    InvalidAssignmentTarget { kind: String },
    #[error("unterminated template expression starting at offset {offset}")]
    UnterminatedTemplateExpression { offset: usize },
    #[error("invalid template expression `{text}`: {reason}")]
    InvalidTemplateExpression { text: String, reason: String },

    // Resolution
    #[error("unknown function `{name}`")]
    UnknownFunction { name: String },
    #[error("`{name}` is not a function")]
    NotAFunction { name: String },
    #[error("cannot scope a query to {type_name}: it is not a queryable element")]
    InvalidScopeOperand { type_name: String },
    #[error("cannot test membership in {type_name}")]
    InvalidMembershipOperand { type_name: String },

    // Host
    #[error("expression `{name}` failed: {message}")]
    ExpressionFailed { name: String, message: String },
    #[error("document error: {message}")]
    Dom { message: String },

    // Limits
    #[error("maximum evaluation depth exceeded (limit: {limit})")]
    DepthLimitExceeded { limit: usize },
    #[error("evaluation budget of {budget} nodes exhausted")]
    BudgetExhausted { budget: u64 },

    /// Catch-all for collaborator failures without a structured kind.
    #[error("{message}")]
    Custom { message: String },
}

/// Failure class, deciding how a command executor reacts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Malformed or unsupported AST; never recovered locally.
    Structural,
    /// A name or operand that did not resolve.
    Resolution,
    /// The host document or a collaborator failed.
    Host,
    /// A configured evaluation limit was hit.
    Limit,
}

/// Evaluation error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Context notes, innermost first (e.g. "while evaluating callExpression").
    pub notes: Vec<String>,
}

impl EvalError {
    /// Create an error with just a message.
    ///
    /// Uses `Custom` kind. Prefer the factory functions when a structured
    /// kind exists.
    pub fn new(message: impl Into<String>) -> Self {
        Self::from_kind(EvalErrorKind::Custom {
            message: message.into(),
        })
    }

    pub fn from_kind(kind: EvalErrorKind) -> Self {
        Self {
            kind,
            notes: Vec::new(),
        }
    }

    /// Add a context note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn category(&self) -> ErrorCategory {
        match self.kind {
            EvalErrorKind::UnsupportedNodeKind { .. }
            | EvalErrorKind::MissingPropertyName { .. }
            | EvalErrorKind::InvalidAssignmentTarget { .. }
            | EvalErrorKind::UnterminatedTemplateExpression { .. }
            | EvalErrorKind::InvalidTemplateExpression { .. } => ErrorCategory::Structural,
            EvalErrorKind::UnknownFunction { .. }
            | EvalErrorKind::NotAFunction { .. }
            | EvalErrorKind::InvalidScopeOperand { .. }
            | EvalErrorKind::InvalidMembershipOperand { .. } => ErrorCategory::Resolution,
            EvalErrorKind::ExpressionFailed { .. }
            | EvalErrorKind::Dom { .. }
            | EvalErrorKind::Custom { .. } => ErrorCategory::Host,
            EvalErrorKind::DepthLimitExceeded { .. } | EvalErrorKind::BudgetExhausted { .. } => {
                ErrorCategory::Limit
            }
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        for note in &self.notes {
            write!(f, "\n  note: {note}")?;
        }
        Ok(())
    }
}

impl std::error::Error for EvalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl From<EvalErrorKind> for EvalError {
    fn from(kind: EvalErrorKind) -> Self {
        Self::from_kind(kind)
    }
}

impl From<DomError> for EvalError {
    fn from(err: DomError) -> Self {
        Self::from_kind(EvalErrorKind::Dom {
            message: err.to_string(),
        })
    }
}

// Structural Errors

/// Node kind the evaluator has no arm for.
#[cold]
pub fn unsupported_node_kind(kind: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnsupportedNodeKind {
        kind: kind.to_string(),
    })
}

/// Member-style node without a usable property name.
#[cold]
pub fn missing_property_name(node: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MissingPropertyName {
        node: node.to_string(),
    })
}

#[cold]
pub fn invalid_assignment_target(kind: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidAssignmentTarget {
        kind: kind.to_string(),
    })
}

/// `${` without a matching `}`.
#[cold]
pub fn unterminated_template_expression(offset: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnterminatedTemplateExpression { offset })
}

#[cold]
pub fn invalid_template_expression(text: &str, reason: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidTemplateExpression {
        text: text.to_string(),
        reason: reason.into(),
    })
}

// Resolution Errors

#[cold]
pub fn unknown_function(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnknownFunction {
        name: name.to_string(),
    })
}

#[cold]
pub fn not_a_function(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotAFunction {
        name: name.to_string(),
    })
}

/// Right operand of a selector-scoped `in` cannot be queried.
#[cold]
pub fn invalid_scope_operand(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidScopeOperand {
        type_name: type_name.to_string(),
    })
}

/// Right operand of a generic `in` supports no membership test.
#[cold]
pub fn invalid_membership_operand(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidMembershipOperand {
        type_name: type_name.to_string(),
    })
}

// Host Errors

/// A registered expression implementation reported a failure.
#[cold]
pub fn expression_failed(name: &str, message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ExpressionFailed {
        name: name.to_string(),
        message: message.into(),
    })
}

// Limits

#[cold]
pub fn depth_limit_exceeded(limit: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DepthLimitExceeded { limit })
}

#[cold]
pub fn budget_exhausted(budget: u64) -> EvalError {
    EvalError::from_kind(EvalErrorKind::BudgetExhausted { budget })
}

// Control Flow

/// Non-local control transfer raised by commands.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlFlowSignal {
    /// Stop the whole handler.
    Halt,
    /// Leave the current handler, carrying its return value.
    Exit(Value),
    Break,
    Continue,
    /// Return from the enclosing function with a value.
    Return(Value),
}

impl ControlFlowSignal {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Halt => "halt",
            Self::Exit(_) => "exit",
            Self::Break => "break",
            Self::Continue => "continue",
            Self::Return(_) => "return",
        }
    }

    /// The carried value of `exit`/`return`.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Exit(value) | Self::Return(value) => Some(value),
            Self::Halt | Self::Break | Self::Continue => None,
        }
    }

    /// Whether the signal ends the command sequence rather than a loop
    /// iteration.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Halt | Self::Exit(_) | Self::Return(_))
    }

    /// The signal equivalent to flags set by a collaborator.
    ///
    /// `HALTED` wins over `RETURNING`, which wins over the loop flags.
    /// `return_value` is the payload used for `RETURNING`.
    pub fn from_flags(flags: ControlFlags, return_value: Value) -> Option<Self> {
        if flags.contains(ControlFlags::HALTED) {
            Some(Self::Halt)
        } else if flags.contains(ControlFlags::RETURNING) {
            Some(Self::Return(return_value))
        } else if flags.contains(ControlFlags::BREAKING) {
            Some(Self::Break)
        } else if flags.contains(ControlFlags::CONTINUING) {
            Some(Self::Continue)
        } else {
            None
        }
    }
}

impl fmt::Display for ControlFlowSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.payload() {
            Some(value) => write!(f, "{}({value})", self.kind_name()),
            None => f.write_str(self.kind_name()),
        }
    }
}

bitflags! {
    /// Control-flow state of an execution context, set by collaborators.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ControlFlags: u8 {
        const HALTED = 1;
        const BREAKING = 1 << 1;
        const CONTINUING = 1 << 2;
        const RETURNING = 1 << 3;
        /// An asynchronous command is in flight.
        const ASYNC = 1 << 4;
    }
}

/// Why evaluation stopped without a value.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlAction {
    Signal(ControlFlowSignal),
    Error(Box<EvalError>),
}

impl ControlAction {
    pub fn is_signal(&self) -> bool {
        matches!(self, Self::Signal(_))
    }

    /// The error, or `None` for a control-flow signal.
    pub fn into_error(self) -> Option<EvalError> {
        match self {
            Self::Error(err) => Some(*err),
            Self::Signal(_) => None,
        }
    }
}

impl From<EvalError> for ControlAction {
    fn from(err: EvalError) -> Self {
        Self::Error(Box::new(err))
    }
}

impl From<ControlFlowSignal> for ControlAction {
    fn from(signal: ControlFlowSignal) -> Self {
        Self::Signal(signal)
    }
}

impl From<DomError> for ControlAction {
    fn from(err: DomError) -> Self {
        Self::Error(Box::new(err.into()))
    }
}

impl fmt::Display for ControlAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signal(signal) => write!(f, "control flow: {signal}"),
            Self::Error(err) => write!(f, "{err}"),
        }
    }
}

#[cfg(test)]
mod tests;
