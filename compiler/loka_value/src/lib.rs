//! Loka Value - runtime values, host interfaces, and error types.
//!
//! This crate provides:
//! - Runtime value types (`Value`, `FunctionValue`)
//! - Host document traits (`Host`, `Element`) the evaluator calls into
//! - Evaluation error types (`EvalError`, `EvalErrorKind`, `EvalResult`)
//! - Control-flow signal types (`ControlFlowSignal`, `ControlFlags`, `ControlAction`)
//!
//! # Value Types
//!
//! Arrays and objects are shared, mutable and reference-counted with `Rc`;
//! everything here is single-threaded, matching the runtime's cooperative
//! evaluation model.

mod errors;
mod host;
mod value;

pub use errors::{
    ControlAction, ControlFlags, ControlFlowSignal, ErrorCategory, EvalError, EvalErrorKind,
    EvalResult,
};
pub use host::{DomError, Element, ElementRef, Host, NoHost};
pub use value::{
    format_number, parse_number, str_to_number, ArrayRef, FunctionValue, Invocation, NativeFn,
    ObjectRef, Value,
};

// Re-export error constructors for use by other crates
pub use errors::{
    budget_exhausted, depth_limit_exceeded, expression_failed, invalid_assignment_target,
    invalid_membership_operand, invalid_scope_operand, invalid_template_expression,
    missing_property_name, not_a_function, unknown_function, unsupported_node_kind,
    unterminated_template_expression,
};
