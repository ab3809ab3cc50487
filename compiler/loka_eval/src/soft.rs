//! The single place where failures turn into `false`.
//!
//! `matches`, `has`, `contains` and their negations answer questions about
//! the document; a malformed selector or an operand of the wrong shape is a
//! "no", not an error. Control-flow signals still propagate.

use loka_ir::BinaryOp;
use loka_value::{ControlAction, EvalResult, Value};

/// Map a genuine error from a soft operator to `false`. Errors from any
/// other operator pass through.
pub fn or_false(op: BinaryOp, result: EvalResult) -> EvalResult {
    match result {
        Err(ControlAction::Error(err)) if is_soft(op) => {
            tracing::trace!(operator = %op, error = %err, "soft failure swallowed");
            Ok(Value::Bool(false))
        }
        other => other,
    }
}

/// Whether failures of `op` are swallowed.
pub const fn is_soft(op: BinaryOp) -> bool {
    matches!(
        op,
        BinaryOp::Matches
            | BinaryOp::NotMatches
            | BinaryOp::Has
            | BinaryOp::NotHas
            | BinaryOp::Contains
            | BinaryOp::NotContains
    )
}
