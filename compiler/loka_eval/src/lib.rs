//! Loka Eval - the expression evaluator of the Loka document runtime.
//!
//! Evaluates parsed expression trees ([`loka_ir::Node`]) against an
//! [`ExecutionContext`] and a host document ([`loka_value::Host`]).
//!
//! # Architecture
//!
//! - [`Evaluator`]: the recursive node evaluator, built with
//!   [`EvaluatorBuilder`] from an [`ExpressionRegistry`], a host and an
//!   [`EvalConfig`]
//! - [`ExecutionContext`] / [`Environment`]: pronouns, event, layered scopes
//!   and control flags
//! - [`evaluate_binary`] / [`evaluate_unary`]: operator semantics on
//!   evaluated operands, with document-object coercion ([`coerce_operand`])
//! - [`Completion`]: the tagged form of control-flow signals
//!
//! ```text
//! let evaluator = Evaluator::builder().registry(registry).host(host).build();
//! let mut ctx = ExecutionContext::for_subject(button);
//! let value = block_on(evaluator.evaluate(&node, &mut ctx))?;
//! ```

mod coerce;
mod config;
mod context;
mod control;
mod environment;
pub mod interpreter;
mod members;
mod operators;
mod registry;
mod shared;
mod soft;
pub mod template;
mod unary_operators;

pub use coerce::coerce_operand;
pub use config::EvalConfig;
pub use context::ExecutionContext;
pub use control::Completion;
pub use environment::{Environment, LocalScope, Scope};
pub use interpreter::{Evaluator, EvaluatorBuilder};
pub use members::{get_property, is_array_native};
pub use operators::evaluate_binary;
pub use registry::{
    Diagnostic, Expression, ExpressionCategory, ExpressionRegistry, FnExpression, RegistryError,
};
pub use shared::SharedRegistry;
pub use unary_operators::evaluate_unary;

// Re-export value types from loka_value
pub use loka_value::{
    ControlAction, ControlFlags, ControlFlowSignal, ErrorCategory, EvalError, EvalErrorKind,
    EvalResult, FunctionValue, Host, Value,
};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=loka_eval=debug` or
/// `RUST_LOG=loka_eval=trace` (per-node spans).
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}

#[cfg(test)]
mod tests;
