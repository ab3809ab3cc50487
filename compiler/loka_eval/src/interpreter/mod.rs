//! Tree-walking evaluator for Loka expressions.
//!
//! # Architecture
//!
//! All evaluation goes through [`Evaluator::evaluate`], which guards the
//! recursion (halt flag, depth limit, node budget, stack growth) and hands
//! the node to `dispatch`. Dispatch is one exhaustive match over
//! [`Node`]; the arms live in helper modules:
//!
//! - `ident` - identifiers, scoped lookup, assignment
//! - `binary` / `unary` - operators that need the operand *nodes*
//! - `member` - property reads, possessives, attribute access
//! - `call` - function, method and constructor calls
//! - `selectors` - document queries, context references, positionals
//!
//! Operators that only need evaluated operands are in
//! [`crate::operators`] and [`crate::unary_operators`].
//!
//! # Suspension
//!
//! Every step returns a `LocalBoxFuture`: registered expressions may
//! suspend, so sub-evaluation is awaited in the order each construct
//! documents, strictly sequentially. The futures are `!Send`; one context
//! is evaluated on one logical thread.
//!
//! # Control flow
//!
//! Signals raised by collaborators travel as `Err(ControlAction::Signal)`
//! and `?` unwinds sibling evaluation. [`Evaluator::evaluate_with_result`]
//! turns them back into a tagged [`Completion`] for command executors.

mod binary;
mod builder;
mod call;
mod dispatch;
mod ident;
mod member;
mod selectors;
mod unary;

pub use builder::EvaluatorBuilder;

use std::fmt;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture};

use loka_ir::Node;
use loka_stack::grow_on_poll;
use loka_value::{
    budget_exhausted, depth_limit_exceeded, ControlFlowSignal, EvalError, EvalResult, Host,
    Value,
};

use crate::config::EvalConfig;
use crate::context::ExecutionContext;
use crate::control::Completion;
use crate::registry::{Diagnostic, ExpressionRegistry};
use crate::shared::SharedRegistry;

/// The evaluator: a frozen expression registry, the host document, and a
/// configuration. Cheap to clone.
#[derive(Clone)]
pub struct Evaluator {
    registry: SharedRegistry,
    host: Rc<dyn Host>,
    config: EvalConfig,
}

impl Evaluator {
    /// An evaluator with the default configuration.
    pub fn new(registry: ExpressionRegistry, host: Rc<dyn Host>) -> Self {
        EvaluatorBuilder::new().registry(registry).host(host).build()
    }

    pub fn builder() -> EvaluatorBuilder {
        EvaluatorBuilder::new()
    }

    /// Evaluate `node` in `ctx`.
    ///
    /// Refuses to start when `ctx` is halted (yields the `halt` signal).
    /// Fails with `DepthLimitExceeded` / `BudgetExhausted` when the
    /// configured limits are hit.
    pub fn evaluate<'a>(
        &'a self,
        node: &'a Node,
        ctx: &'a mut ExecutionContext,
    ) -> LocalBoxFuture<'a, EvalResult> {
        grow_on_poll(async move {
            if ctx.is_halted() {
                return Err(ControlFlowSignal::Halt.into());
            }
            if ctx.depth == 0 {
                ctx.nodes_evaluated = 0;
            }
            self.check_limits(ctx)?;
            ctx.depth += 1;
            let result = self.dispatch(node, ctx).await;
            ctx.depth -= 1;
            result
        })
        .boxed_local()
    }

    /// Evaluate an optional node; a missing node is `null`.
    pub fn evaluate_optional<'a>(
        &'a self,
        node: Option<&'a Node>,
        ctx: &'a mut ExecutionContext,
    ) -> LocalBoxFuture<'a, EvalResult> {
        match node {
            Some(node) => self.evaluate(node, ctx),
            None => futures::future::ready(Ok(Value::Null)).boxed_local(),
        }
    }

    /// Evaluate `node`, returning control-flow signals as a tagged
    /// [`Completion`] instead of propagating them. Genuine errors are
    /// returned unchanged.
    pub fn evaluate_with_result<'a>(
        &'a self,
        node: &'a Node,
        ctx: &'a mut ExecutionContext,
    ) -> LocalBoxFuture<'a, Result<Completion, EvalError>> {
        async move { Completion::from_result(self.evaluate(node, ctx).await) }.boxed_local()
    }

    // Registry introspection

    pub fn has_expression(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Registered expression names, sorted.
    pub fn available_expressions(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Run the validator of the expression registered as `name`.
    pub fn validate(&self, name: &str, args: &[Value]) -> Option<Diagnostic> {
        self.registry.validate(name, args)
    }

    pub fn registry(&self) -> &ExpressionRegistry {
        &self.registry
    }

    /// A handle to this evaluator's frozen registry, for building siblings.
    pub fn shared_registry(&self) -> SharedRegistry {
        self.registry.clone()
    }

    pub fn host(&self) -> &dyn Host {
        &*self.host
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    fn check_limits(&self, ctx: &mut ExecutionContext) -> Result<(), EvalError> {
        if let Some(limit) = self.config.max_depth {
            if ctx.depth >= limit {
                return Err(depth_limit_exceeded(limit));
            }
        }
        ctx.nodes_evaluated += 1;
        if let Some(budget) = self.config.node_budget {
            if ctx.nodes_evaluated > budget {
                return Err(budget_exhausted(budget));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluator")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
