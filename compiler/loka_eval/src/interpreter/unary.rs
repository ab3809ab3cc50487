//! Unary operators.
//!
//! `not`, `no`, `exists` and `does not exist` go to a registered
//! implementation when one exists; everything else, and the fallback, is
//! [`evaluate_unary`].

use loka_ir::{Node, UnaryOp};
use loka_value::EvalResult;

use super::Evaluator;
use crate::context::ExecutionContext;
use crate::unary_operators::{evaluate_unary, registry_name};

impl Evaluator {
    pub(super) async fn eval_unary(
        &self,
        op: UnaryOp,
        argument: &Node,
        ctx: &mut ExecutionContext,
    ) -> EvalResult {
        let value = self.evaluate(argument, ctx).await?;
        if let Some(expression) = registry_name(op).and_then(|name| self.registry.get(name)) {
            return expression.evaluate(ctx, vec![value]).await;
        }
        Ok(evaluate_unary(&value, op))
    }
}
