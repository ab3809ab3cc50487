//! Call expressions.
//!
//! Three shapes:
//!
//! - `new Name(args)`: a constructor from the global scope or the host
//! - `receiver.method(args)`: method call, bound to the receiver
//! - `name(args)`: the expression registry first, then the scope chain and
//!   the host's global namespace

use loka_ir::{Node, ScopeKind};
use loka_value::{
    expression_failed, not_a_function, unknown_function, ControlAction, EvalError, EvalResult,
    FunctionValue, Value,
};

use super::member::read_member;
use super::Evaluator;
use crate::context::ExecutionContext;
use crate::members::is_array_native;

/// Registered functions that take a selector argument as its text instead
/// of the elements it would find.
const RAW_SELECTOR_FUNCTIONS: &[&str] = &[
    "closest",
    "first",
    "last",
    "querySelector",
    "querySelectorAll",
    "matches",
    "next",
    "previous",
];

impl Evaluator {
    pub(super) async fn eval_constructor(
        &self,
        callee: &Node,
        arguments: &[Node],
        ctx: &mut ExecutionContext,
    ) -> EvalResult {
        let constructor = match callee {
            Node::Identifier { name, .. } => {
                let value = self
                    .lookup(name, Some(ScopeKind::Global), ctx)
                    .ok_or_else(|| unknown_function(name))?;
                expect_function(value, name)?
            }
            other => {
                let value = self.evaluate(other, ctx).await?;
                expect_function(value, other.kind_name())?
            }
        };
        let args = self.eval_arguments(arguments, ctx).await?;
        tracing::debug!(constructor = constructor.name(), args = args.len(), "construct");
        Ok(constructor
            .construct(&args)
            .map_err(|err| in_call(err, constructor.name()))?)
    }

    pub(super) async fn eval_call(
        &self,
        callee: &Node,
        arguments: &[Node],
        ctx: &mut ExecutionContext,
    ) -> EvalResult {
        match callee {
            Node::MemberExpression {
                object,
                property,
                computed,
            } => {
                let receiver = self.evaluate(object, ctx).await?;
                let name = self
                    .member_name(property, *computed, "memberExpression", ctx)
                    .await?;
                self.eval_method_call(receiver, &name, arguments, ctx).await
            }
            Node::PropertyAccess { object, property } => {
                let receiver = self.evaluate(object, ctx).await?;
                self.eval_method_call(receiver, property, arguments, ctx)
                    .await
            }
            Node::Identifier { name, .. } => self.eval_named_call(name, arguments, ctx).await,
            other => {
                let value = self.evaluate(other, ctx).await?;
                let function = expect_function(value, other.kind_name())?;
                let args = self.eval_arguments(arguments, ctx).await?;
                Ok(function
                    .call(&args)
                    .map_err(|err| in_call(err, function.name()))?)
            }
        }
    }

    /// `receiver.method(args)` with the receiver (and a computed method
    /// name) already evaluated; the arguments come last.
    async fn eval_method_call(
        &self,
        receiver: Value,
        method: &str,
        arguments: &[Node],
        ctx: &mut ExecutionContext,
    ) -> EvalResult {
        let receiver = if is_array_native(method) {
            receiver
        } else {
            receiver.single_item().unwrap_or(receiver)
        };
        let method_value = read_member(&receiver, method, true);
        let Value::Function(function) = method_value else {
            return Err(not_a_function(method).into());
        };
        let args = self.eval_arguments(arguments, ctx).await?;
        tracing::debug!(
            method,
            receiver = receiver.type_name(),
            args = args.len(),
            "method call"
        );
        Ok(function.call(&args).map_err(|err| in_call(err, method))?)
    }

    /// `name(args)`.
    async fn eval_named_call(
        &self,
        name: &str,
        arguments: &[Node],
        ctx: &mut ExecutionContext,
    ) -> EvalResult {
        if let Some(expression) = self.registry.get(name) {
            let raw_selectors = RAW_SELECTOR_FUNCTIONS.contains(&name);
            let mut args = Vec::with_capacity(arguments.len());
            for argument in arguments {
                let value = match argument.selector_text() {
                    Some(selector) if raw_selectors => Value::string(selector),
                    _ => self.evaluate(argument, ctx).await?,
                };
                args.push(value);
            }
            if let Some(diagnostic) = expression.validate(&args) {
                return Err(expression_failed(name, diagnostic.to_string()).into());
            }
            tracing::debug!(name, args = args.len(), "registered expression call");
            return expression.evaluate(ctx, args).await;
        }

        let value = self.lookup(name, None, ctx).ok_or_else(|| unknown_function(name))?;
        let function = expect_function(value, name)?;
        let args = self.eval_arguments(arguments, ctx).await?;
        tracing::debug!(name, args = args.len(), "function call");
        Ok(function.call(&args).map_err(|err| in_call(err, name))?)
    }

    /// Arguments, left to right.
    async fn eval_arguments(
        &self,
        arguments: &[Node],
        ctx: &mut ExecutionContext,
    ) -> Result<Vec<Value>, ControlAction> {
        let mut args = Vec::with_capacity(arguments.len());
        for argument in arguments {
            args.push(self.evaluate(argument, ctx).await?);
        }
        Ok(args)
    }
}

fn expect_function(value: Value, name: &str) -> Result<FunctionValue, EvalError> {
    match value {
        Value::Function(function) => Ok(function),
        _ => Err(not_a_function(name)),
    }
}

fn in_call(err: EvalError, name: &str) -> EvalError {
    err.with_note(format!("in call to `{name}`"))
}
