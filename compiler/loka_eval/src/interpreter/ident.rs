//! Identifier resolution and assignment.
//!
//! Lookup order for a bare name:
//!
//! 1. pronouns (`me`/`my`/`I`, `you`/`your`, `it`/`its`/`result`)
//! 2. `Reference` expressions in the registry
//! 3. by annotation:
//!    - `local`: the local scope only
//!    - `global`: the global scope, then the host's global namespace
//!    - none: local, global, general variables, host global namespace
//!
//! Anything unresolved is `undefined`.

use loka_ir::{Node, ScopeKind};
use loka_value::{invalid_assignment_target, EvalResult, Value};

use super::Evaluator;
use crate::context::ExecutionContext;

impl Evaluator {
    pub(super) async fn eval_identifier(
        &self,
        name: &str,
        scope: Option<ScopeKind>,
        ctx: &mut ExecutionContext,
    ) -> EvalResult {
        if let Some(value) = ctx.pronoun(name) {
            return Ok(value.clone());
        }
        if let Some(reference) = self.registry.reference(name) {
            return reference.evaluate(ctx, Vec::new()).await;
        }
        Ok(self.lookup(name, scope, ctx).unwrap_or_default())
    }

    /// Scope-chain lookup without pronouns or registry references.
    pub(super) fn lookup(
        &self,
        name: &str,
        scope: Option<ScopeKind>,
        ctx: &ExecutionContext,
    ) -> Option<Value> {
        match scope {
            Some(ScopeKind::Local) => ctx.env.lookup_local(name),
            Some(ScopeKind::Global) => ctx
                .env
                .lookup_global(name)
                .or_else(|| self.host.global(name)),
            None => ctx.env.lookup(name).or_else(|| self.host.global(name)),
        }
    }

    /// `target = value`. The target must be a bare identifier.
    ///
    /// An explicit `local`/`global` annotation writes to that scope;
    /// `result`/`it` and `you` write the pronouns; every other name goes to
    /// the general-variables scope. Returns the assigned value.
    pub(super) async fn eval_assignment(
        &self,
        target: &Node,
        value: &Node,
        ctx: &mut ExecutionContext,
    ) -> EvalResult {
        let Node::Identifier { name, scope } = target else {
            return Err(invalid_assignment_target(target.kind_name()).into());
        };
        let value = self.evaluate(value, ctx).await?;
        match (scope, name.as_str()) {
            (Some(ScopeKind::Local), _) => ctx.set_local(name.as_str(), value.clone()),
            (Some(ScopeKind::Global), _) => ctx.set_global(name.as_str(), value.clone()),
            (None, "result" | "it") => ctx.it = value.clone(),
            (None, "you") => ctx.you = value.clone(),
            (None, _) => ctx.set_variable(name.as_str(), value.clone()),
        }
        Ok(value)
    }

    /// `$name`: the global scope, then the host's global namespace.
    pub(super) fn eval_dollar(&self, name: &str, ctx: &ExecutionContext) -> Value {
        let name = name.strip_prefix('$').unwrap_or(name);
        self.lookup(name, Some(ScopeKind::Global), ctx)
            .unwrap_or_default()
    }
}
