//! `EvaluatorBuilder` for assembling an [`Evaluator`].

use std::rc::Rc;

use loka_value::{Host, NoHost};

use super::Evaluator;
use crate::config::EvalConfig;
use crate::registry::ExpressionRegistry;
use crate::shared::SharedRegistry;

/// Builder for evaluators.
///
/// Collaborators populate an [`ExpressionRegistry`] first; `build` freezes it
/// into a shared read-only handle. Without a host the evaluator sees an
/// empty document with no globals.
#[derive(Default)]
pub struct EvaluatorBuilder {
    registry: Option<SharedRegistry>,
    host: Option<Rc<dyn Host>>,
    config: EvalConfig,
}

impl EvaluatorBuilder {
    pub fn new() -> Self {
        EvaluatorBuilder::default()
    }

    /// Use `registry`, freezing it at build time.
    #[must_use]
    pub fn registry(mut self, registry: ExpressionRegistry) -> Self {
        self.registry = Some(SharedRegistry::freeze(registry));
        self
    }

    /// Share an already frozen registry with other evaluators.
    #[must_use]
    pub fn shared_registry(mut self, registry: SharedRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    #[must_use]
    pub fn host(mut self, host: Rc<dyn Host>) -> Self {
        self.host = Some(host);
        self
    }

    #[must_use]
    pub fn config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Evaluator {
        let registry = self
            .registry
            .unwrap_or_else(|| SharedRegistry::freeze(ExpressionRegistry::new()));
        let host = self.host.unwrap_or_else(|| Rc::new(NoHost));
        tracing::debug!(
            expressions = registry.len(),
            max_depth = ?self.config.max_depth,
            node_budget = ?self.config.node_budget,
            "evaluator assembled"
        );
        Evaluator {
            registry,
            host,
            config: self.config,
        }
    }
}
