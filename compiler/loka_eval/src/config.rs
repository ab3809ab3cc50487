//! Evaluator configuration.

/// Policy knobs for one evaluator.
///
/// The defaults suit a page: unlimited nesting on native targets (the stack
/// grows on demand), a fixed ceiling on wasm32, no node budget, and template
/// interpolation on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalConfig {
    /// Maximum nesting depth of one evaluation, `None` for unlimited.
    pub max_depth: Option<usize>,
    /// Maximum nodes visited per top-level evaluation, `None` for unlimited.
    pub node_budget: Option<u64>,
    /// When false, template literals evaluate to their raw text.
    pub interpolate_templates: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            max_depth: default_max_depth(),
            node_budget: None,
            interpolate_templates: true,
        }
    }
}

impl EvalConfig {
    pub fn new() -> Self {
        EvalConfig::default()
    }

    #[must_use]
    pub fn max_depth(mut self, limit: Option<usize>) -> Self {
        self.max_depth = limit;
        self
    }

    /// Cap the number of nodes a single top-level evaluation may visit.
    ///
    /// Meant for hosts that run untrusted handlers.
    #[must_use]
    pub fn node_budget(mut self, budget: Option<u64>) -> Self {
        self.node_budget = budget;
        self
    }

    #[must_use]
    pub fn interpolate_templates(mut self, enabled: bool) -> Self {
        self.interpolate_templates = enabled;
        self
    }
}

/// `None` on native (stacker grows the stack), 200 on wasm32.
#[inline]
fn default_max_depth() -> Option<usize> {
    #[cfg(target_arch = "wasm32")]
    {
        Some(200)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        None
    }
}
