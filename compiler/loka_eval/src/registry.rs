//! Expression registry: pluggable, name-keyed expression implementations.
//!
//! Collaborators register implementations once while the runtime is
//! assembled; the evaluator only reads the registry afterwards. The
//! evaluator consults it for reference identifiers (`Reference` category),
//! bare-name calls, and a few operators with overridable semantics
//! (`addition`, `stringConcatenation`, `as`, `not`, `no`, `exists`,
//! `doesNotExist`).

use std::fmt;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture};
use rustc_hash::FxHashMap;

use loka_value::{EvalResult, Value};

use crate::context::ExecutionContext;

/// What kind of expression an implementation provides.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExpressionCategory {
    /// Zero-argument reference resolved like an identifier (`document`, `window`).
    Reference,
    Logical,
    Comparison,
    Conversion,
    Positional,
    Property,
    Special,
}

/// A problem found by an implementation's argument validator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    /// Index of the offending argument, when one is to blame.
    pub argument: Option<usize>,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            argument: None,
        }
    }

    #[must_use]
    pub fn at_argument(mut self, index: usize) -> Self {
        self.argument = Some(index);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.argument {
            Some(index) => write!(f, "argument {index}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// One registered expression implementation.
pub trait Expression {
    fn name(&self) -> &str;

    fn category(&self) -> ExpressionCategory;

    /// Evaluate with already-evaluated arguments. May suspend.
    fn evaluate<'a>(
        &'a self,
        ctx: &'a mut ExecutionContext,
        args: Vec<Value>,
    ) -> LocalBoxFuture<'a, EvalResult>;

    /// Check arguments without evaluating. `None` means they are acceptable.
    fn validate(&self, _args: &[Value]) -> Option<Diagnostic> {
        None
    }
}

/// Adapter for implementations that never suspend.
pub struct FnExpression<F> {
    name: String,
    category: ExpressionCategory,
    func: F,
}

impl<F> FnExpression<F>
where
    F: Fn(&mut ExecutionContext, Vec<Value>) -> EvalResult,
{
    pub fn new(name: impl Into<String>, category: ExpressionCategory, func: F) -> Self {
        FnExpression {
            name: name.into(),
            category,
            func,
        }
    }
}

impl<F> Expression for FnExpression<F>
where
    F: Fn(&mut ExecutionContext, Vec<Value>) -> EvalResult,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> ExpressionCategory {
        self.category
    }

    fn evaluate<'a>(
        &'a self,
        ctx: &'a mut ExecutionContext,
        args: Vec<Value>,
    ) -> LocalBoxFuture<'a, EvalResult> {
        let result = (self.func)(ctx, args);
        futures::future::ready(result).boxed_local()
    }
}

/// Registration failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("expression `{0}` is already registered")]
    Duplicate(String),
}

/// Name-unique table of expression implementations.
#[derive(Default)]
pub struct ExpressionRegistry {
    entries: FxHashMap<String, Rc<dyn Expression>>,
}

impl ExpressionRegistry {
    pub fn new() -> Self {
        ExpressionRegistry::default()
    }

    /// Register an implementation under its own name.
    pub fn register(&mut self, expression: impl Expression + 'static) -> Result<(), RegistryError> {
        let name = expression.name().to_string();
        if self.entries.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        tracing::debug!(name = %name, category = ?expression.category(), "registered expression");
        self.entries.insert(name, Rc::new(expression));
        Ok(())
    }

    /// Register a non-suspending implementation from a closure.
    pub fn register_fn<F>(
        &mut self,
        name: impl Into<String>,
        category: ExpressionCategory,
        func: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&mut ExecutionContext, Vec<Value>) -> EvalResult + 'static,
    {
        self.register(FnExpression::new(name, category, func))
    }

    pub fn get(&self, name: &str) -> Option<&dyn Expression> {
        self.entries.get(name).map(|entry| &**entry)
    }

    /// A zero-argument reference expression named `name`.
    pub fn reference(&self, name: &str) -> Option<&dyn Expression> {
        self.get(name)
            .filter(|expr| expr.category() == ExpressionCategory::Reference)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Registered names of one category, sorted.
    pub fn expressions_in(&self, category: ExpressionCategory) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, expr)| expr.category() == category)
            .map(|(name, _)| name.clone())
            .collect();
        names.sort_unstable();
        names
    }

    /// Run `name`'s validator. `None` also when `name` is not registered.
    pub fn validate(&self, name: &str, args: &[Value]) -> Option<Diagnostic> {
        self.get(name)?.validate(args)
    }
}

impl fmt::Debug for ExpressionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpressionRegistry")
            .field("names", &self.names())
            .finish()
    }
}
