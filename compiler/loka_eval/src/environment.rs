//! Scopes for identifier binding.
//!
//! Three levels, consulted by unscoped lookup in this order:
//! the invocation-local scope, the process-wide global scope, and the
//! optional general-variables scope. The host's page-level namespace comes
//! after all three and lives outside this module.

use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use loka_value::Value;

/// A single-threaded, shared scope handle.
///
/// Wraps `Rc<RefCell<T>>` so scopes outliving one invocation (global,
/// general variables) are shared by every context that sees them.
///
/// # Thread Safety
/// `LocalScope<T>` is NOT thread-safe. Evaluation of one context is
/// single-threaded with cooperative suspension, so `Rc` suffices.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    /// Whether both handles point at the same scope.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalScope").field(&self.0).finish()
    }
}

impl<T: Default> Default for LocalScope<T> {
    fn default() -> Self {
        LocalScope::new(T::default())
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Name-to-value bindings of one scope level.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    bindings: FxHashMap<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    /// Bind `name`, replacing any earlier binding.
    #[inline]
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    #[inline]
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.bindings.get(name).cloned()
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.bindings.remove(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bound names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.bindings.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// The scope chain of one execution context.
///
/// The local scope is owned and dies with the invocation; the global and
/// general-variables scopes are shared handles.
#[derive(Clone, Debug, Default)]
pub struct Environment {
    local: Scope,
    global: LocalScope<Scope>,
    variables: Option<LocalScope<Scope>>,
}

impl Environment {
    /// An environment with a fresh global scope and no general-variables scope.
    pub fn new() -> Self {
        Environment::default()
    }

    /// An environment sharing an existing global scope.
    pub fn with_global(global: LocalScope<Scope>) -> Self {
        Environment {
            local: Scope::new(),
            global,
            variables: None,
        }
    }

    #[must_use]
    pub fn with_variables(mut self, variables: LocalScope<Scope>) -> Self {
        self.variables = Some(variables);
        self
    }

    /// Same shared scopes, fresh local scope.
    ///
    /// The general-variables scope is created here if it does not exist yet,
    /// so writes through either environment stay visible to the other.
    #[must_use]
    pub fn child(&mut self) -> Self {
        let variables = self
            .variables
            .get_or_insert_with(LocalScope::default)
            .clone();
        Environment {
            local: Scope::new(),
            global: self.global.clone(),
            variables: Some(variables),
        }
    }

    pub fn local(&self) -> &Scope {
        &self.local
    }

    pub fn global(&self) -> &LocalScope<Scope> {
        &self.global
    }

    pub fn variables(&self) -> Option<&LocalScope<Scope>> {
        self.variables.as_ref()
    }

    #[inline]
    pub fn lookup_local(&self, name: &str) -> Option<Value> {
        self.local.lookup(name)
    }

    #[inline]
    pub fn lookup_global(&self, name: &str) -> Option<Value> {
        self.global.borrow().lookup(name)
    }

    #[inline]
    pub fn lookup_variable(&self, name: &str) -> Option<Value> {
        self.variables.as_ref()?.borrow().lookup(name)
    }

    /// Unscoped lookup: local, then global, then general variables.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.lookup_local(name)
            .or_else(|| self.lookup_global(name))
            .or_else(|| self.lookup_variable(name))
    }

    pub fn set_local(&mut self, name: impl Into<String>, value: Value) {
        self.local.define(name, value);
    }

    pub fn set_global(&self, name: impl Into<String>, value: Value) {
        self.global.borrow_mut().define(name, value);
    }

    /// Write to the general-variables scope, creating it on first use.
    pub fn set_variable(&mut self, name: impl Into<String>, value: Value) {
        self.variables
            .get_or_insert_with(LocalScope::default)
            .borrow_mut()
            .define(name, value);
    }
}
