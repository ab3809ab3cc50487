//! Native callables.

use std::fmt;
use std::rc::Rc;

use super::Value;
use crate::errors::EvalError;

/// Arguments of one native call.
pub struct Invocation<'a> {
    /// The bound receiver, `undefined` for free functions.
    pub receiver: &'a Value,
    pub args: &'a [Value],
    /// Whether the call came from a `new`-style constructor expression.
    pub construct: bool,
}

impl Invocation<'_> {
    /// The `index`th argument, `undefined` when absent.
    pub fn arg(&self, index: usize) -> Value {
        self.args.get(index).cloned().unwrap_or_default()
    }
}

/// Signature of native function bodies.
pub type NativeFn = dyn Fn(Invocation<'_>) -> Result<Value, EvalError>;

/// A host- or runtime-provided function, optionally bound to a receiver.
///
/// Binding is how member access keeps receiver semantics: `el.getAttribute`
/// evaluates to the function bound to `el`, so a later call invokes it with
/// the right receiver even though the call site only sees a function value.
#[derive(Clone)]
pub struct FunctionValue {
    name: Rc<str>,
    func: Rc<NativeFn>,
    receiver: Option<Rc<Value>>,
}

impl FunctionValue {
    pub fn native(
        name: impl Into<Rc<str>>,
        func: impl Fn(Invocation<'_>) -> Result<Value, EvalError> + 'static,
    ) -> Self {
        FunctionValue {
            name: name.into(),
            func: Rc::new(func),
            receiver: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn receiver(&self) -> Option<&Value> {
        self.receiver.as_deref()
    }

    /// Bind to `receiver`. An already-bound function keeps its receiver.
    #[must_use]
    pub fn bind(&self, receiver: Value) -> Self {
        if self.receiver.is_some() {
            return self.clone();
        }
        FunctionValue {
            name: Rc::clone(&self.name),
            func: Rc::clone(&self.func),
            receiver: Some(Rc::new(receiver)),
        }
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, EvalError> {
        self.invoke(args, false)
    }

    pub fn construct(&self, args: &[Value]) -> Result<Value, EvalError> {
        self.invoke(args, true)
    }

    /// Whether both values share the same native body.
    pub fn ptr_eq(&self, other: &FunctionValue) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }

    fn invoke(&self, args: &[Value], construct: bool) -> Result<Value, EvalError> {
        let unbound = Value::Undefined;
        let receiver = self.receiver.as_deref().unwrap_or(&unbound);
        (self.func)(Invocation {
            receiver,
            args,
            construct,
        })
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionValue")
            .field("name", &self.name)
            .field("bound", &self.receiver.is_some())
            .finish()
    }
}
