//! The frozen expression registry.
//!
//! Collaborators register expressions on an owned [`ExpressionRegistry`];
//! once an evaluator is built the registry can no longer change. Several
//! evaluators (one per document, say) may share the same frozen set.

use std::fmt;
use std::rc::Rc;

use crate::registry::ExpressionRegistry;

/// A read-only handle to a frozen [`ExpressionRegistry`].
///
/// Clones point at the same registry. There is no way back to `&mut`, so
/// registrations made after freezing are impossible.
#[derive(Clone)]
pub struct SharedRegistry(Rc<ExpressionRegistry>);

impl SharedRegistry {
    pub fn freeze(registry: ExpressionRegistry) -> Self {
        SharedRegistry(Rc::new(registry))
    }

    /// Whether both handles refer to the same frozen registry.
    pub fn ptr_eq(&self, other: &SharedRegistry) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl From<ExpressionRegistry> for SharedRegistry {
    fn from(registry: ExpressionRegistry) -> Self {
        SharedRegistry::freeze(registry)
    }
}

impl std::ops::Deref for SharedRegistry {
    type Target = ExpressionRegistry;

    fn deref(&self) -> &ExpressionRegistry {
        &self.0
    }
}

impl fmt::Debug for SharedRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedRegistry").field(&self.0.names()).finish()
    }
}
