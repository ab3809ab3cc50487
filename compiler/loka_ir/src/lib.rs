//! Loka IR - AST node and operator types for the Loka runtime.
//!
//! The tokenizer and grammar live outside this workspace; this crate only
//! fixes the shape of what they produce so the evaluator can dispatch on a
//! closed set of node kinds.

mod ast;
mod operators;

pub use ast::{ContextKind, LiteralValue, Node, ObjectProperty, Position, ScopeKind};
pub use operators::{BinaryOp, UnaryOp, UnknownOperator};

#[cfg(test)]
mod tests;
