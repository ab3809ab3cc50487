//! Tests for the scope chain and context-level scope helpers.

use pretty_assertions::assert_eq;

use loka_value::Value;

use crate::{Environment, ExecutionContext, LocalScope, Scope};

#[test]
fn unscoped_lookup_order() {
    let mut env = Environment::new();
    env.set_variable("x", Value::number(3.0));
    assert_eq!(env.lookup("x"), Some(Value::number(3.0)));

    env.set_global("x", Value::number(2.0));
    assert_eq!(env.lookup("x"), Some(Value::number(2.0)));

    env.set_local("x", Value::number(1.0));
    assert_eq!(env.lookup("x"), Some(Value::number(1.0)));
    assert_eq!(env.lookup_global("x"), Some(Value::number(2.0)));
    assert_eq!(env.lookup_variable("x"), Some(Value::number(3.0)));
    assert_eq!(env.lookup("y"), None);
}

#[test]
fn child_shares_global_and_variables() {
    let mut parent = Environment::new();
    parent.set_local("own", Value::Bool(true));
    let mut child = parent.child();

    assert!(child.global().ptr_eq(parent.global()));
    assert_eq!(child.lookup("own"), None);

    child.set_global("g", Value::number(1.0));
    child.set_variable("v", Value::number(2.0));
    assert_eq!(parent.lookup("g"), Some(Value::number(1.0)));
    assert_eq!(parent.lookup("v"), Some(Value::number(2.0)));
}

#[test]
fn contexts_can_share_one_global_scope() {
    let global = LocalScope::new(Scope::new());
    let first = ExecutionContext::with_global(global.clone());
    let second = ExecutionContext::with_global(global.clone());

    first.set_global("shared", Value::string("yes"));
    assert_eq!(second.env.lookup("shared"), Some(Value::string("yes")));
    assert_eq!(global.borrow().names(), vec!["shared"]);
}

#[test]
fn child_context_keeps_pronouns_and_drops_flags() {
    let mut parent = ExecutionContext::for_subject(Value::string("me")).with_you(Value::number(1.0));
    parent.set_result(Value::number(2.0));
    parent.set_local("temp", Value::Null);
    parent.halt();

    let child = parent.child();
    assert_eq!(child.me, Value::string("me"));
    assert_eq!(child.you, Value::number(1.0));
    assert_eq!(child.result(), &Value::number(2.0));
    assert!(!child.is_halted());
    assert_eq!(child.env.lookup_local("temp"), None);
}

#[test]
fn pronoun_aliases() {
    let ctx = ExecutionContext::for_subject(Value::string("me")).with_you(Value::string("you"));
    assert_eq!(ctx.pronoun("my"), Some(&Value::string("me")));
    assert_eq!(ctx.pronoun("I"), Some(&Value::string("me")));
    assert_eq!(ctx.pronoun("your"), Some(&Value::string("you")));
    assert_eq!(ctx.pronoun("its"), Some(&Value::Undefined));
    assert_eq!(ctx.pronoun("them"), None);
}

#[test]
fn scope_bookkeeping() {
    let mut scope = Scope::new();
    assert!(scope.is_empty());
    scope.define("b", Value::Null);
    scope.define("a", Value::Null);
    scope.define("b", Value::Bool(true));
    assert_eq!(scope.len(), 2);
    assert_eq!(scope.names(), vec!["a", "b"]);
    assert_eq!(scope.remove("b"), Some(Value::Bool(true)));
    assert!(!scope.contains("b"));
}
