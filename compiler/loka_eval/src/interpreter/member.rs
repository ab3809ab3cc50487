//! Member access: `a.b`, `a[b]`, possessives, `the b of a`, `@attr`.
//!
//! All forms share [`read_member`]:
//!
//! - a one-item collection stands for its item under dot access, unless the
//!   name is an array-native property (`length`, `map`, ...)
//! - `computed-<prop>` reads the rendered style of an element
//! - `@name` reads an attribute (`null` when absent)
//! - `previous` / `prev` / `next` are the adjacent element siblings
//! - functions come back bound to the object they were read from

use loka_ir::{LiteralValue, Node};
use loka_value::{missing_property_name, ControlAction, EvalError, EvalResult, Value};

use super::Evaluator;
use crate::context::ExecutionContext;
use crate::members::{get_property, is_array_native};

impl Evaluator {
    pub(super) async fn eval_member(
        &self,
        object: &Node,
        property: &Node,
        computed: bool,
        ctx: &mut ExecutionContext,
    ) -> EvalResult {
        let target = self.evaluate(object, ctx).await?;
        let name = self
            .member_name(property, computed, "memberExpression", ctx)
            .await?;
        Ok(read_member(&target, &name, computed))
    }

    /// `my value`, `#box's textContent`, `the value of #input`.
    pub(super) async fn eval_possessive(
        &self,
        object: &Node,
        property: &Node,
        kind: &str,
        ctx: &mut ExecutionContext,
    ) -> EvalResult {
        let target = self.evaluate(object, ctx).await?;
        let name = property_name(property, kind)?;
        Ok(read_member(&target, &name, false))
    }

    /// `@name` on `target`, or on `me` when there is no target.
    pub(super) async fn eval_attribute_access(
        &self,
        attribute: &str,
        target: Option<&Node>,
        ctx: &mut ExecutionContext,
    ) -> EvalResult {
        let target = match target {
            Some(node) => self.evaluate(node, ctx).await?,
            None => ctx.me.clone(),
        };
        let name = format!("@{}", attribute.trim_start_matches('@'));
        Ok(read_member(&target, &name, false))
    }

    /// The property name of a member node: written out for dot access,
    /// evaluated and stringified for computed access.
    pub(super) async fn member_name(
        &self,
        property: &Node,
        computed: bool,
        kind: &str,
        ctx: &mut ExecutionContext,
    ) -> Result<String, ControlAction> {
        if computed {
            Ok(self.evaluate(property, ctx).await?.to_display_string())
        } else {
            Ok(property_name(property, kind)?)
        }
    }
}

/// The name a property node spells, without evaluating it.
pub(super) fn property_name(property: &Node, kind: &str) -> Result<String, EvalError> {
    match property {
        Node::Identifier { name, .. } => Ok(name.clone()),
        Node::Literal {
            value: LiteralValue::Str(name),
        } => Ok(name.clone()),
        Node::Literal {
            value: LiteralValue::Number(n),
        } => Ok(Value::number(*n).to_display_string()),
        Node::AttributeAccess {
            attribute_name,
            target: None,
        } => Ok(format!("@{}", attribute_name.trim_start_matches('@'))),
        _ => Err(missing_property_name(kind)),
    }
}

/// Read `name` from `target` with the member-access rules above.
pub(super) fn read_member(target: &Value, name: &str, computed: bool) -> Value {
    let target = if computed || is_array_native(name) {
        target.clone()
    } else {
        target.single_item().unwrap_or_else(|| target.clone())
    };

    if let Some(style) = name.strip_prefix("computed-") {
        return match &target {
            Value::Element(element) => {
                Value::string(element.computed_style(style).unwrap_or_default())
            }
            _ => Value::Undefined,
        };
    }
    if let Some(attribute) = name.strip_prefix('@') {
        return match &target {
            Value::Element(element) => element
                .attribute(attribute)
                .map_or(Value::Null, Value::string),
            Value::NodeList(nodes) => Value::array(
                nodes
                    .iter()
                    .map(|el| el.attribute(attribute).map_or(Value::Null, Value::string))
                    .collect(),
            ),
            _ => Value::Undefined,
        };
    }
    if let Value::Element(element) = &target {
        let sibling = match name {
            "previous" | "prev" => Some(element.previous_sibling()),
            "next" => Some(element.next_sibling()),
            _ => None,
        };
        if let Some(sibling) = sibling {
            return sibling.map_or(Value::Null, Value::Element);
        }
    }

    match get_property(&target, name) {
        Value::Function(func) => Value::Function(func.bind(target)),
        value => value,
    }
}
