//! The node dispatch: one arm per node kind.

use loka_ir::{LiteralValue, Node, ObjectProperty};
use loka_value::{unsupported_node_kind, EvalResult, Value};

use super::Evaluator;
use crate::context::ExecutionContext;
use crate::template;

impl Evaluator {
    #[tracing::instrument(level = "trace", skip_all, fields(kind = node.kind_name()))]
    pub(super) async fn dispatch(&self, node: &Node, ctx: &mut ExecutionContext) -> EvalResult {
        match node {
            Node::Literal { value } => Ok(literal_value(value)),
            Node::Identifier { name, scope } => self.eval_identifier(name, *scope, ctx).await,

            Node::ArrayLiteral { elements } => {
                let mut items = Vec::with_capacity(elements.len());
                for element in elements {
                    items.push(self.evaluate(element, ctx).await?);
                }
                Ok(Value::array(items))
            }
            Node::ObjectLiteral { properties } => self.eval_object_literal(properties, ctx).await,
            Node::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => {
                if self.evaluate(test, ctx).await?.is_truthy() {
                    self.evaluate(consequent, ctx).await
                } else {
                    self.evaluate(alternate, ctx).await
                }
            }
            Node::TemplateLiteral { value } => {
                if !self.config.interpolate_templates {
                    return Ok(Value::string(value.as_str()));
                }
                let text = template::interpolate(value, ctx, &*self.host)?;
                Ok(Value::string(text))
            }

            Node::BinaryExpression {
                operator,
                left,
                right,
            } => self.eval_binary(*operator, left, right, ctx).await,
            Node::UnaryExpression { operator, argument } => {
                self.eval_unary(*operator, argument, ctx).await
            }

            Node::MemberExpression {
                object,
                property,
                computed,
            } => self.eval_member(object, property, *computed, ctx).await,
            Node::PossessiveExpression { object, property } => {
                self.eval_possessive(object, property, "possessiveExpression", ctx)
                    .await
            }
            Node::PropertyOfExpression { property, target } => {
                self.eval_possessive(target, property, "propertyOfExpression", ctx)
                    .await
            }
            Node::PropertyAccess { object, property } => {
                let target = self.evaluate(object, ctx).await?;
                Ok(super::member::read_member(&target, property, false))
            }
            Node::AttributeAccess {
                attribute_name,
                target,
            } => {
                self.eval_attribute_access(attribute_name, target.as_deref(), ctx)
                    .await
            }

            Node::CallExpression {
                callee,
                arguments,
                is_constructor,
            } => {
                if *is_constructor {
                    self.eval_constructor(callee, arguments, ctx).await
                } else {
                    self.eval_call(callee, arguments, ctx).await
                }
            }

            Node::Selector { .. }
            | Node::CssSelector { .. }
            | Node::IdSelector { .. }
            | Node::QueryReference { .. } => Ok(self.eval_selector(node)?),
            Node::DollarExpression { name } => Ok(self.eval_dollar(name, ctx)),
            Node::ContextReference { context_type } => {
                Ok(self.eval_context_reference(*context_type, ctx))
            }
            Node::PositionalExpression { position, argument } => {
                let value = self.evaluate(argument, ctx).await?;
                Ok(super::selectors::positional(&value, *position))
            }

            Node::Unsupported => Err(unsupported_node_kind(node.kind_name()).into()),
        }
    }

    /// Properties are evaluated in order; a repeated key keeps its first
    /// position and its last value.
    async fn eval_object_literal(
        &self,
        properties: &[ObjectProperty],
        ctx: &mut ExecutionContext,
    ) -> EvalResult {
        let mut entries = Vec::with_capacity(properties.len());
        for property in properties {
            let key = match &property.key {
                Node::Identifier { name, .. } => name.clone(),
                Node::Literal { value } => literal_value(value).to_display_string(),
                computed => self.evaluate(computed, ctx).await?.to_display_string(),
            };
            let value = self.evaluate(&property.value, ctx).await?;
            entries.push((key, value));
        }
        Ok(Value::object(entries))
    }
}

pub(super) fn literal_value(value: &LiteralValue) -> Value {
    match value {
        LiteralValue::Undefined => Value::Undefined,
        LiteralValue::Null => Value::Null,
        LiteralValue::Bool(b) => Value::Bool(*b),
        LiteralValue::Number(n) => Value::number(*n),
        LiteralValue::Str(s) => Value::string(s.as_str()),
    }
}
