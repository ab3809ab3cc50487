//! Binary operators that need the operand nodes.
//!
//! Operands are evaluated left to right. Everything not special-cased here
//! falls through to [`evaluate_binary`] on the two evaluated values.

use rustc_hash::FxHashSet;

use loka_ir::{BinaryOp, LiteralValue, Node, Position};
use loka_value::{invalid_scope_operand, ControlAction, ElementRef, EvalResult, Value};

use super::dispatch::literal_value;
use super::Evaluator;
use crate::coerce::coerce_operand;
use crate::context::ExecutionContext;
use crate::operators::{self, evaluate_binary, simple_class};
use crate::soft::or_false;

impl Evaluator {
    pub(super) async fn eval_binary(
        &self,
        op: BinaryOp,
        left: &Node,
        right: &Node,
        ctx: &mut ExecutionContext,
    ) -> EvalResult {
        match op {
            BinaryOp::Assign => self.eval_assignment(left, right, ctx).await,
            BinaryOp::And => {
                let lhs = self.evaluate(left, ctx).await?;
                if lhs.is_truthy() {
                    self.evaluate(right, ctx).await
                } else {
                    Ok(lhs)
                }
            }
            BinaryOp::Or => {
                let lhs = self.evaluate(left, ctx).await?;
                if lhs.is_truthy() {
                    Ok(lhs)
                } else {
                    self.evaluate(right, ctx).await
                }
            }
            BinaryOp::Add => self.eval_addition(left, right, ctx).await,
            BinaryOp::As => {
                let value = self.evaluate(left, ctx).await?;
                let type_name = self.type_name_operand(right, ctx).await?;
                match self.registry.get("as") {
                    Some(conversion) => {
                        conversion
                            .evaluate(ctx, vec![value, Value::string(type_name)])
                            .await
                    }
                    None => Ok(value),
                }
            }
            BinaryOp::IsA | BinaryOp::IsNotA => {
                let value = self.evaluate(left, ctx).await?;
                let type_name = self.type_name_operand(right, ctx).await?;
                let is = operators::is_a(&value, &type_name);
                Ok(Value::Bool(if op == BinaryOp::IsA { is } else { !is }))
            }
            BinaryOp::In | BinaryOp::NotIn => {
                let Some((selector, position)) = scoped_query(left) else {
                    let lhs = self.evaluate(left, ctx).await?;
                    let rhs = self.evaluate(right, ctx).await?;
                    return Ok(evaluate_binary(lhs, rhs, op)?);
                };
                let found = self.eval_scoped_in(&selector, position, right, ctx).await?;
                if op == BinaryOp::In {
                    Ok(found)
                } else {
                    Ok(Value::Bool(crate::unary_operators::is_empty(&found)))
                }
            }
            BinaryOp::Has | BinaryOp::NotHas => {
                let found = or_false(op, self.eval_has(left, right, ctx).await)?;
                Ok(Value::Bool(found.is_truthy() == (op == BinaryOp::Has)))
            }
            BinaryOp::Matches
            | BinaryOp::NotMatches
            | BinaryOp::Contains
            | BinaryOp::NotContains => {
                let positive = op.positive().unwrap_or(op);
                let found = or_false(op, self.eval_soft(positive, left, right, ctx).await)?;
                Ok(Value::Bool(found.is_truthy() == (op == positive)))
            }
            _ => {
                let lhs = self.evaluate(left, ctx).await?;
                let rhs = self.evaluate(right, ctx).await?;
                Ok(evaluate_binary(lhs, rhs, op)?)
            }
        }
    }

    /// `+` after document-object coercion, routed through the registered
    /// `stringConcatenation` / `addition` expressions when present.
    async fn eval_addition(
        &self,
        left: &Node,
        right: &Node,
        ctx: &mut ExecutionContext,
    ) -> EvalResult {
        let lhs = coerce_operand(self.evaluate(left, ctx).await?);
        let rhs = coerce_operand(self.evaluate(right, ctx).await?);
        let textual = lhs.is_textual() || rhs.is_textual();
        let name = if textual {
            "stringConcatenation"
        } else {
            "addition"
        };
        if let Some(expression) = self.registry.get(name) {
            return expression.evaluate(ctx, vec![lhs, rhs]).await;
        }
        Ok(if textual {
            operators::concatenate(&lhs, &rhs)
        } else {
            operators::add_numbers(&lhs, &rhs)
        })
    }

    /// `matches` / `contains`. A selector node on the right stands for its
    /// selector text, not for the elements it would find.
    async fn eval_soft(
        &self,
        op: BinaryOp,
        left: &Node,
        right: &Node,
        ctx: &mut ExecutionContext,
    ) -> EvalResult {
        let lhs = self.evaluate(left, ctx).await?;
        let rhs = match right.selector_text() {
            Some(selector) if op == BinaryOp::Matches => Value::string(selector),
            _ => self.evaluate(right, ctx).await?,
        };
        Ok(evaluate_binary(lhs, rhs, op)?)
    }

    /// `left has right`, dispatching on the right node kind when the
    /// subject is an element.
    async fn eval_has(&self, left: &Node, right: &Node, ctx: &mut ExecutionContext) -> EvalResult {
        let subject = self.evaluate(left, ctx).await?;
        let subject = subject
            .single_item()
            .filter(|item| matches!(item, Value::Element(_)))
            .unwrap_or(subject);
        let Value::Element(element) = &subject else {
            let needle = self.evaluate(right, ctx).await?;
            return Ok(Value::Bool(operators::has(&subject, &needle)?));
        };
        let found = match right {
            Node::AttributeAccess {
                attribute_name,
                target: None,
            } => element.has_attribute(attribute_name.trim_start_matches('@')),
            selector if selector.is_selector() => {
                let text = selector.selector_text().unwrap_or_default();
                match simple_class(&text) {
                    Some(class) => element.has_class(class),
                    None => element.query_first(&text)?.is_some(),
                }
            }
            _ => {
                let needle = self.evaluate(right, ctx).await?;
                operators::has(&subject, &needle)?
            }
        };
        Ok(Value::Bool(found))
    }

    /// `<selector/> in scope`: query inside every element of the scope,
    /// dropping duplicates, then apply the position if any.
    async fn eval_scoped_in(
        &self,
        selector: &str,
        position: Option<Position>,
        scope: &Node,
        ctx: &mut ExecutionContext,
    ) -> EvalResult {
        let scope = self.evaluate(scope, ctx).await?;
        let roots: Vec<ElementRef> = match &scope {
            Value::Element(element) => vec![element.clone()],
            Value::NodeList(nodes) => nodes.to_vec(),
            Value::Array(items) => {
                let items = items.borrow();
                let roots: Option<Vec<ElementRef>> =
                    items.iter().map(|item| item.as_element().cloned()).collect();
                roots.ok_or_else(|| invalid_scope_operand(scope.type_name()))?
            }
            other => return Err(invalid_scope_operand(other.type_name()).into()),
        };

        let mut seen = FxHashSet::default();
        let mut found = Vec::new();
        for root in &roots {
            for element in root.query_all(selector)? {
                if seen.insert(element.node_id()) {
                    found.push(element);
                }
            }
        }
        tracing::trace!(selector, roots = roots.len(), found = found.len(), "scoped query");

        let pick = |element: Option<&ElementRef>| {
            element.cloned().map_or(Value::Null, Value::Element)
        };
        Ok(match position {
            None => Value::node_list(found),
            Some(Position::First) => pick(found.first()),
            Some(Position::Last) => pick(found.last()),
        })
    }

    /// A type name operand: bare identifiers and literals are taken as
    /// written, anything else is evaluated and stringified.
    async fn type_name_operand(
        &self,
        node: &Node,
        ctx: &mut ExecutionContext,
    ) -> Result<String, ControlAction> {
        Ok(match node {
            Node::Identifier { name, .. } => name.clone(),
            Node::Literal {
                value: LiteralValue::Str(s),
            } => s.clone(),
            Node::Literal { value } => literal_value(value).to_display_string(),
            other => self.evaluate(other, ctx).await?.to_display_string(),
        })
    }
}

/// The selector of a selector-scoped `in` left operand, with its position
/// when it is wrapped in `first` / `last`.
fn scoped_query(node: &Node) -> Option<(String, Option<Position>)> {
    match node {
        Node::PositionalExpression { position, argument } if argument.is_selector() => {
            Some((argument.selector_text()?, Some(*position)))
        }
        selector if selector.is_selector() => Some((selector.selector_text()?, None)),
        _ => None,
    }
}
