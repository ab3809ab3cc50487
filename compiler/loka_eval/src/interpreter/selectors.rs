//! Document queries, context references and `first` / `last`.

use loka_ir::{ContextKind, Node, Position};
use loka_value::{EvalError, Value};

use super::Evaluator;
use crate::context::ExecutionContext;
use crate::members::get_property;

impl Evaluator {
    /// A selector-kind node against the whole document.
    ///
    /// `#id` (an id selector, or a plain selector that is nothing but an id)
    /// is the single element or `null`; everything else is a node list.
    pub(super) fn eval_selector(&self, node: &Node) -> Result<Value, EvalError> {
        let Some(selector) = node.selector_text() else {
            return Ok(Value::Null);
        };
        let by_id = match node {
            Node::IdSelector { .. } => selector.strip_prefix('#'),
            Node::Selector { .. } | Node::CssSelector { .. } => simple_id(&selector),
            _ => None,
        };
        if let Some(id) = by_id {
            return Ok(self
                .host
                .element_by_id(id)
                .map_or(Value::Null, Value::Element));
        }
        let found = self.host.query_all(&selector)?;
        tracing::trace!(selector, found = found.len(), "document query");
        Ok(Value::node_list(found))
    }

    pub(super) fn eval_context_reference(
        &self,
        kind: ContextKind,
        ctx: &ExecutionContext,
    ) -> Value {
        match kind {
            ContextKind::Me => ctx.me.clone(),
            ContextKind::You => ctx.you.clone(),
            ContextKind::It | ContextKind::Result => ctx.it.clone(),
            ContextKind::Event => ctx.event.clone().unwrap_or_default(),
            ContextKind::Target => event_property(ctx, "target"),
            ContextKind::Detail => event_property(ctx, "detail"),
            ContextKind::Body => self.host.body().map_or(Value::Null, Value::Element),
        }
    }
}

fn event_property(ctx: &ExecutionContext, name: &str) -> Value {
    ctx.event
        .as_ref()
        .map(|event| get_property(event, name))
        .unwrap_or_default()
}

/// `#name` with nothing after the id.
fn simple_id(selector: &str) -> Option<&str> {
    let id = selector.strip_prefix('#')?;
    let simple = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_');
    simple.then_some(id)
}

/// `first` / `last` of a collection or string; `null` when empty. Other
/// values are returned unchanged.
pub(super) fn positional(value: &Value, position: Position) -> Value {
    let picked = match value {
        Value::Array(items) => {
            let items = items.borrow();
            match position {
                Position::First => items.first().cloned(),
                Position::Last => items.last().cloned(),
            }
        }
        Value::NodeList(nodes) => match position {
            Position::First => nodes.first().cloned().map(Value::Element),
            Position::Last => nodes.last().cloned().map(Value::Element),
        },
        Value::Str(text) => match position {
            Position::First => text.chars().next(),
            Position::Last => text.chars().next_back(),
        }
        .map(|c| Value::string(c.to_string())),
        other => return other.clone(),
    };
    picked.unwrap_or(Value::Null)
}
