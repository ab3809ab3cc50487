//! AST node definitions.
//!
//! Nodes are produced by the external parser and are immutable afterwards.
//! The evaluator borrows them for the duration of one evaluation and never
//! keeps references past it.
//!
//! With the `serde` feature, nodes deserialize from the parser's JSON shape,
//! where a `type` field selects the variant:
//!
//! ```text
//! { "type": "binaryExpression", "operator": "+",
//!   "left": { "type": "literal", "value": "a" },
//!   "right": { "type": "literal", "value": 1 } }
//! ```
//!
//! An object with an unknown `type`, or with no `type` at all, becomes
//! [`Node::Unsupported`].

use crate::operators::{BinaryOp, UnaryOp};

/// Explicit scope annotation on an identifier (`local x`, `global x`).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(rename_all = "lowercase"))]
pub enum ScopeKind {
    Local,
    Global,
}

/// `first` / `last` in positional expressions.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(rename_all = "lowercase"))]
pub enum Position {
    First,
    Last,
}

/// Context references that read evaluation state instead of scopes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(rename_all = "lowercase"))]
pub enum ContextKind {
    Me,
    You,
    It,
    Result,
    Event,
    Target,
    Detail,
    Body,
}

/// Literal payload.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(untagged))]
pub enum LiteralValue {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    /// Not representable in JSON; a `literal` node without `value` is undefined.
    #[default]
    #[cfg_attr(feature = "serde", serde(skip))]
    Undefined,
}

/// One `key: value` entry of an object literal.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct ObjectProperty {
    pub key: Node,
    pub value: Node,
}

/// Expression node.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(remote = "Self", tag = "type", rename_all = "camelCase")
)]
pub enum Node {
    /// Bare name, optionally annotated `local`/`global`.
    Identifier {
        name: String,
        #[cfg_attr(feature = "serde", serde(default))]
        scope: Option<ScopeKind>,
    },
    Literal {
        #[cfg_attr(feature = "serde", serde(default))]
        value: LiteralValue,
    },
    /// `object.property` or `object[property]`.
    MemberExpression {
        object: Box<Node>,
        property: Box<Node>,
        #[cfg_attr(feature = "serde", serde(default))]
        computed: bool,
    },
    BinaryExpression {
        operator: BinaryOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    UnaryExpression {
        operator: UnaryOp,
        argument: Box<Node>,
    },
    CallExpression {
        callee: Box<Node>,
        #[cfg_attr(feature = "serde", serde(default))]
        arguments: Vec<Node>,
        #[cfg_attr(feature = "serde", serde(default, rename = "isConstructor"))]
        is_constructor: bool,
    },
    /// Raw selector text (`.active`, `div > p`).
    Selector { value: String },
    /// CSS selector literal (`.active`, `#main`).
    CssSelector { selector: String },
    /// `#id` reference; `value` may or may not carry the leading `#`.
    IdSelector { value: String },
    /// Query reference `<div.item/>`.
    QueryReference { selector: String },
    /// `$name` global variable reference.
    DollarExpression { name: String },
    /// `my value`, `#box's textContent`.
    PossessiveExpression {
        object: Box<Node>,
        property: Box<Node>,
    },
    /// Template text with `$name` and `${expr}` interpolation.
    TemplateLiteral { value: String },
    ArrayLiteral {
        #[cfg_attr(feature = "serde", serde(default))]
        elements: Vec<Node>,
    },
    ObjectLiteral {
        #[cfg_attr(feature = "serde", serde(default))]
        properties: Vec<ObjectProperty>,
    },
    ConditionalExpression {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Box<Node>,
    },
    /// Named property read with the name already resolved by the parser.
    PropertyAccess { object: Box<Node>, property: String },
    /// `the value of #input`.
    PropertyOfExpression {
        property: Box<Node>,
        target: Box<Node>,
    },
    ContextReference {
        #[cfg_attr(feature = "serde", serde(rename = "contextType"))]
        context_type: ContextKind,
    },
    /// `@data-id`, optionally on an explicit target (defaults to `me`).
    AttributeAccess {
        #[cfg_attr(feature = "serde", serde(rename = "attributeName"))]
        attribute_name: String,
        #[cfg_attr(feature = "serde", serde(default))]
        target: Option<Box<Node>>,
    },
    /// `first <li/>`, `last of items`.
    PositionalExpression {
        position: Position,
        argument: Box<Node>,
    },
    /// Any node kind the evaluator does not know.
    #[cfg_attr(feature = "serde", serde(other))]
    Unsupported,
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = <serde_json::Value as serde::Deserialize>::deserialize(deserializer)?;
        if raw.as_object().is_some_and(|fields| !fields.contains_key("type")) {
            return Ok(Node::Unsupported);
        }
        // The derived (remote) impl, which reads the `type` tag.
        Node::deserialize(raw).map_err(serde::de::Error::custom)
    }
}

impl Node {
    /// The parser-facing name of this node kind.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Identifier { .. } => "identifier",
            Self::Literal { .. } => "literal",
            Self::MemberExpression { .. } => "memberExpression",
            Self::BinaryExpression { .. } => "binaryExpression",
            Self::UnaryExpression { .. } => "unaryExpression",
            Self::CallExpression { .. } => "callExpression",
            Self::Selector { .. } => "selector",
            Self::CssSelector { .. } => "cssSelector",
            Self::IdSelector { .. } => "idSelector",
            Self::QueryReference { .. } => "queryReference",
            Self::DollarExpression { .. } => "dollarExpression",
            Self::PossessiveExpression { .. } => "possessiveExpression",
            Self::TemplateLiteral { .. } => "templateLiteral",
            Self::ArrayLiteral { .. } => "arrayLiteral",
            Self::ObjectLiteral { .. } => "objectLiteral",
            Self::ConditionalExpression { .. } => "conditionalExpression",
            Self::PropertyAccess { .. } => "propertyAccess",
            Self::PropertyOfExpression { .. } => "propertyOfExpression",
            Self::ContextReference { .. } => "contextReference",
            Self::AttributeAccess { .. } => "attributeAccess",
            Self::PositionalExpression { .. } => "positionalExpression",
            Self::Unsupported => "unsupported",
        }
    }

    /// The CSS selector text of a selector-kind node.
    ///
    /// Query references lose their `<` `/>` wrapper and id selectors gain a
    /// leading `#` when the parser stripped it.
    pub fn selector_text(&self) -> Option<String> {
        match self {
            Self::Selector { value } => Some(value.trim().to_string()),
            Self::CssSelector { selector } => Some(selector.trim().to_string()),
            Self::IdSelector { value } => {
                let value = value.trim();
                if value.starts_with('#') {
                    Some(value.to_string())
                } else {
                    Some(format!("#{value}"))
                }
            }
            Self::QueryReference { selector } => Some(strip_query_delimiters(selector)),
            _ => None,
        }
    }

    /// Whether this node names elements by selector rather than computing a value.
    pub const fn is_selector(&self) -> bool {
        matches!(
            self,
            Self::Selector { .. }
                | Self::CssSelector { .. }
                | Self::IdSelector { .. }
                | Self::QueryReference { .. }
        )
    }

    /// The name of a bare identifier node.
    pub fn identifier_name(&self) -> Option<&str> {
        match self {
            Self::Identifier { name, .. } => Some(name),
            _ => None,
        }
    }

    // Builders, mostly for hosts and tests that construct trees by hand.

    pub fn identifier(name: impl Into<String>) -> Self {
        Self::Identifier {
            name: name.into(),
            scope: None,
        }
    }

    pub fn scoped_identifier(name: impl Into<String>, scope: ScopeKind) -> Self {
        Self::Identifier {
            name: name.into(),
            scope: Some(scope),
        }
    }

    pub fn literal(value: impl Into<LiteralValue>) -> Self {
        Self::Literal {
            value: value.into(),
        }
    }

    pub fn binary(operator: BinaryOp, left: Node, right: Node) -> Self {
        Self::BinaryExpression {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(operator: UnaryOp, argument: Node) -> Self {
        Self::UnaryExpression {
            operator,
            argument: Box::new(argument),
        }
    }

    pub fn call(callee: Node, arguments: Vec<Node>) -> Self {
        Self::CallExpression {
            callee: Box::new(callee),
            arguments,
            is_constructor: false,
        }
    }

    pub fn member(object: Node, property: impl Into<String>) -> Self {
        Self::MemberExpression {
            object: Box::new(object),
            property: Box::new(Self::identifier(property)),
            computed: false,
        }
    }

    pub fn array(elements: Vec<Node>) -> Self {
        Self::ArrayLiteral { elements }
    }
}

fn strip_query_delimiters(selector: &str) -> String {
    let trimmed = selector.trim();
    let inner = trimmed.strip_prefix('<').unwrap_or(trimmed);
    let inner = inner
        .strip_suffix("/>")
        .or_else(|| inner.strip_suffix('>'))
        .unwrap_or(inner);
    inner.trim().to_string()
}

impl From<f64> for LiteralValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for LiteralValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<bool> for LiteralValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for LiteralValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for LiteralValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}
