//! Operator types for binary and unary expressions.
//!
//! The parser hands operators over as source tokens, including the word
//! forms of the language (`is greater than`, `does not contain`, `is an`).
//! `from_token` folds every alias onto one variant so evaluation dispatches
//! on a closed enum.

use std::fmt;

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(try_from = "String"))]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    StrictEq,
    NotEq,
    StrictNotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,

    // Document-aware predicates
    Matches,
    NotMatches,
    Has,
    NotHas,
    Contains,
    NotContains,
    In,
    NotIn,
    StartsWith,
    EndsWith,

    // Types
    IsA,
    IsNotA,
    As,

    // Binding
    Assign,
}

impl BinaryOp {
    /// Parse an operator token, accepting symbol and word-form aliases.
    pub fn from_token(token: &str) -> Option<Self> {
        let op = match token.trim() {
            "+" => Self::Add,
            "-" => Self::Sub,
            "*" => Self::Mul,
            "/" => Self::Div,
            "%" | "mod" => Self::Mod,

            "==" | "is" | "equals" | "is equal to" => Self::Eq,
            "===" | "is really" | "really equals" | "is really equal to" => Self::StrictEq,
            "!=" | "is not" | "is not equal to" => Self::NotEq,
            "!==" | "is not really" | "is not really equal to" => Self::StrictNotEq,
            "<" | "is less than" => Self::Lt,
            "<=" | "is less than or equal to" => Self::LtEq,
            ">" | "is greater than" => Self::Gt,
            ">=" | "is greater than or equal to" => Self::GtEq,

            "and" | "&&" => Self::And,
            "or" | "||" => Self::Or,

            "matches" | "match" => Self::Matches,
            "does not match" => Self::NotMatches,
            "has" | "have" => Self::Has,
            "does not have" => Self::NotHas,
            "contains" | "contain" | "include" | "includes" => Self::Contains,
            "does not contain" | "does not include" => Self::NotContains,
            "in" | "is in" => Self::In,
            "is not in" => Self::NotIn,
            "starts with" => Self::StartsWith,
            "ends with" => Self::EndsWith,

            "is a" | "is an" => Self::IsA,
            "is not a" | "is not an" => Self::IsNotA,
            "as" => Self::As,

            "=" => Self::Assign,
            _ => return None,
        };
        Some(op)
    }

    /// Returns the canonical source-level spelling for this operator.
    ///
    /// Used in error messages and trace output.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "==",
            Self::StrictEq => "===",
            Self::NotEq => "!=",
            Self::StrictNotEq => "!==",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "and",
            Self::Or => "or",
            Self::Matches => "matches",
            Self::NotMatches => "does not match",
            Self::Has => "has",
            Self::NotHas => "does not have",
            Self::Contains => "contains",
            Self::NotContains => "does not contain",
            Self::In => "in",
            Self::NotIn => "is not in",
            Self::StartsWith => "starts with",
            Self::EndsWith => "ends with",
            Self::IsA => "is a",
            Self::IsNotA => "is not a",
            Self::As => "as",
            Self::Assign => "=",
        }
    }

    /// Arithmetic operators coerce document objects before computing.
    pub const fn is_arithmetic(self) -> bool {
        matches!(
            self,
            Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Mod
        )
    }

    /// The positive form of a negated predicate (`does not have` -> `has`).
    pub const fn positive(self) -> Option<Self> {
        match self {
            Self::NotMatches => Some(Self::Matches),
            Self::NotHas => Some(Self::Has),
            Self::NotContains => Some(Self::Contains),
            Self::NotIn => Some(Self::In),
            _ => None,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(try_from = "String"))]
pub enum UnaryOp {
    /// `not`, `!`
    Not,
    /// `no`
    No,
    /// `some`
    Some,
    /// `exists`
    Exists,
    /// `does not exist`
    NotExists,
    /// `is empty`
    IsEmpty,
    /// `is not empty`
    IsNotEmpty,
    /// `-`
    Neg,
    /// `+`
    Plus,
}

impl UnaryOp {
    /// Parse an operator token, accepting symbol and word-form aliases.
    pub fn from_token(token: &str) -> Option<Self> {
        let op = match token.trim() {
            "not" | "!" => Self::Not,
            "no" => Self::No,
            "some" => Self::Some,
            "exists" | "exist" => Self::Exists,
            "does not exist" | "doesNotExist" => Self::NotExists,
            "is empty" | "empty" => Self::IsEmpty,
            "is not empty" => Self::IsNotEmpty,
            "-" => Self::Neg,
            "+" => Self::Plus,
            _ => return None,
        };
        Some(op)
    }

    /// Returns the canonical source-level spelling for this operator.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Not => "not",
            Self::No => "no",
            Self::Some => "some",
            Self::Exists => "exists",
            Self::NotExists => "does not exist",
            Self::IsEmpty => "is empty",
            Self::IsNotEmpty => "is not empty",
            Self::Neg => "-",
            Self::Plus => "+",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

/// An operator token no variant accepts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownOperator(pub String);

impl fmt::Display for UnknownOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown operator `{}`", self.0)
    }
}

impl std::error::Error for UnknownOperator {}

impl TryFrom<String> for BinaryOp {
    type Error = UnknownOperator;

    fn try_from(token: String) -> Result<Self, Self::Error> {
        Self::from_token(&token).ok_or(UnknownOperator(token))
    }
}

impl TryFrom<String> for UnaryOp {
    type Error = UnknownOperator;

    fn try_from(token: String) -> Result<Self, Self::Error> {
        Self::from_token(&token).ok_or(UnknownOperator(token))
    }
}
