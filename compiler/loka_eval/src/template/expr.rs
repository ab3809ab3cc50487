//! The expression language inside `${...}`.
//!
//! Deliberately small: number and string literals, `true` `false` `null`
//! `undefined`, dotted variable paths, parentheses, unary `-` and `!`,
//! arithmetic, comparisons, `&&` `||`, and the conditional `?:`. Operators
//! share their semantics with the full evaluator through
//! [`evaluate_binary`].

use loka_ir::BinaryOp;
use loka_value::{invalid_template_expression, parse_number, EvalError, Value};

use crate::operators::evaluate_binary;

/// Evaluate `source`, resolving dotted paths with `resolve`.
pub(super) fn evaluate(source: &str, resolve: &dyn Fn(&str) -> Value) -> Result<Value, EvalError> {
    let fail = |reason: String| invalid_template_expression(source.trim(), reason);
    let tokens = tokenize(source).map_err(fail)?;
    if tokens.is_empty() {
        return Err(fail("empty expression".to_string()));
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        resolve,
    };
    let value = parser.expression(0).map_err(fail)?;
    match parser.peek() {
        None => Ok(value),
        Some(token) => Err(fail(format!("unexpected {}", token.describe()))),
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Number(f64),
    Str(String),
    Ident(String),
    Op(&'static str),
    LParen,
    RParen,
    Question,
    Colon,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {n}"),
            Token::Str(s) => format!("string {s:?}"),
            Token::Ident(name) => format!("name `{name}`"),
            Token::Op(op) => format!("operator `{op}`"),
            Token::LParen => "`(`".to_string(),
            Token::RParen => "`)`".to_string(),
            Token::Question => "`?`".to_string(),
            Token::Colon => "`:`".to_string(),
        }
    }
}

/// Longest operators first so `===` is not read as `==` `=`.
const OPERATORS: &[&str] = &[
    "===", "!==", "==", "!=", "<=", ">=", "&&", "||", "+", "-", "*", "/", "%", "<", ">", "!",
];

fn tokenize(source: &str) -> Result<Vec<Token>, String> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if c.is_ascii_digit() || (c == '.' && chars.get(i + 1).is_some_and(char::is_ascii_digit)) {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            if i < chars.len() && matches!(chars[i], 'e' | 'E') {
                i += 1;
                if i < chars.len() && matches!(chars[i], '+' | '-') {
                    i += 1;
                }
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
            }
            let text: String = chars[start..i].iter().collect();
            let n = parse_number(&text).ok_or_else(|| format!("malformed number `{text}`"))?;
            tokens.push(Token::Number(n));
            continue;
        }
        if matches!(c, '\'' | '"' | '`') {
            let (text, next) = read_string(&chars, i)?;
            tokens.push(Token::Str(text));
            i = next;
            continue;
        }
        if c.is_alphabetic() || c == '_' || c == '$' {
            let start = i;
            i += 1;
            while i < chars.len()
                && (chars[i].is_alphanumeric() || chars[i] == '_' || chars[i] == '.')
            {
                i += 1;
            }
            let name: String = chars[start..i].iter().collect();
            let name = name.strip_prefix('$').unwrap_or(&name).to_string();
            if name.is_empty() || name.ends_with('.') || name.contains("..") {
                return Err(format!("malformed name `{name}`"));
            }
            tokens.push(Token::Ident(name));
            continue;
        }
        let simple = match c {
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            '?' => Some(Token::Question),
            ':' => Some(Token::Colon),
            _ => None,
        };
        if let Some(token) = simple {
            tokens.push(token);
            i += 1;
            continue;
        }
        let rest: String = chars[i..chars.len().min(i + 3)].iter().collect();
        let Some(op) = OPERATORS.iter().copied().find(|op| rest.starts_with(op)) else {
            return Err(format!("unexpected character `{c}`"));
        };
        tokens.push(Token::Op(op));
        i += op.chars().count();
    }
    Ok(tokens)
}

fn read_string(chars: &[char], open: usize) -> Result<(String, usize), String> {
    let quote = chars[open];
    let mut text = String::new();
    let mut i = open + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' if i + 1 < chars.len() => {
                text.push(match chars[i + 1] {
                    'n' => '\n',
                    't' => '\t',
                    other => other,
                });
                i += 2;
            }
            c if c == quote => return Ok((text, i + 1)),
            c => {
                text.push(c);
                i += 1;
            }
        }
    }
    Err("unterminated string".to_string())
}

// Parsing

const TERNARY_BP: u8 = 2;
const PREFIX_BP: u8 = 16;

/// Left binding power and evaluator operator of an infix token.
fn infix(op: &str) -> Option<(u8, BinaryOp)> {
    let entry = match op {
        "||" => (4, BinaryOp::Or),
        "&&" => (6, BinaryOp::And),
        "==" => (8, BinaryOp::Eq),
        "!=" => (8, BinaryOp::NotEq),
        "===" => (8, BinaryOp::StrictEq),
        "!==" => (8, BinaryOp::StrictNotEq),
        "<" => (10, BinaryOp::Lt),
        "<=" => (10, BinaryOp::LtEq),
        ">" => (10, BinaryOp::Gt),
        ">=" => (10, BinaryOp::GtEq),
        "+" => (12, BinaryOp::Add),
        "-" => (12, BinaryOp::Sub),
        "*" => (14, BinaryOp::Mul),
        "/" => (14, BinaryOp::Div),
        "%" => (14, BinaryOp::Mod),
        _ => return None,
    };
    Some(entry)
}

/// Evaluating Pratt parser: values are computed while parsing.
struct Parser<'r> {
    tokens: Vec<Token>,
    pos: usize,
    resolve: &'r dyn Fn(&str) -> Value,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn expect(&mut self, expected: &Token) -> Result<(), String> {
        match self.next() {
            Some(ref token) if token == expected => Ok(()),
            Some(token) => Err(format!(
                "expected {}, found {}",
                expected.describe(),
                token.describe()
            )),
            None => Err(format!("expected {}, found end of input", expected.describe())),
        }
    }

    fn expression(&mut self, min_bp: u8) -> Result<Value, String> {
        let mut lhs = self.prefix()?;
        loop {
            match self.peek() {
                Some(Token::Question) => {
                    if TERNARY_BP < min_bp {
                        break;
                    }
                    self.pos += 1;
                    let consequent = self.expression(0)?;
                    self.expect(&Token::Colon)?;
                    let alternate = self.expression(TERNARY_BP)?;
                    lhs = if lhs.is_truthy() { consequent } else { alternate };
                }
                Some(Token::Op(op)) => {
                    let Some((bp, op)) = infix(op) else {
                        return Err(format!("`{op}` is not a binary operator"));
                    };
                    if bp < min_bp {
                        break;
                    }
                    self.pos += 1;
                    let rhs = self.expression(bp + 1)?;
                    lhs = evaluate_binary(lhs, rhs, op).map_err(|err| err.to_string())?;
                }
                _ => break,
            }
        }
        Ok(lhs)
    }

    fn prefix(&mut self) -> Result<Value, String> {
        match self.next() {
            Some(Token::Number(n)) => Ok(Value::number(n)),
            Some(Token::Str(s)) => Ok(Value::string(s)),
            Some(Token::Ident(name)) => Ok(match name.as_str() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                "null" => Value::Null,
                "undefined" => Value::Undefined,
                path => (self.resolve)(path),
            }),
            Some(Token::LParen) => {
                let inner = self.expression(0)?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Op("-")) => {
                let operand = self.expression(PREFIX_BP)?;
                Ok(Value::number(-operand.to_number()))
            }
            Some(Token::Op("+")) => {
                let operand = self.expression(PREFIX_BP)?;
                Ok(Value::number(operand.to_number()))
            }
            Some(Token::Op("!")) => {
                let operand = self.expression(PREFIX_BP)?;
                Ok(Value::Bool(!operand.is_truthy()))
            }
            Some(token) => Err(format!("unexpected {}", token.describe())),
            None => Err("unexpected end of input".to_string()),
        }
    }
}
