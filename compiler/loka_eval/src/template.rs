//! Template literal interpolation.
//!
//! Two passes over the text:
//!
//! 1. `$name` and `$name.path` references. The longest prefix of the path
//!    that resolves is substituted and the remainder is kept as text
//!    (`$file.txt` with `file = "notes"` gives `notes.txt`). A reference
//!    whose head does not resolve at all becomes the empty string.
//! 2. `${expr}` spans, found by delimiter matching and evaluated with the
//!    restricted expression language in [`expr`].
//!
//! Both passes collect replacements first and apply them right to left so
//! earlier offsets stay valid. `null` and `undefined` render as `""`.

mod expr;

use std::ops::Range;

use smallvec::SmallVec;

use loka_value::{unterminated_template_expression, EvalError, Host, Value};

use crate::context::ExecutionContext;
use crate::members::get_property;

type Replacements = SmallVec<[(Range<usize>, String); 8]>;

/// Interpolate `template` against the context's pronouns, scopes and the
/// host's global namespace.
pub fn interpolate(
    template: &str,
    ctx: &ExecutionContext,
    host: &dyn Host,
) -> Result<String, EvalError> {
    let scope = TemplateScope { ctx, host };
    let text = substitute_references(template, &scope);
    substitute_expressions(&text, &scope)
}

/// Name resolution for templates. Synchronous: pronouns, then the scope
/// chain, then the host.
struct TemplateScope<'a> {
    ctx: &'a ExecutionContext,
    host: &'a dyn Host,
}

impl TemplateScope<'_> {
    fn head(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.ctx.pronoun(name) {
            return Some(value.clone());
        }
        self.ctx
            .env
            .lookup(name)
            .or_else(|| self.host.global(name))
    }

    /// Value of a full dotted path, `undefined` when any step is missing.
    fn path(&self, path: &str) -> Value {
        let mut segments = path.split('.');
        let head = segments.next().unwrap_or_default();
        let Some(mut value) = self.head(head) else {
            return Value::Undefined;
        };
        for segment in segments {
            value = get_property(&value, segment);
        }
        value
    }
}

fn render(value: &Value) -> String {
    if value.is_nullish() {
        String::new()
    } else {
        value.to_display_string()
    }
}

// Pass 1

fn substitute_references(text: &str, scope: &TemplateScope<'_>) -> String {
    let bytes = text.as_bytes();
    let mut replacements = Replacements::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'$' || !bytes.get(i + 1).copied().is_some_and(is_ident_start) {
            i += 1;
            continue;
        }
        let segments = path_segments(text, i + 1);
        let token_end = segments.last().map_or(i + 1, |seg| seg.end);
        let (end, value) = longest_resolvable(text, &segments, scope);
        let rendered = value.as_ref().map(render).unwrap_or_default();
        let end = if value.is_some() { end } else { token_end };
        replacements.push((i..end, rendered));
        i = token_end;
    }
    apply(text, replacements)
}

/// Byte ranges of `ident(.ident)*` starting at `start`.
fn path_segments(text: &str, start: usize) -> SmallVec<[Range<usize>; 4]> {
    let bytes = text.as_bytes();
    let mut segments = SmallVec::new();
    let mut pos = start;
    loop {
        let seg_start = pos;
        while bytes.get(pos).copied().is_some_and(is_ident_char) {
            pos += 1;
        }
        segments.push(seg_start..pos);
        let continues = bytes.get(pos) == Some(&b'.')
            && bytes.get(pos + 1).copied().is_some_and(is_ident_start);
        if !continues {
            break;
        }
        pos += 1;
    }
    segments
}

/// End offset and value of the longest resolvable prefix of the path.
fn longest_resolvable(
    text: &str,
    segments: &[Range<usize>],
    scope: &TemplateScope<'_>,
) -> (usize, Option<Value>) {
    let Some(first) = segments.first() else {
        return (0, None);
    };
    let Some(mut value) = scope.head(&text[first.clone()]) else {
        return (first.end, None);
    };
    let mut end = first.end;
    for segment in &segments[1..] {
        let next = get_property(&value, &text[segment.clone()]);
        if matches!(next, Value::Undefined) {
            break;
        }
        value = next;
        end = segment.end;
    }
    (end, Some(value))
}

// Pass 2

fn substitute_expressions(text: &str, scope: &TemplateScope<'_>) -> Result<String, EvalError> {
    let mut replacements = Replacements::new();
    let mut search = 0;
    while let Some(found) = text[search..].find("${") {
        let start = search + found;
        let body_start = start + 2;
        let end = closing_brace(text, body_start)
            .ok_or_else(|| unterminated_template_expression(start))?;
        let source = &text[body_start..end];
        let value = expr::evaluate(source, &|path| scope.path(path))?;
        replacements.push((start..end + 1, render(&value)));
        search = end + 1;
    }
    Ok(apply(text, replacements))
}

/// Offset of the `}` closing a span whose body starts at `from`.
/// Braces nest; quoted strings are skipped.
fn closing_brace(text: &str, from: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 1usize;
    let mut quote: Option<u8> = None;
    let mut i = from;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(_) if b == b'\\' => i += 1,
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'\'' | b'"' | b'`' => quote = Some(b),
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }
    None
}

fn apply(text: &str, replacements: Replacements) -> String {
    let mut out = text.to_string();
    for (range, replacement) in replacements.into_iter().rev() {
        out.replace_range(range, &replacement);
    }
    out
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
