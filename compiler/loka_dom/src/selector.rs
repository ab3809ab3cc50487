//! CSS selector parsing and matching.
//!
//! Supported: type, universal, `#id`, `.class`, attribute conditions
//! (`[a]`, `[a=v]`, `[a^=v]`, `[a$=v]`, `[a*=v]`, `[a~=v]`), the
//! `:first-child` / `:last-child` pseudo-classes, the descendant, child
//! (`>`), adjacent (`+`) and general sibling (`~`) combinators, and `,`
//! groups. Anything else is an invalid selector.

use loka_value::DomError;

use crate::document::Tree;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AttrCondition {
    Exists { key: String },
    Eq { key: String, value: String },
    StartsWith { key: String, value: String },
    EndsWith { key: String, value: String },
    Contains { key: String, value: String },
    Includes { key: String, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PseudoClass {
    FirstChild,
    LastChild,
}

/// One compound selector (`div.item[data-id]`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Step {
    pub(crate) tag: Option<String>,
    pub(crate) universal: bool,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: Vec<AttrCondition>,
    pub(crate) pseudo: Vec<PseudoClass>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Combinator {
    Descendant,
    Child,
    AdjacentSibling,
    GeneralSibling,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Part {
    pub(crate) step: Step,
    // Relation to the part on the left.
    pub(crate) combinator: Option<Combinator>,
}

/// A parsed selector list: any group matching means the selector matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectorList {
    pub(crate) groups: Vec<Vec<Part>>,
}

impl SelectorList {
    pub(crate) fn parse(selector: &str) -> Result<Self, DomError> {
        let groups = split_groups(selector)
            .and_then(|groups| {
                groups
                    .iter()
                    .map(|group| parse_chain(group))
                    .collect::<Result<Vec<_>, _>>()
            })
            .inspect_err(|err| tracing::trace!(selector, %err, "rejected selector"))?;
        Ok(SelectorList { groups })
    }

    pub(crate) fn matches(&self, tree: &Tree, node: usize) -> bool {
        self.groups
            .iter()
            .any(|chain| matches_chain(tree, node, chain))
    }
}

fn invalid(selector: &str) -> DomError {
    DomError::InvalidSelector(selector.to_string())
}

fn split_groups(selector: &str) -> Result<Vec<String>, DomError> {
    let mut groups = Vec::new();
    let mut current = String::new();
    let mut bracket_depth = 0usize;

    for ch in selector.chars() {
        match ch {
            '[' => {
                bracket_depth += 1;
                current.push(ch);
            }
            ']' => {
                bracket_depth = bracket_depth.checked_sub(1).ok_or_else(|| invalid(selector))?;
                current.push(ch);
            }
            ',' if bracket_depth == 0 => {
                let trimmed = current.trim();
                if trimmed.is_empty() {
                    return Err(invalid(selector));
                }
                groups.push(trimmed.to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    let trimmed = current.trim();
    if bracket_depth != 0 || trimmed.is_empty() {
        return Err(invalid(selector));
    }
    groups.push(trimmed.to_string());
    Ok(groups)
}

fn tokenize(selector: &str) -> Result<Vec<String>, DomError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut bracket_depth = 0usize;

    let flush = |current: &mut String, tokens: &mut Vec<String>| {
        if !current.trim().is_empty() {
            tokens.push(current.trim().to_string());
        }
        current.clear();
    };

    for ch in selector.chars() {
        match ch {
            '[' => {
                bracket_depth += 1;
                current.push(ch);
            }
            ']' => {
                bracket_depth = bracket_depth.checked_sub(1).ok_or_else(|| invalid(selector))?;
                current.push(ch);
            }
            '>' | '+' | '~' if bracket_depth == 0 => {
                flush(&mut current, &mut tokens);
                tokens.push(ch.to_string());
            }
            ch if ch.is_ascii_whitespace() && bracket_depth == 0 => {
                flush(&mut current, &mut tokens);
            }
            _ => current.push(ch),
        }
    }

    if bracket_depth != 0 {
        return Err(invalid(selector));
    }
    flush(&mut current, &mut tokens);
    Ok(tokens)
}

fn parse_chain(selector: &str) -> Result<Vec<Part>, DomError> {
    let mut parts: Vec<Part> = Vec::new();
    let mut pending: Option<Combinator> = None;

    for token in tokenize(selector)? {
        let combinator = match token.as_str() {
            ">" => Some(Combinator::Child),
            "+" => Some(Combinator::AdjacentSibling),
            "~" => Some(Combinator::GeneralSibling),
            _ => None,
        };
        if let Some(combinator) = combinator {
            if pending.is_some() || parts.is_empty() {
                return Err(invalid(selector));
            }
            pending = Some(combinator);
            continue;
        }

        let step = parse_step(&token).map_err(|_| invalid(selector))?;
        let combinator = if parts.is_empty() {
            None
        } else {
            Some(pending.take().unwrap_or(Combinator::Descendant))
        };
        parts.push(Part { step, combinator });
    }

    if parts.is_empty() || pending.is_some() {
        return Err(invalid(selector));
    }
    Ok(parts)
}

fn parse_step(part: &str) -> Result<Step, DomError> {
    let bytes = part.as_bytes();
    let mut i = 0usize;
    let mut step = Step::default();

    while let Some(&byte) = bytes.get(i) {
        match byte {
            b'*' => {
                if step.universal || step.tag.is_some() {
                    return Err(invalid(part));
                }
                step.universal = true;
                i += 1;
            }
            b'#' => {
                let (id, next) = parse_ident(part, i + 1).ok_or_else(|| invalid(part))?;
                if step.id.replace(id).is_some() {
                    return Err(invalid(part));
                }
                i = next;
            }
            b'.' => {
                let (class, next) = parse_ident(part, i + 1).ok_or_else(|| invalid(part))?;
                step.classes.push(class);
                i = next;
            }
            b'[' => {
                let (attr, next) = parse_attr_condition(part, i)?;
                step.attrs.push(attr);
                i = next;
            }
            b':' => {
                let (name, next) = parse_ident(part, i + 1).ok_or_else(|| invalid(part))?;
                let pseudo = match name.as_str() {
                    "first-child" => PseudoClass::FirstChild,
                    "last-child" => PseudoClass::LastChild,
                    _ => return Err(invalid(part)),
                };
                step.pseudo.push(pseudo);
                i = next;
            }
            _ => {
                if i != 0 {
                    return Err(invalid(part));
                }
                let (tag, next) = parse_ident(part, i).ok_or_else(|| invalid(part))?;
                step.tag = Some(tag.to_ascii_lowercase());
                i = next;
            }
        }
    }

    Ok(step)
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

fn parse_ident(src: &str, start: usize) -> Option<(String, usize)> {
    let bytes = src.as_bytes();
    let len = bytes
        .get(start..)?
        .iter()
        .take_while(|b| is_ident_char(**b))
        .count();
    if len == 0 {
        return None;
    }
    Some((src.get(start..start + len)?.to_string(), start + len))
}

fn parse_attr_condition(src: &str, open: usize) -> Result<(AttrCondition, usize), DomError> {
    let close = src
        .get(open..)
        .and_then(|rest| rest.find(']'))
        .map(|offset| open + offset)
        .ok_or_else(|| invalid(src))?;
    let body = src.get(open + 1..close).ok_or_else(|| invalid(src))?.trim();

    let Some(eq) = body.find('=') else {
        if body.is_empty() || !body.bytes().all(|b| is_ident_char(b) || b == b':') {
            return Err(invalid(src));
        }
        let key = body.to_ascii_lowercase();
        return Ok((AttrCondition::Exists { key }, close + 1));
    };

    let (raw_key, op) = match body.as_bytes().get(eq.wrapping_sub(1)) {
        Some(b'^') => (&body[..eq - 1], '^'),
        Some(b'$') => (&body[..eq - 1], '$'),
        Some(b'*') => (&body[..eq - 1], '*'),
        Some(b'~') => (&body[..eq - 1], '~'),
        _ => (&body[..eq], '='),
    };
    let key = raw_key.trim().to_ascii_lowercase();
    if key.is_empty() || !key.bytes().all(|b| is_ident_char(b) || b == b':') {
        return Err(invalid(src));
    }
    let value = unquote(body[eq + 1..].trim()).ok_or_else(|| invalid(src))?;

    let condition = match op {
        '^' => AttrCondition::StartsWith { key, value },
        '$' => AttrCondition::EndsWith { key, value },
        '*' => AttrCondition::Contains { key, value },
        '~' => AttrCondition::Includes { key, value },
        _ => AttrCondition::Eq { key, value },
    };
    Ok((condition, close + 1))
}

fn unquote(raw: &str) -> Option<String> {
    let first = raw.chars().next();
    match first {
        Some(quote @ ('"' | '\'')) => raw
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
            .map(str::to_string),
        _ => Some(raw.to_string()),
    }
}

// Matching

fn matches_step(tree: &Tree, node: usize, step: &Step) -> bool {
    if let Some(tag) = &step.tag {
        if tree.tag(node) != tag {
            return false;
        }
    }
    if let Some(id) = &step.id {
        if tree.attr(node, "id") != Some(id.as_str()) {
            return false;
        }
    }
    if !step.classes.iter().all(|class| tree.has_class(node, class)) {
        return false;
    }
    if !step.attrs.iter().all(|cond| matches_attr(tree, node, cond)) {
        return false;
    }
    step.pseudo.iter().all(|pseudo| match pseudo {
        PseudoClass::FirstChild => {
            tree.parent(node).is_some() && tree.previous_sibling(node).is_none()
        }
        PseudoClass::LastChild => tree.parent(node).is_some() && tree.next_sibling(node).is_none(),
    })
}

fn matches_attr(tree: &Tree, node: usize, cond: &AttrCondition) -> bool {
    match cond {
        AttrCondition::Exists { key } => tree.attr(node, key).is_some(),
        AttrCondition::Eq { key, value } => tree.attr(node, key) == Some(value.as_str()),
        AttrCondition::StartsWith { key, value } => {
            tree.attr(node, key).is_some_and(|v| v.starts_with(value.as_str()))
        }
        AttrCondition::EndsWith { key, value } => {
            tree.attr(node, key).is_some_and(|v| v.ends_with(value.as_str()))
        }
        AttrCondition::Contains { key, value } => {
            tree.attr(node, key).is_some_and(|v| v.contains(value.as_str()))
        }
        AttrCondition::Includes { key, value } => tree
            .attr(node, key)
            .is_some_and(|v| v.split_ascii_whitespace().any(|word| word == value)),
    }
}

/// Match right to left, backtracking through ancestors and siblings.
fn matches_chain(tree: &Tree, node: usize, parts: &[Part]) -> bool {
    let Some((last, rest)) = parts.split_last() else {
        return false;
    };
    if !matches_step(tree, node, &last.step) {
        return false;
    }
    let Some(combinator) = last.combinator else {
        return true;
    };
    match combinator {
        Combinator::Child => tree
            .parent(node)
            .is_some_and(|parent| matches_chain(tree, parent, rest)),
        Combinator::Descendant => {
            let mut current = tree.parent(node);
            while let Some(ancestor) = current {
                if matches_chain(tree, ancestor, rest) {
                    return true;
                }
                current = tree.parent(ancestor);
            }
            false
        }
        Combinator::AdjacentSibling => tree
            .previous_sibling(node)
            .is_some_and(|sibling| matches_chain(tree, sibling, rest)),
        Combinator::GeneralSibling => {
            let mut current = tree.previous_sibling(node);
            while let Some(sibling) = current {
                if matches_chain(tree, sibling, rest) {
                    return true;
                }
                current = tree.previous_sibling(sibling);
            }
            false
        }
    }
}
