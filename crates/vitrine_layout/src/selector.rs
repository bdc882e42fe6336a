//! Simple element selectors
//!
//! Supports compound selectors made of a tag, `#id`, `.class`, `[attr]` and
//! `[attr=value]` parts (in any combination), joined by the descendant
//! combinator (whitespace). That covers every query the widgets make.

use smallvec::SmallVec;
use std::iter::Peekable;
use std::str::{CharIndices, FromStr};
use thiserror::Error;

use crate::tree::{Document, NodeId};

/// Selector parse errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unexpected '{ch}' at position {pos}")]
    Unexpected { ch: char, pos: usize },

    #[error("missing name after position {pos}")]
    MissingName { pos: usize },

    #[error("unclosed attribute selector")]
    UnclosedAttribute,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct AttrMatch {
    name: String,
    value: Option<String>,
}

/// One compound selector (no combinators)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    universal: bool,
    tag: Option<String>,
    id: Option<String>,
    classes: SmallVec<[String; 2]>,
    attrs: SmallVec<[AttrMatch; 2]>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        !self.universal
            && self.tag.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attrs.is_empty()
    }

    fn matches(&self, doc: &Document, id: NodeId) -> bool {
        let Some(node) = doc.get(id) else {
            return false;
        };
        if self.tag.as_deref().is_some_and(|t| t != node.tag()) {
            return false;
        }
        if self.id.as_deref().is_some_and(|i| node.attr("id") != Some(i)) {
            return false;
        }
        if !self.classes.iter().all(|c| node.has_class(c)) {
            return false;
        }
        self.attrs.iter().all(|a| match (&a.value, node.attr(&a.name)) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(expected), Some(actual)) => expected == actual,
        })
    }
}

/// A parsed selector
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    /// Outermost compound first
    parts: Vec<Compound>,
}

impl Selector {
    /// Check if `id` matches this selector
    pub fn matches(&self, doc: &Document, id: NodeId) -> bool {
        let Some((last, rest)) = self.parts.split_last() else {
            return false;
        };
        if !last.matches(doc, id) {
            return false;
        }

        // Descendant combinators only: greedy ancestor matching is exact
        let mut ancestors = doc.ancestors(id);
        rest.iter()
            .rev()
            .all(|part| ancestors.by_ref().any(|a| part.matches(doc, a)))
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut parts = Vec::new();
        let mut current = Compound::default();
        let mut chars = input.char_indices().peekable();

        while let Some((pos, ch)) = chars.next() {
            match ch {
                c if c.is_whitespace() => {
                    if !current.is_empty() {
                        parts.push(std::mem::take(&mut current));
                    }
                }
                '*' => current.universal = true,
                '#' => current.id = Some(read_name(&mut chars, pos)?),
                '.' => current.classes.push(read_name(&mut chars, pos)?),
                '[' => {
                    let name = read_name(&mut chars, pos)?;
                    let value = match chars.next() {
                        Some((_, ']')) => None,
                        Some((_, '=')) => Some(read_value(&mut chars)?),
                        Some((pos, ch)) => return Err(SelectorError::Unexpected { ch, pos }),
                        None => return Err(SelectorError::UnclosedAttribute),
                    };
                    current.attrs.push(AttrMatch { name, value });
                }
                c if is_name_char(c) => {
                    let mut tag = String::from(c);
                    tag.push_str(&read_while(&mut chars, is_name_char));
                    current.tag = Some(tag.to_ascii_lowercase());
                }
                ch => return Err(SelectorError::Unexpected { ch, pos }),
            }
        }

        if !current.is_empty() {
            parts.push(current);
        }
        if parts.is_empty() {
            return Err(SelectorError::Empty);
        }
        Ok(Self { parts })
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn read_while(chars: &mut Peekable<CharIndices<'_>>, pred: impl Fn(char) -> bool) -> String {
    let mut out = String::new();
    while let Some(&(_, c)) = chars.peek() {
        if !pred(c) {
            break;
        }
        out.push(c);
        chars.next();
    }
    out
}

fn read_name(chars: &mut Peekable<CharIndices<'_>>, pos: usize) -> Result<String, SelectorError> {
    let name = read_while(chars, is_name_char);
    if name.is_empty() {
        return Err(SelectorError::MissingName { pos });
    }
    Ok(name)
}

/// Read an attribute value up to and including the closing `]`
fn read_value(chars: &mut Peekable<CharIndices<'_>>) -> Result<String, SelectorError> {
    let quote = match chars.peek() {
        Some(&(_, q @ ('"' | '\''))) => {
            chars.next();
            Some(q)
        }
        _ => None,
    };

    let mut value = String::new();
    loop {
        match (chars.next(), quote) {
            (None, _) => return Err(SelectorError::UnclosedAttribute),
            (Some((_, c)), Some(q)) if c == q => {
                return match chars.next() {
                    Some((_, ']')) => Ok(value),
                    Some((pos, ch)) => Err(SelectorError::Unexpected { ch, pos }),
                    None => Err(SelectorError::UnclosedAttribute),
                };
            }
            (Some((_, ']')), None) => return Ok(value.trim().to_owned()),
            (Some((_, c)), _) => value.push(c),
        }
    }
}
