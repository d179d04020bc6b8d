//! CSS selector parsing and matching.
//!
//! Supports the subset trigger selectors use in practice:
//!
//! - type (`a`), universal (`*`), class (`.lightbox`), id (`#hero`)
//! - attributes: `[data-gallery]`, `[rel=lightbox]`, `[href^="/img"]`,
//!   `[href$=".jpg"]`, `[class*=thumb]`, `[rel~=gallery]`
//! - descendant (` `) and child (`>`) combinators
//! - selector lists (`a.photo, .gallery a`)
//!
//! Pseudo-classes and sibling combinators are rejected with
//! [`SelectorError::Unsupported`].
//!
//! Tokenizing is done by `cssparser`, so escapes (`.photo\:large`) and
//! comments behave as in a stylesheet.

use crate::dom::{Document, NodeId};
use cssparser::{ParseError, ParseErrorKind, Parser, ParserInput, SourcePosition, Token};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unexpected `{found}` at offset {offset} in `{input}`")]
    Unexpected {
        input: String,
        found: char,
        offset: usize,
    },
    #[error("unsupported selector syntax `{found}` in `{input}`")]
    Unsupported { input: String, found: String },
    #[error("unterminated attribute selector in `{0}`")]
    UnterminatedAttribute(String),
    #[error("combinator without a right-hand side in `{0}`")]
    DanglingCombinator(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOp {
    Equals,
    Includes,
    Prefix,
    Suffix,
    Substring,
}

#[derive(Debug, Clone, PartialEq)]
struct AttrMatch {
    name: String,
    test: Option<(AttrOp, String)>,
}

impl AttrMatch {
    fn matches(&self, actual: Option<&str>) -> bool {
        let Some(actual) = actual else {
            return false;
        };
        match &self.test {
            None => true,
            Some((AttrOp::Equals, v)) => actual == v,
            Some((AttrOp::Includes, v)) => actual.split_whitespace().any(|w| w == v),
            Some((AttrOp::Prefix, v)) => !v.is_empty() && actual.starts_with(v.as_str()),
            Some((AttrOp::Suffix, v)) => !v.is_empty() && actual.ends_with(v.as_str()),
            Some((AttrOp::Substring, v)) => !v.is_empty() && actual.contains(v.as_str()),
        }
    }
}

/// One compound selector, e.g. `a.photo[href]`.
#[derive(Debug, Clone, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    ids: Vec<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatch>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.ids.is_empty() && self.classes.is_empty() && self.attrs.is_empty()
    }

    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let Some(tag) = doc.tag(node) else {
            return false;
        };
        if let Some(want) = &self.tag {
            if want != "*" && !want.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        self.ids
            .iter()
            .all(|id| doc.attribute(node, "id") == Some(id.as_str()))
            && self.classes.iter().all(|c| doc.has_class(node, c))
            && self.attrs.iter().all(|a| a.matches(doc.attribute(node, &a.name)))
    }
}

/// A chain of compounds joined by combinators, e.g. `.gallery > a`.
#[derive(Debug, Clone, PartialEq)]
struct Complex {
    compounds: Vec<Compound>,
    /// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`.
    combinators: Vec<Combinator>,
}

impl Complex {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.matches_at(doc, node, self.compounds.len() - 1)
    }

    fn matches_at(&self, doc: &Document, node: NodeId, idx: usize) -> bool {
        if !self.compounds[idx].matches(doc, node) {
            return false;
        }
        if idx == 0 {
            return true;
        }
        match self.combinators[idx - 1] {
            Combinator::Child => doc
                .parent(node)
                .is_some_and(|parent| self.matches_at(doc, parent, idx - 1)),
            Combinator::Descendant => {
                let mut cursor = doc.parent(node);
                while let Some(ancestor) = cursor {
                    if self.matches_at(doc, ancestor, idx - 1) {
                        return true;
                    }
                    cursor = doc.parent(ancestor);
                }
                false
            }
        }
    }
}

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Complex>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        if input.trim().is_empty() {
            return Err(SelectorError::Empty);
        }
        let mut css = ParserInput::new(input);
        let mut parser = Parser::new(&mut css);
        parser.skip_whitespace();

        let mut alternatives = Vec::new();
        loop {
            let (complex, more) = parse_complex(&mut parser, input)?;
            alternatives.push(complex);
            if !more {
                break;
            }
            parser.skip_whitespace();
        }
        Ok(Self {
            source: input.trim().to_string(),
            alternatives,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `node` is an element matching any alternative of the list.
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.alternatives.iter().any(|c| c.matches(doc, node))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Walk the token stream of one complex selector, stopping after a comma
/// or at the end of input. Returns the selector and whether a comma
/// followed it.
fn parse_complex<'i>(
    parser: &mut Parser<'i, '_>,
    input: &str,
) -> Result<(Complex, bool), SelectorError> {
    let mut compounds = Vec::new();
    let mut combinators = Vec::new();
    let mut current = Compound::default();
    // Combinator seen since the last finished compound.
    let mut pending: Option<Combinator> = None;
    let mut more = false;

    loop {
        let start = parser.position();
        let token = match parser.next_including_whitespace() {
            Ok(t) => t.clone(),
            Err(_) => break,
        };

        // Tokens that open or extend a compound.
        if matches!(
            token,
            Token::Ident(_)
                | Token::Delim('*')
                | Token::Delim('.')
                | Token::IDHash(_)
                | Token::SquareBracketBlock
        ) && current.is_empty()
        {
            if let Some(combinator) = pending.take() {
                combinators.push(combinator);
            }
        }

        match token {
            Token::Ident(name) => {
                if !current.is_empty() {
                    return Err(unexpected(input, start));
                }
                current.tag = Some(name.to_ascii_lowercase());
            }
            Token::Delim('*') => {
                if !current.is_empty() {
                    return Err(unexpected(input, start));
                }
                current.tag = Some("*".to_string());
            }
            Token::Delim('.') => {
                let class_start = parser.position();
                match parser.next_including_whitespace() {
                    Ok(Token::Ident(class)) => current.classes.push(class.to_string()),
                    Ok(_) => return Err(unexpected(input, class_start)),
                    Err(_) => return Err(SelectorError::DanglingCombinator(input.to_string())),
                }
            }
            Token::IDHash(id) => current.ids.push(id.to_string()),
            Token::SquareBracketBlock => {
                let attr = parser
                    .parse_nested_block(|p| parse_attribute(p, input))
                    .map_err(|e| match e.kind {
                        ParseErrorKind::Custom(err) => err,
                        ParseErrorKind::Basic(_) => {
                            SelectorError::UnterminatedAttribute(input.to_string())
                        }
                    })?;
                // The tokenizer closes blocks left open at end of input.
                if !parser.slice_from(start).ends_with(']') {
                    return Err(SelectorError::UnterminatedAttribute(input.to_string()));
                }
                current.attrs.push(attr);
            }
            Token::WhiteSpace(_) => {
                if !current.is_empty() {
                    compounds.push(std::mem::take(&mut current));
                    pending = Some(Combinator::Descendant);
                }
            }
            Token::Delim('>') => {
                if !current.is_empty() {
                    compounds.push(std::mem::take(&mut current));
                }
                if compounds.is_empty() || pending == Some(Combinator::Child) {
                    return Err(unexpected(input, start));
                }
                pending = Some(Combinator::Child);
            }
            Token::Delim(c @ ('+' | '~')) => {
                return Err(SelectorError::Unsupported {
                    input: input.to_string(),
                    found: c.to_string(),
                });
            }
            Token::Colon => {
                let found = input[start.byte_index()..]
                    .split(|c: char| c.is_whitespace() || c == ',')
                    .next()
                    .unwrap_or(":")
                    .to_string();
                return Err(SelectorError::Unsupported {
                    input: input.to_string(),
                    found,
                });
            }
            Token::Comma => {
                if current.is_empty() && compounds.is_empty() {
                    return Err(unexpected(input, start));
                }
                more = true;
                break;
            }
            _ => return Err(unexpected(input, start)),
        }
    }

    if !current.is_empty() {
        compounds.push(current);
    }
    if compounds.is_empty() || pending == Some(Combinator::Child) {
        return Err(SelectorError::DanglingCombinator(input.to_string()));
    }
    Ok((
        Complex {
            compounds,
            combinators,
        },
        more,
    ))
}

/// Contents of `[...]`: a name, optionally an operator and a value.
fn parse_attribute<'i>(
    parser: &mut Parser<'i, '_>,
    input: &str,
) -> Result<AttrMatch, ParseError<'i, SelectorError>> {
    let unterminated = || SelectorError::UnterminatedAttribute(input.to_string());

    parser.skip_whitespace();
    let start = parser.position();
    let name = match parser.next().cloned() {
        Ok(Token::Ident(name)) => name.to_ascii_lowercase(),
        Ok(_) => return Err(parser.new_custom_error(unexpected(input, start))),
        Err(_) => return Err(parser.new_custom_error(unterminated())),
    };

    parser.skip_whitespace();
    let start = parser.position();
    let op = match parser.next().cloned() {
        Err(_) => return Ok(AttrMatch { name, test: None }),
        Ok(Token::Delim('=')) => AttrOp::Equals,
        Ok(Token::IncludeMatch) => AttrOp::Includes,
        Ok(Token::PrefixMatch) => AttrOp::Prefix,
        Ok(Token::SuffixMatch) => AttrOp::Suffix,
        Ok(Token::SubstringMatch) => AttrOp::Substring,
        Ok(_) => return Err(parser.new_custom_error(unexpected(input, start))),
    };

    parser.skip_whitespace();
    let start = parser.position();
    let value = match parser.next().cloned() {
        Ok(Token::Ident(v)) | Ok(Token::QuotedString(v)) => v.to_string(),
        Ok(_) => return Err(parser.new_custom_error(unexpected(input, start))),
        Err(_) => return Err(parser.new_custom_error(unterminated())),
    };

    Ok(AttrMatch {
        name,
        test: Some((op, value)),
    })
}

/// Error for the token starting at `at`.
fn unexpected(input: &str, at: SourcePosition) -> SelectorError {
    let offset = at.byte_index();
    match input[offset..].chars().next() {
        Some(found) => SelectorError::Unexpected {
            input: input.to_string(),
            found,
            offset,
        },
        None => SelectorError::DanglingCombinator(input.to_string()),
    }
}
