//! Placeholder tokenizer for template string leaves.
//!
//! Splits a string into a typed segment stream that the resolver consumes.
//!
//! # Syntax
//!
//! - `{{name}}` - A placeholder token; whitespace inside the delimiters is ignored
//! - `\{{` - Renders as a literal `{{` and never starts a token
//! - `}}` outside a token, and any other backslash, is ordinary text
//!
//! Token names follow `[A-Za-z_][A-Za-z0-9_]*`.
//!
//! A backslash directly before a token is always read as the escape, so there
//! is no way to render a literal `\` followed by a resolved token
//! (`C:\{{dir}}` yields `C:{{dir}}`). Put the backslash in the bound value
//! instead.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static TOKEN_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("Invalid token name regex")
});

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const ESCAPED_OPEN: &str = "\\{{";

/// One piece of a tokenized string leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text copied to the output as-is (escapes already applied).
    Literal(String),
    /// A placeholder to be replaced by its bound value.
    Token {
        /// Token name without delimiters or padding.
        name: String,
        /// Byte offset of the opening `{{` in the source string.
        offset: usize,
    },
}

/// Syntax error found while tokenizing a string leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// A `{{` was found without a matching `}}`.
    Unterminated {
        /// Byte offset of the unmatched `{{`.
        offset: usize,
    },
    /// The text between the delimiters is empty or not a valid name.
    InvalidName {
        /// The raw (trimmed) text between the delimiters.
        name: String,
        /// Byte offset of the opening `{{`.
        offset: usize,
    },
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::Unterminated { offset } => {
                write!(f, "unterminated '{{{{' at offset {}", offset)
            }
            TokenError::InvalidName { name, offset } => {
                write!(f, "invalid placeholder name '{}' at offset {}", name, offset)
            }
        }
    }
}

impl std::error::Error for TokenError {}

/// Check whether `name` is usable as a placeholder token name.
pub fn is_valid_token_name(name: &str) -> bool {
    TOKEN_NAME_REGEX.is_match(name)
}

/// Tokenize a string leaf into literal and token segments.
///
/// Adjacent literal text is merged into a single segment, so a string that is
/// exactly one token yields exactly one `Segment::Token`.
pub fn tokenize(input: &str) -> Result<Vec<Segment>, TokenError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut pos = 0;

    while pos < input.len() {
        let rest = &input[pos..];

        if rest.starts_with(ESCAPED_OPEN) {
            literal.push_str(OPEN);
            pos += ESCAPED_OPEN.len();
        } else if rest.starts_with(OPEN) {
            let body_start = pos + OPEN.len();
            let close = input[body_start..]
                .find(CLOSE)
                .ok_or(TokenError::Unterminated { offset: pos })?;
            let name = input[body_start..body_start + close].trim();

            if !is_valid_token_name(name) {
                return Err(TokenError::InvalidName {
                    name: name.to_string(),
                    offset: pos,
                });
            }

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Token {
                name: name.to_string(),
                offset: pos,
            });
            pos = body_start + close + CLOSE.len();
        } else {
            // Advance by one full character to stay on a UTF-8 boundary
            let ch = rest.chars().next().unwrap_or_default();
            literal.push(ch);
            pos += ch.len_utf8();
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(segments)
}

/// Collect the names of every token in a string leaf, in order of appearance.
pub fn token_names(input: &str) -> Result<Vec<String>, TokenError> {
    Ok(tokenize(input)?
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Token { name, .. } => Some(name),
            Segment::Literal(_) => None,
        })
        .collect())
}
