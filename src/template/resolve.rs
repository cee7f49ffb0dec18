//! Placeholder resolution over an arbitrary JSON tree.
//!
//! The resolver never mutates its input: the same template tree is reused for
//! every record of a batch. Objects keep their key order, arrays keep their
//! length and order, and only string leaves are scanned for tokens. Numbers,
//! booleans, and null pass through untouched.
//!
//! All substitutions are string-typed. A leaf that is exactly `{{index}}`
//! becomes the string `"0"`, not the number `0`.

use super::token::{Segment, tokenize};
use crate::error::{FormatError, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

/// Per-record mapping from token name to its concrete value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Binding {
    values: HashMap<String, String>,
}

impl Binding {
    /// Create an empty binding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value`, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Builder-style variant of [`Binding::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Look up the value bound to `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// One step from the root of a JSON tree to a node.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PathStep {
    Key(String),
    Index(usize),
}

/// Location of a node inside a JSON tree, rendered as `$.a.b[0]["odd key"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonPath {
    steps: Vec<PathStep>,
}

impl JsonPath {
    /// The root path (`$`).
    pub fn root() -> Self {
        Self::default()
    }

    /// Path to an object member of this node.
    pub fn key(&self, key: &str) -> Self {
        let mut next = self.clone();
        next.steps.push(PathStep::Key(key.to_string()));
        next
    }

    /// Path to an array element of this node.
    pub fn index(&self, index: usize) -> Self {
        let mut next = self.clone();
        next.steps.push(PathStep::Index(index));
        next
    }

    fn push_key(&mut self, key: &str) {
        self.steps.push(PathStep::Key(key.to_string()));
    }

    fn push_index(&mut self, index: usize) {
        self.steps.push(PathStep::Index(index));
    }

    fn pop(&mut self) {
        self.steps.pop();
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for step in &self.steps {
            match step {
                PathStep::Key(key) if is_plain_key(key) => write!(f, ".{}", key)?,
                PathStep::Key(key) => write!(f, "[{}]", Value::String(key.clone()))?,
                PathStep::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

fn is_plain_key(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Resolve every placeholder in `node` against `binding`, producing a new tree.
///
/// Fails with `UnresolvedPlaceholder` on the first token (in document order)
/// that has no value in the binding.
pub fn resolve(node: &Value, binding: &Binding) -> Result<Value> {
    let mut path = JsonPath::root();
    resolve_node(node, binding, &mut path)
}

fn resolve_node(node: &Value, binding: &Binding, path: &mut JsonPath) -> Result<Value> {
    match node {
        Value::Object(members) => {
            let mut resolved = Map::with_capacity(members.len());
            for (key, value) in members {
                path.push_key(key);
                let value = resolve_node(value, binding, path)?;
                path.pop();
                resolved.insert(key.clone(), value);
            }
            Ok(Value::Object(resolved))
        }
        Value::Array(items) => {
            let mut resolved = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                path.push_index(index);
                resolved.push(resolve_node(item, binding, path)?);
                path.pop();
            }
            Ok(Value::Array(resolved))
        }
        Value::String(text) => resolve_str(text, binding, path).map(Value::String),
        Value::Number(_) | Value::Bool(_) | Value::Null => Ok(node.clone()),
    }
}

/// Resolve the placeholders of a single string found at `path`.
pub fn resolve_str(text: &str, binding: &Binding, path: &JsonPath) -> Result<String> {
    let segments = tokenize(text)
        .map_err(|e| FormatError::Validation(format!("{} in string at {}", e, path)))?;

    // Exactly one token: the bound value replaces the whole leaf
    if let [Segment::Token { name, .. }] = segments.as_slice() {
        return lookup(name, binding, path).map(str::to_string);
    }

    let mut rendered = String::with_capacity(text.len());
    for segment in &segments {
        match segment {
            Segment::Literal(literal) => rendered.push_str(literal),
            Segment::Token { name, .. } => rendered.push_str(lookup(name, binding, path)?),
        }
    }
    Ok(rendered)
}

fn lookup<'a>(name: &str, binding: &'a Binding, path: &JsonPath) -> Result<&'a str> {
    binding
        .get(name)
        .ok_or_else(|| FormatError::UnresolvedPlaceholder {
            token: name.to_string(),
            path: path.to_string(),
            line: None,
        })
}
