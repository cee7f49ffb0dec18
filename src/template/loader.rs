//! Template loading and validation.
//!
//! A template is parsed once per batch and is read-only afterwards. Loading
//! fails early, before any record is built, if the document is not a JSON
//! object, if any string leaf has malformed token syntax, or if no string leaf
//! references the prompt token.

use super::resolve::JsonPath;
use super::token::{is_valid_token_name, token_names};
use crate::error::{FormatError, Result};
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

/// Default name of the token that receives the prompt text.
pub const DEFAULT_PROMPT_TOKEN: &str = "prompt";

/// Token names bound by the batch itself; none of them can carry the prompt.
pub const RESERVED_TOKENS: [&str; 4] = ["timestamp", "index", "id", "run_id"];

/// A validated template tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    root: Value,
    tokens: BTreeSet<String>,
    prompt_token: String,
}

impl Template {
    /// Load and validate a template file.
    pub fn load<P: AsRef<Path>>(path: P, prompt_token: &str) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            FormatError::UserError(format!(
                "failed to read template file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::parse(&content, &path.display().to_string(), prompt_token)
    }

    /// Parse and validate a template from JSON text.
    ///
    /// `source_name` only labels error messages.
    pub fn parse(json: &str, source_name: &str, prompt_token: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(json).map_err(|e| FormatError::Parse {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })?;

        if !root.is_object() {
            return Err(FormatError::Parse {
                source_name: source_name.to_string(),
                message: format!("template root must be a JSON object, found {}", kind_of(&root)),
            });
        }

        Self::from_value(root, prompt_token)
    }

    /// Validate an already-parsed JSON object as a template.
    pub fn from_value(root: Value, prompt_token: &str) -> Result<Self> {
        if !is_valid_token_name(prompt_token) {
            return Err(FormatError::UserError(format!(
                "invalid prompt placeholder name '{}'",
                prompt_token
            )));
        }
        if RESERVED_TOKENS.contains(&prompt_token) {
            return Err(FormatError::UserError(format!(
                "'{}' is a reserved placeholder and cannot carry the prompt",
                prompt_token
            )));
        }
        if !root.is_object() {
            return Err(FormatError::Validation(format!(
                "template root must be a JSON object, found {}",
                kind_of(&root)
            )));
        }

        if let Some(id) = root.get("id")
            && !(id.is_string() || id.is_number() || id.is_boolean())
        {
            return Err(FormatError::Validation(format!(
                "template 'id' must be a string or a scalar, found {}",
                kind_of(id)
            )));
        }

        let mut tokens = BTreeSet::new();
        collect_tokens(&root, &JsonPath::root(), &mut tokens)?;

        if !tokens.contains(prompt_token) {
            return Err(FormatError::Validation(format!(
                "template never references the '{{{{{}}}}}' placeholder, so prompts have nowhere to go",
                prompt_token
            )));
        }

        debug!(tokens = ?tokens, prompt_token, "template validated");

        Ok(Self {
            root,
            tokens,
            prompt_token: prompt_token.to_string(),
        })
    }

    /// The template tree.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Every token name referenced anywhere in the template.
    pub fn tokens(&self) -> &BTreeSet<String> {
        &self.tokens
    }

    /// Name of the token that receives the prompt text.
    pub fn prompt_token(&self) -> &str {
        &self.prompt_token
    }

    /// The root-level `id` field, if the template has one.
    pub fn id_field(&self) -> Option<&Value> {
        self.root.get("id")
    }
}

fn collect_tokens(node: &Value, path: &JsonPath, tokens: &mut BTreeSet<String>) -> Result<()> {
    match node {
        Value::Object(members) => {
            for (key, value) in members {
                let member = path.key(key);
                // Keys are copied verbatim, so a token there would never be filled
                match token_names(key) {
                    Ok(names) if names.is_empty() => {}
                    Ok(_) => {
                        return Err(FormatError::Validation(format!(
                            "placeholders are not allowed in object keys (found in key at {})",
                            member
                        )));
                    }
                    Err(e) => {
                        return Err(FormatError::Validation(format!(
                            "{} in object key at {}",
                            e, member
                        )));
                    }
                }
                collect_tokens(value, &member, tokens)?;
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                collect_tokens(item, &path.index(index), tokens)?;
            }
        }
        Value::String(text) => {
            let names = token_names(text)
                .map_err(|e| FormatError::Validation(format!("{} in string at {}", e, path)))?;
            tokens.extend(names);
        }
        Value::Number(_) | Value::Bool(_) | Value::Null => {}
    }
    Ok(())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Object(_) => "an object",
        Value::Array(_) => "an array",
        Value::String(_) => "a string",
        Value::Number(_) => "a number",
        Value::Bool(_) => "a boolean",
        Value::Null => "null",
    }
}
