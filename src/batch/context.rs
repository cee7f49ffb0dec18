//! Immutable per-batch context.
//!
//! The clock is read once, when the context is created, so every record of a
//! batch sees the same `timestamp` and `run_id`. Tests build a context from a
//! fixed instant to keep ids reproducible.

use crate::error::{FormatError, Result};
use crate::template::{Binding, RESERVED_TOKENS, is_valid_token_name};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Default chrono format for the batch `timestamp` token.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Values shared by every record of one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchContext {
    timestamp: String,
    run_id: String,
    variables: BTreeMap<String, String>,
}

impl BatchContext {
    /// Create a context for a batch started at `started_at`.
    ///
    /// Fails if `timestamp_format` is not a valid chrono format string or
    /// renders to nothing.
    pub fn new(started_at: DateTime<Utc>, timestamp_format: &str) -> Result<Self> {
        let timestamp = render_timestamp(&started_at, timestamp_format)?;
        let run_id = format!("run-{}-{}", timestamp, std::process::id());

        Ok(Self {
            timestamp,
            run_id,
            variables: BTreeMap::new(),
        })
    }

    /// Create a context stamped with the current time.
    pub fn now(timestamp_format: &str) -> Result<Self> {
        Self::new(Utc::now(), timestamp_format)
    }

    /// Add static variables bound into every record.
    ///
    /// Names must be valid token names and must not collide with the reserved
    /// batch tokens.
    pub fn with_variables<I, K, V>(mut self, variables: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in variables {
            let name = name.into();
            validate_variable_name(&name)?;
            self.variables.insert(name, value.into());
        }
        Ok(self)
    }

    /// The rendered batch timestamp.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// `run-<timestamp>-<pid>`, shared by every record of the batch.
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn variables(&self) -> &BTreeMap<String, String> {
        &self.variables
    }

    /// Build the binding for one record, without its `id`.
    ///
    /// Static variables go in first so the batch tokens always win.
    pub(crate) fn partial_binding(&self, prompt_token: &str, prompt: &str, index: usize) -> Binding {
        let mut binding = Binding::new();
        for (name, value) in &self.variables {
            binding.insert(name.as_str(), value.as_str());
        }
        binding.insert(prompt_token, prompt);
        binding.insert("timestamp", self.timestamp.as_str());
        binding.insert("index", index.to_string());
        binding.insert("run_id", self.run_id.as_str());
        binding
    }
}

/// Check that a user variable name is a valid, non-reserved token name.
pub fn validate_variable_name(name: &str) -> Result<()> {
    if !is_valid_token_name(name) {
        return Err(FormatError::UserError(format!(
            "invalid variable name '{}': use letters, digits, and underscores",
            name
        )));
    }
    if RESERVED_TOKENS.contains(&name) {
        return Err(FormatError::UserError(format!(
            "variable '{}' shadows a reserved placeholder",
            name
        )));
    }
    Ok(())
}

/// Render `started_at` with a chrono format string.
pub fn render_timestamp(started_at: &DateTime<Utc>, timestamp_format: &str) -> Result<String> {
    let mut rendered = String::new();
    write!(rendered, "{}", started_at.format(timestamp_format)).map_err(|_| {
        FormatError::UserError(format!("invalid timestamp format '{}'", timestamp_format))
    })?;

    if rendered.is_empty() {
        return Err(FormatError::UserError(
            "timestamp format renders an empty string".to_string(),
        ));
    }
    Ok(rendered)
}
