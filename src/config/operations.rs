//! Config loading, validation, and override operations.

use super::model::{Config, DEFAULT_CONFIG_FILE};
use crate::batch::{render_timestamp, validate_variable_name};
use crate::error::{FormatError, Result};
use crate::template::{RESERVED_TOKENS, is_valid_token_name};
use chrono::Utc;
use std::path::Path;
use tracing::debug;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the config file
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(FormatError::UserError)` - Read error, parse error, or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            FormatError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Resolve the effective config.
    ///
    /// An explicit path must exist. Without one, `promptfmt.yaml` in the
    /// working directory is used if present, otherwise the defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading config");
            return Self::load(path);
        }

        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.is_file() {
            debug!(path = DEFAULT_CONFIG_FILE, "loading config");
            Self::load(default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from a YAML string.
    ///
    /// An empty document yields the defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml)
                .map_err(|e| FormatError::UserError(format!("failed to parse config YAML: {}", e)))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides on top of the file values, then revalidate.
    ///
    /// `variables` entries replace config variables of the same name.
    pub fn with_overrides(
        mut self,
        prompt_token: Option<String>,
        variables: Vec<(String, String)>,
    ) -> Result<Self> {
        if let Some(prompt_token) = prompt_token {
            self.prompt_token = prompt_token;
        }
        self.variables.extend(variables);

        self.validate()?;
        Ok(self)
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `prompt_token` must be a valid, non-reserved placeholder name
    /// - `timestamp_format` must be a chrono format that renders something
    /// - `output_dir` must be non-empty
    /// - `variables` names must be valid, non-reserved, and not the prompt token
    pub fn validate(&self) -> Result<()> {
        if !is_valid_token_name(&self.prompt_token) {
            return Err(FormatError::UserError(format!(
                "config validation failed: prompt_token '{}' is not a valid placeholder name",
                self.prompt_token
            )));
        }
        if RESERVED_TOKENS.contains(&self.prompt_token.as_str()) {
            return Err(FormatError::UserError(format!(
                "config validation failed: prompt_token '{}' is reserved",
                self.prompt_token
            )));
        }

        render_timestamp(&Utc::now(), &self.timestamp_format).map_err(|e| {
            FormatError::UserError(format!("config validation failed: {}", e))
        })?;

        if self.output_dir.trim().is_empty() {
            return Err(FormatError::UserError(
                "config validation failed: output_dir must be non-empty".to_string(),
            ));
        }

        for name in self.variables.keys() {
            validate_variable_name(name)
                .map_err(|e| FormatError::UserError(format!("config validation failed: {}", e)))?;
            if *name == self.prompt_token {
                return Err(FormatError::UserError(format!(
                    "config validation failed: variable '{}' shadows the prompt placeholder",
                    name
                )));
            }
        }

        Ok(())
    }
}
