//! Config struct definition and default implementation.

use crate::batch::DEFAULT_TIMESTAMP_FORMAT;
use crate::template::DEFAULT_PROMPT_TOKEN;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "promptfmt.yaml";

/// Configuration for promptfmt.
///
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name of the placeholder that receives each prompt (default: "prompt").
    #[serde(default = "default_prompt_token")]
    pub prompt_token: String,

    /// chrono format for the batch `{{timestamp}}` (default: "%Y%m%d_%H%M%S").
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,

    /// Directory for output pairs when no explicit prefix is given.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Static placeholder values bound into every record.
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt_token: default_prompt_token(),
            timestamp_format: default_timestamp_format(),
            output_dir: default_output_dir(),
            variables: BTreeMap::new(),
        }
    }
}

pub(crate) fn default_prompt_token() -> String {
    DEFAULT_PROMPT_TOKEN.to_string()
}
pub(crate) fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_FORMAT.to_string()
}
pub(crate) fn default_output_dir() -> String {
    "outputs".to_string()
}
