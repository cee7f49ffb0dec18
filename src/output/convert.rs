//! Companion converter: an existing `.json` batch array to `.jsonl`.
//!
//! Uses the same JSONL encoder as [`super::write_batch`], so converting a
//! batch's `.json` output reproduces its `.jsonl` output byte for byte.

use super::encode_jsonl;
use crate::error::{FormatError, Result};
use crate::fs::atomic_write;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;

/// `<input>` with its extension replaced by `jsonl`.
pub fn default_jsonl_path(input: &Path) -> PathBuf {
    input.with_extension("jsonl")
}

/// Convert a JSON array of record objects into a JSONL file.
///
/// Writes to `output`, or next to `input` with a `.jsonl` extension. Returns
/// the written path.
pub fn convert_json_to_jsonl(input: &Path, output: Option<&Path>) -> Result<PathBuf> {
    let content = std::fs::read_to_string(input).map_err(|e| {
        FormatError::UserError(format!(
            "failed to read JSON file '{}': {}",
            input.display(),
            e
        ))
    })?;

    let document: Value = serde_json::from_str(&content).map_err(|e| FormatError::Parse {
        source_name: input.display().to_string(),
        message: e.to_string(),
    })?;

    let Value::Array(records) = document else {
        return Err(FormatError::Validation(format!(
            "'{}' must contain a JSON array of records",
            input.display()
        )));
    };

    if let Some(position) = records.iter().position(|record| !record.is_object()) {
        return Err(FormatError::Validation(format!(
            "element {} of '{}' is not a JSON object",
            position,
            input.display()
        )));
    }

    let target = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_jsonl_path(input));
    if target == input {
        return Err(FormatError::UserError(format!(
            "refusing to overwrite the input file '{}'",
            input.display()
        )));
    }

    let jsonl = encode_jsonl(&records)?;
    let written = atomic_write(&target, jsonl.as_bytes())?;

    info!(records = records.len(), output = %written.display(), "converted JSON array to JSONL");
    Ok(written)
}
