//! Dual-format output: a pretty JSON array and a JSONL stream per batch.
//!
//! Both artifacts are encoded from the same record bodies, in the same order,
//! with the same serializer; they differ only in container syntax. The pair is
//! committed as a unit: both files are staged before either is renamed, and a
//! failure at any point puts the output location back the way it was.

mod convert;


pub use convert::{convert_json_to_jsonl, default_jsonl_path};

use crate::batch::PromptRecord;
use crate::error::{FormatError, Result};
use crate::fs::{SetAside, create_parent_dirs, set_aside, stage};
use serde_json::Value;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Paths of a committed output pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// `<prefix>.json`
    pub json: PathBuf,
    /// `<prefix>.jsonl`
    pub jsonl: PathBuf,
}

impl OutputPaths {
    /// Derive both artifact paths from an output prefix.
    ///
    /// The extension is appended, never substituted: `out/v1.2` becomes
    /// `out/v1.2.json` and `out/v1.2.jsonl`.
    pub fn from_prefix<P: AsRef<Path>>(prefix: P) -> Self {
        let prefix = prefix.as_ref();
        Self {
            json: append_extension(prefix, "json"),
            jsonl: append_extension(prefix, "jsonl"),
        }
    }
}

fn append_extension(prefix: &Path, extension: &str) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// Encode values as one pretty-printed JSON array with a trailing newline.
pub fn encode_json_array<'a, I>(values: I) -> Result<String>
where
    I: IntoIterator<Item = &'a Value>,
{
    let values: Vec<&Value> = values.into_iter().collect();
    let mut encoded = serde_json::to_string_pretty(&values)
        .map_err(|e| FormatError::Write(format!("failed to encode JSON array: {}", e)))?;
    encoded.push('\n');
    Ok(encoded)
}

/// Encode values as JSONL: one compact object per newline-terminated line.
pub fn encode_jsonl<'a, I>(values: I) -> Result<String>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut encoded = String::new();
    for value in values {
        let line = serde_json::to_string(value)
            .map_err(|e| FormatError::Write(format!("failed to encode JSONL line: {}", e)))?;
        encoded.push_str(&line);
        encoded.push('\n');
    }
    Ok(encoded)
}

/// Write the batch as `<prefix>.json` and `<prefix>.jsonl`.
///
/// Either both files end up on disk with matching content, or a `Write` error
/// is returned and the output location is left as it was: a `.json` file from
/// an earlier run is restored, and directories created for this batch are
/// removed again.
pub fn write_batch<P: AsRef<Path>>(records: &[PromptRecord], prefix: P) -> Result<OutputPaths> {
    let paths = OutputPaths::from_prefix(prefix);

    let json = encode_json_array(records.iter().map(|r| &r.body))?;
    let jsonl = encode_jsonl(records.iter().map(|r| &r.body))?;

    let created = create_parent_dirs(&paths.json)?;
    if let Err(err) = commit_pair(&paths, json.as_bytes(), jsonl.as_bytes()) {
        created.remove();
        return Err(err);
    }

    info!(
        records = records.len(),
        json = %paths.json.display(),
        jsonl = %paths.jsonl.display(),
        "output pair written"
    );
    Ok(paths)
}

fn commit_pair(paths: &OutputPaths, json: &[u8], jsonl: &[u8]) -> Result<()> {
    // Dropping a staged file removes its temp file, so early returns clean up
    let staged_json = stage(&paths.json, json)?;
    let staged_jsonl = stage(&paths.jsonl, jsonl)?;

    let previous = set_aside(&paths.json)?;

    if let Err(err) = staged_json.commit() {
        return Err(restore_previous(err, previous));
    }

    if let Err(err) = staged_jsonl.commit() {
        warn!(path = %paths.json.display(), error = %err, "rolling back output pair");
        let err = match std::fs::remove_file(&paths.json) {
            Ok(()) => err,
            Err(remove_err) => FormatError::Write(format!(
                "{}; additionally failed to remove '{}': {}",
                err,
                paths.json.display(),
                remove_err
            )),
        };
        return Err(restore_previous(err, previous));
    }

    if let Some(previous) = previous {
        previous.discard();
    }
    Ok(())
}

/// Put a set-aside `.json` back, folding any failure into `err`.
fn restore_previous(err: FormatError, previous: Option<SetAside>) -> FormatError {
    match previous.map(SetAside::restore) {
        Some(Err(restore_err)) => FormatError::Write(format!("{}; {}", err, restore_err)),
        _ => err,
    }
}
