//! Batch driver: prompt lines in, ordered records out.
//!
//! The driver is fail-fast. The first failing line aborts the whole batch and
//! no partial record sequence is returned, so the two output encodings can
//! never disagree about which prompts made it through.

use super::context::BatchContext;
use super::record::{PromptRecord, build_record};
use crate::error::{FormatError, Result};
use crate::template::Template;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// Ordinal assigned to the first non-blank prompt of a batch.
pub const ORDINAL_BASE: usize = 0;

/// Render every non-blank line of `lines` through `template`.
///
/// Blank lines (after trimming) are skipped without consuming an ordinal.
/// Duplicate prompt text is kept; each occurrence becomes its own record.
pub fn run_batch<I, S>(template: &Template, lines: I, ctx: &BatchContext) -> Result<Vec<PromptRecord>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if ctx.variables().contains_key(template.prompt_token()) {
        return Err(FormatError::UserError(format!(
            "variable '{}' shadows the prompt placeholder",
            template.prompt_token()
        )));
    }

    let mut records = Vec::new();
    let mut seen_ids = HashSet::new();
    let mut ordinal = ORDINAL_BASE;

    for (index, raw) in lines.into_iter().enumerate() {
        let line = index + 1;
        let raw = raw.as_ref();

        if raw.trim().is_empty() {
            debug!(line, "skipping blank prompt line");
            continue;
        }

        let record = build_record(template, raw, ordinal, line, ctx)?;

        if !seen_ids.insert(record.id.clone()) {
            return Err(FormatError::DuplicateId {
                id: record.id,
                line,
            });
        }

        debug!(line, ordinal, id = %record.id, "record rendered");
        records.push(record);
        ordinal += 1;
    }

    info!(records = records.len(), timestamp = ctx.timestamp(), "batch rendered");
    Ok(records)
}

/// Read a UTF-8 prompt file into its raw lines.
///
/// Line terminators (`\n` or `\r\n`) are stripped; trimming and blank-line
/// handling are left to [`run_batch`].
pub fn read_prompt_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();

    let content = std::fs::read_to_string(path).map_err(|e| {
        FormatError::UserError(format!(
            "failed to read prompt file '{}': {}",
            path.display(),
            e
        ))
    })?;

    Ok(content.lines().map(str::to_string).collect())
}
