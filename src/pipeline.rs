//! End-to-end batch pipeline: files in, matched output pair out.
//!
//! The pipeline runs its checks in order of cost. Template problems are
//! rejected before the prompt file is even read, record problems abort before
//! anything is written, and write problems roll the pair back. Whatever the
//! failure, no output file is left on disk.

use crate::batch::{BatchContext, read_prompt_lines, run_batch};
use crate::config::Config;
use crate::error::{FormatError, Result};
use crate::output::write_batch;
use crate::template::Template;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Everything needed to render one prompt file through one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatRequest {
    pub prompts: PathBuf,
    pub template: PathBuf,
    /// Output prefix; `.json` and `.jsonl` are appended.
    pub prefix: PathBuf,
    pub prompt_token: String,
    pub timestamp_format: String,
    pub variables: BTreeMap<String, String>,
}

impl FormatRequest {
    /// Build a request from input paths and an effective config.
    ///
    /// Without an explicit prefix, outputs go to
    /// `<output_dir>/<prompts-stem>_<template-stem>`.
    pub fn from_config(
        prompts: PathBuf,
        template: PathBuf,
        prefix: Option<PathBuf>,
        config: &Config,
    ) -> Self {
        let prefix = prefix
            .unwrap_or_else(|| default_prefix(Path::new(&config.output_dir), &prompts, &template));

        Self {
            prompts,
            template,
            prefix,
            prompt_token: config.prompt_token.clone(),
            timestamp_format: config.timestamp_format.clone(),
            variables: config.variables.clone(),
        }
    }
}

/// Result of a committed batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub record_count: usize,
    pub json_path: PathBuf,
    pub jsonl_path: PathBuf,
    /// The batch timestamp every record was rendered with.
    pub timestamp: String,
    /// The `{{run_id}}` value shared by the batch.
    pub run_id: String,
}

/// `<output_dir>/<prompts-stem>_<template-stem>`
pub fn default_prefix(output_dir: &Path, prompts: &Path, template: &Path) -> PathBuf {
    let stem = |path: &Path, fallback: &str| {
        path.file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| fallback.to_string())
    };
    output_dir.join(format!(
        "{}_{}",
        stem(prompts, "prompts"),
        stem(template, "template")
    ))
}

/// Render every prompt of `request.prompts` and write the output pair.
pub fn format_files(request: &FormatRequest) -> Result<BatchOutcome> {
    let ctx = BatchContext::now(&request.timestamp_format)?;
    format_files_with_context(request, ctx)
}

/// [`format_files`] with a caller-supplied batch context.
pub fn format_files_with_context(request: &FormatRequest, ctx: BatchContext) -> Result<BatchOutcome> {
    let template = Template::load(&request.template, &request.prompt_token)?;
    let ctx = ctx.with_variables(request.variables.clone())?;

    let lines = read_prompt_lines(&request.prompts)?;
    let records = run_batch(&template, &lines, &ctx)?;
    if records.is_empty() {
        return Err(FormatError::UserError(format!(
            "no prompts found in '{}'",
            request.prompts.display()
        )));
    }

    let paths = write_batch(&records, &request.prefix)?;

    info!(
        records = records.len(),
        prompts = %request.prompts.display(),
        template = %request.template.display(),
        "batch complete"
    );

    Ok(BatchOutcome {
        record_count: records.len(),
        json_path: paths.json,
        jsonl_path: paths.jsonl,
        timestamp: ctx.timestamp().to_string(),
        run_id: ctx.run_id().to_string(),
    })
}
