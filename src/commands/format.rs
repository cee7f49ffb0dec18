//! Implementation of the `promptfmt format` command.
//!
//! Renders a prompt file through a template and writes the `.json`/`.jsonl`
//! pair.

use crate::cli::FormatArgs;
use crate::config::Config;
use crate::error::Result;
use crate::pipeline::{BatchOutcome, FormatRequest, format_files};

/// Execute the `promptfmt format` command.
pub fn cmd_format(args: FormatArgs, config: Config) -> Result<()> {
    let outcome = run_format(args, config)?;

    println!("Formatted {} prompt(s)", outcome.record_count);
    println!();
    println!("  JSON:      {}", outcome.json_path.display());
    println!("  JSONL:     {}", outcome.jsonl_path.display());
    println!("  Timestamp: {}", outcome.timestamp);
    println!("  Run id:    {}", outcome.run_id);

    Ok(())
}

/// Apply CLI overrides and run the pipeline.
pub(super) fn run_format(args: FormatArgs, config: Config) -> Result<BatchOutcome> {
    let config = config.with_overrides(args.placeholder, args.vars)?;
    let request = FormatRequest::from_config(args.prompts, args.template, args.output, &config);
    format_files(&request)
}
