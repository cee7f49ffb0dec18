//! Implementation of the `promptfmt convert` command.

use crate::cli::ConvertArgs;
use crate::error::Result;
use crate::output::convert_json_to_jsonl;

/// Execute the `promptfmt convert` command.
///
/// Converts an existing `.json` batch array into JSONL using the same
/// encoder as `format`.
pub fn cmd_convert(args: ConvertArgs) -> Result<()> {
    let written = convert_json_to_jsonl(&args.input, args.output.as_deref())?;

    println!("Converted: {} -> {}", args.input.display(), written.display());

    Ok(())
}
