//! CLI argument parsing for promptfmt.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// promptfmt: turn free-text prompts into structured JSON prompt records.
///
/// Each non-blank line of a prompt file is merged into a JSON template and the
/// batch is written twice, as a pretty JSON array and as JSONL:
/// - `{{prompt}}` receives the trimmed prompt text
/// - `{{timestamp}}`, `{{index}}`, `{{id}}`, and `{{run_id}}` are bound per batch/record
/// - `\{{` renders a literal `{{`
#[derive(Parser, Debug)]
#[command(name = "promptfmt")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a YAML config file (default: ./promptfmt.yaml if present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for promptfmt.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a prompt file through a template.
    ///
    /// Writes `<prefix>.json` and `<prefix>.jsonl` as a matched pair, or
    /// nothing at all if any prompt fails.
    Format(FormatArgs),

    /// Convert an existing JSON array of records to JSONL.
    Convert(ConvertArgs),

    /// Validate a template and list the placeholders it references.
    Check(CheckArgs),
}

/// Arguments for the `format` command.
#[derive(Parser, Debug)]
pub struct FormatArgs {
    /// Prompt file, one prompt per non-blank line.
    #[arg(short, long)]
    pub prompts: PathBuf,

    /// JSON template file.
    #[arg(short, long)]
    pub template: PathBuf,

    /// Output prefix; `.json` and `.jsonl` are appended.
    ///
    /// Defaults to `<output_dir>/<prompts-stem>_<template-stem>`.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Placeholder name that receives the prompt text (overrides config).
    #[arg(long)]
    pub placeholder: Option<String>,

    /// Extra placeholder value as NAME=VALUE (repeatable).
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,
}

/// Arguments for the `convert` command.
#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// JSON file containing an array of records.
    pub input: PathBuf,

    /// Output path (default: input with a `.jsonl` extension).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `check` command.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// JSON template file.
    pub template: PathBuf,

    /// Placeholder name that receives the prompt text (overrides config).
    #[arg(long)]
    pub placeholder: Option<String>,
}

/// Parse a `NAME=VALUE` pair. The value may itself contain `=`.
fn parse_var(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing variable name in '{}'", raw));
    }
    Ok((name.to_string(), value.to_string()))
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        // Verifies the CLI arguments configuration is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_format_minimal() {
        let cli =
            Cli::try_parse_from(["promptfmt", "format", "-p", "prompts.txt", "-t", "t.json"]).unwrap();
        assert_eq!(cli.verbose, 0);
        assert!(cli.config.is_none());
        if let Command::Format(args) = cli.command {
            assert_eq!(args.prompts, PathBuf::from("prompts.txt"));
            assert_eq!(args.template, PathBuf::from("t.json"));
            assert!(args.output.is_none());
            assert!(args.placeholder.is_none());
            assert!(args.vars.is_empty());
        } else {
            panic!("Expected Format command");
        }
    }

    #[test]
    fn parse_format_full() {
        let cli = Cli::try_parse_from([
            "promptfmt",
            "-vv",
            "--config",
            "custom.yaml",
            "format",
            "--prompts",
            "prompts.txt",
            "--template",
            "t.json",
            "--output",
            "out/batch",
            "--placeholder",
            "CHALLENGE",
            "--var",
            "brand=Acme",
            "--var",
            "formula=a=b",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
        if let Command::Format(args) = cli.command {
            assert_eq!(args.output, Some(PathBuf::from("out/batch")));
            assert_eq!(args.placeholder.as_deref(), Some("CHALLENGE"));
            assert_eq!(
                args.vars,
                vec![
                    ("brand".to_string(), "Acme".to_string()),
                    ("formula".to_string(), "a=b".to_string())
                ]
            );
        } else {
            panic!("Expected Format command");
        }
    }

    #[test]
    fn parse_format_requires_inputs() {
        assert!(Cli::try_parse_from(["promptfmt", "format", "-p", "prompts.txt"]).is_err());
    }

    #[test]
    fn parse_bad_var() {
        assert!(
            Cli::try_parse_from([
                "promptfmt", "format", "-p", "p.txt", "-t", "t.json", "--var", "novalue"
            ])
            .is_err()
        );
    }

    #[test]
    fn parse_convert() {
        let cli = Cli::try_parse_from(["promptfmt", "convert", "batch.json"]).unwrap();
        if let Command::Convert(args) = cli.command {
            assert_eq!(args.input, PathBuf::from("batch.json"));
            assert!(args.output.is_none());
        } else {
            panic!("Expected Convert command");
        }
    }

    #[test]
    fn parse_check_with_global_flag_after_subcommand() {
        let cli =
            Cli::try_parse_from(["promptfmt", "check", "t.json", "--placeholder", "X", "-v"]).unwrap();
        assert_eq!(cli.verbose, 1);
        if let Command::Check(args) = cli.command {
            assert_eq!(args.template, PathBuf::from("t.json"));
            assert_eq!(args.placeholder.as_deref(), Some("X"));
        } else {
            panic!("Expected Check command");
        }
    }

    #[test]
    fn parse_var_splits_on_first_equals() {
        assert_eq!(
            parse_var("k=v=w"),
            Ok(("k".to_string(), "v=w".to_string()))
        );
        assert!(parse_var("=v").is_err());
    }
}
