//! Implementation of the `promptfmt check` command.
//!
//! Validates a template without rendering anything and reports which
//! placeholders it uses, flagging any that no batch would bind.

use crate::cli::CheckArgs;
use crate::config::Config;
use crate::error::Result;
use crate::template::{RESERVED_TOKENS, Template};

/// Summary of a validated template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct CheckReport {
    pub(super) prompt_token: String,
    pub(super) tokens: Vec<String>,
    /// Tokens that neither the batch nor the config variables would bind.
    pub(super) unbound: Vec<String>,
}

/// Execute the `promptfmt check` command.
pub fn cmd_check(args: CheckArgs, config: Config) -> Result<()> {
    let report = check_template(args, config)?;

    println!("Template OK");
    println!();
    println!("  Prompt placeholder: {{{{{}}}}}", report.prompt_token);
    println!("  Placeholders:       {}", report.tokens.join(", "));

    if !report.unbound.is_empty() {
        println!();
        println!("Warning: no value configured for: {}", report.unbound.join(", "));
        println!("  Provide them with --var NAME=VALUE or the config `variables` map.");
    }

    Ok(())
}

pub(super) fn check_template(args: CheckArgs, config: Config) -> Result<CheckReport> {
    let config = config.with_overrides(args.placeholder, Vec::new())?;
    let template = Template::load(&args.template, &config.prompt_token)?;

    let tokens: Vec<String> = template.tokens().iter().cloned().collect();
    let unbound = tokens
        .iter()
        .filter(|name| {
            name.as_str() != template.prompt_token()
                && !RESERVED_TOKENS.contains(&name.as_str())
                && !config.variables.contains_key(name.as_str())
        })
        .cloned()
        .collect();

    Ok(CheckReport {
        prompt_token: template.prompt_token().to_string(),
        tokens,
        unbound,
    })
}
