//! Command implementations for promptfmt.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Every command resolves the effective config first.

mod check;
mod convert;
mod format;

#[cfg(test)]
mod tests;

use crate::cli::Command;
use crate::config::Config;
use crate::error::Result;
use std::path::Path;

/// Dispatch a command to its implementation.
///
/// `config_path` is the global `--config` flag, if given.
pub fn dispatch(command: Command, config_path: Option<&Path>) -> Result<()> {
    let config = Config::resolve(config_path)?;

    match command {
        Command::Format(args) => format::cmd_format(args, config),
        Command::Convert(args) => convert::cmd_convert(args),
        Command::Check(args) => check::cmd_check(args, config),
    }
}
