//! Error types for the promptfmt CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.
//! Every error carries a locator (file, JSON path, or source line) where one exists.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for promptfmt operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// A JSON document (template or converter input) is not well-formed.
    #[error("failed to parse {source_name}: {message}")]
    Parse {
        /// Where the document came from (file path or a short label).
        source_name: String,
        /// Parser message, including line/column when available.
        message: String,
    },

    /// The template (or converter input) parsed but is structurally unusable.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A prompt was empty after trimming.
    #[error("empty prompt{}", line_suffix(.line))]
    EmptyPrompt {
        /// 1-based line in the prompt source, when known.
        line: Option<usize>,
    },

    /// A template token has no value in the record's binding.
    #[error("unresolved placeholder '{token}' at {path}{}", line_suffix(.line))]
    UnresolvedPlaceholder {
        /// Name of the token without delimiters.
        token: String,
        /// JSON path of the offending string leaf (e.g. `$.conversation[0].content`).
        path: String,
        /// 1-based line in the prompt source, when known.
        line: Option<usize>,
    },

    /// Two records in one batch resolved to the same id.
    #[error("duplicate record id '{id}' on line {line}")]
    DuplicateId {
        /// The colliding id.
        id: String,
        /// 1-based line of the second occurrence.
        line: usize,
    },

    /// The output pair could not be written; any partial output was removed.
    #[error("failed to write output: {0}")]
    Write(String),

    /// Bad arguments, unreadable inputs, or nothing to do.
    #[error("{0}")]
    UserError(String),
}

fn line_suffix(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!(" (prompt line {})", line),
        None => String::new(),
    }
}

impl FormatError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            FormatError::Parse { .. } | FormatError::Validation(_) => exit_codes::TEMPLATE_ERROR,
            FormatError::EmptyPrompt { .. }
            | FormatError::UnresolvedPlaceholder { .. }
            | FormatError::DuplicateId { .. } => exit_codes::RECORD_ERROR,
            FormatError::Write(_) => exit_codes::WRITE_FAILURE,
            FormatError::UserError(_) => exit_codes::USER_ERROR,
        }
    }

    /// Attach a prompt source line to record-level errors that lack one.
    pub fn at_line(self, source_line: usize) -> Self {
        match self {
            FormatError::EmptyPrompt { line: None } => FormatError::EmptyPrompt {
                line: Some(source_line),
            },
            FormatError::UnresolvedPlaceholder {
                token,
                path,
                line: None,
            } => FormatError::UnresolvedPlaceholder {
                token,
                path,
                line: Some(source_line),
            },
            other => other,
        }
    }
}

/// Result type alias for promptfmt operations.
pub type Result<T> = std::result::Result<T, FormatError>;
