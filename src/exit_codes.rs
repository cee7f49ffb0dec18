//! Exit code constants for the promptfmt CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, unreadable input, nothing to do)
//! - 2: Template error (malformed JSON or failed validation)
//! - 3: Record error (empty prompt, unresolved placeholder, duplicate id)
//! - 4: Write failure (output pair rolled back)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, unreadable input files, or an empty prompt source.
pub const USER_ERROR: i32 = 1;

/// Template error: the template is not valid JSON or fails validation.
pub const TEMPLATE_ERROR: i32 = 2;

/// Record error: a single prompt line could not be turned into a record.
pub const RECORD_ERROR: i32 = 3;

/// Write failure: the output pair could not be committed and was removed.
pub const WRITE_FAILURE: i32 = 4;
