//! Batch rendering: per-batch context, record building, and the line driver.
//!
//! Control flow for one batch:
//!
//! 1. The template is validated once (see [`crate::template::Template`])
//! 2. A [`BatchContext`] fixes the timestamp and run id
//! 3. [`run_batch`] walks the prompt lines and calls [`build_record`] per line
//! 4. The ordered records go to [`crate::output::write_batch`]

mod context;
mod driver;
mod record;


pub use context::{BatchContext, DEFAULT_TIMESTAMP_FORMAT, render_timestamp, validate_variable_name};
pub use driver::{ORDINAL_BASE, read_prompt_lines, run_batch};
pub use record::{PromptRecord, build_record};
