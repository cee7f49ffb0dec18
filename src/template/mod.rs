//! Template subsystem: loading, tokenizing, and resolving JSON templates.
//!
//! - **Token**: splits string leaves into literal and placeholder segments
//! - **Loader**: parses a template document and validates it once per batch
//! - **Resolve**: substitutes a binding into a template tree
//!
//! # Placeholder Syntax
//!
//! ```text
//! {
//!   "id": "brand_{{timestamp}}",
//!   "conversation": [{"role": "user", "content": "{{prompt}}"}]
//! }
//! ```
//!
//! Write `\{{` to emit a literal `{{`.

mod loader;
mod resolve;
mod token;

pub use loader::{DEFAULT_PROMPT_TOKEN, RESERVED_TOKENS, Template};
pub use resolve::{Binding, JsonPath, resolve, resolve_str};
pub use token::{is_valid_token_name, token_names};
