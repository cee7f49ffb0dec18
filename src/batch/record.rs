//! Record construction: one prompt in, one resolved template tree out.

use super::context::BatchContext;
use crate::error::{FormatError, Result};
use crate::template::{Binding, JsonPath, Template, resolve, resolve_str, token_names};
use serde_json::Value;

/// One template instantiation for exactly one input prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptRecord {
    /// Batch-unique record identifier.
    pub id: String,
    /// Dense position among the non-blank prompts of the batch.
    pub ordinal: usize,
    /// 1-based line of the prompt in its source.
    pub line: usize,
    /// The resolved tree, isomorphic to the template.
    pub body: Value,
}

/// Build the record for one raw prompt line.
///
/// The id is the template's own `id` field resolved against the partial
/// binding. Unless that field already references `{{index}}`, `_<ordinal>` is
/// appended so ids stay unique within the batch. Templates without an `id`
/// field get `<ordinal>-<timestamp>`.
pub fn build_record(
    template: &Template,
    raw_prompt: &str,
    ordinal: usize,
    line: usize,
    ctx: &BatchContext,
) -> Result<PromptRecord> {
    let prompt = raw_prompt.trim();
    if prompt.is_empty() {
        return Err(FormatError::EmptyPrompt { line: Some(line) });
    }

    let mut binding = ctx.partial_binding(template.prompt_token(), prompt, ordinal);
    let id = record_id(template, &binding, ordinal, ctx).map_err(|e| e.at_line(line))?;
    binding.insert("id", id.as_str());

    let mut body = resolve(template.root(), &binding).map_err(|e| e.at_line(line))?;
    if let Some(slot) = body.get_mut("id") {
        *slot = Value::String(id.clone());
    }

    Ok(PromptRecord {
        id,
        ordinal,
        line,
        body,
    })
}

fn record_id(
    template: &Template,
    binding: &Binding,
    ordinal: usize,
    ctx: &BatchContext,
) -> Result<String> {
    let raw = match template.id_field() {
        None => return Ok(format!("{}-{}", ordinal, ctx.timestamp())),
        Some(Value::String(raw)) => raw,
        // Scalars carry no tokens; their compact JSON text is the base id
        Some(scalar) => return Ok(format!("{}_{}", scalar, ordinal)),
    };

    let resolved = resolve_str(raw, binding, &JsonPath::root().key("id"))?;
    let names = token_names(raw).map_err(|e| FormatError::Validation(format!("{} in $.id", e)))?;

    if names.iter().any(|name| name == "index") {
        Ok(resolved)
    } else {
        Ok(format!("{}_{}", resolved, ordinal))
    }
}
