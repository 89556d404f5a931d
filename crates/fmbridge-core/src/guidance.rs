//! Composition of the JSON-only system instruction for structured
//! generation.
//!
//! Both the guided path and the prompt-then-parse fallback send the same
//! composed instruction: the caller's own instructions (when present)
//! followed by a fixed demand for schema-conforming raw JSON.

use minijinja::{Environment, context};

use fmbridge_schema::Schema;

const GUIDANCE_TEMPLATE: &str = "\
{% if instructions %}{{ instructions }}\n\n{% endif %}\
Respond with a single JSON value that conforms to the following JSON schema:\n\
\n\
{{ schema }}\n\
\n\
Output raw JSON only. Do not include prose, markdown fences, or explanations.";

/// Render the composed system instruction for a structured request.
///
/// `instructions` is expected to be pre-trimmed; `None` or empty skips the
/// leading block entirely.
pub(crate) fn compose_guidance(
    instructions: Option<&str>,
    schema: &Schema,
) -> anyhow::Result<String> {
    let schema_json = serde_json::to_string_pretty(&schema.to_value())?;
    let env = Environment::new();
    let rendered = env.render_str(
        GUIDANCE_TEMPLATE,
        context! { instructions => instructions, schema => schema_json },
    )?;
    Ok(rendered)
}
