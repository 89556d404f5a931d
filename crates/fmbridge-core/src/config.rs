//! Client-level generation defaults.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Defaults applied to structured (object) generation requests.
///
/// Structured requests run cool and bounded by default: a low temperature
/// keeps the output parseable, and the token bound keeps a runaway response
/// from blowing past what a schema-shaped payload should need. Callers can
/// override both per request.
///
/// All fields have serde defaults, so a host deserializing a partial
/// document gets the standard values for missing keys.
///
/// # Examples
///
/// ```
/// use fmbridge_core::GenerationConfig;
///
/// let config = GenerationConfig::builder()
///     .structured_max_output_tokens(1024)
///     .build();
/// assert_eq!(config.structured_temperature, 0.2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Temperature for structured generation requests.
    #[builder(default = default_structured_temperature())]
    #[serde(default = "default_structured_temperature")]
    pub structured_temperature: f32,

    /// Token bound for structured generation responses.
    #[builder(default = default_structured_max_output_tokens())]
    #[serde(default = "default_structured_max_output_tokens")]
    pub structured_max_output_tokens: u32,
}

fn default_structured_temperature() -> f32 {
    0.2
}

fn default_structured_max_output_tokens() -> u32 {
    512
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            structured_temperature: default_structured_temperature(),
            structured_max_output_tokens: default_structured_max_output_tokens(),
        }
    }
}
