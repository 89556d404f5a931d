//! Request and reply shapes crossing the native boundary.
//!
//! These are the only payloads the boundary ever sees. They serialize with
//! camelCase keys so an embedding host (FFI shim, app-framework channel)
//! can pass them through without renaming.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use typed_builder::TypedBuilder;

/// One plain-text generation request.
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// The user prompt. Callers guarantee it is non-empty after trimming.
    #[builder(setter(into))]
    pub prompt: String,

    /// System instructions applied to this request.
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Sampling temperature, conventionally in `[0, 1]`.
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Upper bound on generated tokens.
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,

    /// Native session to resume, when continuing a conversation.
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Successful plain-text generation reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReply {
    /// The generated text.
    pub text: String,
    /// Session identifier assigned (or re-confirmed) by the native layer.
    pub session_id: String,
}

/// One schema-constrained generation request for the guided capability.
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct GuidedRequest {
    /// The user prompt. Callers guarantee it is non-empty after trimming.
    #[builder(setter(into))]
    pub prompt: String,

    /// System instructions, including the JSON-only guidance.
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// The schema document constraining the output, in plain JSON form.
    pub schema: Value,

    /// Sampling temperature. Kept low for parseable output.
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Upper bound on generated tokens.
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,

    /// Native session to resume, when continuing a conversation.
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Successful guided-generation reply.
///
/// The payload is the raw JSON string produced by the native layer; the
/// dispatcher still parses and conformance-checks it before handing a
/// decoded object to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidedReply {
    /// Raw JSON emitted by the model.
    pub json: String,
    /// Session identifier assigned (or re-confirmed) by the native layer.
    pub session_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_serialize_request_with_camel_case_keys() {
        let request = GenerationRequest::builder()
            .prompt("hello")
            .system("be terse")
            .max_output_tokens(64_u32)
            .session_id("s-1")
            .build();

        let json = serde_json::to_value(&request).expect("request should serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "prompt": "hello",
                "system": "be terse",
                "maxOutputTokens": 64,
                "sessionId": "s-1"
            })
        );
    }

    #[test]
    fn test_should_omit_unset_optional_fields() {
        let request = GenerationRequest::builder().prompt("hello").build();
        let json = serde_json::to_value(&request).expect("request should serialize");
        assert_eq!(json, serde_json::json!({"prompt": "hello"}));
    }

    #[test]
    fn test_should_parse_reply_from_native_payload() {
        let reply: GenerationReply =
            serde_json::from_str(r#"{"text": "hi", "sessionId": "s-9"}"#)
                .expect("reply should parse");
        assert_eq!(reply.text, "hi");
        assert_eq!(reply.session_id, "s-9");
    }
}
