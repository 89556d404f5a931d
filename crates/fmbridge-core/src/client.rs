//! The generation dispatcher.
//!
//! [`FmClient`] is the main entry point for one-shot generation. It owns the
//! injected backend, applies the structured-generation defaults, and runs
//! the two-tier object strategy: prefer the native guided capability, fall
//! back to prompt-then-parse when the platform lacks it, and gate both
//! tiers behind the same schema conformance check.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use typed_builder::TypedBuilder;

use fmbridge_schema::Schema;

use crate::availability::ModelAvailability;
use crate::backend::TextModelBackend;
use crate::config::GenerationConfig;
use crate::error::{ObjectError, ObjectErrorCode, TextError, TextErrorCode};
use crate::guidance::compose_guidance;
use crate::normalize::{normalize_object, normalize_text};
use crate::request::{GenerationReply, GenerationRequest, GuidedRequest};
use crate::session::{Session, SessionOptions};

/// Options for a one-shot text generation call.
///
/// # Examples
///
/// ```
/// use fmbridge_core::TextOptions;
///
/// let options = TextOptions::builder()
///     .prompt("Summarize this note")
///     .instructions("Be terse")
///     .temperature(0.7)
///     .build();
/// ```
#[derive(Debug, Clone, TypedBuilder)]
pub struct TextOptions {
    #[builder(setter(into))]
    prompt: String,

    #[builder(default, setter(strip_option, into))]
    instructions: Option<String>,

    #[builder(default, setter(strip_option))]
    temperature: Option<f32>,

    #[builder(default, setter(strip_option))]
    max_output_tokens: Option<u32>,

    /// Native session to resume, when continuing a conversation.
    #[builder(default, setter(strip_option, into))]
    session_id: Option<String>,
}

/// Options for a one-shot structured generation call.
///
/// The schema is taken in plain JSON document form and shape-checked before
/// anything is dispatched, so hosts can hand through caller-supplied
/// documents without pre-validating them.
#[derive(Debug, Clone, TypedBuilder)]
pub struct ObjectOptions {
    #[builder(setter(into))]
    prompt: String,

    #[builder(default, setter(strip_option, into))]
    instructions: Option<String>,

    /// The schema constraining the output, as a plain JSON document.
    schema: Value,

    #[builder(default, setter(strip_option))]
    temperature: Option<f32>,

    #[builder(default, setter(strip_option))]
    max_output_tokens: Option<u32>,

    /// Native session to resume, when continuing a conversation.
    #[builder(default, setter(strip_option, into))]
    session_id: Option<String>,
}

/// Successful structured generation result.
#[derive(Debug, Clone)]
pub struct ObjectReply<T> {
    /// The decoded, schema-conforming object.
    pub object: T,
    /// Session identifier assigned (or re-confirmed) by the native layer.
    pub session_id: String,
}

/// Dispatcher for generation requests against an injected backend.
///
/// Cheap to clone; clones share the backend.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use fmbridge_core::{FmClient, UnsupportedBackend};
///
/// # async fn example() {
/// let client = FmClient::new(Arc::new(UnsupportedBackend));
/// assert!(!client.is_available().await);
/// # }
/// ```
#[derive(Clone)]
pub struct FmClient {
    backend: Arc<dyn TextModelBackend>,
    config: GenerationConfig,
}

impl FmClient {
    /// Create a client with the standard generation defaults.
    pub fn new(backend: Arc<dyn TextModelBackend>) -> Self {
        Self::with_config(backend, GenerationConfig::default())
    }

    /// Create a client with explicit generation defaults.
    pub fn with_config(backend: Arc<dyn TextModelBackend>, config: GenerationConfig) -> Self {
        Self { backend, config }
    }

    /// Boolean availability query.
    pub async fn is_available(&self) -> bool {
        self.backend.check_availability().await.is_available()
    }

    /// Full availability report, including the unavailability reason.
    pub async fn check_availability(&self) -> ModelAvailability {
        self.backend.check_availability().await
    }

    /// Generate plain text.
    ///
    /// # Errors
    ///
    /// Returns `PROMPT_INVALID` for a whitespace-only prompt without
    /// contacting the backend; every backend failure is normalized into
    /// [`TextError`] before surfacing.
    #[instrument(skip_all)]
    pub async fn generate_text(&self, options: TextOptions) -> Result<GenerationReply, TextError> {
        let prompt = options.prompt.trim();
        if prompt.is_empty() {
            return Err(TextError::new(
                TextErrorCode::PromptInvalid,
                TextErrorCode::PromptInvalid.default_message(),
            ));
        }

        let request = GenerationRequest {
            prompt: prompt.to_owned(),
            system: trimmed(options.instructions.as_deref()),
            temperature: options.temperature,
            max_output_tokens: options.max_output_tokens,
            session_id: options.session_id,
        };

        debug!(
            prompt_len = request.prompt.len(),
            resumed = request.session_id.is_some(),
            "dispatching text generation"
        );

        match self.backend.generate_text(&request).await {
            Ok(reply) => Ok(reply),
            Err(failure) => {
                let error = normalize_text(failure);
                warn!(code = %error.code(), "text generation failed");
                Err(error)
            }
        }
    }

    /// Generate a structured object conforming to a schema.
    ///
    /// Prefers the backend's guided capability when present. When the
    /// capability is absent, or the guided call fails with the specific
    /// `UNSUPPORTED` code, degrades to the text path with composed JSON-only
    /// instructions. Both tiers end at the same gate: the raw reply must
    /// parse as JSON and conform to the schema, or the call fails with
    /// `DECODE_FAILED`.
    ///
    /// # Errors
    ///
    /// `PROMPT_INVALID` and `SCHEMA_INVALID` are raised locally, before the
    /// backend is contacted. Everything else is a normalized
    /// [`ObjectError`].
    #[instrument(skip_all)]
    pub async fn generate_object<T>(
        &self,
        options: ObjectOptions,
    ) -> Result<ObjectReply<T>, ObjectError>
    where
        T: DeserializeOwned,
    {
        let prompt = options.prompt.trim().to_owned();
        if prompt.is_empty() {
            return Err(ObjectError::new(
                ObjectErrorCode::PromptInvalid,
                ObjectErrorCode::PromptInvalid.default_message(),
            ));
        }

        let schema = Schema::from_value(&options.schema)?;
        let instructions = trimmed(options.instructions.as_deref());
        let system = compose_guidance(instructions.as_deref(), &schema).map_err(|err| {
            ObjectError::new(
                ObjectErrorCode::Runtime,
                "failed to compose guidance instructions",
            )
            .with_cause(err)
        })?;

        let temperature = options
            .temperature
            .unwrap_or(self.config.structured_temperature);
        let max_output_tokens = options
            .max_output_tokens
            .unwrap_or(self.config.structured_max_output_tokens);

        if let Some(guided) = self.backend.guided() {
            let request = GuidedRequest {
                prompt: prompt.clone(),
                system: Some(system.clone()),
                schema: schema.to_value(),
                temperature: Some(temperature),
                max_output_tokens: Some(max_output_tokens),
                session_id: options.session_id.clone(),
            };

            debug!("dispatching guided generation");
            match guided.generate_object(&request).await {
                Ok(reply) => return decode_reply(&reply.json, reply.session_id, &schema),
                Err(failure) => {
                    let error = normalize_object(failure);
                    if error.code() != ObjectErrorCode::Unsupported {
                        warn!(code = %error.code(), "guided generation failed");
                        return Err(error);
                    }
                    debug!("guided generation unsupported, falling back to text path");
                }
            }
        } else {
            debug!("no guided capability, using text path");
        }

        let text_options = TextOptions {
            prompt,
            instructions: Some(system),
            temperature: Some(temperature),
            max_output_tokens: Some(max_output_tokens),
            session_id: options.session_id,
        };
        let reply = self
            .generate_text(text_options)
            .await
            .map_err(ObjectError::from_text_failure)?;
        decode_reply(&reply.text, reply.session_id, &schema)
    }

    /// Create a conversational session sharing this client's backend.
    pub fn session(&self, options: SessionOptions) -> Session {
        Session::new(Arc::clone(&self.backend), options)
    }
}

impl fmt::Debug for FmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FmClient")
            .field("config", &self.config)
            .field("guided", &self.backend.guided().is_some())
            .finish_non_exhaustive()
    }
}

/// Trim an optional string, mapping whitespace-only input to `None`.
fn trimmed(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

/// Shared decode gate for both generation tiers.
fn decode_reply<T: DeserializeOwned>(
    raw: &str,
    session_id: String,
    schema: &Schema,
) -> Result<ObjectReply<T>, ObjectError> {
    let value: Value = serde_json::from_str(raw.trim()).map_err(|err| {
        ObjectError::new(
            ObjectErrorCode::DecodeFailed,
            "model response was not valid JSON",
        )
        .with_cause(err.into())
    })?;

    if !schema.accepts(&value) {
        return Err(ObjectError::new(
            ObjectErrorCode::DecodeFailed,
            "model response did not conform to the requested schema",
        ));
    }

    let object = serde_json::from_value(value).map_err(|err| {
        ObjectError::new(
            ObjectErrorCode::DecodeFailed,
            "model response did not deserialize into the requested type",
        )
        .with_cause(err.into())
    })?;

    Ok(ObjectReply { object, session_id })
}
