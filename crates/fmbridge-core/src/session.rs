//! Conversational sessions over the native boundary.
//!
//! A [`Session`] is a client-side convenience wrapper: the real
//! conversational context lives in the native store, keyed by the session
//! identifier. This type just remembers that identifier and the current
//! system instructions, threads both through every request, and adopts
//! whatever identifier the native layer hands back.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument, warn};
use typed_builder::TypedBuilder;

use crate::backend::TextModelBackend;
use crate::error::{TextError, TextErrorCode};
use crate::normalize::normalize_text;
use crate::request::GenerationRequest;

/// Options for creating a session.
#[derive(Debug, Clone, Default, TypedBuilder)]
pub struct SessionOptions {
    /// Seed system instructions. Whitespace-only input counts as none.
    #[builder(default, setter(strip_option, into))]
    instructions: Option<String>,

    /// Resume an existing native session instead of starting fresh.
    #[builder(default, setter(strip_option, into))]
    session_id: Option<String>,
}

/// Per-request options for [`Session::ask`].
#[derive(Debug, Clone, Default, TypedBuilder)]
pub struct AskOptions {
    #[builder(default, setter(strip_option))]
    temperature: Option<f32>,

    #[builder(default, setter(strip_option))]
    max_output_tokens: Option<u32>,
}

/// One logical conversation with the on-device model.
///
/// The session starts uninitialized (no identifier) and becomes established
/// on the first successful [`ask`](Session::ask); every later success
/// overwrites the identifier with whatever the native layer returned, even
/// if it changed. Methods take `&mut self`: a session expects a single
/// writer at a time, and concurrent use needs external mutual exclusion.
pub struct Session {
    backend: Arc<dyn TextModelBackend>,
    id: Option<String>,
    instructions: Option<String>,
}

impl Session {
    /// Create a session against the given backend.
    pub fn new(backend: Arc<dyn TextModelBackend>, options: SessionOptions) -> Self {
        Self {
            backend,
            id: options.session_id,
            instructions: normalize_instructions(options.instructions.as_deref()),
        }
    }

    /// The native session identifier, once established.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The system instructions that will accompany the next request.
    pub fn instructions(&self) -> Option<&str> {
        self.instructions.as_deref()
    }

    /// Send a prompt within this conversation and return the reply text.
    ///
    /// The request carries the current identifier and instructions; on
    /// success the identifier from the reply is adopted so native-side
    /// context keeps accumulating.
    ///
    /// # Errors
    ///
    /// Returns `PROMPT_INVALID` for a whitespace-only prompt without
    /// contacting the backend. Backend failures are normalized into
    /// [`TextError`] and leave the session state untouched.
    #[instrument(skip_all)]
    pub async fn ask(&mut self, prompt: &str, options: AskOptions) -> Result<String, TextError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(TextError::new(
                TextErrorCode::PromptInvalid,
                TextErrorCode::PromptInvalid.default_message(),
            ));
        }

        let request = GenerationRequest {
            prompt: prompt.to_owned(),
            system: self.instructions.clone(),
            temperature: options.temperature,
            max_output_tokens: options.max_output_tokens,
            session_id: self.id.clone(),
        };

        debug!(established = self.id.is_some(), "asking within session");

        match self.backend.generate_text(&request).await {
            Ok(reply) => {
                self.id = Some(reply.session_id);
                Ok(reply.text)
            }
            Err(failure) => {
                let error = normalize_text(failure);
                warn!(code = %error.code(), "session ask failed");
                Err(error)
            }
        }
    }

    /// Replace the system instructions while keeping the identifier.
    ///
    /// The native side rebuilds its internal state for the kept identifier
    /// on next use; nothing is sent here. Whitespace-only input clears the
    /// instructions.
    pub fn reset(&mut self, instructions: Option<&str>) {
        self.instructions = normalize_instructions(instructions);
    }

    /// Forget both the identifier and the instructions locally.
    ///
    /// No native teardown is signaled; the next [`ask`](Session::ask)
    /// simply starts a fresh native session.
    pub fn destroy(&mut self) {
        self.id = None;
        self.instructions = None;
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("instructions", &self.instructions)
            .finish_non_exhaustive()
    }
}

/// Trim instructions, mapping whitespace-only input to `None`.
fn normalize_instructions(instructions: Option<&str>) -> Option<String> {
    instructions
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}
