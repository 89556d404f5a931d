//! The injected native capability boundary.
//!
//! Everything that actually talks to an on-device model lives behind
//! [`TextModelBackend`]: an FFI shim on Apple platforms, an embedding-host
//! channel, or a scripted double in tests. The dispatcher and sessions
//! depend only on this trait, which is what makes the rest of the crate
//! testable without a device.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::availability::{ModelAvailability, UnavailableReason};
use crate::error::{NativeDiagnostics, TextError, TextErrorCode};
use crate::request::{GenerationReply, GenerationRequest, GuidedReply, GuidedRequest};

/// Failure surfaced by a backend implementation.
///
/// Backends are heterogeneous in how much structure their failures carry,
/// so this is deliberately loose; the normalizer collapses every variant
/// into the closed code taxonomy exactly once, at the dispatch layer.
#[derive(Debug, Error)]
pub enum BackendFailure {
    /// An already-normalized error. The normalizer passes it through
    /// unchanged.
    #[error(transparent)]
    Normalized(TextError),

    /// A failure tagged with a raw code string by the native layer.
    #[error("{0}")]
    Coded(CodedFailure),

    /// Anything else the native layer threw.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BackendFailure {
    /// Coded failure with just a code and a message.
    pub fn coded(code: impl Into<String>, message: impl Into<String>) -> Self {
        BackendFailure::Coded(CodedFailure {
            code: code.into(),
            message: Some(message.into()),
            native: None,
            cause: None,
        })
    }

    /// The fixed failure raised on platforms without the native runtime.
    pub fn unsupported() -> Self {
        Self::coded(
            TextErrorCode::Unsupported.as_code_str(),
            TextErrorCode::Unsupported.default_message(),
        )
    }
}

/// A failure tagged with a raw code string by the native layer.
#[derive(Debug, Default)]
pub struct CodedFailure {
    /// Raw code string, e.g. `"TIMEOUT"`. Codes outside the closed sets
    /// normalize to the runtime code.
    pub code: String,
    /// Native-provided message, when one exists.
    pub message: Option<String>,
    /// NSError-style diagnostics, when the native layer reported them.
    pub native: Option<NativeDiagnostics>,
    /// The underlying error, when one exists.
    pub cause: Option<anyhow::Error>,
}

impl fmt::Display for CodedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "native failure {}: {}", self.code, message),
            None => write!(f, "native failure {}", self.code),
        }
    }
}

/// The native text-generation capability.
#[async_trait]
pub trait TextModelBackend: Send + Sync {
    /// Report whether the on-device model can serve requests right now.
    async fn check_availability(&self) -> ModelAvailability;

    /// Run one text-generation request to completion.
    ///
    /// There is no cancellation or timeout at this layer; an in-flight call
    /// runs until the native side finishes or fails.
    async fn generate_text(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationReply, BackendFailure>;

    /// The optional guided-generation capability.
    ///
    /// `None` means the platform has no schema-constrained decoding and the
    /// dispatcher will use its prompt-then-parse fallback instead.
    fn guided(&self) -> Option<&dyn GuidedGeneration> {
        None
    }
}

/// The optional schema-constrained generation capability.
#[async_trait]
pub trait GuidedGeneration: Send + Sync {
    /// Run one schema-constrained generation request to completion.
    async fn generate_object(
        &self,
        request: &GuidedRequest,
    ) -> Result<GuidedReply, BackendFailure>;
}

/// Backend for platforms without the native model runtime.
///
/// Reports the model as unavailable with the `Unsupported` reason and fails
/// every generation request with the same stable code, so callers on any
/// platform get a consistent response instead of a missing-symbol crash.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedBackend;

#[async_trait]
impl TextModelBackend for UnsupportedBackend {
    async fn check_availability(&self) -> ModelAvailability {
        ModelAvailability::Unavailable {
            reason_code: UnavailableReason::Unsupported,
        }
    }

    async fn generate_text(
        &self,
        _request: &GenerationRequest,
    ) -> Result<GenerationReply, BackendFailure> {
        Err(BackendFailure::unsupported())
    }
}
