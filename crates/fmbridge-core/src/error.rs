//! Error taxonomy for text and structured generation.
//!
//! Both domains share one shape: a stable code callers can match on, a
//! human-readable message, optional native diagnostics (NSError-style
//! domain/code), and an optional underlying cause. Codes round-trip through
//! SCREAMING_SNAKE_CASE strings, which is also how the native layer tags
//! its failures.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use fmbridge_schema::SchemaError;

/// Stable error codes for plain-text generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextErrorCode {
    Unsupported,
    PromptInvalid,
    InvalidArgument,
    Canceled,
    Timeout,
    Runtime,
    ModelUnavailable,
    DeviceNotEligible,
    NotEnabled,
    NotReady,
    Unknown,
}

impl TextErrorCode {
    /// The stable string form of this code.
    pub const fn as_code_str(&self) -> &'static str {
        match self {
            TextErrorCode::Unsupported => "UNSUPPORTED",
            TextErrorCode::PromptInvalid => "PROMPT_INVALID",
            TextErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            TextErrorCode::Canceled => "CANCELED",
            TextErrorCode::Timeout => "TIMEOUT",
            TextErrorCode::Runtime => "RUNTIME",
            TextErrorCode::ModelUnavailable => "MODEL_UNAVAILABLE",
            TextErrorCode::DeviceNotEligible => "DEVICE_NOT_ELIGIBLE",
            TextErrorCode::NotEnabled => "NOT_ENABLED",
            TextErrorCode::NotReady => "NOT_READY",
            TextErrorCode::Unknown => "UNKNOWN",
        }
    }

    /// Parse a raw code string, returning `None` for anything outside the
    /// closed set.
    pub fn from_code_str(code: &str) -> Option<Self> {
        match code {
            "UNSUPPORTED" => Some(TextErrorCode::Unsupported),
            "PROMPT_INVALID" => Some(TextErrorCode::PromptInvalid),
            "INVALID_ARGUMENT" => Some(TextErrorCode::InvalidArgument),
            "CANCELED" => Some(TextErrorCode::Canceled),
            "TIMEOUT" => Some(TextErrorCode::Timeout),
            "RUNTIME" => Some(TextErrorCode::Runtime),
            "MODEL_UNAVAILABLE" => Some(TextErrorCode::ModelUnavailable),
            "DEVICE_NOT_ELIGIBLE" => Some(TextErrorCode::DeviceNotEligible),
            "NOT_ENABLED" => Some(TextErrorCode::NotEnabled),
            "NOT_READY" => Some(TextErrorCode::NotReady),
            "UNKNOWN" => Some(TextErrorCode::Unknown),
            _ => None,
        }
    }

    /// Message used when the native layer supplied a code but no text.
    pub(crate) const fn default_message(&self) -> &'static str {
        match self {
            TextErrorCode::Unsupported => "text generation is not supported on this platform",
            TextErrorCode::PromptInvalid => "prompt must not be empty",
            TextErrorCode::InvalidArgument => "a generation argument was rejected",
            TextErrorCode::Canceled => "generation was canceled",
            TextErrorCode::Timeout => "generation timed out",
            TextErrorCode::Runtime => "text generation failed",
            TextErrorCode::ModelUnavailable => "the on-device model is unavailable",
            TextErrorCode::DeviceNotEligible => "this device cannot run the on-device model",
            TextErrorCode::NotEnabled => "Apple Intelligence is not enabled",
            TextErrorCode::NotReady => "the on-device model is not ready yet",
            TextErrorCode::Unknown => "the on-device model is unavailable for an unknown reason",
        }
    }
}

impl fmt::Display for TextErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code_str())
    }
}

/// Stable error codes for structured (object) generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectErrorCode {
    Unsupported,
    PromptInvalid,
    SchemaInvalid,
    DecodeFailed,
    Runtime,
}

impl ObjectErrorCode {
    /// The stable string form of this code.
    pub const fn as_code_str(&self) -> &'static str {
        match self {
            ObjectErrorCode::Unsupported => "UNSUPPORTED",
            ObjectErrorCode::PromptInvalid => "PROMPT_INVALID",
            ObjectErrorCode::SchemaInvalid => "SCHEMA_INVALID",
            ObjectErrorCode::DecodeFailed => "DECODE_FAILED",
            ObjectErrorCode::Runtime => "RUNTIME",
        }
    }

    /// Parse a raw code string, returning `None` for anything outside the
    /// closed set.
    pub fn from_code_str(code: &str) -> Option<Self> {
        match code {
            "UNSUPPORTED" => Some(ObjectErrorCode::Unsupported),
            "PROMPT_INVALID" => Some(ObjectErrorCode::PromptInvalid),
            "SCHEMA_INVALID" => Some(ObjectErrorCode::SchemaInvalid),
            "DECODE_FAILED" => Some(ObjectErrorCode::DecodeFailed),
            "RUNTIME" => Some(ObjectErrorCode::Runtime),
            _ => None,
        }
    }

    /// Message used when the native layer supplied a code but no text.
    pub(crate) const fn default_message(&self) -> &'static str {
        match self {
            ObjectErrorCode::Unsupported => {
                "structured generation is not supported on this platform"
            }
            ObjectErrorCode::PromptInvalid => "prompt must not be empty",
            ObjectErrorCode::SchemaInvalid => "the provided schema is malformed",
            ObjectErrorCode::DecodeFailed => "model response did not decode into the schema",
            ObjectErrorCode::Runtime => "structured generation failed",
        }
    }
}

impl fmt::Display for ObjectErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code_str())
    }
}

/// NSError-style diagnostics forwarded from the native layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeDiagnostics {
    /// Native error domain (e.g. `FoundationModels.LanguageModelSession`).
    pub domain: String,
    /// Native error code within that domain.
    pub code: i64,
}

/// A normalized text-generation failure.
///
/// Cheap to clone; the underlying cause (if any) is shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct TextError {
    code: TextErrorCode,
    message: String,
    native: Option<NativeDiagnostics>,
    cause: Option<Arc<anyhow::Error>>,
}

impl TextError {
    /// Create a normalized error with the given code and message.
    pub fn new(code: TextErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            native: None,
            cause: None,
        }
    }

    /// Attach native diagnostics.
    pub fn with_native(mut self, native: NativeDiagnostics) -> Self {
        self.native = Some(native);
        self
    }

    /// Attach the underlying cause.
    pub fn with_cause(mut self, cause: anyhow::Error) -> Self {
        self.cause = Some(Arc::new(cause));
        self
    }

    /// The stable code callers can match on.
    pub fn code(&self) -> TextErrorCode {
        self.code
    }

    /// Human-readable description of the failure.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Native diagnostics, when the native layer reported them.
    pub fn native(&self) -> Option<&NativeDiagnostics> {
        self.native.as_ref()
    }

    /// The underlying cause, when one was attached.
    pub fn cause(&self) -> Option<&anyhow::Error> {
        self.cause.as_deref()
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        TextErrorCode,
        String,
        Option<NativeDiagnostics>,
        Option<Arc<anyhow::Error>>,
    ) {
        (self.code, self.message, self.native, self.cause)
    }
}

impl fmt::Display for TextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(native) = &self.native {
            write!(f, " [{} {}]", native.domain, native.code)?;
        }
        Ok(())
    }
}

impl std::error::Error for TextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|cause| AsRef::<dyn std::error::Error>::as_ref(cause.as_ref()))
    }
}

/// A normalized structured-generation failure.
///
/// Cheap to clone; the underlying cause (if any) is shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ObjectError {
    code: ObjectErrorCode,
    message: String,
    native: Option<NativeDiagnostics>,
    cause: Option<Arc<anyhow::Error>>,
}

impl ObjectError {
    /// Create a normalized error with the given code and message.
    pub fn new(code: ObjectErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            native: None,
            cause: None,
        }
    }

    /// Attach native diagnostics.
    pub fn with_native(mut self, native: NativeDiagnostics) -> Self {
        self.native = Some(native);
        self
    }

    /// Attach the underlying cause.
    pub fn with_cause(mut self, cause: anyhow::Error) -> Self {
        self.cause = Some(Arc::new(cause));
        self
    }

    pub(crate) fn with_shared_cause(mut self, cause: Option<Arc<anyhow::Error>>) -> Self {
        self.cause = cause;
        self
    }

    /// The stable code callers can match on.
    pub fn code(&self) -> ObjectErrorCode {
        self.code
    }

    /// Human-readable description of the failure.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Native diagnostics, when the native layer reported them.
    pub fn native(&self) -> Option<&NativeDiagnostics> {
        self.native.as_ref()
    }

    /// The underlying cause, when one was attached.
    pub fn cause(&self) -> Option<&anyhow::Error> {
        self.cause.as_deref()
    }

    /// Re-wrap a text-domain failure raised on the fallback path under the
    /// object-domain runtime code, preserving message and diagnostics.
    pub(crate) fn from_text_failure(error: TextError) -> Self {
        let (_, message, native, cause) = error.into_parts();
        Self {
            code: ObjectErrorCode::Runtime,
            message,
            native,
            cause,
        }
    }
}

impl fmt::Display for ObjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(native) = &self.native {
            write!(f, " [{} {}]", native.domain, native.code)?;
        }
        Ok(())
    }
}

impl std::error::Error for ObjectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|cause| AsRef::<dyn std::error::Error>::as_ref(cause.as_ref()))
    }
}

impl From<SchemaError> for ObjectError {
    fn from(error: SchemaError) -> Self {
        ObjectError::new(ObjectErrorCode::SchemaInvalid, error.to_string())
            .with_cause(anyhow::Error::new(error))
    }
}
