//! Collapsing heterogeneous backend failures into the closed code taxonomy.
//!
//! Every failure crossing the native boundary passes through here exactly
//! once, at the call site that directly awaited it. Both functions are pure
//! and total: whatever the backend surfaces, the caller gets a stable code.

use crate::backend::{BackendFailure, CodedFailure};
use crate::error::{ObjectError, ObjectErrorCode, TextError, TextErrorCode};

/// Message used when a failure carries no usable text at all.
const FALLBACK_MESSAGE: &str = "generation failed";

/// Normalize a backend failure into the text-generation taxonomy.
pub fn normalize_text(failure: BackendFailure) -> TextError {
    match failure {
        BackendFailure::Normalized(error) => error,
        BackendFailure::Coded(coded) => match TextErrorCode::from_code_str(&coded.code) {
            Some(code) => {
                let message = coded
                    .message
                    .unwrap_or_else(|| code.default_message().to_owned());
                let mut error = TextError::new(code, message);
                if let Some(native) = coded.native {
                    error = error.with_native(native);
                }
                if let Some(cause) = coded.cause {
                    error = error.with_cause(cause);
                }
                error
            }
            None => {
                let mut error = TextError::new(TextErrorCode::Runtime, best_message(&coded));
                if let Some(native) = coded.native {
                    error = error.with_native(native);
                }
                if let Some(cause) = coded.cause {
                    error = error.with_cause(cause);
                }
                error
            }
        },
        BackendFailure::Other(cause) => {
            let message = cause.to_string();
            TextError::new(TextErrorCode::Runtime, message).with_cause(cause)
        }
    }
}

/// Normalize a backend failure into the structured-generation taxonomy.
///
/// Already-normalized text errors keep their code when it exists in both
/// domains (`UNSUPPORTED`, `PROMPT_INVALID`); everything else collapses to
/// the runtime code with the message preserved.
pub fn normalize_object(failure: BackendFailure) -> ObjectError {
    match failure {
        BackendFailure::Normalized(error) => {
            let code = match error.code() {
                TextErrorCode::Unsupported => ObjectErrorCode::Unsupported,
                TextErrorCode::PromptInvalid => ObjectErrorCode::PromptInvalid,
                _ => ObjectErrorCode::Runtime,
            };
            let (_, message, native, cause) = error.into_parts();
            let mut object = ObjectError::new(code, message).with_shared_cause(cause);
            if let Some(native) = native {
                object = object.with_native(native);
            }
            object
        }
        BackendFailure::Coded(coded) => match ObjectErrorCode::from_code_str(&coded.code) {
            Some(code) => {
                let message = coded
                    .message
                    .unwrap_or_else(|| code.default_message().to_owned());
                let mut error = ObjectError::new(code, message);
                if let Some(native) = coded.native {
                    error = error.with_native(native);
                }
                if let Some(cause) = coded.cause {
                    error = error.with_cause(cause);
                }
                error
            }
            None => {
                let mut error = ObjectError::new(ObjectErrorCode::Runtime, best_message(&coded));
                if let Some(native) = coded.native {
                    error = error.with_native(native);
                }
                if let Some(cause) = coded.cause {
                    error = error.with_cause(cause);
                }
                error
            }
        },
        BackendFailure::Other(cause) => {
            let message = cause.to_string();
            ObjectError::new(ObjectErrorCode::Runtime, message).with_cause(cause)
        }
    }
}

/// Best available message for an out-of-set coded failure: the explicit
/// message, then the cause's message, then the fixed fallback.
fn best_message(coded: &CodedFailure) -> String {
    coded
        .message
        .clone()
        .or_else(|| coded.cause.as_ref().map(|cause| cause.to_string()))
        .unwrap_or_else(|| FALLBACK_MESSAGE.to_owned())
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;
    use crate::error::NativeDiagnostics;

    #[test]
    fn test_should_pass_through_already_normalized_errors() {
        let original = TextError::new(TextErrorCode::Canceled, "stopped").with_native(
            NativeDiagnostics {
                domain: "FoundationModels".to_owned(),
                code: 7,
            },
        );
        let normalized = normalize_text(BackendFailure::Normalized(original.clone()));
        assert_eq!(normalized.code(), original.code());
        assert_eq!(normalized.message(), original.message());
        assert_eq!(normalized.native(), original.native());

        // A second pass changes nothing.
        let twice = normalize_text(BackendFailure::Normalized(normalized.clone()));
        assert_eq!(twice.code(), normalized.code());
        assert_eq!(twice.message(), normalized.message());
        assert_eq!(twice.native(), normalized.native());
    }

    #[test]
    fn test_should_preserve_known_codes_and_diagnostics() {
        let failure = BackendFailure::Coded(CodedFailure {
            code: "TIMEOUT".to_owned(),
            message: Some("took too long".to_owned()),
            native: Some(NativeDiagnostics {
                domain: "FoundationModels".to_owned(),
                code: -4,
            }),
            cause: None,
        });
        let error = normalize_text(failure);
        assert_eq!(error.code(), TextErrorCode::Timeout);
        assert_eq!(error.message(), "took too long");
        assert_eq!(
            error.native().map(|n| n.domain.as_str()),
            Some("FoundationModels")
        );
    }

    #[test]
    fn test_should_fill_default_message_for_bare_codes() {
        let error = normalize_text(BackendFailure::Coded(CodedFailure {
            code: "MODEL_UNAVAILABLE".to_owned(),
            ..CodedFailure::default()
        }));
        assert_eq!(error.code(), TextErrorCode::ModelUnavailable);
        assert_eq!(error.message(), "the on-device model is unavailable");
    }

    #[test]
    fn test_should_coerce_unknown_codes_to_runtime() {
        let error = normalize_text(BackendFailure::Coded(CodedFailure {
            code: "KERNEL_PANIC".to_owned(),
            message: Some("something native".to_owned()),
            ..CodedFailure::default()
        }));
        assert_eq!(error.code(), TextErrorCode::Runtime);
        assert_eq!(error.message(), "something native");
    }

    #[test]
    fn test_should_use_cause_message_when_no_explicit_message() {
        let error = normalize_text(BackendFailure::Coded(CodedFailure {
            code: "KERNEL_PANIC".to_owned(),
            cause: Some(anyhow!("underlying detail")),
            ..CodedFailure::default()
        }));
        assert_eq!(error.code(), TextErrorCode::Runtime);
        assert_eq!(error.message(), "underlying detail");
        assert!(error.cause().is_some());
    }

    #[test]
    fn test_should_fall_back_to_fixed_message_when_nothing_usable() {
        let error = normalize_text(BackendFailure::Coded(CodedFailure {
            code: "KERNEL_PANIC".to_owned(),
            ..CodedFailure::default()
        }));
        assert_eq!(error.code(), TextErrorCode::Runtime);
        assert_eq!(error.message(), "generation failed");
    }

    #[test]
    fn test_should_coerce_opaque_failures_to_runtime_with_cause() {
        let error = normalize_text(BackendFailure::Other(anyhow!("socket hangup")));
        assert_eq!(error.code(), TextErrorCode::Runtime);
        assert_eq!(error.message(), "socket hangup");
        assert!(error.cause().is_some());
    }

    #[test]
    fn test_should_normalize_object_codes_in_their_own_domain() {
        let error = normalize_object(BackendFailure::coded("DECODE_FAILED", "bad json"));
        assert_eq!(error.code(), ObjectErrorCode::DecodeFailed);
        assert_eq!(error.message(), "bad json");

        // TIMEOUT is not an object-domain code.
        let error = normalize_object(BackendFailure::coded("TIMEOUT", "took too long"));
        assert_eq!(error.code(), ObjectErrorCode::Runtime);
        assert_eq!(error.message(), "took too long");
    }

    #[test]
    fn test_should_map_normalized_text_errors_into_object_domain() {
        let unsupported = normalize_object(BackendFailure::Normalized(TextError::new(
            TextErrorCode::Unsupported,
            "no guided decoding",
        )));
        assert_eq!(unsupported.code(), ObjectErrorCode::Unsupported);

        let timeout = normalize_object(BackendFailure::Normalized(TextError::new(
            TextErrorCode::Timeout,
            "took too long",
        )));
        assert_eq!(timeout.code(), ObjectErrorCode::Runtime);
        assert_eq!(timeout.message(), "took too long");
    }
}
