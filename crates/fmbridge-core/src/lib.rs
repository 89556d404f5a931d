//! Session management, dispatch, and error normalization for on-device
//! foundation model backends.
//!
//! The native model runtime (Apple's FoundationModels, or anything shaped
//! like it) is reached exclusively through the [`TextModelBackend`] trait,
//! injected into [`FmClient`] and [`Session`]. On top of that boundary this
//! crate provides:
//!
//! - availability probing with a fixed reason-code set,
//! - one-shot text generation with prompt validation,
//! - schema-guided object generation with a prompt-then-parse fallback for
//!   platforms without native guided decoding,
//! - conversational sessions that preserve native-side context via a lazily
//!   established identifier,
//! - normalization of every backend failure into a closed error-code
//!   taxonomy.
//!
//! Platforms without any native runtime use [`UnsupportedBackend`], which
//! fails every request with the same stable `UNSUPPORTED` code.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use fmbridge_core::{FmClient, SessionOptions, TextErrorCode, UnsupportedBackend};
//!
//! # async fn example() {
//! let client = FmClient::new(Arc::new(UnsupportedBackend));
//! assert!(!client.is_available().await);
//!
//! let mut session = client.session(SessionOptions::default());
//! let error = session
//!     .ask("Hello", Default::default())
//!     .await
//!     .unwrap_err();
//! assert_eq!(error.code(), TextErrorCode::Unsupported);
//! # }
//! ```

mod availability;
mod backend;
mod client;
mod config;
mod error;
mod guidance;
mod normalize;
mod request;
mod session;

#[cfg(test)]
mod test_backend;

pub use availability::{ModelAvailability, UnavailableReason};
pub use backend::{
    BackendFailure, CodedFailure, GuidedGeneration, TextModelBackend, UnsupportedBackend,
};
pub use client::{FmClient, ObjectOptions, ObjectReply, TextOptions};
pub use config::GenerationConfig;
pub use error::{NativeDiagnostics, ObjectError, ObjectErrorCode, TextError, TextErrorCode};
pub use normalize::{normalize_object, normalize_text};
pub use request::{GenerationReply, GenerationRequest, GuidedReply, GuidedRequest};
pub use session::{AskOptions, Session, SessionOptions};
