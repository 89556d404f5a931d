//! Structured generation over a text-only backend.
//!
//! This backend has no guided capability, so the client composes JSON-only
//! guidance, runs the text path, and conformance-checks the reply before
//! decoding it. The canned backend stands in for a real native runtime.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use fmbridge_core::{
    BackendFailure, FmClient, GenerationReply, GenerationRequest, ModelAvailability,
    ObjectOptions, TextModelBackend,
};

/// Pretends to be an on-device model that always answers with one grocery
/// item in JSON.
struct CannedBackend;

#[async_trait]
impl TextModelBackend for CannedBackend {
    async fn check_availability(&self) -> ModelAvailability {
        ModelAvailability::Available
    }

    async fn generate_text(
        &self,
        _request: &GenerationRequest,
    ) -> Result<GenerationReply, BackendFailure> {
        Ok(GenerationReply {
            text: r#"{"name": "milk", "qty": 2}"#.to_owned(),
            session_id: "demo-session".to_owned(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct GroceryItem {
    name: String,
    qty: f64,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client = FmClient::new(Arc::new(CannedBackend));

    let schema = json!({
        "type": "object",
        "required": ["name", "qty"],
        "properties": {
            "name": {"type": "string", "minLength": 1},
            "qty": {"type": "number", "minimum": 0}
        }
    });

    match client
        .generate_object::<GroceryItem>(
            ObjectOptions::builder()
                .prompt("Add two bottles of milk to my list")
                .instructions("You manage a grocery list.")
                .schema(schema)
                .build(),
        )
        .await
    {
        Ok(reply) => println!(
            "decoded {} x{} (session {})",
            reply.object.name, reply.object.qty, reply.session_id
        ),
        Err(error) => println!("failed with {}: {}", error.code(), error.message()),
    }
}
