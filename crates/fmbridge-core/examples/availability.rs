//! Probe availability and show the consistent unsupported response on a
//! platform without the native model runtime.

use std::sync::Arc;

use fmbridge_core::{FmClient, TextOptions, UnsupportedBackend};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client = FmClient::new(Arc::new(UnsupportedBackend));

    println!("available: {}", client.is_available().await);
    println!("availability: {:?}", client.check_availability().await);

    match client
        .generate_text(TextOptions::builder().prompt("What is Rust?").build())
        .await
    {
        Ok(reply) => println!("text: {}", reply.text),
        Err(error) => println!("failed with {}: {}", error.code(), error.message()),
    }
}
