//! Compute repository

use async_trait::async_trait;
use beacon_client::{ComputeClient, Result};
use serde_json::Value as JsonValue;

/// Repository trait for the code-execution sandbox
#[async_trait]
pub trait ComputeEngine: Send + Sync {
    /// Runs `code` against `inputs`, returning the raw answer
    async fn run(&self, code: &str, inputs: &JsonValue) -> Result<JsonValue>;
}

#[async_trait]
impl ComputeEngine for ComputeClient {
    async fn run(&self, code: &str, inputs: &JsonValue) -> Result<JsonValue> {
        ComputeClient::run(self, code, inputs).await
    }
}
