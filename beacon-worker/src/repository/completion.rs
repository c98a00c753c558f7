//! Completion repository

use async_trait::async_trait;
use beacon_client::{CompletionClient, Result};

/// Repository trait for the language-model completion service
#[async_trait]
pub trait CompletionEngine: Send + Sync {
    /// Sends a single-message prompt and returns the first choice's content
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
impl CompletionEngine for CompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        CompletionClient::complete(self, prompt).await
    }
}
