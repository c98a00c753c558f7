//! Beacon HTTP Client
//!
//! Type-safe clients for the services the Beacon workers talk to:
//! - [`LedgerClient`]: contract smart queries, account lookup and transaction
//!   broadcast through the chain's REST gateway
//! - [`SigningClient`]: builds, signs and broadcasts contract executions
//! - [`ComputeClient`]: the local code-execution sandbox
//! - [`CompletionClient`]: the chat completion service
//!
//! None of the clients apply timeouts of their own; callers bound each call.

pub mod completion;
pub mod compute;
pub mod error;
pub mod ledger;
pub mod signing;
pub mod wallet;

// Re-export commonly used types
pub use completion::CompletionClient;
pub use compute::ComputeClient;
pub use error::{ClientError, Result};
pub use ledger::LedgerClient;
pub use signing::SigningClient;
pub use wallet::Wallet;

use serde::de::DeserializeOwned;

// =============================================================================
// Response Handlers
// =============================================================================

/// Check the status code and deserialize a JSON body
pub(crate) async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let body = handle_text_response(response).await?;

    serde_json::from_str(&body)
        .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
}

/// Check the status code and return the raw body
pub(crate) async fn handle_text_response(response: reqwest::Response) -> Result<String> {
    let status = response.status();

    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ClientError::api_error(status.as_u16(), error_text));
    }

    Ok(response.text().await?)
}

/// Trims a trailing slash so paths can be appended with `format!`
pub(crate) fn normalize_base_url(base_url: impl Into<String>) -> String {
    base_url.into().trim_end_matches('/').to_string()
}
