//! Compute sandbox client
//!
//! The sandbox exposes a single `POST /run` endpoint taking the item's code and
//! the task's parsed inputs. Any body is accepted as output: JSON bodies are
//! decoded, anything else is returned as a plain string.

use reqwest::Client;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::Result;
use crate::{handle_text_response, normalize_base_url};

/// HTTP client for the code-execution sandbox
#[derive(Debug, Clone)]
pub struct ComputeClient {
    base_url: String,
    client: Client,
}

impl ComputeClient {
    /// Create a new compute client
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the sandbox (e.g., "http://localhost:3327")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run `code` against `inputs` and return whatever the sandbox answered
    pub async fn run(&self, code: &str, inputs: &JsonValue) -> Result<JsonValue> {
        let url = format!("{}/run", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&RunRequest { code, inputs })
            .send()
            .await?;

        let body = handle_text_response(response).await?;
        debug!("Sandbox answered {} bytes", body.len());

        Ok(serde_json::from_str(&body).unwrap_or(JsonValue::String(body)))
    }
}

#[derive(Debug, Serialize)]
struct RunRequest<'a> {
    code: &'a str,
    inputs: &'a JsonValue,
}
