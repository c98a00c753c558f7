//! Chat completion client
//!
//! Minimal client for an OpenAI-compatible `/v1/chat/completions` endpoint:
//! one user message in, the first choice's message content out.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::{handle_response, normalize_base_url};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MAX_TOKENS: u32 = 150;

/// HTTP client for the completion service
#[derive(Clone)]
pub struct CompletionClient {
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    client: Client,
}

impl CompletionClient {
    /// Create a new completion client
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the service (e.g., "https://api.openai.com")
    /// * `api_key` - Bearer credential
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            client: Client::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send `prompt` as a single user message and return the first choice
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let completion: ChatResponse = handle_response(response).await?;
        debug!("Completion returned {} choice(s)", completion.choices.len());

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ClientError::ParseError("Completion returned no choices".to_string()))
    }
}

impl std::fmt::Debug for CompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::Json(json!({
                "model": "gpt-4o-mini",
                "messages": [{ "role": "user", "content": "Summarize" }],
                "max_tokens": 150
            })))
            .with_status(200)
            .with_body(
                json!({ "choices": [
                    { "message": { "role": "assistant", "content": "first" } },
                    { "message": { "role": "assistant", "content": "second" } }
                ] })
                .to_string(),
            )
            .create_async()
            .await;

        let client = CompletionClient::new(server.url(), "sk-test");
        assert_eq!(client.complete("Summarize").await.unwrap(), "first");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_custom_model_and_budget() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .match_body(Matcher::PartialJson(json!({ "model": "local-llm", "max_tokens": 64 })))
            .with_status(200)
            .with_body(json!({ "choices": [{ "message": { "content": "ok" } }] }).to_string())
            .create_async()
            .await;

        let client = CompletionClient::new(server.url(), "k")
            .with_model("local-llm")
            .with_max_tokens(64);
        assert_eq!(client.model(), "local-llm");
        assert_eq!(client.complete("p").await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_no_choices_is_a_parse_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(json!({ "choices": [] }).to_string())
            .create_async()
            .await;

        let client = CompletionClient::new(server.url(), "k");
        assert!(matches!(
            client.complete("p").await,
            Err(ClientError::ParseError(_))
        ));
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_body(json!({ "error": { "message": "Incorrect API key" } }).to_string())
            .create_async()
            .await;

        let client = CompletionClient::new(server.url(), "bad");
        assert!(client.complete("p").await.unwrap_err().is_client_error());
    }

    #[test]
    fn test_debug_omits_api_key() {
        let client = CompletionClient::new("https://api.openai.com", "sk-secret");
        assert!(!format!("{:?}", client).contains("sk-secret"));
    }
}
