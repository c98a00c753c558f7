//! Metadata generation for the updater
//!
//! The completion service is asked for a strict JSON object with `title` and
//! `description`. Anything else is treated as malformed and the item is left
//! for the next sweep.

use beacon_core::domain::metadata::Metadata;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::error::CallError;
use crate::repository::CompletionEngine;
use crate::timeout::guarded;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Completion call failed: {0}")]
    Call(#[from] CallError),

    #[error("Malformed completion: {0}")]
    Malformed(String),
}

/// Builds the summarization prompt for an item's code
pub fn build_prompt(code: &str) -> String {
    format!(
        r#"Explain this function with title and short description:
{code}

---

Answer in this format. Do not answer any other words:
{{"title": "/*title*/", "description": "/*short description under 40 words*/"}}

Example input:
function addNumbers(params) {{ const {{ a, b }} = params; return a + b; }} mainFunction = addNumbers;

Example output:
{{"title": "Simple Addition", "description": "Simply add two inputs and return the result."}}"#
    )
}

/// Parses a completion into metadata
///
/// Both fields must be present, strings, and non-empty.
pub fn parse_metadata(content: &str) -> Result<Metadata, SummaryError> {
    let metadata: Metadata = serde_json::from_str(content.trim())
        .map_err(|e| SummaryError::Malformed(format!("{}: {:?}", e, content)))?;

    if metadata.title.trim().is_empty() || metadata.description.trim().is_empty() {
        return Err(SummaryError::Malformed(format!(
            "empty title or description: {:?}",
            content
        )));
    }

    Ok(metadata)
}

/// Asks the completion service to describe an item's code
pub struct Summarizer {
    engine: Arc<dyn CompletionEngine>,
    timeout: Duration,
}

impl Summarizer {
    pub fn new(engine: Arc<dyn CompletionEngine>, timeout: Duration) -> Self {
        Self { engine, timeout }
    }

    pub async fn summarize(&self, code: &str) -> Result<Metadata, SummaryError> {
        let prompt = build_prompt(code);
        let content = guarded(self.timeout, self.engine.complete(&prompt)).await?;

        parse_metadata(&content)
    }
}
