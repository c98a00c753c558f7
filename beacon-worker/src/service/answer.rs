//! Task resolution for the responder
//!
//! A task whose input is not valid JSON can never run, so it is answered with
//! [`FAILURE_OUTPUT`]. A sandbox failure is assumed to be transient and leaves
//! the task pending for the next sweep.

use beacon_core::domain::item::TaskDescriptor;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::error::CallError;
use crate::repository::ComputeEngine;
use crate::timeout::guarded;

/// Output committed for tasks that cannot produce a result
pub const FAILURE_OUTPUT: &str = "Fail to run.";

/// Outcome of resolving one task
#[derive(Debug)]
pub enum Resolution {
    /// The sandbox produced an output to commit
    Answer(String),
    /// The input is malformed; [`FAILURE_OUTPUT`] is committed
    Unrunnable(serde_json::Error),
    /// The sandbox call failed or timed out; nothing is committed this sweep
    Deferred(CallError),
}

/// Runs task inputs through the compute sandbox
pub struct TaskResolver {
    engine: Arc<dyn ComputeEngine>,
    timeout: Duration,
}

impl TaskResolver {
    pub fn new(engine: Arc<dyn ComputeEngine>, timeout: Duration) -> Self {
        Self { engine, timeout }
    }

    pub async fn resolve(&self, code: &str, task: &TaskDescriptor) -> Resolution {
        let inputs = match task.parse_input() {
            Ok(inputs) => inputs,
            Err(e) => return Resolution::Unrunnable(e),
        };

        match guarded(self.timeout, self.engine.run(code, &inputs)).await {
            Ok(answer) => {
                debug!("Sandbox answer for task {}: {}", task.tid, answer);
                Resolution::Answer(render_output(answer))
            }
            Err(e) => Resolution::Deferred(e),
        }
    }
}

/// Renders a sandbox answer as the string committed on chain
///
/// Strings are used as-is and other values as compact JSON. Empty answers
/// (`null`, `false`, `0`, `""`) become [`FAILURE_OUTPUT`].
pub fn render_output(answer: JsonValue) -> String {
    match answer {
        JsonValue::Null | JsonValue::Bool(false) => FAILURE_OUTPUT.to_string(),
        JsonValue::Number(n) if n.as_f64() == Some(0.0) => FAILURE_OUTPUT.to_string(),
        JsonValue::String(s) if s.is_empty() => FAILURE_OUTPUT.to_string(),
        JsonValue::String(s) => s,
        other => other.to_string(),
    }
}
