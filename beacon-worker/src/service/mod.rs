//! Service layer
//!
//! Turns ledger-provided payloads into results by calling an external
//! engine under a timeout:
//! - [`TaskResolver`]: task input + item code -> output string (responder)
//! - [`Summarizer`]: item code -> title and description (updater)

mod answer;
mod summary;

pub use answer::{FAILURE_OUTPUT, Resolution, TaskResolver};
pub use summary::Summarizer;

#[cfg(test)]
pub use summary::build_prompt;
