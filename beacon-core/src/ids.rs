//! Identifier deserialization helpers
//!
//! The contract reports token and task ids either as JSON strings or as
//! integers depending on the query. Lookup keys are normalized to their
//! decimal string representation. A [`TaskId`] keeps the form it arrived in,
//! since it is sent back to the contract unchanged.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Task id exactly as the contract reported it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Number(u64),
    Text(String),
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Number(n) => write!(f, "{}", n),
            TaskId::Text(text) => f.write_str(text),
        }
    }
}

impl From<u64> for TaskId {
    fn from(n: u64) -> Self {
        TaskId::Number(n)
    }
}

impl From<&str> for TaskId {
    fn from(text: &str) -> Self {
        TaskId::Text(text.to_string())
    }
}

impl From<String> for TaskId {
    fn from(text: String) -> Self {
        TaskId::Text(text)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(text) => text,
            RawId::Number(n) => n.to_string(),
        }
    }
}

/// Deserializes a single id given as a string or an unsigned integer
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

/// Deserializes a list of ids given as strings and/or unsigned integers
pub fn deserialize_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<RawId>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(String::from).collect())
}
