//! Item domain types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ids::TaskId;

/// Detail record returned by the `nft_info` query
///
/// Fields other than `extension` (token uri and the like) are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NftInfo {
    pub extension: Extension,
}

/// Item payload: code, submitted tasks and optional descriptive metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Extension {
    pub code: String,
    #[serde(default)]
    pub tasks: BTreeMap<String, TaskDescriptor>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Extension {
    /// Looks up a task by the id reported in the pending set
    pub fn task(&self, task_id: &str) -> Option<&TaskDescriptor> {
        self.tasks.get(task_id)
    }

    /// Whether both title and description are present and non-empty
    pub fn has_metadata(&self) -> bool {
        let filled = |field: &Option<String>| field.as_deref().is_some_and(|s| !s.is_empty());
        filled(&self.title) && filled(&self.description)
    }
}

/// A task submitted against an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    /// Serialized JSON input for the item's code
    pub input: String,
    /// Sent back unchanged when the output is committed
    pub tid: TaskId,
}

impl TaskDescriptor {
    pub fn new(tid: impl Into<TaskId>, input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            tid: tid.into(),
        }
    }

    /// Parses the task input as structured JSON
    pub fn parse_input(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.input)
    }
}
