//! Execute messages and transaction receipts

use serde::{Deserialize, Serialize};

use crate::ids::TaskId;

/// State-mutating messages sent by the workers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    /// Records the output of a task
    Response {
        token_id: String,
        task_id: TaskId,
        output: String,
    },
    /// Sets an item's title and description
    Update {
        token_id: String,
        title: String,
        description: String,
    },
}

impl ExecuteMsg {
    pub fn token_id(&self) -> &str {
        match self {
            ExecuteMsg::Response { token_id, .. } | ExecuteMsg::Update { token_id, .. } => token_id,
        }
    }
}

/// Result of an accepted transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub transaction_hash: String,
}
