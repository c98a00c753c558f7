//! Query messages and responses

use serde::{Deserialize, Serialize};

use crate::ids::deserialize_ids;

/// Read-only queries understood by the contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    NumTokens {},
    Remains { token_id: String },
    IncompleteProjects {},
    NftInfo { token_id: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct NumTokensResponse {
    pub count: u64,
}

/// Task ids of an item that still have no committed output
#[derive(Debug, Clone, Deserialize)]
pub struct RemainsResponse {
    #[serde(deserialize_with = "deserialize_ids")]
    pub tids: Vec<String>,
}

/// Item ids that still lack a title or description
#[derive(Debug, Clone, Deserialize)]
pub struct IncompleteProjectsResponse {
    #[serde(deserialize_with = "deserialize_ids")]
    pub pids: Vec<String>,
}
