//! Descriptive metadata generated for an item

use serde::{Deserialize, Serialize};

/// Title and short description committed by the updater
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: String,
    pub description: String,
}
