//! Worker error types
//!
//! [`WorkerError`] is the fatal class: a sweep that returns one stops the
//! worker. Everything else (engine failures, malformed completions, rejected
//! transactions) is logged inside the sweep and never reaches this type.

use beacon_client::ClientError;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single timeout-guarded call
#[derive(Debug, Error)]
pub enum CallError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Errors that stop the sweep loop
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The discovery query failed, so no consistent view of pending work exists
    #[error("Discovery failed: {0}")]
    Discovery(#[source] CallError),

    /// An item's detail record could not be fetched
    #[error("Failed to fetch details of token {token_id}: {source}")]
    DetailFetch {
        token_id: String,
        #[source]
        source: CallError,
    },

    /// An item's pending task list could not be fetched
    #[error("Failed to fetch remaining tasks of token {token_id}: {source}")]
    PendingFetch {
        token_id: String,
        #[source]
        source: CallError,
    },
}
