//! Timeout-guarded calls
//!
//! Every outbound call races against a deadline. `tokio::time::timeout` owns
//! the timer for the duration of the call, so the timer is dropped as soon as
//! either side resolves and never outlives its call.

use beacon_client::ClientError;
use std::future::Future;
use std::time::Duration;

use crate::error::CallError;

/// Awaits `call`, failing with [`CallError::Timeout`] once `limit` elapses
pub async fn guarded<T, F>(limit: Duration, call: F) -> Result<T, CallError>
where
    F: Future<Output = Result<T, ClientError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(CallError::from),
        Err(_) => Err(CallError::Timeout(limit)),
    }
}
