//! Scheduler layer for the workers
//!
//! A worker is a [`Sweep`]: one pass of discovery, resolution and commit over
//! the ledger. [`SweepLoop`] repeats sweeps with a fixed pause in between
//! until a sweep fails fatally.
//!
//! "Pending" is always recomputed from the ledger at the start of a sweep.
//! A unit skipped in one sweep is retried only because the next sweep
//! discovers it again; there is no retry queue or backoff.

mod commit;
pub mod responder;
#[cfg(test)]
pub(crate) mod testing;
pub mod updater;

pub use responder::Responder;
pub use updater::Updater;

use async_trait::async_trait;
use std::fmt;
use tokio::time::{self, Duration};
use tracing::{debug, info};

use crate::error::WorkerError;

/// Counters for one sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Pending units discovered
    pub found: usize,
    /// Transactions accepted by the ledger
    pub committed: usize,
    /// Transactions that failed or timed out
    pub failed: usize,
    /// Units left pending for a later sweep
    pub deferred: usize,
}

impl fmt::Display for SweepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} found, {} committed, {} failed, {} deferred",
            self.found, self.committed, self.failed, self.deferred
        )
    }
}

/// One pass over the ledger
#[async_trait]
pub trait Sweep: Send + Sync {
    /// Worker role, used in log lines
    fn role(&self) -> &'static str;

    /// Runs one sweep; an error means the worker must stop
    async fn sweep(&self) -> Result<SweepReport, WorkerError>;
}

/// Runs sweeps back to back with a fixed pause between them
pub struct SweepLoop<W> {
    worker: W,
    interval: Duration,
}

impl<W: Sweep> SweepLoop<W> {
    pub fn new(worker: W, interval: Duration) -> Self {
        Self { worker, interval }
    }

    /// Sweeps forever; only returns when a sweep fails fatally
    pub async fn run(&self) -> Result<(), WorkerError> {
        info!(
            "Starting {} loop (interval: {:?})",
            self.worker.role(),
            self.interval
        );

        loop {
            self.run_once().await?;

            debug!("Sleeping for {:?}", self.interval);
            time::sleep(self.interval).await;
        }
    }

    /// Runs a single sweep
    pub async fn run_once(&self) -> Result<SweepReport, WorkerError> {
        let report = self.worker.sweep().await?;
        info!("{} sweep finished: {}", self.worker.role(), report);
        Ok(report)
    }
}
