//! Updater worker
//!
//! Fills in the title and description of items that lack them, using the
//! completion service to describe each item's code.

use async_trait::async_trait;
use beacon_core::dto::execute::ExecuteMsg;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::error::WorkerError;
use crate::repository::{CompletionEngine, Ledger};
use crate::scheduler::commit::commit;
use crate::scheduler::{Sweep, SweepReport};
use crate::service::Summarizer;
use crate::timeout::guarded;

pub struct Updater {
    ledger: Arc<dyn Ledger>,
    summarizer: Summarizer,
    timeout: Duration,
}

impl Updater {
    pub fn new(
        ledger: Arc<dyn Ledger>,
        completion: Arc<dyn CompletionEngine>,
        timeout: Duration,
    ) -> Self {
        Self {
            ledger,
            summarizer: Summarizer::new(completion, timeout),
            timeout,
        }
    }
}

#[async_trait]
impl Sweep for Updater {
    fn role(&self) -> &'static str {
        "updater"
    }

    async fn sweep(&self) -> Result<SweepReport, WorkerError> {
        let pids = guarded(self.timeout, self.ledger.incomplete_projects())
            .await
            .map_err(WorkerError::Discovery)?;
        info!("Projects: {:?}", pids);

        let mut report = SweepReport::default();
        for token_id in &pids {
            report.found += 1;

            let info = guarded(self.timeout, self.ledger.nft_info(token_id))
                .await
                .map_err(|source| WorkerError::DetailFetch {
                    token_id: token_id.clone(),
                    source,
                })?;

            let metadata = match self.summarizer.summarize(&info.extension.code).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    error!("Error describing Token: {}: {}", token_id, e);
                    warn!("skip - Token: {}", token_id);
                    report.deferred += 1;
                    continue;
                }
            };
            info!("Metadata for Token: {}: {:?}", token_id, metadata);

            let msg = ExecuteMsg::Update {
                token_id: token_id.clone(),
                title: metadata.title,
                description: metadata.description,
            };
            commit(self.ledger.as_ref(), self.timeout, &msg, &mut report).await;
        }

        Ok(report)
    }
}
