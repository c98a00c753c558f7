//! Responder worker
//!
//! Walks every item in id order, runs each pending task through the compute
//! sandbox and commits the answer. Tasks are processed one at a time.

use async_trait::async_trait;
use beacon_core::domain::item::NftInfo;
use beacon_core::dto::execute::ExecuteMsg;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::error::WorkerError;
use crate::repository::{ComputeEngine, Ledger};
use crate::scheduler::commit::commit;
use crate::scheduler::{Sweep, SweepReport};
use crate::service::{FAILURE_OUTPUT, Resolution, TaskResolver};
use crate::timeout::guarded;

pub struct Responder {
    ledger: Arc<dyn Ledger>,
    resolver: TaskResolver,
    timeout: Duration,
}

impl Responder {
    pub fn new(ledger: Arc<dyn Ledger>, compute: Arc<dyn ComputeEngine>, timeout: Duration) -> Self {
        Self {
            ledger,
            resolver: TaskResolver::new(compute, timeout),
            timeout,
        }
    }

    async fn process_token(
        &self,
        token_id: &str,
        report: &mut SweepReport,
    ) -> Result<(), WorkerError> {
        let info: NftInfo = guarded(self.timeout, self.ledger.nft_info(token_id))
            .await
            .map_err(|source| WorkerError::DetailFetch {
                token_id: token_id.to_string(),
                source,
            })?;

        let remains = guarded(self.timeout, self.ledger.remains(token_id))
            .await
            .map_err(|source| WorkerError::PendingFetch {
                token_id: token_id.to_string(),
                source,
            })?;

        if remains.is_empty() {
            debug!("Token {} has no pending tasks", token_id);
            return Ok(());
        }
        info!("Token {}: {} pending task(s) {:?}", token_id, remains.len(), remains);

        for task_id in &remains {
            report.found += 1;

            let Some(task) = info.extension.task(task_id) else {
                warn!("skip - Token: {} | Task: {} has no descriptor", token_id, task_id);
                report.deferred += 1;
                continue;
            };

            let resolution = self.resolver.resolve(&info.extension.code, task).await;
            let output = match &resolution {
                Resolution::Answer(output) => {
                    info!("Response for Token: {} | Task: {}: {}", token_id, task.tid, output);
                    output.clone()
                }
                Resolution::Unrunnable(e) => {
                    warn!("Token: {} | Task: {} has unparsable input: {}", token_id, task.tid, e);
                    FAILURE_OUTPUT.to_string()
                }
                Resolution::Deferred(e) => {
                    error!("Error running code for Token: {} | Task: {}: {}", token_id, task.tid, e);
                    warn!("skip - Token: {} | Task: {}", token_id, task.tid);
                    report.deferred += 1;
                    continue;
                }
            };

            let msg = ExecuteMsg::Response {
                token_id: token_id.to_string(),
                task_id: task.tid.clone(),
                output,
            };
            commit(self.ledger.as_ref(), self.timeout, &msg, report).await;
        }

        Ok(())
    }
}

#[async_trait]
impl Sweep for Responder {
    fn role(&self) -> &'static str {
        "responder"
    }

    async fn sweep(&self) -> Result<SweepReport, WorkerError> {
        let count = guarded(self.timeout, self.ledger.num_tokens())
            .await
            .map_err(WorkerError::Discovery)?;
        info!("Tokens: {}", count);

        let mut report = SweepReport::default();
        for token in 0..count {
            self.process_token(&token.to_string(), &mut report).await?;
        }

        Ok(report)
    }
}
