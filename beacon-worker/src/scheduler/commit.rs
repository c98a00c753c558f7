//! Commit step shared by both workers

use beacon_core::dto::execute::ExecuteMsg;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::repository::Ledger;
use crate::scheduler::SweepReport;
use crate::timeout::guarded;

/// Submits one message; a failure is logged and counted, never retried here
pub(crate) async fn commit(
    ledger: &dyn Ledger,
    limit: Duration,
    msg: &ExecuteMsg,
    report: &mut SweepReport,
) {
    match guarded(limit, ledger.execute(msg)).await {
        Ok(receipt) => {
            info!(
                "Transaction Hash: {} ({})",
                receipt.transaction_hash,
                unit_label(msg)
            );
            report.committed += 1;
        }
        Err(e) => {
            error!("Error sending transaction for {}: {}", unit_label(msg), e);
            warn!("skip - {}", unit_label(msg));
            report.failed += 1;
        }
    }
}

/// Human-readable name of the unit a message commits
pub(crate) fn unit_label(msg: &ExecuteMsg) -> String {
    match msg {
        ExecuteMsg::Response {
            token_id, task_id, ..
        } => format!("Token: {} | Task: {}", token_id, task_id),
        ExecuteMsg::Update { token_id, .. } => format!("Token: {}", token_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_core::ids::TaskId;

    #[test]
    fn test_unit_label() {
        let response = ExecuteMsg::Response {
            token_id: "2".to_string(),
            task_id: TaskId::Number(7),
            output: "x".to_string(),
        };
        assert_eq!(unit_label(&response), "Token: 2 | Task: 7");

        let update = ExecuteMsg::Update {
            token_id: "4".to_string(),
            title: "t".to_string(),
            description: "d".to_string(),
        };
        assert_eq!(unit_label(&update), "Token: 4");
    }
}
