//! Ledger repository
//!
//! Read-only contract queries plus the signed `execute` mutation.

use async_trait::async_trait;
use beacon_client::{LedgerClient, Result, SigningClient};
use beacon_core::domain::item::NftInfo;
use beacon_core::dto::execute::{ExecuteMsg, TxReceipt};

/// Repository trait for the task registry contract
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Number of registered items; ids are `0..count`
    async fn num_tokens(&self) -> Result<u64>;

    /// Task ids of an item that have no committed output yet
    async fn remains(&self, token_id: &str) -> Result<Vec<String>>;

    /// Item ids that still lack a title or description
    async fn incomplete_projects(&self) -> Result<Vec<String>>;

    /// Detail record of an item
    async fn nft_info(&self, token_id: &str) -> Result<NftInfo>;

    /// Signs and submits a state-mutating message
    async fn execute(&self, msg: &ExecuteMsg) -> Result<TxReceipt>;
}

/// Ledger backed by the chain's REST gateway and the worker's signing identity
#[derive(Debug)]
pub struct ChainLedger {
    queries: LedgerClient,
    signer: SigningClient,
}

impl ChainLedger {
    pub fn new(queries: LedgerClient, signer: SigningClient) -> Self {
        Self { queries, signer }
    }

    pub fn signer_address(&self) -> String {
        self.signer.address()
    }
}

#[async_trait]
impl Ledger for ChainLedger {
    async fn num_tokens(&self) -> Result<u64> {
        self.queries.num_tokens().await
    }

    async fn remains(&self, token_id: &str) -> Result<Vec<String>> {
        self.queries.remains(token_id).await
    }

    async fn incomplete_projects(&self) -> Result<Vec<String>> {
        self.queries.incomplete_projects().await
    }

    async fn nft_info(&self, token_id: &str) -> Result<NftInfo> {
        self.queries.nft_info(token_id).await
    }

    async fn execute(&self, msg: &ExecuteMsg) -> Result<TxReceipt> {
        self.signer.execute(msg).await
    }
}
