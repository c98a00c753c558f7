//! Ledger REST client
//!
//! Talks to the chain's REST (LCD) gateway:
//! - Contract smart queries (`num_tokens`, `remains`, `incomplete_projects`, `nft_info`)
//! - Account number and sequence lookup for the signer
//! - Chain id discovery
//! - Signed transaction broadcast, followed by polling until the transaction
//!   is included in a block

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use beacon_core::domain::item::NftInfo;
use beacon_core::dto::execute::TxReceipt;
use beacon_core::dto::query::{
    IncompleteProjectsResponse, NumTokensResponse, QueryMsg, RemainsResponse,
};
use beacon_core::ids::deserialize_id;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::{handle_response, normalize_base_url};

/// Pause between two inclusion lookups of a broadcast transaction
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Account number and next sequence of a signing identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountState {
    pub account_number: u64,
    pub sequence: u64,
}

/// HTTP client for the ledger's REST gateway, bound to one contract
#[derive(Debug, Clone)]
pub struct LedgerClient {
    /// Base URL of the gateway (e.g., "https://api.mainnet.archway.io")
    base_url: String,
    /// Address of the task registry contract
    contract_address: String,
    client: Client,
    poll_interval: Duration,
}

impl LedgerClient {
    /// Create a new ledger client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the REST gateway
    /// * `contract_address` - Bech32 address of the contract to query
    pub fn new(base_url: impl Into<String>, contract_address: impl Into<String>) -> Self {
        Self::with_client(base_url, contract_address, Client::new())
    }

    /// Create a new ledger client with a custom HTTP client
    pub fn with_client(
        base_url: impl Into<String>,
        contract_address: impl Into<String>,
        client: Client,
    ) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            contract_address: contract_address.into(),
            client,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Set the pause between inclusion lookups after a broadcast
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn contract_address(&self) -> &str {
        &self.contract_address
    }

    // =============================================================================
    // Contract Queries
    // =============================================================================

    /// Run a smart query against the contract and return its `data` payload
    pub async fn query_smart<T: DeserializeOwned>(&self, msg: &QueryMsg) -> Result<T> {
        let payload = serde_json::to_vec(msg)
            .map_err(|e| ClientError::InvalidRequest(format!("Failed to encode query: {}", e)))?;
        let url = format!(
            "{}/cosmwasm/wasm/v1/contract/{}/smart/{}",
            self.base_url,
            self.contract_address,
            URL_SAFE.encode(payload)
        );

        debug!("Smart query {:?}", msg);
        let response = self.client.get(&url).send().await?;
        let envelope: SmartQueryResponse<T> = handle_response(response).await?;

        Ok(envelope.data)
    }

    /// Total number of registered items
    pub async fn num_tokens(&self) -> Result<u64> {
        let response: NumTokensResponse = self.query_smart(&QueryMsg::NumTokens {}).await?;
        Ok(response.count)
    }

    /// Task ids of an item that still have no committed output
    pub async fn remains(&self, token_id: &str) -> Result<Vec<String>> {
        let response: RemainsResponse = self
            .query_smart(&QueryMsg::Remains {
                token_id: token_id.to_string(),
            })
            .await?;
        Ok(response.tids)
    }

    /// Item ids that still lack descriptive metadata
    pub async fn incomplete_projects(&self) -> Result<Vec<String>> {
        let response: IncompleteProjectsResponse =
            self.query_smart(&QueryMsg::IncompleteProjects {}).await?;
        Ok(response.pids)
    }

    /// Full detail record of an item
    pub async fn nft_info(&self, token_id: &str) -> Result<NftInfo> {
        self.query_smart(&QueryMsg::NftInfo {
            token_id: token_id.to_string(),
        })
        .await
    }

    // =============================================================================
    // Chain State
    // =============================================================================

    /// Fetch the account number and current sequence of an address
    pub async fn account(&self, address: &str) -> Result<AccountState> {
        let url = format!("{}/cosmos/auth/v1beta1/accounts/{}", self.base_url, address);
        let response = self.client.get(&url).send().await?;
        let envelope: AccountResponse = handle_response(response).await?;

        let parse = |field: &str, value: &str| {
            value.parse::<u64>().map_err(|_| {
                ClientError::ParseError(format!("Invalid {} '{}' for {}", field, value, address))
            })
        };

        Ok(AccountState {
            account_number: parse("account_number", &envelope.account.account_number)?,
            sequence: parse("sequence", &envelope.account.sequence)?,
        })
    }

    /// Fetch the chain id reported by the connected node
    pub async fn chain_id(&self) -> Result<String> {
        let url = format!("{}/cosmos/base/tendermint/v1beta1/node_info", self.base_url);
        let response = self.client.get(&url).send().await?;
        let info: NodeInfoResponse = handle_response(response).await?;

        Ok(info.default_node_info.network)
    }

    // =============================================================================
    // Transactions
    // =============================================================================

    /// Broadcast a signed transaction and wait until it is included in a block
    ///
    /// Fails with [`ClientError::TxRejected`] if the transaction is refused by
    /// mempool checks or fails during execution. Inclusion is polled without a
    /// deadline; callers bound the whole call.
    pub async fn broadcast(&self, tx_bytes: Vec<u8>) -> Result<TxReceipt> {
        let accepted = self.broadcast_sync(tx_bytes).await?.into_receipt()?;
        debug!("Transaction {} accepted, waiting for inclusion", accepted.transaction_hash);

        loop {
            if let Some(tx) = self.find_tx(&accepted.transaction_hash).await? {
                return tx.into_receipt();
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Look up a transaction by hash; `None` while it is not in a block yet
    async fn find_tx(&self, txhash: &str) -> Result<Option<TxResponse>> {
        let url = format!("{}/cosmos/tx/v1beta1/txs/{}", self.base_url, txhash);
        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let envelope: TxEnvelope = handle_response(response).await?;
        Ok(Some(envelope.tx_response))
    }

    async fn broadcast_sync(&self, tx_bytes: Vec<u8>) -> Result<TxResponse> {
        let url = format!("{}/cosmos/tx/v1beta1/txs", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&BroadcastRequest {
                tx_bytes: STANDARD.encode(tx_bytes),
                mode: "BROADCAST_MODE_SYNC",
            })
            .send()
            .await?;

        let envelope: TxEnvelope = handle_response(response).await?;
        Ok(envelope.tx_response)
    }
}

#[derive(Debug, Deserialize)]
struct SmartQueryResponse<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    account: BaseAccount,
}

#[derive(Debug, Deserialize)]
struct BaseAccount {
    #[serde(deserialize_with = "deserialize_id")]
    account_number: String,
    #[serde(deserialize_with = "deserialize_id")]
    sequence: String,
}

#[derive(Debug, Deserialize)]
struct NodeInfoResponse {
    default_node_info: DefaultNodeInfo,
}

#[derive(Debug, Deserialize)]
struct DefaultNodeInfo {
    network: String,
}

#[derive(Debug, Serialize)]
struct BroadcastRequest {
    tx_bytes: String,
    mode: &'static str,
}

/// Body of both the broadcast and the lookup endpoints
#[derive(Debug, Deserialize)]
struct TxEnvelope {
    tx_response: TxResponse,
}

#[derive(Debug, Deserialize)]
struct TxResponse {
    txhash: String,
    #[serde(default)]
    code: u32,
    #[serde(default)]
    raw_log: String,
}

impl TxResponse {
    fn into_receipt(self) -> Result<TxReceipt> {
        if self.code != 0 {
            return Err(ClientError::TxRejected {
                txhash: self.txhash,
                code: self.code,
                log: self.raw_log,
            });
        }

        Ok(TxReceipt {
            transaction_hash: self.txhash,
        })
    }
}
