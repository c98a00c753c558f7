//! Signing client
//!
//! Submits contract executions on behalf of one wallet. The account sequence
//! is cached between transactions and advanced after every included
//! transaction; any failure drops the cache so the next transaction refetches
//! it from the ledger.
//!
//! A refetched sequence reflects committed state only. If a transaction was
//! still in the mempool when its call failed or was cut off by a timeout, the
//! refetched value lags it, and the following commits fail with a sequence
//! mismatch until that transaction lands in a block.

use beacon_core::dto::execute::{ExecuteMsg, TxReceipt};
use beacon_core::fee::Fee;
use cosmrs::AccountId;
use cosmrs::tendermint::chain;
use tokio::sync::{Mutex, OnceCell};
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::ledger::{AccountState, LedgerClient};
use crate::wallet::Wallet;

/// Signs and broadcasts executions against the ledger client's contract
#[derive(Debug)]
pub struct SigningClient {
    ledger: LedgerClient,
    wallet: Wallet,
    contract: AccountId,
    fee: Fee,
    chain_id: OnceCell<chain::Id>,
    account: Mutex<Option<AccountState>>,
}

impl SigningClient {
    /// Create a signing client
    ///
    /// # Arguments
    /// * `ledger` - Client for the gateway; its contract address is the execution target
    /// * `wallet` - Identity that signs every transaction
    /// * `fee` - Fee attached to every transaction
    pub fn new(ledger: LedgerClient, wallet: Wallet, fee: Fee) -> Result<Self> {
        let contract = ledger.contract_address().parse::<AccountId>().map_err(|e| {
            ClientError::InvalidRequest(format!(
                "Invalid contract address '{}': {}",
                ledger.contract_address(),
                e
            ))
        })?;

        Ok(Self {
            ledger,
            wallet,
            contract,
            fee,
            chain_id: OnceCell::new(),
            account: Mutex::new(None),
        })
    }

    pub fn address(&self) -> String {
        self.wallet.address().to_string()
    }

    pub fn fee(&self) -> &Fee {
        &self.fee
    }

    /// Sign and broadcast one execute message
    pub async fn execute(&self, msg: &ExecuteMsg) -> Result<TxReceipt> {
        let chain_id = self
            .chain_id
            .get_or_try_init(|| async {
                let id = self.ledger.chain_id().await?;
                id.parse::<chain::Id>().map_err(|e| {
                    ClientError::ParseError(format!("Invalid chain id '{}': {}", id, e))
                })
            })
            .await?;

        // Taken out of the cache so a cancelled call leaves it empty.
        let mut cached = self.account.lock().await;
        let account = match cached.take() {
            Some(account) => account,
            None => {
                self.ledger
                    .account(&self.wallet.address().to_string())
                    .await?
            }
        };

        debug!(
            "Signing {} with account {} sequence {}",
            msg.token_id(),
            account.account_number,
            account.sequence
        );

        let tx_bytes = self.wallet.sign_execute(
            &self.contract,
            msg,
            &self.fee,
            chain_id,
            account.account_number,
            account.sequence,
        )?;

        let receipt = self.ledger.broadcast(tx_bytes).await?;
        *cached = Some(AccountState {
            sequence: account.sequence + 1,
            ..account
        });

        Ok(receipt)
    }
}
