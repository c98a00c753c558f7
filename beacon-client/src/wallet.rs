//! Signing identity
//!
//! Derives a secp256k1 key from a BIP-39 mnemonic (12 to 24 words) on the
//! standard Cosmos path and signs `MsgExecuteContract` transactions in
//! direct mode.

use beacon_core::dto::execute::ExecuteMsg;
use beacon_core::fee::Fee;
use bip32::DerivationPath;
use bip39::{Language, Mnemonic};
use cosmrs::cosmwasm::MsgExecuteContract;
use cosmrs::crypto::secp256k1::SigningKey;
use cosmrs::tendermint::chain;
use cosmrs::tx::{self, Body, Msg, SignDoc, SignerInfo};
use cosmrs::{AccountId, Coin, Denom};
use std::fmt;

use crate::error::{ClientError, Result};

/// HD path used by Cosmos SDK wallets (coin type 118, first account)
pub const DERIVATION_PATH: &str = "m/44'/118'/0'/0/0";

/// Key pair plus its bech32 address
pub struct Wallet {
    key: SigningKey,
    address: AccountId,
}

impl Wallet {
    /// Derives the wallet for `phrase`, encoding the address with `prefix`
    pub fn from_mnemonic(phrase: &str, prefix: &str) -> Result<Self> {
        let mnemonic = Mnemonic::parse_in(Language::English, phrase.trim())
            .map_err(|e| ClientError::SigningError(format!("Invalid mnemonic: {}", e)))?;
        let seed = mnemonic.to_seed("");
        let path: DerivationPath = DERIVATION_PATH.parse().map_err(ClientError::signing)?;
        let key = SigningKey::derive_from_path(seed, &path)
            .map_err(ClientError::signing)?;
        let address = key
            .public_key()
            .account_id(prefix)
            .map_err(ClientError::signing)?;

        Ok(Self { key, address })
    }

    pub fn address(&self) -> &AccountId {
        &self.address
    }

    /// Builds and signs a transaction carrying one contract execution
    ///
    /// Returns the protobuf-encoded `TxRaw` ready for broadcast.
    pub fn sign_execute(
        &self,
        contract: &AccountId,
        msg: &ExecuteMsg,
        fee: &Fee,
        chain_id: &chain::Id,
        account_number: u64,
        sequence: u64,
    ) -> Result<Vec<u8>> {
        let payload = serde_json::to_vec(msg)
            .map_err(|e| ClientError::InvalidRequest(format!("Failed to encode message: {}", e)))?;

        let execute = MsgExecuteContract {
            sender: self.address.clone(),
            contract: contract.clone(),
            msg: payload,
            funds: Vec::new(),
        };
        let body = Body::new(
            vec![execute.to_any().map_err(ClientError::signing)?],
            "",
            0u32,
        );

        let amount = Coin {
            denom: fee.denom.parse::<Denom>().map_err(ClientError::signing)?,
            amount: fee.amount,
        };
        let auth_info = SignerInfo::single_direct(Some(self.key.public_key()), sequence)
            .auth_info(tx::Fee::from_amount_and_gas(amount, fee.gas_limit));

        let sign_doc = SignDoc::new(&body, &auth_info, chain_id, account_number)
            .map_err(ClientError::signing)?;
        let raw = sign_doc.sign(&self.key).map_err(ClientError::signing)?;

        raw.to_bytes().map_err(ClientError::signing)
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address.to_string())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_core::ids::TaskId;

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon \
        abandon abandon abandon abandon abandon about";

    const LONG_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon \
        abandon abandon abandon abandon abandon abandon abandon abandon abandon \
        abandon abandon abandon abandon abandon abandon abandon abandon art";

    #[test]
    fn test_derives_prefixed_address() {
        let wallet = Wallet::from_mnemonic(TEST_MNEMONIC, "archway").unwrap();
        assert!(wallet.address().to_string().starts_with("archway1"));

        let again = Wallet::from_mnemonic(TEST_MNEMONIC, "archway").unwrap();
        assert_eq!(wallet.address(), again.address());
    }

    #[test]
    fn test_accepts_12_and_24_word_phrases() {
        let short = Wallet::from_mnemonic(TEST_MNEMONIC, "archway").unwrap();
        let long = Wallet::from_mnemonic(LONG_MNEMONIC, "archway").unwrap();

        assert!(long.address().to_string().starts_with("archway1"));
        assert_ne!(short.address(), long.address());
    }

    #[test]
    fn test_prefix_only_changes_encoding() {
        let archway = Wallet::from_mnemonic(TEST_MNEMONIC, "archway").unwrap();
        let cosmos = Wallet::from_mnemonic(&format!("  {}\n", TEST_MNEMONIC), "cosmos").unwrap();

        assert!(cosmos.address().to_string().starts_with("cosmos1"));
        assert_eq!(archway.address().to_bytes(), cosmos.address().to_bytes());
    }

    #[test]
    fn test_rejects_bad_checksum() {
        let phrase = TEST_MNEMONIC.replace("about", "abandon");
        let err = Wallet::from_mnemonic(&phrase, "archway").unwrap_err();
        assert!(matches!(err, ClientError::SigningError(_)));
    }

    #[test]
    fn test_rejects_bad_mnemonic() {
        let err = Wallet::from_mnemonic("not a real phrase", "archway").unwrap_err();
        assert!(matches!(err, ClientError::SigningError(_)));
    }

    #[test]
    fn test_debug_hides_key() {
        let wallet = Wallet::from_mnemonic(TEST_MNEMONIC, "archway").unwrap();
        let rendered = format!("{:?}", wallet);
        assert!(rendered.starts_with("Wallet { address: \"archway1"));
        assert!(rendered.ends_with(", .. }"));
    }

    #[test]
    fn test_sign_execute_produces_bytes() {
        let wallet = Wallet::from_mnemonic(TEST_MNEMONIC, "archway").unwrap();
        let contract = wallet.address().clone();
        let fee = Fee {
            amount: 42_000_000_000_000_000,
            denom: "aarch".to_string(),
            gas_limit: 300_000,
        };
        let msg = ExecuteMsg::Response {
            token_id: "0".to_string(),
            task_id: TaskId::Number(0),
            output: "3".to_string(),
        };
        let chain_id: chain::Id = "constantine-3".parse().unwrap();

        let bytes = wallet
            .sign_execute(&contract, &msg, &fee, &chain_id, 1, 0)
            .unwrap();
        assert!(!bytes.is_empty());
    }
}
