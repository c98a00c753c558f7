//! Worker configuration
//!
//! Settings are read once at startup (flags or environment) into an immutable
//! [`Config`] that is passed to every component. Nothing reads the
//! environment after that.

use anyhow::Context;
use beacon_core::fee::{DEFAULT_GAS_LIMIT, Fee, GasPrice, calculate_fee};
use clap::Args;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_COMPUTE_URL: &str = "http://localhost:3327";
pub const DEFAULT_COMPLETION_URL: &str = "https://api.openai.com";
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_GAS_PRICE: &str = "140000000000aarch";
pub const DEFAULT_ADDRESS_PREFIX: &str = "archway";
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 20;
pub const DEFAULT_CALL_TIMEOUT_SECS: u64 = 60;

/// Command-line and environment settings
#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// REST gateway of the ledger
    #[arg(long, env = "RPC_URL")]
    pub rpc_url: String,

    /// Address of the task registry contract
    #[arg(long, env = "CONTRACT_ADDRESS")]
    pub contract_address: String,

    /// Mnemonic of the signing identity
    #[arg(long, env = "MNEMONIC", hide_env_values = true)]
    pub mnemonic: String,

    /// Credential for the completion service
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: String,

    /// Base URL of the code-execution sandbox
    #[arg(long, env = "COMPUTE_URL", default_value = DEFAULT_COMPUTE_URL)]
    pub compute_url: String,

    /// Base URL of the completion service
    #[arg(long, env = "COMPLETION_URL", default_value = DEFAULT_COMPLETION_URL)]
    pub completion_url: String,

    /// Model requested from the completion service
    #[arg(long, env = "COMPLETION_MODEL", default_value = DEFAULT_COMPLETION_MODEL)]
    pub completion_model: String,

    /// Gas price used to compute the fee of every transaction
    #[arg(long, env = "GAS_PRICE", default_value = DEFAULT_GAS_PRICE)]
    pub gas_price: String,

    /// Bech32 prefix of the signing address
    #[arg(long, env = "ADDRESS_PREFIX", default_value = DEFAULT_ADDRESS_PREFIX)]
    pub address_prefix: String,

    /// Seconds to sleep between sweeps
    #[arg(long, env = "SWEEP_INTERVAL", default_value_t = DEFAULT_SWEEP_INTERVAL_SECS)]
    pub sweep_interval: u64,

    /// Seconds before any outbound call is abandoned
    #[arg(long, env = "CALL_TIMEOUT", default_value_t = DEFAULT_CALL_TIMEOUT_SECS)]
    pub call_timeout: u64,
}

/// Worker configuration
#[derive(Clone)]
pub struct Config {
    /// Ledger REST gateway (e.g., "https://api.constantine.archway.io")
    pub rpc_url: String,

    pub contract_address: String,

    pub mnemonic: String,

    pub api_key: String,

    pub compute_url: String,

    pub completion_url: String,

    pub completion_model: String,

    pub gas_price: GasPrice,

    pub address_prefix: String,

    /// Fixed pause between two sweeps, independent of how long a sweep took
    pub sweep_interval: Duration,

    /// Upper bound for every ledger query, engine call and broadcast
    pub call_timeout: Duration,
}

impl Config {
    /// Builds and validates the configuration from parsed arguments
    pub fn from_args(args: ConfigArgs) -> anyhow::Result<Self> {
        let gas_price = args
            .gas_price
            .parse::<GasPrice>()
            .with_context(|| format!("Invalid GAS_PRICE '{}'", args.gas_price))?;

        let config = Self {
            rpc_url: args.rpc_url,
            contract_address: args.contract_address,
            mnemonic: args.mnemonic,
            api_key: args.openai_api_key,
            compute_url: args.compute_url,
            completion_url: args.completion_url,
            completion_model: args.completion_model,
            gas_price,
            address_prefix: args.address_prefix,
            sweep_interval: Duration::from_secs(args.sweep_interval),
            call_timeout: Duration::from_secs(args.call_timeout),
        };

        config.validate()?;
        Ok(config)
    }

    /// Fee attached to every transaction, for the fixed gas budget
    pub fn fee(&self) -> anyhow::Result<Fee> {
        calculate_fee(DEFAULT_GAS_LIMIT, &self.gas_price).context("Failed to calculate fee")
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        let required = [
            ("RPC_URL", &self.rpc_url),
            ("CONTRACT_ADDRESS", &self.contract_address),
            ("MNEMONIC", &self.mnemonic),
            ("OPENAI_API_KEY", &self.api_key),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                anyhow::bail!("{} cannot be empty", name);
            }
        }

        for (name, url) in [
            ("RPC_URL", &self.rpc_url),
            ("COMPUTE_URL", &self.compute_url),
            ("COMPLETION_URL", &self.completion_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("{} must start with http:// or https://", name);
            }
        }

        if self.address_prefix.is_empty() {
            anyhow::bail!("address_prefix cannot be empty");
        }

        if self.sweep_interval.is_zero() {
            anyhow::bail!("sweep_interval must be greater than 0");
        }

        if self.call_timeout.is_zero() {
            anyhow::bail!("call_timeout must be greater than 0");
        }

        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("rpc_url", &self.rpc_url)
            .field("contract_address", &self.contract_address)
            .field("compute_url", &self.compute_url)
            .field("completion_url", &self.completion_url)
            .field("completion_model", &self.completion_model)
            .field("gas_price", &self.gas_price.to_string())
            .field("address_prefix", &self.address_prefix)
            .field("sweep_interval", &self.sweep_interval)
            .field("call_timeout", &self.call_timeout)
            .finish_non_exhaustive()
    }
}
