//! Gas price parsing and fee calculation
//!
//! A gas price is written `<decimal amount><denom>`, e.g. `140000000000aarch`
//! or `0.025uconst`. The fee for a gas budget is `ceil(price * gas)` in the
//! price's denomination.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Gas budget for every transaction the workers submit
pub const DEFAULT_GAS_LIMIT: u64 = 300_000;

/// Maximum number of fractional digits accepted in a gas price
const MAX_FRACTION_DIGITS: usize = 18;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeeError {
    #[error("Invalid gas price '{0}': expected <amount><denom>")]
    InvalidFormat(String),

    #[error("Invalid gas price amount '{0}'")]
    InvalidAmount(String),

    #[error("Invalid denomination '{0}'")]
    InvalidDenom(String),

    #[error("Fee calculation overflowed")]
    Overflow,
}

/// Price of one unit of gas
///
/// The amount is stored as a fixed-point integer: `mantissa / 10^scale`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasPrice {
    mantissa: u128,
    scale: u32,
    denom: String,
}

impl GasPrice {
    pub fn denom(&self) -> &str {
        &self.denom
    }
}

impl FromStr for GasPrice {
    type Err = FeeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| FeeError::InvalidFormat(s.to_string()))?;
        let (amount, denom) = s.split_at(split);

        if amount.is_empty() {
            return Err(FeeError::InvalidFormat(s.to_string()));
        }
        validate_denom(denom)?;

        let (whole, fraction) = match amount.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (amount, ""),
        };

        if (whole.is_empty() && fraction.is_empty())
            || fraction.contains('.')
            || fraction.len() > MAX_FRACTION_DIGITS
        {
            return Err(FeeError::InvalidAmount(amount.to_string()));
        }

        let digits = format!("{}{}", whole, fraction);
        let mantissa = digits
            .parse::<u128>()
            .map_err(|_| FeeError::InvalidAmount(amount.to_string()))?;

        Ok(Self {
            mantissa,
            scale: fraction.len() as u32,
            denom: denom.to_string(),
        })
    }
}

impl fmt::Display for GasPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let divisor = 10u128.pow(self.scale);
        let whole = self.mantissa / divisor;
        let fraction = self.mantissa % divisor;

        if self.scale == 0 || fraction == 0 {
            write!(f, "{}{}", whole, self.denom)
        } else {
            let fraction = format!("{:0width$}", fraction, width = self.scale as usize);
            write!(f, "{}.{}{}", whole, fraction.trim_end_matches('0'), self.denom)
        }
    }
}

fn validate_denom(denom: &str) -> Result<(), FeeError> {
    let mut chars = denom.chars();
    let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || "/:._-".contains(c));

    if !starts_with_letter || !valid_rest || !(3..=128).contains(&denom.len()) {
        return Err(FeeError::InvalidDenom(denom.to_string()));
    }

    Ok(())
}

/// Fee attached to a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub amount: u128,
    pub denom: String,
    pub gas_limit: u64,
}

impl fmt::Display for Fee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} (gas {})", self.amount, self.denom, self.gas_limit)
    }
}

/// Computes the fee for a gas budget, rounding up to the next whole unit
pub fn calculate_fee(gas_limit: u64, price: &GasPrice) -> Result<Fee, FeeError> {
    let product = price
        .mantissa
        .checked_mul(u128::from(gas_limit))
        .ok_or(FeeError::Overflow)?;
    let divisor = 10u128.pow(price.scale);
    let amount = product / divisor + u128::from(product % divisor != 0);

    Ok(Fee {
        amount,
        denom: price.denom.clone(),
        gas_limit,
    })
}
