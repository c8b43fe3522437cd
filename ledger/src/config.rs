//! Configuration for the auction coordinator.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Fee fractions are expressed in basis points so operators never touch
//! floating point.

use adslot_core::account::AccountId;
use adslot_core::settlement::FeePolicy;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use uuid::Uuid;

/// Basis points in a whole.
const BPS_DENOMINATOR: u64 = 10_000;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An environment variable held a value that does not parse.
    #[error("Invalid value for {key}: {value}")]
    InvalidValue {
        /// The offending variable
        key: &'static str,
        /// The raw value found
        value: String,
    },

    /// The configured fee fractions were rejected by the policy.
    #[error("Invalid fee configuration: {0}")]
    InvalidFees(String),
}

/// Auction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionConfig {
    /// Fee split applied when a bid is superseded
    pub fees: FeePolicy,
    /// Identity of the platform treasury receiving platform fees
    pub treasury: AccountId,
}

impl AuctionConfig {
    /// Creates a configuration from explicit parts.
    #[must_use]
    pub const fn new(fees: FeePolicy, treasury: AccountId) -> Self {
        Self { fees, treasury }
    }

    /// Loads configuration from the environment.
    ///
    /// | Variable | Meaning | Default |
    /// |---|---|---|
    /// | `AUCTION_TOTAL_FEE_BPS` | total fee on a superseded bid, in basis points | `1000` (10%) |
    /// | `AUCTION_OWNER_SHARE_BPS` | owner's share of the total fee, in basis points | `7000` (70%) |
    /// | `AUCTION_TREASURY_ID` | UUID of the platform treasury account | fresh UUID |
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a variable is present but malformed, or
    /// if the resulting fee fractions are rejected.
    pub fn from_env() -> Result<Self, ConfigError> {
        let fee_bps = env_u64("AUCTION_TOTAL_FEE_BPS", 1_000)?;
        let owner_bps = env_u64("AUCTION_OWNER_SHARE_BPS", 7_000)?;
        let treasury = env_account("AUCTION_TREASURY_ID")?;

        let fees = FeePolicy::new(fee_bps, BPS_DENOMINATOR, owner_bps, BPS_DENOMINATOR)
            .map_err(|err| ConfigError::InvalidFees(err.to_string()))?;

        Ok(Self { fees, treasury })
    }
}

impl Default for AuctionConfig {
    /// Default fee policy with a freshly generated treasury identity.
    fn default() -> Self {
        Self {
            fees: FeePolicy::default(),
            treasury: AccountId::new(),
        }
    }
}

fn env_u64(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(key) {
        Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
            key,
            value,
        }),
        Err(_) => Ok(default),
    }
}

fn env_account(key: &'static str) -> Result<AccountId, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .parse::<Uuid>()
            .map(AccountId::from_uuid)
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        Err(_) => Ok(AccountId::new()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use adslot_core::money::Money;

    #[test]
    fn default_matches_design_fees() {
        let config = AuctionConfig::default();
        let split = config.fees.split(Money::from_cents(100)).unwrap();
        assert_eq!(split.total_fee, Money::from_cents(10));
        assert_eq!(split.owner_fee, Money::from_cents(7));
    }

    #[test]
    fn basis_point_policy_matches_percentage_policy() {
        let bps = FeePolicy::new(1_000, BPS_DENOMINATOR, 7_000, BPS_DENOMINATOR).unwrap();
        let amount = Money::from_cents(123_456);
        assert_eq!(
            bps.split(amount).unwrap(),
            FeePolicy::default().split(amount).unwrap()
        );
    }
}
