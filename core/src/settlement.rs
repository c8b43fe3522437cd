//! Fee-splitting settlement policy.
//!
//! When a bid is superseded, the escrowed amount of the *superseded* bid
//! is settled: a fixed fraction is levied as the total fee, the fee is
//! divided between the slot owner and the platform, and the remainder is
//! refunded to the displaced bidder. All arithmetic is exact-integer with
//! widened intermediates; the platform fee and the refund are derived by
//! subtraction so the three parts always reconstruct the original amount
//! to the cent.

use crate::money::Money;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from settlement computation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettlementError {
    /// Settlement of a zero amount was requested. The bid ledger rejects
    /// zero bids before any settlement runs, so hitting this indicates a
    /// caller bug rather than a user error.
    #[error("Cannot settle a zero amount")]
    InvalidAmount,

    /// A fee fraction was malformed (zero denominator or a fraction above one).
    #[error("Invalid fee fraction: {numerator}/{denominator}")]
    InvalidFraction {
        /// Offending numerator
        numerator: u64,
        /// Offending denominator
        denominator: u64,
    },
}

/// Result of splitting a settled amount.
///
/// Derived, never stored: `owner_fee + platform_fee + refund_to_bidder`
/// always equals the settled amount exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementResult {
    /// Total fee levied on the settled amount
    pub total_fee: Money,
    /// Portion of the fee paid to the slot owner
    pub owner_fee: Money,
    /// Portion of the fee paid to the platform treasury
    pub platform_fee: Money,
    /// Remainder returned to the displaced bidder
    pub refund_to_bidder: Money,
}

/// The fee configuration applied when a bid is superseded.
///
/// `fee_numerator / fee_denominator` of the settled amount is collected in
/// fees; `owner_numerator / owner_denominator` of that fee goes to the
/// slot owner and the rest to the platform. Defaults to a 10% total fee
/// split 70% owner / 30% platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeePolicy {
    fee_numerator: u64,
    fee_denominator: u64,
    owner_numerator: u64,
    owner_denominator: u64,
}

impl FeePolicy {
    /// Creates a fee policy from the two fractions.
    ///
    /// # Errors
    ///
    /// Returns `SettlementError::InvalidFraction` if either denominator is
    /// zero or either fraction exceeds one.
    pub const fn new(
        fee_numerator: u64,
        fee_denominator: u64,
        owner_numerator: u64,
        owner_denominator: u64,
    ) -> Result<Self, SettlementError> {
        if fee_denominator == 0 || fee_numerator > fee_denominator {
            return Err(SettlementError::InvalidFraction {
                numerator: fee_numerator,
                denominator: fee_denominator,
            });
        }
        if owner_denominator == 0 || owner_numerator > owner_denominator {
            return Err(SettlementError::InvalidFraction {
                numerator: owner_numerator,
                denominator: owner_denominator,
            });
        }
        Ok(Self {
            fee_numerator,
            fee_denominator,
            owner_numerator,
            owner_denominator,
        })
    }

    /// Splits a settled amount into fees and refund.
    ///
    /// Exact integer arithmetic: the total fee and owner fee are computed
    /// with truncating division over `u128` intermediates (no overflow for
    /// any `u64` amount), and the platform fee and refund are derived by
    /// subtraction so the parts sum to `amount` exactly.
    ///
    /// # Errors
    ///
    /// Returns `SettlementError::InvalidAmount` if `amount` is zero.
    pub fn split(&self, amount: Money) -> Result<SettlementResult, SettlementError> {
        if amount.is_zero() {
            return Err(SettlementError::InvalidAmount);
        }

        let cents = u128::from(amount.cents());
        let total_fee =
            cents * u128::from(self.fee_numerator) / u128::from(self.fee_denominator);
        let owner_fee =
            total_fee * u128::from(self.owner_numerator) / u128::from(self.owner_denominator);

        // total_fee <= cents and owner_fee <= total_fee, so all three
        // narrow back to u64 without loss.
        #[allow(clippy::cast_possible_truncation)]
        let total_fee = Money::from_cents(total_fee as u64);
        #[allow(clippy::cast_possible_truncation)]
        let owner_fee = Money::from_cents(owner_fee as u64);

        Ok(SettlementResult {
            total_fee,
            owner_fee,
            platform_fee: total_fee.saturating_sub(owner_fee),
            refund_to_bidder: amount.saturating_sub(total_fee),
        })
    }
}

impl Default for FeePolicy {
    /// 10% total fee, split 70% owner / 30% platform.
    fn default() -> Self {
        Self {
            fee_numerator: 10,
            fee_denominator: 100,
            owner_numerator: 70,
            owner_denominator: 100,
        }
    }
}
