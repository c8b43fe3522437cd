//! Caller-facing error taxonomy.

use crate::environment::TransferError;
use crate::money::Money;
use crate::settlement::SettlementError;
use crate::slot::SlotId;
use thiserror::Error;

/// Errors returned by the auction coordinator and its components.
///
/// Every rejected operation returns one of these and leaves all ledger
/// state unchanged. Validation failures (`InvalidDimensions`,
/// `InvalidName`, `BidTooLow`, `ZeroBid`, `InvalidCreative`) are caller
/// errors detected before any fund movement; `SettlementFailed` means the
/// transfer capability refused mid-replacement and the operation was
/// fully aborted, so it is safe to retry once the capability recovers.
#[derive(Error, Debug)]
pub enum AuctionError {
    /// The referenced slot does not exist.
    #[error("Slot not found: {0}")]
    NotFound(SlotId),

    /// Slot creation was given non-positive dimensions.
    #[error("Invalid slot dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Requested width in pixels
        width: u32,
        /// Requested height in pixels
        height: u32,
    },

    /// Slot creation was given an empty name or domain name.
    #[error("Invalid slot name: {0} cannot be empty")]
    InvalidName(&'static str),

    /// The offered amount does not exceed the current holder's.
    ///
    /// The current amount is included so a caller can correct and retry
    /// without a separate read.
    #[error("Bid too low: offered {offered}, current holder has {current}")]
    BidTooLow {
        /// The rejected amount
        offered: Money,
        /// The amount the current holder has escrowed
        current: Money,
    },

    /// A first bid on an unheld slot must be greater than zero.
    #[error("Bid amount must be greater than zero")]
    ZeroBid,

    /// The creative identifier was empty or failed external verification.
    #[error("Invalid creative: {0}")]
    InvalidCreative(String),

    /// A fund transfer failed during replacement; the operation was fully
    /// rolled back and the prior bid remains the holder.
    #[error("Settlement failed: {0}")]
    SettlementFailed(#[from] TransferError),

    /// An internal invariant was violated. Never silently swallowed.
    #[error("Internal failure: {0}")]
    Internal(String),
}

impl From<SettlementError> for AuctionError {
    fn from(err: SettlementError) -> Self {
        // Settlement only runs on amounts the ledger already validated as
        // non-zero, so any settlement error is an internal bug.
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bid_too_low_names_both_amounts() {
        let error = AuctionError::BidTooLow {
            offered: Money::from_cents(150),
            current: Money::from_cents(150),
        };
        let display = format!("{error}");
        assert!(display.contains("$1.50"));
    }

    #[test]
    fn settlement_failure_wraps_transfer_error() {
        let error: AuctionError =
            TransferError::Rejected("vault offline".to_string()).into();
        assert!(matches!(error, AuctionError::SettlementFailed(_)));
    }

    #[test]
    fn settlement_error_maps_to_internal() {
        let error: AuctionError = SettlementError::InvalidAmount.into();
        assert!(matches!(error, AuctionError::Internal(_)));
    }
}
