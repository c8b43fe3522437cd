//! Environment traits - the ledger's external collaborators.
//!
//! All side-effecting dependencies are abstracted behind traits and
//! injected into the stateful components, so business logic stays
//! deterministic and testable. Production wires `SystemClock` plus real
//! transfer/verification capabilities; tests wire the mocks from
//! `adslot-testing`.
//!
//! # Dyn Compatibility
//!
//! The async traits use explicit `Pin<Box<dyn Future>>` returns instead of
//! `async fn` so they can be held as trait objects (`Arc<dyn FundTransfer>`)
//! inside the ledger's environment.

use crate::account::AccountId;
use crate::bid::CreativeId;
use crate::money::Money;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Clock trait - abstracts time operations for testability
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Errors surfaced by the fund-transfer capability.
///
/// The ledger does not interpret these beyond treating any of them as
/// fatal to the in-flight `place_bid`; retry policy belongs to callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// The recipient cannot accept funds.
    #[error("Recipient {0} cannot accept funds")]
    RecipientUnavailable(AccountId),

    /// The transfer was rejected by the underlying capability.
    #[error("Transfer rejected: {0}")]
    Rejected(String),
}

/// Result type for fund transfers.
pub type TransferResult = Result<(), TransferError>;

/// Fund transfer capability with all-or-nothing semantics per call.
///
/// Each `transfer` either moves the full amount or fails with no effect.
/// The bid ledger performs all of a settlement's transfers before
/// mutating any state, so a failure here aborts the whole replacement
/// and leaves the prior bid as the unchanged holder.
pub trait FundTransfer: Send + Sync {
    /// Transfer `amount` to `to`.
    ///
    /// # Errors
    ///
    /// Returns a `TransferError` if the funds could not be moved; the
    /// call must have had no partial effect.
    fn transfer(
        &self,
        to: AccountId,
        amount: Money,
    ) -> Pin<Box<dyn Future<Output = TransferResult> + Send + '_>>;
}

/// External content-verification capability.
///
/// Invoked before a bid is accepted; a `false` outcome rejects the bid.
/// The ledger treats the verifier as a black box and defines no retry
/// policy of its own.
pub trait ContentVerifier: Send + Sync {
    /// Whether the referenced creative passes verification.
    fn verify(
        &self,
        creative_id: &CreativeId,
    ) -> Pin<Box<dyn Future<Output = bool> + Send + '_>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_advances() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn transfer_error_display() {
        let id = AccountId::new();
        let error = TransferError::RecipientUnavailable(id);
        assert!(format!("{error}").contains(&id.to_string()));
    }
}
