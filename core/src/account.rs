//! Party identity for the auction ledger.
//!
//! An [`AccountId`] names any party the ledger moves value between: slot
//! creators, bidders, and the platform treasury. The ledger never inspects
//! an identity beyond equality; wallets and sessions belong to the
//! surrounding system.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identity of a party (slot owner, bidder, or treasury).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Creates a new random `AccountId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an `AccountId` from a UUID
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_id_display() {
        let id = AccountId::new();
        let display = format!("{id}");
        assert!(!display.is_empty());
    }

    #[test]
    fn account_id_round_trips_through_uuid() {
        let id = AccountId::new();
        let copy = AccountId::from_uuid(*id.as_uuid());
        assert_eq!(id, copy);
    }

    #[test]
    fn fresh_ids_are_distinct() {
        assert_ne!(AccountId::new(), AccountId::new());
    }
}
