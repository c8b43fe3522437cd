//! Bids, creative identifiers, and bid receipts.
//!
//! A bid binds a bidder, an escrowed amount, and a creative identifier to
//! a slot. The creative identifier is an opaque reference into an external
//! content-addressed store; the ledger never fetches or validates the
//! referenced bytes, it only requires the reference to be non-empty and to
//! pass the external content verifier.

use crate::account::AccountId;
use crate::fact::SequenceNumber;
use crate::money::Money;
use crate::slot::SlotId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for `CreativeId` parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid creative ID: {0}")]
pub struct ParseCreativeIdError(String);

/// Opaque reference to externally stored advertisement content.
///
/// Typically a content-addressed identifier (an IPFS-style CID). The core
/// treats it as an uninterpreted string.
///
/// # Validation
///
/// - `FromStr::from_str()`: Validates input (rejects empty strings)
/// - `From::from()` and `new()`: No validation (for internal use with trusted input)
///
/// Use `FromStr` when parsing external/user input. Use `new()` or `From`
/// when constructing creative IDs from application-controlled data.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CreativeId(String);

impl CreativeId {
    /// Create a new `CreativeId` from a string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the creative ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is empty (invalid as a bid reference).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert the `CreativeId` into its inner `String`.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CreativeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CreativeId {
    type Err = ParseCreativeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseCreativeIdError(
                "Creative ID cannot be empty".to_string(),
            ));
        }
        Ok(Self(s.to_string()))
    }
}

impl From<String> for CreativeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CreativeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for CreativeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The current escrowed bid holding a slot.
///
/// A slot has at most one of these at any instant. A superseded bid is not
/// retained in the ledger; it is echoed into the event log as part of the
/// `BidPlaced` fact that displaced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    /// Identity of the bidder holding the slot
    pub bidder: AccountId,
    /// Escrowed amount
    pub amount: Money,
    /// Reference to the advertisement creative
    pub creative_id: CreativeId,
    /// When the bid was accepted
    pub placed_at: DateTime<Utc>,
}

/// A refund issued to a displaced bidder as part of a replacement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refund {
    /// The bidder that was displaced
    pub bidder: AccountId,
    /// The amount returned after fees
    pub amount: Money,
}

/// Receipt returned for an accepted bid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidReceipt {
    /// The slot the bid holds
    pub slot_id: SlotId,
    /// The accepted bid, now the slot's sole current holder
    pub bid: Bid,
    /// Event-log sequence of the `BidPlaced` fact
    pub sequence: SequenceNumber,
    /// Refund issued to the previous holder, if this bid displaced one
    pub refund: Option<Refund>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::expect_used)] // Panics: Test will fail if parse fails
    fn parse_from_str() {
        let id: CreativeId = "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG"
            .parse()
            .expect("parse should succeed");
        assert_eq!(id.as_str(), "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG");
    }

    #[test]
    fn parse_empty_string_fails() {
        let result = "".parse::<CreativeId>();
        assert!(result.is_err());
    }

    #[test]
    fn new_does_not_validate() {
        // Unchecked constructor for trusted input; emptiness is caught by
        // the ledger's validation path.
        let id = CreativeId::new("");
        assert!(id.is_empty());
    }

    #[test]
    fn display_and_into_inner() {
        let id = CreativeId::new("cidA");
        assert_eq!(format!("{id}"), "cidA");
        assert_eq!(id.into_inner(), "cidA");
    }
}
