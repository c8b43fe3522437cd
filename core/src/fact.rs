//! Immutable facts recorded in the event log.
//!
//! A fact describes a state change that has already happened: a slot was
//! created, or a bid was placed (possibly displacing a previous holder).
//! Facts are append-only and globally ordered by a [`SequenceNumber`]
//! assigned at append time; external indexers and dashboards consume them
//! through the event log's `read_from` interface.
//!
//! Facts carry a versioned type tag (`"SlotCreated.v1"`) and serialize to
//! a compact `bincode` encoding so consumers outside this process can
//! persist and decode them without sharing in-memory types.

use crate::account::AccountId;
use crate::bid::CreativeId;
use crate::money::Money;
use crate::slot::SlotId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error types for fact encoding.
#[derive(Error, Debug)]
pub enum FactError {
    /// Failed to serialize a fact to bytes.
    #[error("Failed to serialize fact: {0}")]
    SerializationError(String),

    /// Failed to deserialize a fact from bytes.
    #[error("Failed to deserialize fact: {0}")]
    DeserializationError(String),
}

/// Global, append-time position of a fact in the event log.
///
/// Sequence numbers start at 0, increase by 1 per appended fact, and are
/// never reused. They provide the total order consumers replay in and the
/// low-water mark (`read_from`) semantics.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SequenceNumber(u64);

impl SequenceNumber {
    /// The first sequence number assigned to an empty log.
    pub const INITIAL: Self = Self(0);

    /// Create a new `SequenceNumber` with the given value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the sequence value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Get the next sequence number (current + 1).
    ///
    /// # Overflow Behavior
    ///
    /// Plain addition. Reaching `u64::MAX` appended facts is not a
    /// realistic concern for any event log.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for SequenceNumber {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<SequenceNumber> for u64 {
    fn from(seq: SequenceNumber) -> Self {
        seq.0
    }
}

/// The bid a newly accepted bid displaced, as echoed into the log.
///
/// The ledger does not retain superseded bids; this record inside the
/// `BidPlaced` fact is the only durable trace of the eviction and refund.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplacedBid {
    /// The bidder that was displaced
    pub previous_bidder: AccountId,
    /// The amount the displaced bidder held in escrow
    pub previous_amount: Money,
    /// The amount refunded to the displaced bidder after fees
    pub refunded: Money,
}

/// An immutable record of a state change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fact {
    /// A slot was registered.
    SlotCreated {
        /// Identifier assigned to the new slot
        slot_id: SlotId,
        /// Display name
        name: String,
        /// Domain the slot appears on
        domain_name: String,
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
        /// Identity of the registering party
        creator: AccountId,
        /// When the slot was created
        created_at: DateTime<Utc>,
    },

    /// A bid was accepted as a slot's current holder.
    BidPlaced {
        /// The slot the bid holds
        slot_id: SlotId,
        /// Identity of the accepted bidder
        bidder: AccountId,
        /// Escrowed amount
        amount: Money,
        /// Reference to the advertisement creative
        creative_id: CreativeId,
        /// When the bid was accepted
        placed_at: DateTime<Utc>,
        /// The previous holder and its refund, when this bid displaced one
        displaced: Option<DisplacedBid>,
    },
}

impl Fact {
    /// Returns the versioned type tag for this fact.
    ///
    /// The tag is stable across releases and is what external consumers
    /// key their decoders on.
    #[must_use]
    pub const fn fact_type(&self) -> &'static str {
        match self {
            Self::SlotCreated { .. } => "SlotCreated.v1",
            Self::BidPlaced { .. } => "BidPlaced.v1",
        }
    }

    /// The slot this fact concerns.
    #[must_use]
    pub const fn slot_id(&self) -> SlotId {
        match self {
            Self::SlotCreated { slot_id, .. } | Self::BidPlaced { slot_id, .. } => *slot_id,
        }
    }

    /// Serialize this fact to bincode bytes.
    ///
    /// # Errors
    ///
    /// Returns `FactError::SerializationError` if the fact cannot be
    /// serialized, which is rare with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, FactError> {
        bincode::serialize(self).map_err(|e| FactError::SerializationError(e.to_string()))
    }

    /// Deserialize a fact from bincode bytes.
    ///
    /// # Errors
    ///
    /// Returns `FactError::DeserializationError` if the bytes are
    /// corrupted or encode an incompatible schema.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FactError> {
        bincode::deserialize(bytes).map_err(|e| FactError::DeserializationError(e.to_string()))
    }
}

/// A fact together with its position in the log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencedFact {
    /// Append-time global sequence
    pub sequence: SequenceNumber,
    /// When the fact was appended
    pub recorded_at: DateTime<Utc>,
    /// The fact itself
    pub fact: Fact,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_bid_placed() -> Fact {
        Fact::BidPlaced {
            slot_id: SlotId::new(),
            bidder: AccountId::new(),
            amount: Money::from_cents(150),
            creative_id: CreativeId::new("cidB"),
            placed_at: Utc::now(),
            displaced: Some(DisplacedBid {
                previous_bidder: AccountId::new(),
                previous_amount: Money::from_cents(100),
                refunded: Money::from_cents(90),
            }),
        }
    }

    #[test]
    fn fact_type_tags() {
        let created = Fact::SlotCreated {
            slot_id: SlotId::new(),
            name: "Header".to_string(),
            domain_name: "example.com".to_string(),
            width: 728,
            height: 90,
            creator: AccountId::new(),
            created_at: Utc::now(),
        };
        assert_eq!(created.fact_type(), "SlotCreated.v1");
        assert_eq!(sample_bid_placed().fact_type(), "BidPlaced.v1");
    }

    #[test]
    fn bincode_round_trip() {
        let fact = sample_bid_placed();
        let bytes = fact.to_bytes().unwrap();
        assert!(!bytes.is_empty());
        let decoded = Fact::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, fact);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(Fact::from_bytes(&[0xFF, 0x00, 0x13]).is_err());
    }

    #[test]
    fn sequence_numbers_advance() {
        let s0 = SequenceNumber::INITIAL;
        let s1 = s0.next();
        assert_eq!(s1, SequenceNumber::new(1));
        assert!(s0 < s1);
        assert_eq!(u64::from(s1), 1);
    }
}
