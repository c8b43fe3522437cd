//! # AdSlot Core
//!
//! Domain types and contracts for the ad-slot auction ledger.
//!
//! This crate defines the pure half of the system: identities, money,
//! slots, bids, the fee-splitting settlement policy, the immutable facts
//! recorded in the event log, the caller-facing error taxonomy, and the
//! traits abstracting external collaborators (clock, fund transfer,
//! content verification).
//!
//! Nothing here performs I/O or holds a lock. The stateful components
//! (registry, bid ledger, event log, coordinator) live in `adslot-ledger`
//! and are built entirely out of these types.
//!
//! ## Core Concepts
//!
//! - **Slot**: a registered advertising placement with fixed dimensions
//!   and a domain association. Immutable after creation, never deleted.
//! - **Bid / holder**: the single highest accepted, not-yet-superseded bid
//!   for a slot. A higher bid evicts and refunds the previous holder.
//! - **Settlement**: the exact-integer fee split applied to a superseded
//!   bid: a fixed fraction is levied as fees (split between the slot owner
//!   and the platform) and the remainder refunded to the displaced bidder.
//! - **Fact**: an immutable, globally ordered record appended to the event
//!   log describing a state change, consumed by external indexers.

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};

pub mod account;
pub mod bid;
pub mod environment;
pub mod error;
pub mod fact;
pub mod money;
pub mod settlement;
pub mod slot;

pub use account::AccountId;
pub use bid::{Bid, BidReceipt, CreativeId, Refund};
pub use error::AuctionError;
pub use fact::{Fact, SequenceNumber, SequencedFact};
pub use money::Money;
pub use settlement::{FeePolicy, SettlementResult};
pub use slot::{Slot, SlotId};
