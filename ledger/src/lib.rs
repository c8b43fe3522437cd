//! # AdSlot Ledger
//!
//! The stateful half of the ad-slot auction system: the slot registry,
//! the per-slot escrowed bid ledger with its atomic replace-and-settle
//! protocol, the append-only event log, and the coordinator façade that
//! external callers (the presentation layer) talk to.
//!
//! ## Architecture
//!
//! ```text
//! caller ──▶ AuctionCoordinator ──▶ SlotRegistry ──▶ EventLog
//!                     │                                 ▲
//!                     └──────────▶ BidLedger ───────────┘
//!                                      │
//!                                      ├─ FeePolicy (pure split)
//!                                      ├─ FundTransfer (external)
//!                                      └─ ContentVerifier (external)
//! ```
//!
//! ## Concurrency
//!
//! Bids on the same slot are serialized by that slot's own critical
//! section; bids on distinct slots proceed fully in parallel. The event
//! log assigns sequence numbers under a single internal lock held only
//! for the append itself, so log ordering never becomes a cross-slot
//! bottleneck. A `place_bid` either completes the whole
//! validate → settle → install → log sequence or fails with no effect.

pub mod bid_ledger;
pub mod config;
pub mod coordinator;
pub mod event_log;
pub mod registry;

pub use bid_ledger::{BidLedger, LedgerEnvironment};
pub use config::AuctionConfig;
pub use coordinator::AuctionCoordinator;
pub use event_log::EventLog;
pub use registry::SlotRegistry;
