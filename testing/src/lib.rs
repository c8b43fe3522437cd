//! # AdSlot Testing
//!
//! Deterministic mock implementations of the environment traits for unit
//! and integration tests across the workspace:
//!
//! - [`FixedClock`]: always returns the same instant
//! - [`RecordingBank`]: a [`FundTransfer`](adslot_core::environment::FundTransfer)
//!   that records every payout and can be told to fail
//! - [`StaticVerifier`]: a [`ContentVerifier`](adslot_core::environment::ContentVerifier)
//!   that approves everything except an explicit deny list
//!
//! ## Example
//!
//! ```ignore
//! use adslot_testing::{test_clock, RecordingBank, StaticVerifier};
//!
//! let bank = RecordingBank::shared();
//! let verifier = StaticVerifier::approve_all();
//! // wire into a BidLedger / AuctionCoordinator, drive scenarios, then:
//! let payouts = bank.payouts().await;
//! ```

pub mod mocks;

pub use mocks::{test_clock, FixedClock, RecordingBank, StaticVerifier};
