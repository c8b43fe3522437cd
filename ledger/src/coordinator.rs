//! Auction coordinator - the public face of the core.
//!
//! A thin façade combining the slot registry, the bid ledger, and the
//! event log behind the operations external callers invoke. Holds no
//! state of its own beyond `Arc` references to the components it wires
//! together at construction.

use crate::bid_ledger::{BidLedger, LedgerEnvironment};
use crate::config::AuctionConfig;
use crate::event_log::EventLog;
use crate::registry::SlotRegistry;
use adslot_core::account::AccountId;
use adslot_core::bid::{Bid, BidReceipt, CreativeId};
use adslot_core::error::AuctionError;
use adslot_core::fact::{SequenceNumber, SequencedFact};
use adslot_core::money::Money;
use adslot_core::slot::{Slot, SlotId};
use futures::Stream;
use std::sync::Arc;

/// Façade over the registry, ledger, and log.
#[derive(Debug)]
pub struct AuctionCoordinator {
    registry: Arc<SlotRegistry>,
    ledger: Arc<BidLedger>,
    log: Arc<EventLog>,
}

impl AuctionCoordinator {
    /// Wires up a coordinator from configuration and an environment.
    #[must_use]
    pub fn new(config: AuctionConfig, env: LedgerEnvironment) -> Self {
        let log = Arc::new(EventLog::new(Arc::clone(&env.clock)));
        let registry = Arc::new(SlotRegistry::new(Arc::clone(&log), Arc::clone(&env.clock)));
        let ledger = Arc::new(BidLedger::new(
            Arc::clone(&registry),
            Arc::clone(&log),
            config.fees,
            config.treasury,
            env,
        ));
        Self {
            registry,
            ledger,
            log,
        }
    }

    /// Registers a new advertising slot and returns its identifier.
    ///
    /// # Errors
    ///
    /// - `InvalidDimensions` if `width` or `height` is zero
    /// - `InvalidName` if `name` or `domain_name` is blank
    pub async fn create_slot(
        &self,
        name: &str,
        domain_name: &str,
        width: u32,
        height: u32,
        creator: AccountId,
    ) -> Result<SlotId, AuctionError> {
        let slot = self
            .registry
            .create_slot(name, domain_name, width, height, creator)
            .await?;
        Ok(slot.id)
    }

    /// Places a bid on a slot.
    ///
    /// The creative identifier arrives as the caller's raw string and is
    /// parsed here, so an empty identifier is rejected before it reaches
    /// the ledger.
    ///
    /// # Errors
    ///
    /// See [`BidLedger::place_bid`]; additionally `InvalidCreative` if
    /// the identifier fails to parse.
    pub async fn place_bid(
        &self,
        slot_id: SlotId,
        bidder: AccountId,
        amount: Money,
        creative: &str,
    ) -> Result<BidReceipt, AuctionError> {
        let creative_id: CreativeId = creative
            .parse()
            .map_err(|err: adslot_core::bid::ParseCreativeIdError| {
                AuctionError::InvalidCreative(err.to_string())
            })?;
        self.ledger
            .place_bid(slot_id, bidder, amount, creative_id)
            .await
    }

    /// The slot's current holder, or `None` if it has never been bid on.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the slot does not exist.
    pub async fn current_bid(&self, slot_id: SlotId) -> Result<Option<Bid>, AuctionError> {
        self.ledger.get_current_bid(slot_id).await
    }

    /// Looks up a slot by identifier.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the slot does not exist.
    pub async fn get_slot(&self, slot_id: SlotId) -> Result<Slot, AuctionError> {
        self.registry.get(slot_id).await
    }

    /// Snapshot of all slots in creation order.
    pub async fn list_slots(&self) -> Vec<Slot> {
        self.registry.list_all().await
    }

    /// Snapshot of one creator's slots in creation order.
    pub async fn list_slots_by_creator(&self, creator: AccountId) -> Vec<Slot> {
        self.registry.list_by_creator(creator).await
    }

    /// Replay stream of facts with sequence ≥ `from`, for external
    /// consumers (indexers, dashboards).
    pub fn facts_from(
        &self,
        from: SequenceNumber,
    ) -> impl Stream<Item = SequencedFact> + Send + '_ {
        self.log.read_from(from)
    }

    /// The sequence number the next recorded fact will receive.
    pub async fn next_sequence(&self) -> SequenceNumber {
        self.log.next_sequence().await
    }
}
