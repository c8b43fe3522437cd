//! Per-slot escrowed bid ledger.
//!
//! Holds, for each slot, the single currently escrowed bid and runs the
//! atomic replace-and-settle protocol: a strictly higher bid evicts the
//! current holder, pays the fee split out of the superseded amount
//! (refund to the displaced bidder, owner fee to the slot creator,
//! platform fee to the treasury), installs itself as sole holder, and
//! records the `BidPlaced` fact.
//!
//! # Atomicity
//!
//! Each slot's read → validate → settle → install → log sequence runs
//! inside that slot's own critical section, so concurrent bids on one
//! slot are linearized while bids on distinct slots never contend. All
//! validation happens before any fund movement and all fund movement
//! happens before any state mutation: a transfer failure aborts the whole
//! operation with the prior bid still the unchanged holder.

use crate::event_log::EventLog;
use crate::registry::SlotRegistry;
use adslot_core::account::AccountId;
use adslot_core::bid::{Bid, BidReceipt, CreativeId, Refund};
use adslot_core::environment::{Clock, ContentVerifier, FundTransfer};
use adslot_core::error::AuctionError;
use adslot_core::fact::{DisplacedBid, Fact};
use adslot_core::money::Money;
use adslot_core::settlement::FeePolicy;
use adslot_core::slot::SlotId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Environment dependencies for the bid ledger
#[derive(Clone)]
pub struct LedgerEnvironment {
    /// Clock for acceptance timestamps
    pub clock: Arc<dyn Clock>,
    /// Fund transfer capability with all-or-nothing semantics
    pub funds: Arc<dyn FundTransfer>,
    /// External content verification
    pub verifier: Arc<dyn ContentVerifier>,
}

impl LedgerEnvironment {
    /// Creates a new `LedgerEnvironment`
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        funds: Arc<dyn FundTransfer>,
        verifier: Arc<dyn ContentVerifier>,
    ) -> Self {
        Self {
            clock,
            funds,
            verifier,
        }
    }
}

/// One slot's bid cell. The mutex is the slot's critical section.
type SlotCell = Arc<Mutex<Option<Bid>>>;

/// The per-slot bid ledger.
///
/// The arena maps each slot to its own cell; the outer lock is touched
/// only to look up or insert a cell, never held across a settlement.
pub struct BidLedger {
    registry: Arc<SlotRegistry>,
    log: Arc<EventLog>,
    policy: FeePolicy,
    treasury: AccountId,
    env: LedgerEnvironment,
    cells: RwLock<HashMap<SlotId, SlotCell>>,
}

impl BidLedger {
    /// Creates a ledger over the given registry and log.
    #[must_use]
    pub fn new(
        registry: Arc<SlotRegistry>,
        log: Arc<EventLog>,
        policy: FeePolicy,
        treasury: AccountId,
        env: LedgerEnvironment,
    ) -> Self {
        Self {
            registry,
            log,
            policy,
            treasury,
            env,
            cells: RwLock::new(HashMap::new()),
        }
    }

    /// Looks up the slot's cell, creating it on first use.
    async fn cell(&self, slot_id: SlotId) -> SlotCell {
        {
            let cells = self.cells.read().await;
            if let Some(cell) = cells.get(&slot_id) {
                return Arc::clone(cell);
            }
        }
        let mut cells = self.cells.write().await;
        Arc::clone(cells.entry(slot_id).or_default())
    }

    /// Skips zero-valued components; invoking the transfer capability for
    /// nothing would only add failure surface.
    async fn pay(&self, to: AccountId, amount: Money) -> Result<(), AuctionError> {
        if amount.is_zero() {
            return Ok(());
        }
        self.env
            .funds
            .transfer(to, amount)
            .await
            .map_err(AuctionError::from)
    }

    /// Places a bid on a slot.
    ///
    /// Validates, settles the displaced holder if any, installs the new
    /// bid as the slot's sole current holder, and appends the `BidPlaced`
    /// fact - all inside the slot's critical section. Once settlement
    /// transfers begin the operation runs to completion or aborts
    /// entirely; it is never left half-applied.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the slot does not exist
    /// - `BidTooLow` if a current bid exists and `amount` does not exceed it
    /// - `ZeroBid` if the slot is unheld and `amount` is zero
    /// - `InvalidCreative` if the creative identifier is empty or fails
    ///   external verification
    /// - `SettlementFailed` if a fund transfer fails; the prior bid
    ///   remains the unchanged holder
    pub async fn place_bid(
        &self,
        slot_id: SlotId,
        bidder: AccountId,
        amount: Money,
        creative_id: CreativeId,
    ) -> Result<BidReceipt, AuctionError> {
        let slot = self.registry.get(slot_id).await?;
        let cell = self.cell(slot_id).await;
        let mut current = cell.lock().await;

        // Validation - all of it before any fund movement.
        match current.as_ref() {
            Some(held) if amount <= held.amount => {
                tracing::debug!(
                    slot_id = %slot_id,
                    offered = amount.cents(),
                    current = held.amount.cents(),
                    "Bid rejected: does not exceed current holder"
                );
                return Err(AuctionError::BidTooLow {
                    offered: amount,
                    current: held.amount,
                });
            }
            None if amount.is_zero() => return Err(AuctionError::ZeroBid),
            _ => {}
        }
        if creative_id.is_empty() {
            return Err(AuctionError::InvalidCreative(
                "creative ID cannot be empty".to_string(),
            ));
        }
        if !self.env.verifier.verify(&creative_id).await {
            tracing::debug!(
                slot_id = %slot_id,
                creative_id = %creative_id,
                "Bid rejected: creative failed verification"
            );
            return Err(AuctionError::InvalidCreative(format!(
                "creative {creative_id} failed verification"
            )));
        }

        // Settle the displaced holder. Fund movement is the last
        // side-effecting step before state mutation, so a failure here
        // leaves the ledger and the log untouched.
        let displaced = match current.as_ref() {
            Some(held) => {
                let split = self.policy.split(held.amount)?;
                if let Err(err) = async {
                    self.pay(held.bidder, split.refund_to_bidder).await?;
                    self.pay(slot.creator, split.owner_fee).await?;
                    self.pay(self.treasury, split.platform_fee).await
                }
                .await
                {
                    tracing::warn!(
                        slot_id = %slot_id,
                        displaced_bidder = %held.bidder,
                        error = %err,
                        "Settlement aborted; holder unchanged"
                    );
                    return Err(err);
                }
                Some((held.clone(), split))
            }
            None => None,
        };

        let bid = Bid {
            bidder,
            amount,
            creative_id,
            placed_at: self.env.clock.now(),
        };
        *current = Some(bid.clone());

        let sequence = self
            .log
            .append(Fact::BidPlaced {
                slot_id,
                bidder,
                amount,
                creative_id: bid.creative_id.clone(),
                placed_at: bid.placed_at,
                displaced: displaced.as_ref().map(|(held, split)| DisplacedBid {
                    previous_bidder: held.bidder,
                    previous_amount: held.amount,
                    refunded: split.refund_to_bidder,
                }),
            })
            .await;

        tracing::info!(
            slot_id = %slot_id,
            bidder = %bidder,
            amount = amount.cents(),
            sequence = sequence.value(),
            displaced = displaced.is_some(),
            "Bid accepted"
        );

        Ok(BidReceipt {
            slot_id,
            bid,
            sequence,
            refund: displaced.map(|(held, split)| Refund {
                bidder: held.bidder,
                amount: split.refund_to_bidder,
            }),
        })
    }

    /// The slot's current holder, or `None` if it has never been bid on.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` only if the slot itself does not exist.
    pub async fn get_current_bid(&self, slot_id: SlotId) -> Result<Option<Bid>, AuctionError> {
        self.registry.get(slot_id).await?;
        let cell = {
            let cells = self.cells.read().await;
            cells.get(&slot_id).map(Arc::clone)
        };
        match cell {
            Some(cell) => Ok(cell.lock().await.clone()),
            None => Ok(None),
        }
    }
}

impl std::fmt::Debug for BidLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BidLedger")
            .field("policy", &self.policy)
            .field("treasury", &self.treasury)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use adslot_core::slot::Slot;
    use adslot_testing::{test_clock, RecordingBank, StaticVerifier};

    struct Fixture {
        registry: Arc<SlotRegistry>,
        ledger: BidLedger,
        bank: Arc<RecordingBank>,
        treasury: AccountId,
    }

    fn fixture_with_verifier(verifier: Arc<StaticVerifier>) -> Fixture {
        let clock = Arc::new(test_clock());
        let log = Arc::new(EventLog::new(clock.clone()));
        let registry = Arc::new(SlotRegistry::new(Arc::clone(&log), clock.clone()));
        let bank = RecordingBank::shared();
        let treasury = AccountId::new();
        let env = LedgerEnvironment::new(clock, bank.clone(), verifier);
        let ledger = BidLedger::new(
            Arc::clone(&registry),
            log,
            FeePolicy::default(),
            treasury,
            env,
        );
        Fixture {
            registry,
            ledger,
            bank,
            treasury,
        }
    }

    fn fixture() -> Fixture {
        fixture_with_verifier(StaticVerifier::approve_all())
    }

    async fn header_slot(fixture: &Fixture) -> Slot {
        fixture
            .registry
            .create_slot("Header", "example.com", 728, 90, AccountId::new())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn first_bid_is_accepted_without_payouts() {
        let fx = fixture();
        let slot = header_slot(&fx).await;
        let alice = AccountId::new();

        let receipt = fx
            .ledger
            .place_bid(slot.id, alice, Money::from_cents(100), "cidA".into())
            .await
            .unwrap();

        assert_eq!(receipt.bid.bidder, alice);
        assert_eq!(receipt.bid.amount, Money::from_cents(100));
        assert!(receipt.refund.is_none());
        assert!(fx.bank.payouts().await.is_empty());

        let held = fx.ledger.get_current_bid(slot.id).await.unwrap().unwrap();
        assert_eq!(held.creative_id.as_str(), "cidA");
    }

    #[tokio::test]
    async fn unknown_slot_is_not_found() {
        let fx = fixture();
        let missing = SlotId::new();

        assert!(matches!(
            fx.ledger
                .place_bid(missing, AccountId::new(), Money::from_cents(100), "cid".into())
                .await,
            Err(AuctionError::NotFound(_))
        ));
        assert!(matches!(
            fx.ledger.get_current_bid(missing).await,
            Err(AuctionError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn zero_first_bid_is_rejected() {
        let fx = fixture();
        let slot = header_slot(&fx).await;

        assert!(matches!(
            fx.ledger
                .place_bid(slot.id, AccountId::new(), Money::ZERO, "cid".into())
                .await,
            Err(AuctionError::ZeroBid)
        ));
        assert_eq!(fx.ledger.get_current_bid(slot.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn replacement_pays_refund_and_fees_exactly() {
        let fx = fixture();
        let slot = header_slot(&fx).await;
        let alice = AccountId::new();
        let bob = AccountId::new();

        fx.ledger
            .place_bid(slot.id, alice, Money::from_cents(100), "cidA".into())
            .await
            .unwrap();
        let receipt = fx
            .ledger
            .place_bid(slot.id, bob, Money::from_cents(150), "cidB".into())
            .await
            .unwrap();

        // 10% of the superseded 100, split 70/30; 90 refunded.
        assert_eq!(
            fx.bank.payouts().await,
            vec![
                (alice, Money::from_cents(90)),
                (slot.creator, Money::from_cents(7)),
                (fx.treasury, Money::from_cents(3)),
            ]
        );
        assert_eq!(
            receipt.refund,
            Some(Refund {
                bidder: alice,
                amount: Money::from_cents(90),
            })
        );

        let held = fx.ledger.get_current_bid(slot.id).await.unwrap().unwrap();
        assert_eq!(held.bidder, bob);
        assert_eq!(held.amount, Money::from_cents(150));
    }

    #[tokio::test]
    async fn equal_bid_is_rejected_and_state_unchanged() {
        let fx = fixture();
        let slot = header_slot(&fx).await;
        let bob = AccountId::new();

        fx.ledger
            .place_bid(slot.id, bob, Money::from_cents(150), "cidB".into())
            .await
            .unwrap();
        let payouts_before = fx.bank.payouts().await;

        let result = fx
            .ledger
            .place_bid(slot.id, AccountId::new(), Money::from_cents(150), "cidC".into())
            .await;
        assert!(matches!(
            result,
            Err(AuctionError::BidTooLow { offered, current })
                if offered == Money::from_cents(150) && current == Money::from_cents(150)
        ));

        let held = fx.ledger.get_current_bid(slot.id).await.unwrap().unwrap();
        assert_eq!(held.bidder, bob);
        assert_eq!(fx.bank.payouts().await, payouts_before);
    }

    #[tokio::test]
    async fn empty_creative_is_rejected() {
        let fx = fixture();
        let slot = header_slot(&fx).await;

        let result = fx
            .ledger
            .place_bid(
                slot.id,
                AccountId::new(),
                Money::from_cents(100),
                CreativeId::new(""),
            )
            .await;
        assert!(matches!(result, Err(AuctionError::InvalidCreative(_))));
    }

    #[tokio::test]
    async fn verifier_rejection_blocks_the_bid() {
        let fx = fixture_with_verifier(StaticVerifier::denying([CreativeId::new("banned")]));
        let slot = header_slot(&fx).await;

        let result = fx
            .ledger
            .place_bid(slot.id, AccountId::new(), Money::from_cents(100), "banned".into())
            .await;
        assert!(matches!(result, Err(AuctionError::InvalidCreative(_))));
        assert_eq!(fx.ledger.get_current_bid(slot.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn refund_failure_aborts_and_keeps_holder() {
        let fx = fixture();
        let slot = header_slot(&fx).await;
        let bob = AccountId::new();

        fx.ledger
            .place_bid(slot.id, bob, Money::from_cents(150), "cidB".into())
            .await
            .unwrap();

        // The displaced bidder cannot accept the refund.
        fx.bank.fail_for(bob).await;

        let result = fx
            .ledger
            .place_bid(slot.id, AccountId::new(), Money::from_cents(200), "cidD".into())
            .await;
        assert!(matches!(result, Err(AuctionError::SettlementFailed(_))));

        let held = fx.ledger.get_current_bid(slot.id).await.unwrap().unwrap();
        assert_eq!(held.bidder, bob);
        assert_eq!(held.amount, Money::from_cents(150));
        assert!(fx.bank.payouts().await.is_empty());

        // Once the capability recovers the same bid succeeds.
        fx.bank.recover().await;
        fx.ledger
            .place_bid(slot.id, AccountId::new(), Money::from_cents(200), "cidD".into())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn tiny_replacement_skips_zero_fee_transfers() {
        let fx = fixture();
        let slot = header_slot(&fx).await;
        let alice = AccountId::new();

        // 5 cents: fee truncates to zero, so only the refund moves.
        fx.ledger
            .place_bid(slot.id, alice, Money::from_cents(5), "cidA".into())
            .await
            .unwrap();
        fx.ledger
            .place_bid(slot.id, AccountId::new(), Money::from_cents(6), "cidB".into())
            .await
            .unwrap();

        assert_eq!(fx.bank.payouts().await, vec![(alice, Money::from_cents(5))]);
    }
}
