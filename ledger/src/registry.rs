//! Slot registry.
//!
//! Owns the set of advertising slots: creates them, assigns identity and
//! creation order, and serves lookups and creation-order listings. Slots
//! are immutable once created and are never deleted; their bid state
//! lives in the [`BidLedger`](crate::bid_ledger::BidLedger).

use crate::event_log::EventLog;
use adslot_core::account::AccountId;
use adslot_core::environment::Clock;
use adslot_core::error::AuctionError;
use adslot_core::fact::Fact;
use adslot_core::slot::{Slot, SlotId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct RegistryInner {
    slots: HashMap<SlotId, Slot>,
    /// Slot ids in creation order, backing the listing snapshots.
    order: Vec<SlotId>,
}

/// Registry of advertising slots.
///
/// Creation is serialized under the registry's write lock so creation
/// sequence numbers strictly increase; lookups and listings take the read
/// lock and see only fully constructed slots.
pub struct SlotRegistry {
    inner: RwLock<RegistryInner>,
    log: Arc<EventLog>,
    clock: Arc<dyn Clock>,
}

impl SlotRegistry {
    /// Creates an empty registry appending `SlotCreated` facts to `log`.
    #[must_use]
    pub fn new(log: Arc<EventLog>, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: RwLock::new(RegistryInner::default()),
            log,
            clock,
        }
    }

    /// Registers a new slot and returns it.
    ///
    /// Allocates a fresh, never-reused identifier, appends the
    /// `SlotCreated` fact, and records the fact's sequence number as the
    /// slot's replay low-water mark. No other slot's state changes.
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
    ) -> Result<Slot, AuctionError> {
        if width == 0 || height == 0 {
            return Err(AuctionError::InvalidDimensions { width, height });
        }
        if name.trim().is_empty() {
            return Err(AuctionError::InvalidName("name"));
        }
        if domain_name.trim().is_empty() {
            return Err(AuctionError::InvalidName("domain name"));
        }

        let mut inner = self.inner.write().await;

        let id = SlotId::new();
        let created_at = self.clock.now();
        let created_seq = self
            .log
            .append(Fact::SlotCreated {
                slot_id: id,
                name: name.to_string(),
                domain_name: domain_name.to_string(),
                width,
                height,
                creator,
                created_at,
            })
            .await;

        let slot = Slot {
            id,
            name: name.to_string(),
            domain_name: domain_name.to_string(),
            width,
            height,
            creator,
            created_seq,
            created_at,
        };

        inner.slots.insert(id, slot.clone());
        inner.order.push(id);

        tracing::info!(
            slot_id = %id,
            name,
            domain_name,
            width,
            height,
            creator = %creator,
            sequence = created_seq.value(),
            "Slot created"
        );

        Ok(slot)
    }

    /// Looks up a slot by identifier.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the slot does not exist.
    pub async fn get(&self, slot_id: SlotId) -> Result<Slot, AuctionError> {
        self.inner
            .read()
            .await
            .slots
            .get(&slot_id)
            .cloned()
            .ok_or(AuctionError::NotFound(slot_id))
    }

    /// Snapshot of all slots in creation order.
    ///
    /// A call in progress need not observe slots created after it
    /// started, but never omits a slot that existed before it started.
    pub async fn list_all(&self) -> Vec<Slot> {
        let inner = self.inner.read().await;
        inner
            .order
            .iter()
            .filter_map(|id| inner.slots.get(id).cloned())
            .collect()
    }

    /// Snapshot of one creator's slots in creation order.
    pub async fn list_by_creator(&self, creator: AccountId) -> Vec<Slot> {
        let inner = self.inner.read().await;
        inner
            .order
            .iter()
            .filter_map(|id| inner.slots.get(id))
            .filter(|slot| slot.creator == creator)
            .cloned()
            .collect()
    }

    /// Number of registered slots.
    pub async fn len(&self) -> usize {
        self.inner.read().await.order.len()
    }

    /// Whether the registry is empty.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.order.is_empty()
    }
}

impl std::fmt::Debug for SlotRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotRegistry").finish_non_exhaustive()
    }
}
