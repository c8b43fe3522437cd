//! Advertising slots and their identifiers.
//!
//! A slot is a registered advertising placement: a display name, the
//! domain it appears on, and fixed pixel dimensions. Slots are created
//! once, identified by a [`SlotId`] that is never reused, and are
//! immutable thereafter; the only mutable thing associated with a slot is
//! its current bid, which lives in the bid ledger, not here.

use crate::account::AccountId;
use crate::fact::SequenceNumber;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique, address-like identifier of an advertising slot.
///
/// Assigned at creation and stable for the slot's lifetime. Identifiers
/// are never reassigned, even if the surrounding system forgets a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotId(Uuid);

impl SlotId {
    /// Creates a new random `SlotId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a `SlotId` from a UUID
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

impl Default for SlotId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered advertising slot.
///
/// `created_seq` is the event-log sequence number of the slot's
/// `SlotCreated` fact. It strictly increases across creations and serves
/// as the low-water mark an external consumer replays from when it only
/// cares about facts recorded after this slot existed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Slot identifier
    pub id: SlotId,
    /// Display name of the slot
    pub name: String,
    /// Domain the slot appears on (free text, not validated for DNS correctness)
    pub domain_name: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Identity of the party that registered the slot (receives owner fees)
    pub creator: AccountId,
    /// Event-log sequence of the `SlotCreated` fact
    pub created_seq: SequenceNumber,
    /// When the slot was created
    pub created_at: DateTime<Utc>,
}

impl Slot {
    /// Formats the slot dimensions as `WxH`.
    #[must_use]
    pub fn dimensions(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}
