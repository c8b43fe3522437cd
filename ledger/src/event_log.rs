//! Append-only event log.
//!
//! Every state change in the system is recorded here as an immutable
//! [`Fact`] with a globally ordered sequence number assigned at append
//! time. Facts are never rewritten or deleted; external indexers and
//! dashboards replay them through [`EventLog::read_from`].
//!
//! # Ordering
//!
//! Sequence assignment happens under the log's single write lock, held
//! only for the push itself. A reader started at sequence N observes the
//! facts with sequence ≥ N that existed when each page of the read was
//! served: pages are always a prefix-consistent snapshot, facts arrive in
//! strict sequence order, and no fact is ever delivered twice.

use adslot_core::environment::Clock;
use adslot_core::fact::{Fact, SequenceNumber, SequencedFact};
use futures::Stream;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Number of facts served per page by [`EventLog::read_from`].
const READ_PAGE_SIZE: usize = 256;

/// In-process append-only log of [`SequencedFact`]s.
///
/// Appending is infallible in process; a storage failure in a durable
/// implementation would be fatal to the process, not recoverable here.
pub struct EventLog {
    clock: Arc<dyn Clock>,
    facts: RwLock<Vec<SequencedFact>>,
}

impl EventLog {
    /// Creates an empty log stamping appends with the given clock.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            facts: RwLock::new(Vec::new()),
        }
    }

    /// Appends a fact and returns its assigned sequence number.
    pub async fn append(&self, fact: Fact) -> SequenceNumber {
        let recorded_at = self.clock.now();
        let mut facts = self.facts.write().await;
        let sequence = SequenceNumber::new(facts.len() as u64);
        facts.push(SequencedFact {
            sequence,
            recorded_at,
            fact,
        });

        tracing::debug!(sequence = sequence.value(), "Fact appended");

        sequence
    }

    /// The sequence number the next appended fact will receive.
    pub async fn next_sequence(&self) -> SequenceNumber {
        SequenceNumber::new(self.facts.read().await.len() as u64)
    }

    /// Number of facts appended so far.
    pub async fn len(&self) -> usize {
        self.facts.read().await.len()
    }

    /// Whether no fact has been appended yet.
    pub async fn is_empty(&self) -> bool {
        self.facts.read().await.is_empty()
    }

    /// One page of facts starting at `from`, at most `limit` long.
    ///
    /// Reflects the log at the instant the page is served; an empty page
    /// means no fact at or beyond `from` existed at that instant.
    pub async fn read_page(&self, from: SequenceNumber, limit: usize) -> Vec<SequencedFact> {
        let facts = self.facts.read().await;
        let start = usize::try_from(from.value())
            .unwrap_or(usize::MAX)
            .min(facts.len());
        let end = start.saturating_add(limit).min(facts.len());
        facts[start..end].to_vec()
    }

    /// Lazy, paged stream of facts with sequence ≥ `from`.
    ///
    /// The stream is finite at any instant: it ends when a page comes
    /// back empty. Appends racing the read are observed if they land
    /// before the page containing their sequence is served, and are
    /// otherwise picked up by a later `read_from` call - never skipped
    /// within the delivered range, never duplicated.
    pub fn read_from(
        &self,
        from: SequenceNumber,
    ) -> impl Stream<Item = SequencedFact> + Send + '_ {
        async_stream::stream! {
            let mut cursor = from;
            loop {
                let page = self.read_page(cursor, READ_PAGE_SIZE).await;
                let Some(last) = page.last() else {
                    break;
                };
                cursor = last.sequence.next();
                for fact in page {
                    yield fact;
                }
            }
        }
    }
}

impl std::fmt::Debug for EventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLog").finish_non_exhaustive()
    }
}
