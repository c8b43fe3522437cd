//! Mock implementations of the environment traits.

use adslot_core::account::AccountId;
use adslot_core::bid::CreativeId;
use adslot_core::environment::{Clock, ContentVerifier, FundTransfer, TransferError, TransferResult};
use adslot_core::money::Money;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Fixed clock for deterministic tests
///
/// Always returns the same time, making tests reproducible.
#[derive(Debug, Clone)]
pub struct FixedClock {
    time: DateTime<Utc>,
}

impl FixedClock {
    /// Create a new fixed clock with the given time
    #[must_use]
    pub const fn new(time: DateTime<Utc>) -> Self {
        Self { time }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.time
    }
}

/// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
///
/// # Panics
///
/// This function will panic if the hardcoded timestamp fails to parse,
/// which should never happen in practice.
#[must_use]
#[allow(clippy::expect_used)]
pub fn test_clock() -> FixedClock {
    FixedClock::new(
        DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .expect("hardcoded timestamp should always parse")
            .with_timezone(&Utc),
    )
}

/// A fund-transfer mock that records every payout.
///
/// Transfers succeed by default. Individual recipients can be marked as
/// unable to accept funds (a displaced bidder that cannot take its
/// refund), or the whole bank can be switched off to simulate a transfer
/// capability outage.
/// Recorded payouts let tests assert exactly who was paid what, in order.
#[derive(Debug, Default)]
pub struct RecordingBank {
    payouts: Mutex<Vec<(AccountId, Money)>>,
    failing_recipients: Mutex<HashSet<AccountId>>,
    fail_all: Mutex<bool>,
}

impl RecordingBank {
    /// Creates a new bank with no recorded payouts and no failures.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an Arc-wrapped instance for sharing
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Marks a recipient as unable to accept funds.
    pub async fn fail_for(&self, recipient: AccountId) {
        self.failing_recipients.lock().await.insert(recipient);
    }

    /// Makes every subsequent transfer fail.
    pub async fn fail_all(&self) {
        *self.fail_all.lock().await = true;
    }

    /// Restores normal operation for all recipients.
    pub async fn recover(&self) {
        *self.fail_all.lock().await = false;
        self.failing_recipients.lock().await.clear();
    }

    /// All successful payouts, in the order they were made.
    pub async fn payouts(&self) -> Vec<(AccountId, Money)> {
        self.payouts.lock().await.clone()
    }

    /// Total amount successfully paid to one recipient.
    pub async fn total_paid_to(&self, recipient: AccountId) -> Money {
        let cents = self
            .payouts
            .lock()
            .await
            .iter()
            .filter(|(to, _)| *to == recipient)
            .map(|(_, amount)| amount.cents())
            .sum();
        Money::from_cents(cents)
    }
}

impl FundTransfer for RecordingBank {
    fn transfer(
        &self,
        to: AccountId,
        amount: Money,
    ) -> Pin<Box<dyn Future<Output = TransferResult> + Send + '_>> {
        Box::pin(async move {
            if *self.fail_all.lock().await {
                return Err(TransferError::Rejected("transfer capability down".to_string()));
            }
            if self.failing_recipients.lock().await.contains(&to) {
                return Err(TransferError::RecipientUnavailable(to));
            }

            self.payouts.lock().await.push((to, amount));

            tracing::info!(
                to = %to,
                amount = amount.cents(),
                "Mock transfer recorded"
            );

            Ok(())
        })
    }
}

/// A content verifier with a fixed answer per creative.
///
/// Approves everything except the creatives on its deny list.
#[derive(Debug, Default)]
pub struct StaticVerifier {
    denied: HashSet<CreativeId>,
}

impl StaticVerifier {
    /// A verifier that approves every creative.
    #[must_use]
    pub fn approve_all() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A verifier that rejects exactly the given creatives.
    #[must_use]
    pub fn denying(denied: impl IntoIterator<Item = CreativeId>) -> Arc<Self> {
        Arc::new(Self {
            denied: denied.into_iter().collect(),
        })
    }
}

impl ContentVerifier for StaticVerifier {
    fn verify(
        &self,
        creative_id: &CreativeId,
    ) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        let verdict = !self.denied.contains(creative_id);
        Box::pin(async move { verdict })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
    }

    #[tokio::test]
    async fn bank_records_payouts_in_order() {
        let bank = RecordingBank::new();
        let alice = AccountId::new();
        let bob = AccountId::new();

        bank.transfer(alice, Money::from_cents(90)).await.unwrap();
        bank.transfer(bob, Money::from_cents(7)).await.unwrap();
        bank.transfer(alice, Money::from_cents(3)).await.unwrap();

        assert_eq!(
            bank.payouts().await,
            vec![
                (alice, Money::from_cents(90)),
                (bob, Money::from_cents(7)),
                (alice, Money::from_cents(3)),
            ]
        );
        assert_eq!(bank.total_paid_to(alice).await, Money::from_cents(93));
    }

    #[tokio::test]
    async fn bank_failure_injection() {
        let bank = RecordingBank::new();
        let alice = AccountId::new();
        let bob = AccountId::new();

        bank.fail_for(alice).await;
        assert!(matches!(
            bank.transfer(alice, Money::from_cents(10)).await,
            Err(TransferError::RecipientUnavailable(_))
        ));
        assert!(bank.transfer(bob, Money::from_cents(10)).await.is_ok());

        bank.fail_all().await;
        assert!(bank.transfer(bob, Money::from_cents(10)).await.is_err());

        bank.recover().await;
        assert!(bank.transfer(alice, Money::from_cents(10)).await.is_ok());

        // Failed transfers leave no payout record.
        assert_eq!(bank.payouts().await.len(), 2);
    }

    #[tokio::test]
    async fn verifier_denies_listed_creatives() {
        let verifier = StaticVerifier::denying([CreativeId::new("bad")]);
        assert!(!verifier.verify(&CreativeId::new("bad")).await);
        assert!(verifier.verify(&CreativeId::new("good")).await);
    }
}
