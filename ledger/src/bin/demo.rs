//! Demo: drive the auction ledger through a bid war.
//!
//! Creates a slot, places an opening bid, outbids it twice, shows a
//! rejected equal bid, and finally replays the event log the way an
//! external indexer would.
//!
//! Run with: `cargo run -p adslot-ledger --bin demo`

use adslot_core::account::AccountId;
use adslot_core::environment::SystemClock;
use adslot_core::money::Money;
use adslot_ledger::{AuctionConfig, AuctionCoordinator, LedgerEnvironment};
use adslot_testing::{RecordingBank, StaticVerifier};
use futures::StreamExt;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let bank = RecordingBank::shared();
    let env = LedgerEnvironment::new(
        Arc::new(SystemClock),
        bank.clone(),
        StaticVerifier::approve_all(),
    );
    let config = AuctionConfig::from_env()?;
    let treasury = config.treasury;
    let coordinator = AuctionCoordinator::new(config, env);

    let owner = AccountId::new();
    let alice = AccountId::new();
    let bob = AccountId::new();

    let slot_id = coordinator
        .create_slot("Header Banner", "example.com", 728, 90, owner)
        .await?;
    println!("Created slot {slot_id} (728x90 on example.com)");

    coordinator
        .place_bid(slot_id, alice, Money::from_dollars(1), "QmAliceCreative")
        .await?;
    println!("Alice opens at {}", Money::from_dollars(1));

    let receipt = coordinator
        .place_bid(slot_id, bob, Money::from_cents(150), "QmBobCreative")
        .await?;
    println!(
        "Bob outbids at {}; Alice refunded {}",
        receipt.bid.amount,
        receipt
            .refund
            .map_or_else(|| "nothing".to_string(), |r| r.amount.to_string())
    );

    if let Err(rejected) = coordinator
        .place_bid(slot_id, alice, Money::from_cents(150), "QmAliceAgain")
        .await
    {
        println!("Alice's matching bid rejected: {rejected}");
    }

    let held = coordinator
        .current_bid(slot_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("slot should be held"))?;
    println!("Current holder: {} at {}", held.bidder, held.amount);

    println!("\nSettlement trail:");
    for (to, amount) in bank.payouts().await {
        let label = if to == owner {
            "owner fee"
        } else if to == treasury {
            "platform fee"
        } else {
            "refund"
        };
        println!("  {amount} -> {to} ({label})");
    }

    println!("\nEvent log replay:");
    let mut facts = Box::pin(coordinator.facts_from(adslot_core::fact::SequenceNumber::INITIAL));
    while let Some(fact) = facts.next().await {
        println!("  [{}] {}", fact.sequence, fact.fact.fact_type());
    }

    Ok(())
}
