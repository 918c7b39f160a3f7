//! Calibration-mode dispatch and simulate-only attempts.

use std::sync::Arc;

use rust_decimal_macros::dec;
use solarb::domain::{Leg, PoolId, Venue};
use solarb::engine::{Dispatch, Scheduler};
use solarb::testkit::{pool, ContextBuilder, ScriptedLedger, ScriptedVenue};

#[tokio::test]
async fn calibration_mode_simulates_the_top_route_without_spending() {
    // Best pairing loses 1%, so nothing should execute for real; calibration
    // mode still runs it simulate-only and corrects the model from fresh
    // quotes (0.99x of both estimates).
    let orca = Arc::new(ScriptedVenue::new(Venue::Orca).with_quotes(vec![dec!(0.00495)]));
    let raydium = Arc::new(ScriptedVenue::new(Venue::Raydium).with_quotes(vec![dec!(4.9005)]));
    let ledger = Arc::new(ScriptedLedger::new());

    let engine = ContextBuilder::new()
        .with_tokens(&["ETH"])
        .with_pool(pool("ORCA_USDC_ETH", dec!(0.001), dec!(980)))
        .with_pool(pool("RAYDIUM_USDC_ETH", dec!(0.00097), dec!(990)))
        .with_venue(orca.clone())
        .with_venue(raydium.clone())
        .with_ledger(ledger.clone())
        .with_calibration_mode()
        .build();

    Scheduler::new(engine.ctx.clone()).tick().await;

    // Fresh quotes were taken, no instructions built, nothing submitted.
    assert_eq!(orca.quote_count(), 1);
    assert_eq!(raydium.quote_count(), 1);
    assert_eq!(orca.build_count(), 0);
    assert_eq!(raydium.build_count(), 0);
    assert_eq!(ledger.submit_count(), 0);

    let first = PoolId::from("ORCA_USDC_ETH");
    let second = PoolId::from("RAYDIUM_USDC_ETH");
    assert_eq!(engine.slippage.factor(&first, Leg::First), dec!(0.99));
    assert_eq!(engine.slippage.factor(&second, Leg::Second), dec!(0.99));
    assert_eq!(engine.store.get(&first, Leg::First), Some(dec!(0.99)));

    assert!(engine.notifier.events().is_empty());
    assert!(engine.audit.records().is_empty());
}

#[tokio::test]
async fn profitable_routes_execute_even_in_calibration_mode() {
    let engine = ContextBuilder::new()
        .with_calibration_mode()
        .build();
    let scheduler = Scheduler::new(engine.ctx);

    assert_eq!(scheduler.plan(0, dec!(0.004)), Dispatch::Execute);
    assert_eq!(scheduler.plan(7, dec!(0.004)), Dispatch::Execute);
}

#[tokio::test]
async fn top_two_ranks_are_always_promoted_at_or_below_threshold() {
    let engine = ContextBuilder::new()
        .with_calibration_mode()
        .build();
    let scheduler = Scheduler::new(engine.ctx);

    assert_eq!(scheduler.plan(0, dec!(0)), Dispatch::Simulate);
    assert_eq!(scheduler.plan(1, dec!(-0.01)), Dispatch::Simulate);
}

#[tokio::test]
async fn lower_ranks_are_promoted_probabilistically() {
    let engine = ContextBuilder::new()
        .with_calibration_mode()
        .build();
    let scheduler = Scheduler::new(engine.ctx);

    let mut simulated = 0;
    let mut skipped = 0;
    for _ in 0..500 {
        match scheduler.plan(5, dec!(-0.01)) {
            Dispatch::Simulate => simulated += 1,
            Dispatch::Skip => skipped += 1,
            Dispatch::Execute => panic!("unprofitable route must never execute"),
        }
    }
    assert!(simulated > 0);
    assert!(skipped > 0);
}

#[tokio::test]
async fn without_calibration_mode_unprofitable_ranks_are_skipped() {
    let engine = ContextBuilder::new().build();
    let scheduler = Scheduler::new(engine.ctx);

    assert_eq!(scheduler.plan(0, dec!(0)), Dispatch::Skip);
    assert_eq!(scheduler.plan(3, dec!(-0.02)), Dispatch::Skip);
}
