//! End-to-end scheduler ticks against the paper backends.

use std::sync::Arc;

use rust_decimal_macros::dec;
use solarb::domain::TokenSymbol;
use solarb::engine::Scheduler;
use solarb::testkit::{pool, ContextBuilder, ScriptedLedger};

#[tokio::test]
async fn dispatches_best_route_per_intermediate_token() {
    // Two intermediates, each with one profitable pairing. Both should
    // dispatch in the same tick.
    let engine = ContextBuilder::new()
        .with_tokens(&["ETH", "SOL"])
        .with_pool(pool("ORCA_USDC_ETH", dec!(0.001), dec!(990)))
        .with_pool(pool("RAYDIUM_USDC_ETH", dec!(0.00099), dec!(1004)))
        .with_pool(pool("ORCA_USDC_SOL", dec!(0.01), dec!(98)))
        .with_pool(pool("RAYDIUM_USDC_SOL", dec!(0.00999), dec!(100.2)))
        .with_paper_backends(dec!(1), dec!(1000))
        .build();

    Scheduler::new(engine.ctx.clone()).tick().await;

    let records = engine.audit.records();
    assert_eq!(records.len(), 2);

    let mut routes: Vec<String> = engine
        .notifier
        .events()
        .into_iter()
        .map(|e| e.route)
        .collect();
    routes.sort();
    assert_eq!(
        routes,
        vec![
            "ORCA_USDC_ETH -> RAYDIUM_USDC_ETH".to_string(),
            "ORCA_USDC_SOL -> RAYDIUM_USDC_SOL".to_string(),
        ]
    );

    // ETH cycle nets 0.02, SOL cycle nets 0.01 on a bet of 5.
    let balance = engine
        .ctx
        .ledger
        .token_balance(&TokenSymbol::from("USDC"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(balance, dec!(1000.03));
}

#[tokio::test]
async fn picks_the_most_profitable_pairing_for_a_token() {
    // Three ETH pools give three candidate pairings; only the best one runs.
    let engine = ContextBuilder::new()
        .with_tokens(&["ETH"])
        .with_pool(pool("ORCA_USDC_ETH", dec!(0.001), dec!(990)))
        .with_pool(pool("RAYDIUM_USDC_ETH", dec!(0.00099), dec!(1004)))
        .with_pool(pool("ORCA|whirl_USDC_ETH", dec!(0.000995), dec!(1001)))
        .with_paper_backends(dec!(1), dec!(1000))
        .build();

    Scheduler::new(engine.ctx.clone()).tick().await;

    let events = engine.notifier.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].route, "ORCA_USDC_ETH -> RAYDIUM_USDC_ETH");
    assert_eq!(events[0].net_profit, dec!(0.02));

    let records = engine.audit.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].starting_amount, dec!(1000));
    assert_eq!(records[0].ending_amount, dec!(1000.02));
    assert_eq!(records[0].net_profit, dec!(0.02));
    assert_eq!(records[0].expected_profit, dec!(0.02));
}

#[tokio::test]
async fn unprofitable_routes_are_skipped_outside_calibration_mode() {
    let ledger = Arc::new(ScriptedLedger::new());
    let engine = ContextBuilder::new()
        .with_tokens(&["ETH"])
        .with_pool(pool("ORCA_USDC_ETH", dec!(0.001), dec!(980)))
        .with_pool(pool("RAYDIUM_USDC_ETH", dec!(0.00097), dec!(990)))
        .with_ledger(ledger.clone())
        .build();

    Scheduler::new(engine.ctx.clone()).tick().await;

    assert_eq!(ledger.submit_count(), 0);
    assert!(engine.audit.records().is_empty());
    assert!(engine.notifier.events().is_empty());
}

#[tokio::test]
async fn tokens_off_the_allow_list_are_never_traded() {
    // Profitable SOL pairing, but only ETH is enabled.
    let engine = ContextBuilder::new()
        .with_tokens(&["ETH"])
        .with_pool(pool("ORCA_USDC_SOL", dec!(0.01), dec!(98)))
        .with_pool(pool("RAYDIUM_USDC_SOL", dec!(0.00999), dec!(100.2)))
        .with_paper_backends(dec!(1), dec!(1000))
        .build();

    Scheduler::new(engine.ctx.clone()).tick().await;

    assert!(engine.audit.records().is_empty());
    let balance = engine
        .ctx
        .ledger
        .token_balance(&TokenSymbol::from("USDC"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(balance, dec!(1000));
}
