//! Startup-phase consistency checks and live reconfiguration.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal_macros::dec;
use solarb::adapter::{MemorySlippageStore, NullAuditSink, PaperLedger, PaperVenue, StaticFeed};
use solarb::app::{App, Collaborators};
use solarb::config::Config;
use solarb::domain::{PoolId, TokenSymbol, Venue};
use solarb::error::Error;
use solarb::port::{Ledger, NotifierRegistry, PriceUpdate, VenueRegistry};
use solarb::state::PriceBook;
use solarb::testkit::{rates, ScriptedLedger};

fn collaborators(entries: Vec<PriceUpdate>, tokens: Vec<TokenSymbol>) -> Collaborators {
    Collaborators {
        feed: Arc::new(StaticFeed::new(entries, tokens)),
        store: Arc::new(MemorySlippageStore::new()),
        venues: VenueRegistry::new(),
        ledger: Arc::new(ScriptedLedger::new()),
        notifiers: Arc::new(NotifierRegistry::new()),
        audit: Arc::new(NullAuditSink),
    }
}

fn eth_entry() -> PriceUpdate {
    PriceUpdate {
        id: PoolId::from("ORCA_USDC_ETH"),
        address: "orca-1".to_string(),
        rates: rates("USDC", "ETH", dec!(0.001), dec!(990)),
    }
}

#[tokio::test]
async fn empty_price_snapshot_is_fatal() {
    let prices = Arc::new(PriceBook::new());
    let collab = collaborators(Vec::new(), vec![TokenSymbol::from("ETH")]);

    let err = App::run_with(Config::default(), prices, collab)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::StateInconsistency(_)));
}

#[tokio::test]
async fn empty_token_list_is_fatal() {
    let prices = Arc::new(PriceBook::new());
    let collab = collaborators(vec![eth_entry()], Vec::new());

    let err = App::run_with(Config::default(), prices.clone(), collab)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::StateInconsistency(_)));

    // The snapshot was still ingested before the check tripped.
    assert_eq!(prices.len(), 1);
}

#[tokio::test]
async fn pushed_token_list_enables_new_intermediates_live() {
    // Profitable SOL pools, but SOL starts off the allow-list; a pushed
    // token-list replacement must turn trading on without a restart.
    let entries = vec![
        PriceUpdate {
            id: PoolId::from("ORCA_USDC_SOL"),
            address: "orca-sol".to_string(),
            rates: rates("USDC", "SOL", dec!(0.01), dec!(98)),
        },
        PriceUpdate {
            id: PoolId::from("RAYDIUM_USDC_SOL"),
            address: "raydium-sol".to_string(),
            rates: rates("USDC", "SOL", dec!(0.00999), dec!(100.2)),
        },
    ];

    let prices = Arc::new(PriceBook::new());
    let feed = Arc::new(StaticFeed::new(entries, vec![TokenSymbol::from("ETH")]));
    let ledger = Arc::new(PaperLedger::new(TokenSymbol::from("USDC"), dec!(1000)));
    let mut venues = VenueRegistry::new();
    for venue in [Venue::Orca, Venue::Raydium] {
        venues.register(Arc::new(PaperVenue::new(venue, prices.clone(), dec!(1))));
    }
    let collab = Collaborators {
        feed: feed.clone(),
        store: Arc::new(MemorySlippageStore::new()),
        venues,
        ledger: ledger.clone(),
        notifiers: Arc::new(NotifierRegistry::new()),
        audit: Arc::new(NullAuditSink),
    };

    let mut config = Config::default();
    config.engine.tick_interval_ms = 10;

    let app = tokio::spawn(App::run_with(config, prices, collab));

    let usdc = TokenSymbol::from("USDC");
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(
        ledger.token_balance(&usdc).await.unwrap().unwrap(),
        dec!(1000)
    );

    feed.push_tokens(vec![TokenSymbol::from("SOL")]).await;
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(ledger.token_balance(&usdc).await.unwrap().unwrap() > dec!(1000));

    app.abort();
}
