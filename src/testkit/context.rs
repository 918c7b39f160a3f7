//! Engine context assembly around the mocks.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;

use crate::adapter::{MemorySlippageStore, PaperLedger, PaperVenue};
use crate::domain::{Leg, Pool, PoolId, PoolRates, TokenSymbol, Venue};
use crate::engine::{EngineContext, EngineSettings, Recalibrator};
use crate::port::{Ledger, NotifierRegistry, VenueAdapter, VenueRegistry};
use crate::state::{AllowList, PriceBook, SlippageModel};

use super::capture::{CollectingAudit, CollectingNotifier};
use super::ledger::ScriptedLedger;

/// A built engine context plus handles for asserting on its internals.
pub struct TestEngine {
    pub ctx: Arc<EngineContext>,
    pub slippage: Arc<SlippageModel>,
    pub store: Arc<MemorySlippageStore>,
    pub notifier: CollectingNotifier,
    pub audit: CollectingAudit,
}

/// Builder over [`EngineContext`] with fast-test defaults: anchor `USDC`,
/// bet 5, zero threshold, five 1ms confirmation polls.
pub struct ContextBuilder {
    prices: Arc<PriceBook>,
    slippage: Arc<SlippageModel>,
    store: Arc<MemorySlippageStore>,
    tokens: Vec<TokenSymbol>,
    venues: VenueRegistry,
    ledger: Option<Arc<dyn Ledger>>,
    settings: EngineSettings,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self {
            prices: Arc::new(PriceBook::new()),
            slippage: Arc::new(SlippageModel::new(Decimal::ZERO)),
            store: Arc::new(MemorySlippageStore::new()),
            tokens: Vec::new(),
            venues: VenueRegistry::new(),
            ledger: None,
            settings: EngineSettings {
                anchor: TokenSymbol::from("USDC"),
                starting_bet: Decimal::from(5),
                profit_threshold: Decimal::ZERO,
                calibration_mode: false,
                tick_interval: Duration::from_millis(60),
                max_confirmation_polls: 5,
                confirmation_poll_interval: Duration::from_millis(1),
            },
        }
    }

    /// The price book mocks and paper backends share with the engine.
    pub fn prices(&self) -> Arc<PriceBook> {
        self.prices.clone()
    }

    pub fn with_pool(self, pool: Pool) -> Self {
        self.slippage.ensure(pool.id());
        self.prices.apply_update(
            pool.id().clone(),
            pool.address().to_string(),
            PoolRates {
                buy: pool.buy().clone(),
                sell: pool.sell().clone(),
            },
        );
        self
    }

    pub fn with_tokens(mut self, tokens: &[&str]) -> Self {
        self.tokens = tokens.iter().map(|t| TokenSymbol::from(*t)).collect();
        self
    }

    pub fn with_venue(mut self, adapter: Arc<dyn VenueAdapter>) -> Self {
        self.venues.register(adapter);
        self
    }

    pub fn with_ledger(mut self, ledger: Arc<dyn Ledger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    /// Paper venues for both DEXes plus a paper wallet, filling against the
    /// builder's price book.
    pub fn with_paper_backends(mut self, fill_ratio: Decimal, anchor_balance: Decimal) -> Self {
        for venue in [Venue::Orca, Venue::Raydium] {
            self.venues.register(Arc::new(PaperVenue::new(
                venue,
                self.prices.clone(),
                fill_ratio,
            )));
        }
        self.ledger = Some(Arc::new(PaperLedger::new(
            self.settings.anchor.clone(),
            anchor_balance,
        )));
        self
    }

    pub fn with_calibration_mode(mut self) -> Self {
        self.settings.calibration_mode = true;
        self
    }

    pub fn with_profit_threshold(mut self, threshold: Decimal) -> Self {
        self.settings.profit_threshold = threshold;
        self
    }

    pub fn with_starting_bet(mut self, bet: Decimal) -> Self {
        self.settings.starting_bet = bet;
        self
    }

    pub fn with_max_confirmation_polls(mut self, polls: u32) -> Self {
        self.settings.max_confirmation_polls = polls;
        self
    }

    pub fn with_slippage_pair(self, pool: &PoolId, pair: [Decimal; 2]) -> Self {
        self.slippage.apply_pair(pool, pair);
        self
    }

    pub fn with_slippage(self, pool: &PoolId, leg: Leg, factor: Decimal) -> Self {
        self.slippage.apply_update(pool, leg, factor);
        self
    }

    pub fn build(self) -> TestEngine {
        let notifier = CollectingNotifier::new();
        let audit = CollectingAudit::new();

        let mut notifiers = NotifierRegistry::new();
        notifiers.register(Box::new(notifier.clone()));

        let ledger = self
            .ledger
            .unwrap_or_else(|| Arc::new(ScriptedLedger::new()));
        let recalibrator = Arc::new(Recalibrator::new(self.slippage.clone(), self.store.clone()));

        let ctx = Arc::new(EngineContext {
            prices: self.prices,
            slippage: self.slippage.clone(),
            allow_list: Arc::new(AllowList::new(self.tokens)),
            venues: self.venues,
            ledger,
            recalibrator,
            notifiers: Arc::new(notifiers),
            audit: Arc::new(audit.clone()),
            settings: self.settings,
        });

        TestEngine {
            ctx,
            slippage: self.slippage,
            store: self.store,
            notifier,
            audit,
        }
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
