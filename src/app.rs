//! Application wiring: state construction, startup reads, subscription
//! pumps, and the scheduler loop.

use std::sync::Arc;

use tracing::info;

use crate::adapter::{
    JsonlAuditSink, LogNotifier, MemorySlippageStore, NullAuditSink, PaperLedger, PaperVenue,
    StaticFeed, WebhookNotifier,
};
use crate::config::Config;
use crate::domain::{PoolId, PoolRates, QuotedRate, TokenSymbol, Venue};
use crate::engine::{EngineContext, Recalibrator, Scheduler};
use crate::error::{Error, Result};
use crate::port::{
    AuditSink, Ledger, NotifierRegistry, PriceFeed, PriceUpdate, SlippageStore, VenueRegistry,
};
use crate::state::{AllowList, PriceBook, SlippageModel};

/// The full external collaborator set the engine runs against.
pub struct Collaborators {
    pub feed: Arc<dyn PriceFeed>,
    pub store: Arc<dyn SlippageStore>,
    pub venues: VenueRegistry,
    pub ledger: Arc<dyn Ledger>,
    pub notifiers: Arc<NotifierRegistry>,
    pub audit: Arc<dyn AuditSink>,
}

pub struct App;

impl App {
    /// Run against the paper-trading backends built from configuration.
    pub async fn run(config: Config) -> Result<()> {
        let prices = Arc::new(PriceBook::new());
        let collaborators = paper_collaborators(&config, prices.clone());
        Self::run_with(config, prices, collaborators).await
    }

    /// Run against an explicit collaborator set.
    ///
    /// Startup reads (feed snapshot, token list, slippage load) are the only
    /// operations allowed to terminate the process; everything after enters
    /// the per-attempt error boundary.
    pub async fn run_with(
        config: Config,
        prices: Arc<PriceBook>,
        collaborators: Collaborators,
    ) -> Result<()> {
        let settings = config.engine_settings();
        let slippage = Arc::new(SlippageModel::new(config.engine.starting_slippage));

        let snapshot = collaborators.feed.snapshot().await?;
        if snapshot.is_empty() {
            return Err(Error::StateInconsistency(
                "price feed snapshot is empty".to_string(),
            ));
        }
        for update in snapshot {
            prices.apply_update(update.id, update.address, update.rates);
        }
        for pool in prices.snapshot() {
            slippage.ensure(pool.id());
        }

        let tokens = collaborators.feed.valid_tokens().await?;
        if tokens.is_empty() {
            return Err(Error::StateInconsistency(
                "valid-token list is empty".to_string(),
            ));
        }
        info!(tokens = ?tokens.iter().map(TokenSymbol::as_str).collect::<Vec<_>>(), "Valid tokens loaded");
        let allow_list = Arc::new(AllowList::new(tokens));

        for (pool, factors) in collaborators.store.load_all().await? {
            slippage.apply_pair(&pool, factors);
        }

        // Push subscriptions keep the caches current for the lifetime of
        // the process; a closed channel just ends the pump.
        let mut feed_rx = collaborators.feed.subscribe().await?;
        let feed_prices = prices.clone();
        tokio::spawn(async move {
            while let Some(update) = feed_rx.recv().await {
                feed_prices.apply_update(update.id, update.address, update.rates);
            }
        });

        let mut store_rx = collaborators.store.subscribe().await?;
        let store_slippage = slippage.clone();
        tokio::spawn(async move {
            while let Some(update) = store_rx.recv().await {
                store_slippage.apply_pair(&update.pool, update.factors);
            }
        });

        let mut tokens_rx = collaborators.feed.subscribe_tokens().await?;
        let tokens_allow_list = allow_list.clone();
        tokio::spawn(async move {
            while let Some(tokens) = tokens_rx.recv().await {
                info!(tokens = ?tokens.iter().map(TokenSymbol::as_str).collect::<Vec<_>>(), "Valid-token list replaced");
                tokens_allow_list.replace(tokens);
            }
        });

        let recalibrator = Arc::new(Recalibrator::new(
            slippage.clone(),
            collaborators.store.clone(),
        ));

        let ctx = Arc::new(EngineContext {
            prices,
            slippage,
            allow_list,
            venues: collaborators.venues,
            ledger: collaborators.ledger,
            recalibrator,
            notifiers: collaborators.notifiers,
            audit: collaborators.audit,
            settings,
        });

        info!(
            anchor = %ctx.settings.anchor,
            bet = %ctx.settings.starting_bet,
            calibration = ctx.settings.calibration_mode,
            "Engine starting"
        );

        Scheduler::new(ctx).run().await;
        Ok(())
    }
}

/// Build the paper-trading collaborator set from the `[paper]` config.
fn paper_collaborators(config: &Config, prices: Arc<PriceBook>) -> Collaborators {
    let anchor = TokenSymbol::new(config.anchor.clone());

    let entries = config
        .paper
        .pools
        .iter()
        .filter_map(|pool| {
            let mut segments = pool.id.split('_').skip(1);
            let (from, to) = (segments.next()?, segments.next()?);
            Some(PriceUpdate {
                id: PoolId::new(pool.id.clone()),
                address: pool.address.clone(),
                rates: PoolRates {
                    buy: QuotedRate {
                        from: TokenSymbol::from(from),
                        to: TokenSymbol::from(to),
                        rate: pool.buy_rate,
                    },
                    sell: QuotedRate {
                        from: TokenSymbol::from(to),
                        to: TokenSymbol::from(from),
                        rate: pool.sell_rate,
                    },
                },
            })
        })
        .collect();

    let tokens = config.paper.tokens.iter().map(TokenSymbol::new).collect();

    let mut venues = VenueRegistry::new();
    for venue in [Venue::Orca, Venue::Raydium] {
        venues.register(Arc::new(PaperVenue::new(
            venue,
            prices.clone(),
            config.paper.fill_ratio,
        )));
    }

    let mut notifiers = NotifierRegistry::new();
    notifiers.register(Box::new(LogNotifier));
    if let Some(url) = &config.notify.webhook_url {
        notifiers.register(Box::new(WebhookNotifier::new(url.clone())));
        info!("Webhook notifier enabled");
    }

    let audit: Arc<dyn AuditSink> = match &config.audit.path {
        Some(path) => Arc::new(JsonlAuditSink::new(path)),
        None => Arc::new(NullAuditSink),
    };

    Collaborators {
        feed: Arc::new(StaticFeed::new(entries, tokens)),
        store: Arc::new(MemorySlippageStore::new()),
        venues,
        ledger: Arc::new(PaperLedger::new(anchor, config.paper.anchor_balance)),
        notifiers: Arc::new(notifiers),
        audit,
    }
}
