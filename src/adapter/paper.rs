//! Paper-trading backends: a static price feed, an in-memory slippage
//! store, and venue/ledger implementations that fill swaps against the
//! price book with a configurable haircut.
//!
//! These let the full pipeline run end to end, including the
//! recalibration feedback loop, without touching a chain.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use rust_decimal::Decimal;
use tokio::sync::mpsc;

use crate::domain::{Leg, PoolId, TokenSymbol, Venue};
use crate::error::{Error, ExecutionError, Result};
use crate::port::{
    Instruction, Ledger, PriceFeed, PriceUpdate, SlippageStore, SlippageUpdate, SwapInstructions,
    SwapRequest, Transaction, TxRecord, TxSignature, VenueAdapter,
};
use crate::state::PriceBook;

/// Feed serving a fixed set of pools, e.g. from the `[paper]` config section.
pub struct StaticFeed {
    entries: Vec<PriceUpdate>,
    tokens: RwLock<Vec<TokenSymbol>>,
    // Held so subscription channels stay open for the process lifetime.
    subscribers: Mutex<Vec<mpsc::Sender<PriceUpdate>>>,
    token_subscribers: Mutex<Vec<mpsc::Sender<Vec<TokenSymbol>>>>,
}

impl StaticFeed {
    pub fn new(entries: Vec<PriceUpdate>, tokens: Vec<TokenSymbol>) -> Self {
        Self {
            entries,
            tokens: RwLock::new(tokens),
            subscribers: Mutex::new(Vec::new()),
            token_subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Replace the valid-token list and push it to every subscriber, as a
    /// live feed backend would when a currency is turned on or off.
    pub async fn push_tokens(&self, tokens: Vec<TokenSymbol>) {
        *self.tokens.write() = tokens.clone();
        let subscribers = self.token_subscribers.lock().clone();
        for sender in subscribers {
            let _ = sender.send(tokens.clone()).await;
        }
    }
}

#[async_trait]
impl PriceFeed for StaticFeed {
    async fn snapshot(&self) -> Result<Vec<PriceUpdate>> {
        Ok(self.entries.clone())
    }

    async fn subscribe(&self) -> Result<mpsc::Receiver<PriceUpdate>> {
        let (sender, receiver) = mpsc::channel(64);
        self.subscribers.lock().push(sender);
        Ok(receiver)
    }

    async fn valid_tokens(&self) -> Result<Vec<TokenSymbol>> {
        Ok(self.tokens.read().clone())
    }

    async fn subscribe_tokens(&self) -> Result<mpsc::Receiver<Vec<TokenSymbol>>> {
        let (sender, receiver) = mpsc::channel(8);
        self.token_subscribers.lock().push(sender);
        Ok(receiver)
    }
}

/// Non-persistent slippage store. Factors survive the process, not restarts.
pub struct MemorySlippageStore {
    factors: RwLock<HashMap<PoolId, [Decimal; 2]>>,
    subscribers: Mutex<Vec<mpsc::Sender<SlippageUpdate>>>,
}

impl MemorySlippageStore {
    pub fn new() -> Self {
        Self {
            factors: RwLock::new(HashMap::new()),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn get(&self, pool: &PoolId, leg: Leg) -> Option<Decimal> {
        self.factors.read().get(pool).map(|pair| pair[leg.index()])
    }

    /// Push an externally-written pair to every subscriber, as a live store
    /// backend would.
    pub async fn push(&self, pool: PoolId, factors: [Decimal; 2]) {
        self.factors.write().insert(pool.clone(), factors);
        let subscribers = self.subscribers.lock().clone();
        for sender in subscribers {
            let _ = sender.send(SlippageUpdate { pool: pool.clone(), factors }).await;
        }
    }
}

impl Default for MemorySlippageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SlippageStore for MemorySlippageStore {
    async fn load_all(&self) -> Result<HashMap<PoolId, [Decimal; 2]>> {
        Ok(self.factors.read().clone())
    }

    async fn merge(&self, pool: &PoolId, leg: Leg, factor: Decimal) -> Result<()> {
        let mut factors = self.factors.write();
        let pair = factors
            .entry(pool.clone())
            .or_insert([Decimal::ONE, Decimal::ONE]);
        pair[leg.index()] = factor;
        Ok(())
    }

    async fn subscribe(&self) -> Result<mpsc::Receiver<SlippageUpdate>> {
        let (sender, receiver) = mpsc::channel(64);
        self.subscribers.lock().push(sender);
        Ok(receiver)
    }
}

/// Venue adapter that quotes and fills against the live price book, shaving
/// a fixed haircut off every fill to mimic execution slippage.
pub struct PaperVenue {
    venue: Venue,
    prices: Arc<PriceBook>,
    fill_ratio: Decimal,
}

impl PaperVenue {
    pub fn new(venue: Venue, prices: Arc<PriceBook>, fill_ratio: Decimal) -> Self {
        Self {
            venue,
            prices,
            fill_ratio,
        }
    }

    fn rate(&self, from: &TokenSymbol, to: &TokenSymbol) -> Option<Decimal> {
        self.prices
            .snapshot()
            .iter()
            .filter(|pool| pool.venue() == self.venue)
            .find_map(|pool| {
                if pool.buy().from == *from && pool.buy().to == *to {
                    Some(pool.buy().rate)
                } else if pool.sell().from == *from && pool.sell().to == *to {
                    Some(pool.sell().rate)
                } else {
                    None
                }
            })
    }

    fn pool_by_address(&self, address: &str) -> Option<PoolId> {
        self.prices
            .snapshot()
            .iter()
            .find(|pool| pool.address() == address)
            .map(|pool| pool.id().clone())
    }
}

#[async_trait]
impl VenueAdapter for PaperVenue {
    fn venue(&self) -> Venue {
        self.venue
    }

    async fn quote(
        &self,
        from: &TokenSymbol,
        to: &TokenSymbol,
        amount_in: Decimal,
    ) -> Result<Decimal> {
        let rate = self.rate(from, to).ok_or_else(|| {
            Error::from(ExecutionError::QuoteFailed {
                from: from.to_string(),
                to: to.to_string(),
                reason: format!("no {} pool for pair", self.venue),
            })
        })?;
        Ok(amount_in * rate * self.fill_ratio)
    }

    async fn build_swap(&self, request: &SwapRequest) -> Result<SwapInstructions> {
        let pool = self.pool_by_address(&request.pool_address).ok_or_else(|| {
            Error::from(ExecutionError::SwapBuildFailed(format!(
                "unknown pool address {}",
                request.pool_address
            )))
        })?;
        let rate = self.rate(&request.from, &request.to).ok_or_else(|| {
            Error::from(ExecutionError::SwapBuildFailed(format!(
                "no rate for {} -> {}",
                request.from, request.to
            )))
        })?;

        let fill = request.amount_in * rate * self.fill_ratio;
        Ok(SwapInstructions {
            instructions: vec![Instruction {
                program: format!("paper.{}", self.venue),
                data: format!(
                    "swap pool={pool} in={} out={fill} min={}",
                    request.amount_in, request.min_amount_out
                ),
            }],
            signers: Vec::new(),
        })
    }
}

/// Ledger that finalizes paper transactions instantly and settles balances
/// from the encoded fills.
pub struct PaperLedger {
    anchor: TokenSymbol,
    balances: RwLock<HashMap<TokenSymbol, Decimal>>,
    finalized: RwLock<HashMap<String, TxRecord>>,
    sequence: AtomicU64,
}

impl PaperLedger {
    pub fn new(anchor: TokenSymbol, anchor_balance: Decimal) -> Self {
        let mut balances = HashMap::new();
        balances.insert(anchor.clone(), anchor_balance);
        Self {
            anchor,
            balances: RwLock::new(balances),
            finalized: RwLock::new(HashMap::new()),
            sequence: AtomicU64::new(1),
        }
    }
}

fn field(data: &str, key: &str) -> Option<Decimal> {
    data.split(&format!("{key}="))
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|raw| raw.parse().ok())
}

#[async_trait]
impl Ledger for PaperLedger {
    async fn submit(&self, tx: &Transaction) -> Result<TxSignature> {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        let signature = format!("paper-{sequence}");

        let swaps: Vec<&Instruction> = tx
            .instructions
            .iter()
            .filter(|i| i.program.starts_with("paper."))
            .collect();

        let logs: Vec<String> = swaps.iter().map(|i| i.data.clone()).collect();
        self.finalized
            .write()
            .insert(signature.clone(), TxRecord { logs });

        // Atomicity: if any leg would fill below its minimum out, the whole
        // transaction fails on chain.
        for swap in &swaps {
            let out = field(&swap.data, "out").unwrap_or_default();
            let min = field(&swap.data, "min").unwrap_or_default();
            if out < min {
                return Err(ExecutionError::SubmissionRejected {
                    reason: format!("Transaction {signature} failed ({{\"err\":\"slippage\"}})"),
                }
                .into());
            }
        }

        // Settle the anchor balance from the cycle boundary amounts.
        if let (Some(first), Some(last)) = (swaps.first(), swaps.last()) {
            if let (Some(spent), Some(received)) =
                (field(&first.data, "in"), field(&last.data, "out"))
            {
                let mut balances = self.balances.write();
                if let Some(balance) = balances.get_mut(&self.anchor) {
                    *balance += received - spent;
                }
            }
        }

        Ok(TxSignature(signature))
    }

    async fn get_finalized(&self, signature: &TxSignature) -> Result<Option<TxRecord>> {
        Ok(self.finalized.read().get(signature.as_str()).cloned())
    }

    async fn token_balance(&self, token: &TokenSymbol) -> Result<Option<Decimal>> {
        Ok(self.balances.read().get(token).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pushed_token_list_reaches_subscribers_and_snapshot() {
        let feed = StaticFeed::new(Vec::new(), vec![TokenSymbol::from("ETH")]);
        let mut rx = feed.subscribe_tokens().await.unwrap();

        feed.push_tokens(vec![TokenSymbol::from("ETH"), TokenSymbol::from("SOL")])
            .await;

        let pushed = rx.recv().await.unwrap();
        assert_eq!(pushed.len(), 2);
        assert_eq!(feed.valid_tokens().await.unwrap(), pushed);
    }
}
