//! Price feed port.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::{PoolId, PoolRates, TokenSymbol};
use crate::error::Result;

/// One pushed rate change for a pool.
#[derive(Debug, Clone)]
pub struct PriceUpdate {
    pub id: PoolId,
    pub address: String,
    pub rates: PoolRates,
}

/// Push-based rate source with a replayable full snapshot.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// One-shot full read of every known pool, in the feed's order.
    ///
    /// An empty or missing snapshot at startup is a fatal
    /// [`StateInconsistency`](crate::error::Error::StateInconsistency).
    async fn snapshot(&self) -> Result<Vec<PriceUpdate>>;

    /// Stream of per-pool rate changes.
    async fn subscribe(&self) -> Result<mpsc::Receiver<PriceUpdate>>;

    /// The currently enabled token allow-list.
    async fn valid_tokens(&self) -> Result<Vec<TokenSymbol>>;

    /// Stream of full replacements for the valid-token list, pushed when
    /// operations turn a currency on or off.
    async fn subscribe_tokens(&self) -> Result<mpsc::Receiver<Vec<TokenSymbol>>>;
}
