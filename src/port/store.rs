//! Slippage store port.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::mpsc;

use crate::domain::{Leg, PoolId};
use crate::error::Result;

/// A pushed change to one pool's slippage factor pair.
#[derive(Debug, Clone)]
pub struct SlippageUpdate {
    pub pool: PoolId,
    pub factors: [Decimal; 2],
}

/// Persistent backing store for slippage factors.
///
/// The in-memory [`SlippageModel`](crate::state::SlippageModel) is a cache
/// over this store with last-write-wins semantics between the recalibrator
/// and the change subscription.
#[async_trait]
pub trait SlippageStore: Send + Sync {
    /// One-shot full read. Pools absent here fall back to the model default.
    async fn load_all(&self) -> Result<HashMap<PoolId, [Decimal; 2]>>;

    /// Merge one (pool, leg) factor into the store.
    async fn merge(&self, pool: &PoolId, leg: Leg, factor: Decimal) -> Result<()>;

    /// Stream of externally-written factor changes.
    async fn subscribe(&self) -> Result<mpsc::Receiver<SlippageUpdate>>;
}
