//! Feedback from realized fills into the slippage model and backing store.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::warn;

use crate::domain::{Leg, PoolId};
use crate::port::SlippageStore;
use crate::state::SlippageModel;

/// Writes corrected slippage factors wherever realized execution quality
/// diverged from the estimate.
pub struct Recalibrator {
    model: Arc<SlippageModel>,
    store: Arc<dyn SlippageStore>,
}

impl Recalibrator {
    pub fn new(model: Arc<SlippageModel>, store: Arc<dyn SlippageStore>) -> Self {
        Self { model, store }
    }

    /// Overwrite the factor for `(pool, leg)` with `realized / estimated`.
    ///
    /// The write is unconditional: the newest observation replaces the
    /// stored factor outright, no smoothing. Store failures are logged and
    /// swallowed; the in-memory model has already been updated.
    pub async fn apply(&self, pool: &PoolId, leg: Leg, realized: Decimal, estimated: Decimal) {
        if estimated.is_zero() {
            warn!(pool = %pool, leg = leg.index(), "Skipping recalibration with zero estimate");
            return;
        }

        let old = self.model.factor(pool, leg);
        let should_be = realized / estimated;

        warn!(
            pool = %pool,
            leg = leg.index(),
            old_slippage = %old,
            new_slippage = %should_be,
            realized = %realized,
            estimated = %estimated,
            "Recalibrating slippage factor"
        );

        self.model.apply_update(pool, leg, should_be);

        if let Err(e) = self.store.merge(pool, leg, should_be).await {
            warn!(pool = %pool, leg = leg.index(), error = %e, "Slippage store merge failed");
        }
    }
}
