//! The slippage model: per pool and per leg position, the fraction of the
//! quoted rate actually realized in past executions.

use std::collections::HashMap;

use parking_lot::RwLock;
use rust_decimal::Decimal;

use crate::domain::{Leg, PoolId};

/// In-memory cache of slippage factors, keyed by pool id.
///
/// Values flow in from the backing store (initial load and change
/// subscription) and from the recalibrator; last write wins from either
/// source. Unseen pools default to `1 - starting_slippage`.
pub struct SlippageModel {
    factors: RwLock<HashMap<PoolId, [Decimal; 2]>>,
    default_factor: Decimal,
}

impl SlippageModel {
    pub fn new(starting_slippage: Decimal) -> Self {
        Self {
            factors: RwLock::new(HashMap::new()),
            default_factor: Decimal::ONE - starting_slippage,
        }
    }

    pub fn default_factor(&self) -> Decimal {
        self.default_factor
    }

    /// Seed the default pair for a pool seen for the first time.
    pub fn ensure(&self, pool: &PoolId) {
        self.factors
            .write()
            .entry(pool.clone())
            .or_insert([self.default_factor, self.default_factor]);
    }

    /// Current factor for one (pool, leg position).
    pub fn factor(&self, pool: &PoolId, leg: Leg) -> Decimal {
        self.factors
            .read()
            .get(pool)
            .map(|pair| pair[leg.index()])
            .unwrap_or(self.default_factor)
    }

    /// Overwrite one (pool, leg position) factor. Unconditional replacement,
    /// no smoothing.
    pub fn apply_update(&self, pool: &PoolId, leg: Leg, factor: Decimal) {
        let mut factors = self.factors.write();
        let pair = factors
            .entry(pool.clone())
            .or_insert([self.default_factor, self.default_factor]);
        pair[leg.index()] = factor;
    }

    /// Replace both factors for a pool, as delivered by the backing store.
    pub fn apply_pair(&self, pool: &PoolId, pair: [Decimal; 2]) {
        self.factors.write().insert(pool.clone(), pair);
    }

    /// Copy-on-read snapshot of the whole model, taken once per attempt so
    /// concurrent recalibration cannot corrupt a single attempt's math.
    pub fn snapshot(&self) -> SlippageSnapshot {
        SlippageSnapshot {
            factors: self.factors.read().clone(),
            default_factor: self.default_factor,
        }
    }
}

/// An immutable point-in-time copy of the slippage model.
#[derive(Debug, Clone)]
pub struct SlippageSnapshot {
    factors: HashMap<PoolId, [Decimal; 2]>,
    default_factor: Decimal,
}

impl SlippageSnapshot {
    pub fn factor(&self, pool: &PoolId, leg: Leg) -> Decimal {
        self.factors
            .get(pool)
            .map(|pair| pair[leg.index()])
            .unwrap_or(self.default_factor)
    }

    /// Iterate (pool, [leg0, leg1]) pairs, for the per-tick table.
    pub fn iter(&self) -> impl Iterator<Item = (&PoolId, &[Decimal; 2])> {
        self.factors.iter()
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn unseen_pool_gets_default_factor() {
        let model = SlippageModel::new(dec!(0));
        let pool = PoolId::from("ORCA_USDC_ETH");
        assert_eq!(model.factor(&pool, Leg::First), dec!(1));
        assert_eq!(model.factor(&pool, Leg::Second), dec!(1));
    }

    #[test]
    fn starting_slippage_shifts_default() {
        let model = SlippageModel::new(dec!(0.01));
        let pool = PoolId::from("ORCA_USDC_ETH");
        assert_eq!(model.factor(&pool, Leg::First), dec!(0.99));
    }

    #[test]
    fn update_is_per_leg() {
        let model = SlippageModel::new(dec!(0));
        let pool = PoolId::from("ORCA_USDC_ETH");

        model.apply_update(&pool, Leg::Second, dec!(0.95));

        assert_eq!(model.factor(&pool, Leg::First), dec!(1));
        assert_eq!(model.factor(&pool, Leg::Second), dec!(0.95));
    }

    #[test]
    fn snapshot_is_immune_to_later_updates() {
        let model = SlippageModel::new(dec!(0));
        let pool = PoolId::from("ORCA_USDC_ETH");
        model.apply_update(&pool, Leg::First, dec!(0.98));

        let snapshot = model.snapshot();
        model.apply_update(&pool, Leg::First, dec!(0.5));

        assert_eq!(snapshot.factor(&pool, Leg::First), dec!(0.98));
        assert_eq!(model.factor(&pool, Leg::First), dec!(0.5));
    }

    #[test]
    fn repeated_identical_updates_are_idempotent() {
        let model = SlippageModel::new(dec!(0));
        let pool = PoolId::from("RAYDIUM_USDC_SOL");

        model.apply_update(&pool, Leg::First, dec!(0.95));
        model.apply_update(&pool, Leg::First, dec!(0.95));

        assert_eq!(model.factor(&pool, Leg::First), dec!(0.95));
    }
}
