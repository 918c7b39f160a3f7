//! Latest-known pool rates, refreshed by push updates from the price feed.

use parking_lot::RwLock;
use tracing::warn;

use crate::domain::{Pool, PoolId, PoolRates};

/// Insertion-ordered store of the latest rates per pool.
///
/// Pools are never deleted; a pool whose tokens leave the allow-list is
/// simply filtered out at enumeration time.
pub struct PriceBook {
    pools: RwLock<Vec<Pool>>,
}

impl PriceBook {
    pub fn new() -> Self {
        Self {
            pools: RwLock::new(Vec::new()),
        }
    }

    /// Apply a feed update. A known pool gets its rates replaced in place,
    /// preserving insertion order; an unknown id is ingested as a new pool.
    pub fn apply_update(&self, id: PoolId, address: String, rates: PoolRates) {
        let mut pools = self.pools.write();
        if let Some(existing) = pools.iter_mut().find(|p| p.id() == &id) {
            existing.set_rates(rates);
            return;
        }
        match Pool::ingest(id, address, rates) {
            Ok(pool) => pools.push(pool),
            Err(e) => warn!(error = %e, "Dropping unparseable feed entry"),
        }
    }

    /// Copy-on-read snapshot of every pool, in insertion order.
    pub fn snapshot(&self) -> Vec<Pool> {
        self.pools.read().clone()
    }

    pub fn len(&self) -> usize {
        self.pools.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PriceBook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{QuotedRate, TokenSymbol};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn rates(buy: Decimal) -> PoolRates {
        PoolRates {
            buy: QuotedRate {
                from: TokenSymbol::from("USDC"),
                to: TokenSymbol::from("ETH"),
                rate: buy,
            },
            sell: QuotedRate {
                from: TokenSymbol::from("ETH"),
                to: TokenSymbol::from("USDC"),
                rate: dec!(1000),
            },
        }
    }

    #[test]
    fn update_replaces_rates_in_place() {
        let book = PriceBook::new();
        book.apply_update(PoolId::from("ORCA_USDC_ETH"), "a1".into(), rates(dec!(0.001)));
        book.apply_update(PoolId::from("RAYDIUM_USDC_ETH"), "a2".into(), rates(dec!(0.002)));
        book.apply_update(PoolId::from("ORCA_USDC_ETH"), "a1".into(), rates(dec!(0.003)));

        let snapshot = book.snapshot();
        assert_eq!(snapshot.len(), 2);
        // Order preserved, rate replaced.
        assert_eq!(snapshot[0].id(), &PoolId::from("ORCA_USDC_ETH"));
        assert_eq!(snapshot[0].buy().rate, dec!(0.003));
    }

    #[test]
    fn unparseable_entries_are_dropped() {
        let book = PriceBook::new();
        book.apply_update(PoolId::from("bogus"), "a".into(), rates(dec!(1)));
        assert!(book.is_empty());
    }

    #[test]
    fn snapshot_is_detached_from_live_state() {
        let book = PriceBook::new();
        book.apply_update(PoolId::from("ORCA_USDC_ETH"), "a1".into(), rates(dec!(0.001)));

        let snapshot = book.snapshot();
        book.apply_update(PoolId::from("ORCA_USDC_ETH"), "a1".into(), rates(dec!(0.009)));

        assert_eq!(snapshot[0].buy().rate, dec!(0.001));
    }
}
