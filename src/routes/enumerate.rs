//! Grouping of anchor-token pools by intermediate token.

use std::collections::HashSet;

use crate::domain::{Pool, TokenSymbol};

/// Group every pool that trades the anchor token, and whose non-anchor side
/// is allow-listed, by that non-anchor ("intermediate") token.
///
/// Pure function of the given snapshot. Both the group order and the pool
/// order within a group follow the snapshot's insertion order. A pool whose
/// two sides are both the anchor token has no intermediate and is skipped.
pub fn group_by_intermediate(
    anchor: &TokenSymbol,
    valid_tokens: &HashSet<TokenSymbol>,
    pools: &[Pool],
) -> Vec<(TokenSymbol, Vec<Pool>)> {
    let mut groups: Vec<(TokenSymbol, Vec<Pool>)> = Vec::new();

    for pool in pools {
        if !pool.contains(anchor) {
            continue;
        }
        let Some(intermediate) = pool.intermediate_for(anchor) else {
            continue;
        };
        if !valid_tokens.contains(intermediate) {
            continue;
        }

        match groups.iter_mut().find(|(token, _)| token == intermediate) {
            Some((_, members)) => members.push(pool.clone()),
            None => groups.push((intermediate.clone(), vec![pool.clone()])),
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PoolId, PoolRates, QuotedRate};
    use rust_decimal_macros::dec;

    fn pool(id: &str) -> Pool {
        let tokens: Vec<&str> = id.split('_').skip(1).collect();
        Pool::ingest(
            PoolId::from(id),
            format!("addr-{id}"),
            PoolRates {
                buy: QuotedRate {
                    from: TokenSymbol::from(tokens[0]),
                    to: TokenSymbol::from(tokens[1]),
                    rate: dec!(1),
                },
                sell: QuotedRate {
                    from: TokenSymbol::from(tokens[1]),
                    to: TokenSymbol::from(tokens[0]),
                    rate: dec!(1),
                },
            },
        )
        .unwrap()
    }

    fn valid(tokens: &[&str]) -> HashSet<TokenSymbol> {
        tokens.iter().map(|t| TokenSymbol::from(*t)).collect()
    }

    #[test]
    fn groups_anchor_pools_by_intermediate() {
        let pools = vec![
            pool("ORCA_USDC_ETH"),
            pool("RAYDIUM_USDC_SOL"),
            pool("RAYDIUM_USDC_ETH"),
        ];
        let anchor = TokenSymbol::from("USDC");

        let groups = group_by_intermediate(&anchor, &valid(&["ETH", "SOL"]), &pools);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, TokenSymbol::from("ETH"));
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[0].1[0].id(), &PoolId::from("ORCA_USDC_ETH"));
        assert_eq!(groups[0].1[1].id(), &PoolId::from("RAYDIUM_USDC_ETH"));
        assert_eq!(groups[1].0, TokenSymbol::from("SOL"));
    }

    #[test]
    fn excludes_pools_without_anchor() {
        let pools = vec![pool("ORCA_SOL_ETH")];
        let anchor = TokenSymbol::from("USDC");

        let groups = group_by_intermediate(&anchor, &valid(&["ETH", "SOL"]), &pools);
        assert!(groups.is_empty());
    }

    #[test]
    fn excludes_non_allowlisted_intermediates() {
        let pools = vec![pool("ORCA_USDC_ETH"), pool("ORCA_USDC_SAMO")];
        let anchor = TokenSymbol::from("USDC");

        let groups = group_by_intermediate(&anchor, &valid(&["ETH"]), &pools);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0, TokenSymbol::from("ETH"));
    }

    #[test]
    fn skips_anchor_anchor_pools() {
        let pools = vec![pool("ORCA_USDC_USDC")];
        let anchor = TokenSymbol::from("USDC");

        let groups = group_by_intermediate(&anchor, &valid(&["USDC", "ETH"]), &pools);
        assert!(groups.is_empty());
    }
}
