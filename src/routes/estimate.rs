//! Expected-profit estimation for candidate pool pairs.

use rust_decimal::Decimal;

use crate::domain::{Leg, Pool, Route, TokenSymbol};
use crate::state::SlippageSnapshot;

/// Expected fractional return of trading one unit of anchor through `first`
/// then `second`:
///
/// `first.buy.rate * slip[first][0] * second.sell.rate * slip[second][1] - 1`
pub fn estimate_profit(first: &Pool, second: &Pool, slippage: &SlippageSnapshot) -> Decimal {
    first.buy().rate
        * slippage.factor(first.id(), Leg::First)
        * second.sell().rate
        * slippage.factor(second.id(), Leg::Second)
        - Decimal::ONE
}

/// All candidate routes for one intermediate token, best traversal order per
/// unordered pool pair, sorted descending by estimated profit.
///
/// The sort is stable, so among equal profits the first pair encountered
/// wins. Within a single pair, a tie between the two traversal orders
/// resolves to the `b -> a` order.
pub fn candidate_routes(
    intermediate: &TokenSymbol,
    pools: &[Pool],
    slippage: &SlippageSnapshot,
) -> Vec<Route> {
    let mut routes = Vec::new();

    for x in 0..pools.len() {
        for y in (x + 1)..pools.len() {
            let a = &pools[x];
            let b = &pools[y];

            let a_then_b = estimate_profit(a, b, slippage);
            let b_then_a = estimate_profit(b, a, slippage);

            let route = if a_then_b > b_then_a {
                Route::new(a.clone(), b.clone(), intermediate.clone(), a_then_b)
            } else {
                Route::new(b.clone(), a.clone(), intermediate.clone(), b_then_a)
            };
            routes.push(route);
        }
    }

    routes.sort_by(|a, b| b.estimated_profit().cmp(&a.estimated_profit()));
    routes
}

/// The tick's dispatch set: for each intermediate token with at least one
/// candidate pair, the single best route. Group order is preserved.
pub fn best_route_per_token(
    groups: &[(TokenSymbol, Vec<Pool>)],
    slippage: &SlippageSnapshot,
) -> Vec<Route> {
    groups
        .iter()
        .filter_map(|(token, pools)| candidate_routes(token, pools, slippage).into_iter().next())
        .collect()
}
