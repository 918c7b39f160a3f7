//! Builders for domain primitives.

use rust_decimal::Decimal;

use crate::domain::{Pool, PoolId, PoolRates, QuotedRate, Route, TokenSymbol};

/// Rate pair quoting `from -> to` at `buy` and `to -> from` at `sell`.
pub fn rates(from: &str, to: &str, buy: Decimal, sell: Decimal) -> PoolRates {
    PoolRates {
        buy: QuotedRate {
            from: TokenSymbol::from(from),
            to: TokenSymbol::from(to),
            rate: buy,
        },
        sell: QuotedRate {
            from: TokenSymbol::from(to),
            to: TokenSymbol::from(from),
            rate: sell,
        },
    }
}

/// Pool built from a `VENUE_TOKENA_TOKENB` id, with the address derived from
/// the id.
pub fn pool(id: &str, buy: Decimal, sell: Decimal) -> Pool {
    let tokens: Vec<&str> = id.split('_').skip(1).collect();
    Pool::ingest(
        PoolId::from(id),
        format!("addr-{id}"),
        rates(tokens[0], tokens[1], buy, sell),
    )
    .expect("test pool id must be well formed")
}

/// Route over two pools with an explicit intermediate and estimate.
pub fn route(first: Pool, second: Pool, intermediate: &str, estimated_profit: Decimal) -> Route {
    Route::new(first, second, intermediate.into(), estimated_profit)
}
