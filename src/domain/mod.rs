//! Venue-agnostic domain types: tokens, pools, legs, and routes.

mod pool;
mod route;

pub use pool::{Leg, Pool, PoolId, PoolRates, QuotedRate, TokenSymbol, Venue};
pub use route::{Route, TradeRecord};
