//! Candidate routes and completed-trade records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::{Pool, TokenSymbol};

/// An ordered two-hop cycle through one intermediate token, back to the
/// anchor. Recomputed every tick; never persisted.
#[derive(Debug, Clone)]
pub struct Route {
    first: Pool,
    second: Pool,
    intermediate: TokenSymbol,
    /// Fractional expected return for one unit of anchor token
    /// (0.004 = 0.4%).
    estimated_profit: Decimal,
}

impl Route {
    pub fn new(
        first: Pool,
        second: Pool,
        intermediate: TokenSymbol,
        estimated_profit: Decimal,
    ) -> Self {
        Self {
            first,
            second,
            intermediate,
            estimated_profit,
        }
    }

    pub fn first(&self) -> &Pool {
        &self.first
    }

    pub fn second(&self) -> &Pool {
        &self.second
    }

    /// The pool traded at the given leg position.
    pub fn pool_at(&self, index: usize) -> &Pool {
        if index == 0 {
            &self.first
        } else {
            &self.second
        }
    }

    pub fn intermediate(&self) -> &TokenSymbol {
        &self.intermediate
    }

    pub fn estimated_profit(&self) -> Decimal {
        self.estimated_profit
    }

    /// `POOL_A -> POOL_B`, for log context.
    pub fn describe(&self) -> String {
        format!("{} -> {}", self.first.id(), self.second.id())
    }
}

/// Append-only audit record for one completed trade.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TradeRecord {
    pub starting_amount: Decimal,
    pub ending_amount: Decimal,
    pub net_profit: Decimal,
    pub expected_profit: Decimal,
    pub transaction_id: String,
    pub timestamp: DateTime<Utc>,
}
