//! Pools and the identifiers that name them.
//!
//! A pool id is the composite key reported by the price feed, shaped
//! `VENUE_TOKENA_TOKENB` (the venue segment may carry a `|variant` suffix).
//! The venue is resolved into the closed [`Venue`] set exactly once, when the
//! pool is ingested, so no downstream code re-parses identifier strings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PoolError;

/// A token symbol such as `USDC` or `ETH`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenSymbol(String);

impl TokenSymbol {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TokenSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TokenSymbol {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The feed-assigned identifier of a pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolId(String);

impl PoolId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PoolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PoolId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The closed set of supported DEX venues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Venue {
    Orca,
    Raydium,
}

impl Venue {
    /// Resolve a venue from the leading segment of a pool id.
    pub fn from_prefix(prefix: &str) -> Result<Self, PoolError> {
        // Feed ids occasionally tag the venue segment with a variant suffix,
        // e.g. "ORCA|aqua".
        let base = prefix.split('|').next().unwrap_or(prefix);
        match base {
            "ORCA" => Ok(Self::Orca),
            "RAYDIUM" => Ok(Self::Raydium),
            other => Err(PoolError::UnknownVenuePrefix(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Orca => "ORCA",
            Self::Raydium => "RAYDIUM",
        }
    }
}

impl std::fmt::Display for Venue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which leg of a two-hop cycle a pool is traded as.
///
/// Slippage factors are indexed by leg position, not by which physical pool
/// happens to occupy the position in a given route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leg {
    /// Anchor -> intermediate, priced off the pool's buy rate.
    First,
    /// Intermediate -> anchor, priced off the pool's sell rate.
    Second,
}

impl Leg {
    pub const BOTH: [Leg; 2] = [Leg::First, Leg::Second];

    pub fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }
}

/// One quoted trading direction of a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotedRate {
    pub from: TokenSymbol,
    pub to: TokenSymbol,
    pub rate: Decimal,
}

/// The mutable rate pair delivered by the price feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolRates {
    pub buy: QuotedRate,
    pub sell: QuotedRate,
}

/// A liquidity pool on one venue, trading one token pair.
///
/// Structure is immutable once ingested; only the rates move on feed updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    id: PoolId,
    venue: Venue,
    /// Venue-specific on-chain address.
    address: String,
    tokens: [TokenSymbol; 2],
    rates: PoolRates,
}

impl Pool {
    /// Ingest a pool from a feed entry, resolving venue and token pair from
    /// the identifier once.
    pub fn ingest(id: PoolId, address: String, rates: PoolRates) -> Result<Self, PoolError> {
        let mut segments = id.as_str().split('_');
        let prefix = segments
            .next()
            .ok_or_else(|| PoolError::MalformedPoolId(id.to_string()))?;
        let venue = Venue::from_prefix(prefix)?;

        let (first, second) = match (segments.next(), segments.next()) {
            (Some(a), Some(b)) => (TokenSymbol::from(a), TokenSymbol::from(b)),
            _ => return Err(PoolError::MalformedPoolId(id.to_string())),
        };

        Ok(Self {
            id,
            venue,
            address,
            tokens: [first, second],
            rates,
        })
    }

    pub fn id(&self) -> &PoolId {
        &self.id
    }

    pub fn venue(&self) -> Venue {
        self.venue
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn tokens(&self) -> &[TokenSymbol; 2] {
        &self.tokens
    }

    pub fn buy(&self) -> &QuotedRate {
        &self.rates.buy
    }

    pub fn sell(&self) -> &QuotedRate {
        &self.rates.sell
    }

    /// The quoted rate for the given leg position: buy for the first leg,
    /// sell for the second.
    pub fn rate_for(&self, leg: Leg) -> &QuotedRate {
        match leg {
            Leg::First => &self.rates.buy,
            Leg::Second => &self.rates.sell,
        }
    }

    /// Replace the quoted rates after a feed update.
    pub fn set_rates(&mut self, rates: PoolRates) {
        self.rates = rates;
    }

    /// Whether either side of the pair is `token`.
    pub fn contains(&self, token: &TokenSymbol) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// The non-anchor side of the pair, by first-non-match scan.
    ///
    /// Returns `None` when the anchor sits on both sides, in which case the
    /// pool cannot serve a two-hop cycle.
    pub fn intermediate_for(&self, anchor: &TokenSymbol) -> Option<&TokenSymbol> {
        self.tokens.iter().find(|t| *t != anchor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rates(from: &str, to: &str, buy: Decimal, sell: Decimal) -> PoolRates {
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

    #[test]
    fn ingest_resolves_venue_and_tokens() {
        let pool = Pool::ingest(
            PoolId::from("RAYDIUM_USDC_ETH"),
            "addr".into(),
            rates("USDC", "ETH", dec!(0.001), dec!(990)),
        )
        .unwrap();

        assert_eq!(pool.venue(), Venue::Raydium);
        assert_eq!(pool.tokens()[0], TokenSymbol::from("USDC"));
        assert_eq!(pool.tokens()[1], TokenSymbol::from("ETH"));
    }

    #[test]
    fn ingest_handles_venue_variant_suffix() {
        let pool = Pool::ingest(
            PoolId::from("ORCA|aqua_USDC_SOL"),
            "addr".into(),
            rates("USDC", "SOL", dec!(0.01), dec!(99)),
        )
        .unwrap();

        assert_eq!(pool.venue(), Venue::Orca);
    }

    #[test]
    fn ingest_rejects_unknown_venue() {
        let err = Pool::ingest(
            PoolId::from("SERUM_USDC_SOL"),
            "addr".into(),
            rates("USDC", "SOL", dec!(0.01), dec!(99)),
        )
        .unwrap_err();

        assert_eq!(err, PoolError::UnknownVenuePrefix("SERUM".to_string()));
    }

    #[test]
    fn ingest_rejects_malformed_id() {
        let err = Pool::ingest(
            PoolId::from("ORCA_USDC"),
            "addr".into(),
            rates("USDC", "SOL", dec!(0.01), dec!(99)),
        )
        .unwrap_err();

        assert!(matches!(err, PoolError::MalformedPoolId(_)));
    }

    #[test]
    fn intermediate_is_first_non_anchor_token() {
        let pool = Pool::ingest(
            PoolId::from("ORCA_USDC_ETH"),
            "addr".into(),
            rates("USDC", "ETH", dec!(0.001), dec!(990)),
        )
        .unwrap();

        let anchor = TokenSymbol::from("USDC");
        assert_eq!(
            pool.intermediate_for(&anchor),
            Some(&TokenSymbol::from("ETH"))
        );

        // Anchor on the far side too.
        let anchor = TokenSymbol::from("ETH");
        assert_eq!(
            pool.intermediate_for(&anchor),
            Some(&TokenSymbol::from("USDC"))
        );
    }
}
