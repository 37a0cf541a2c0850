//! Quote Types
//!
//! Records produced while quoting routes: per-hop results, full route
//! quotes per slice, and ranked split combinations.

use serde::{Deserialize, Serialize};
use splitroute_core::{PoolId, QuoteErrorKind, Route, TokenId};

/// A successfully quoted hop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HopQuote {
    pub pool_id: PoolId,
    pub input_token: TokenId,
    pub output_token: TokenId,
    pub amount_in: u64,
    pub amount_out: u64,
}

/// Outcome of quoting one pool of one route at one slice
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HopResult {
    Success(HopQuote),
    Failure(QuoteErrorKind),
}

impl HopResult {
    pub fn success(&self) -> Option<&HopQuote> {
        match self {
            Self::Success(quote) => Some(quote),
            Self::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<QuoteErrorKind> {
        match self {
            Self::Success(_) => None,
            Self::Failure(kind) => Some(*kind),
        }
    }
}

/// A complete hop chain for one route at one slice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteQuote {
    pub percent: u8,
    /// Index of the route in the pool graph's candidate list
    pub route_index: usize,
    /// Pools in trade order (input token first)
    pub route: Route,
    pub amount_in: u64,
    pub amount_out: u64,
    pub hops: Vec<HopQuote>,
}

impl RouteQuote {
    pub fn shares_pool_with(&self, other: &RouteQuote) -> bool {
        self.route
            .pools()
            .iter()
            .any(|pool| other.route.pools().contains(pool))
    }
}

/// Route quotes for one percentage bucket, in route enumeration order
/// unless pruned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteBucket {
    pub percent: u8,
    pub amount: u64,
    pub quotes: Vec<RouteQuote>,
}

/// One way to execute the full trade, split across up to `max_splits` routes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitRoute {
    /// Sum of member percentages; always 100
    pub percent: u8,
    pub amount_in: u64,
    pub amount_out: u64,
    pub quotes: Vec<RouteQuote>,
}

impl SplitRoute {
    pub fn from_quotes(quotes: Vec<RouteQuote>) -> Self {
        let percent = quotes.iter().map(|q| q.percent).fold(0u8, u8::saturating_add);
        let amount_in = quotes.iter().map(|q| q.amount_in).fold(0u64, u64::saturating_add);
        let amount_out = quotes.iter().map(|q| q.amount_out).fold(0u64, u64::saturating_add);
        Self {
            percent,
            amount_in,
            amount_out,
            quotes,
        }
    }

    pub fn split_count(&self) -> usize {
        self.quotes.len()
    }
}
