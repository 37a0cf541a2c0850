//! External Collaborators
//!
//! The optimizer never touches the network or the per-pool swap math
//! itself. It talks to a [`StateFetcher`] once per call and to a
//! [`QuoteEngine`] once per hop.

use std::sync::Arc;

use async_trait::async_trait;
use splitroute_core::{PoolId, QuoteErrorKind, TokenId};

use crate::state::{PoolState, PriceRangeWindow, WindowKey};

/// One speculative quote request for a single pool
#[derive(Debug, Clone)]
pub struct HopQuoteParams {
    pub pool_id: PoolId,
    /// Token whose amount is specified
    pub trade_token: TokenId,
    pub amount: u64,
    pub amount_is_input: bool,
    pub a_to_b: bool,
    /// Always zero: these quotes are compared, never executed
    pub slippage_tolerance_bps: u16,
    pub pool: Arc<PoolState>,
    /// Windows the swap may walk through, nearest first
    pub windows: Vec<Option<Arc<PriceRangeWindow>>>,
}

/// Amounts produced by the engine for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineQuote {
    pub amount_in: u64,
    pub amount_out: u64,
}

/// Outcome of a single request inside a batch
pub type EngineResult = Result<EngineQuote, QuoteErrorKind>;

/// Batched per-pool swap quoting.
///
/// The returned vector must be positionally aligned with `requests`:
/// entry `i` answers request `i`. An `Err` for the whole call means the
/// batch could not be evaluated at all.
#[async_trait]
pub trait QuoteEngine: Send + Sync {
    async fn batch_quote(&self, requests: &[HopQuoteParams]) -> anyhow::Result<Vec<EngineResult>>;
}

/// Retrieval of on-chain pool and price-range state.
///
/// Entities that do not exist on-chain are simply absent from the result.
#[async_trait]
pub trait StateFetcher: Send + Sync {
    async fn prefetch_pools(&self, pool_ids: &[PoolId]) -> anyhow::Result<Vec<PoolState>>;

    async fn prefetch_price_range_windows(
        &self,
        keys: &[WindowKey],
    ) -> anyhow::Result<Vec<PriceRangeWindow>>;
}

#[async_trait]
impl<T: QuoteEngine + ?Sized> QuoteEngine for Arc<T> {
    async fn batch_quote(&self, requests: &[HopQuoteParams]) -> anyhow::Result<Vec<EngineResult>> {
        (**self).batch_quote(requests).await
    }
}

#[async_trait]
impl<T: StateFetcher + ?Sized> StateFetcher for Arc<T> {
    async fn prefetch_pools(&self, pool_ids: &[PoolId]) -> anyhow::Result<Vec<PoolState>> {
        (**self).prefetch_pools(pool_ids).await
    }

    async fn prefetch_price_range_windows(
        &self,
        keys: &[WindowKey],
    ) -> anyhow::Result<Vec<PriceRangeWindow>> {
        (**self).prefetch_price_range_windows(keys).await
    }
}
