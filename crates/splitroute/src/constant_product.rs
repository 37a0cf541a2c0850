//! Reserve-Based Reference Collaborators
//!
//! A [`QuoteEngine`] for constant-product pools and an in-memory
//! [`StateFetcher`], for hosts whose pools are reserve-based and for
//! exercising the optimizer without a network.

use std::collections::HashMap;

use async_trait::async_trait;
use splitroute_core::{PoolId, QuoteErrorKind};

use crate::calculator::{calculate_input, calculate_output, calculate_price_impact};
use crate::engine::{EngineQuote, EngineResult, HopQuoteParams, QuoteEngine, StateFetcher};
use crate::state::{window_starts_for_swap, PoolState, PriceRangeWindow, WindowKey};

/// Quotes swaps against pool vault reserves with x * y = k
#[derive(Debug, Clone, Default)]
pub struct ConstantProductEngine {
    max_price_impact_pct: Option<f64>,
}

impl ConstantProductEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject swaps that move the price by more than `pct` percent.
    pub fn with_max_price_impact(pct: f64) -> Self {
        Self {
            max_price_impact_pct: Some(pct),
        }
    }

    pub fn quote(&self, params: &HopQuoteParams) -> EngineResult {
        if !matches!(params.windows.first(), Some(Some(_))) {
            return Err(QuoteErrorKind::RangeNotInitialized);
        }
        if params.amount == 0 {
            return Err(QuoteErrorKind::ZeroTradableAmount);
        }

        let pool = &params.pool;
        let (reserves_in, reserves_out) = pool.reserves(params.a_to_b);

        let quote = if params.amount_is_input {
            let amount_out =
                calculate_output(reserves_in, reserves_out, params.amount, pool.fee_rate);
            if amount_out == 0 {
                return Err(QuoteErrorKind::ZeroTradableAmount);
            }
            EngineQuote {
                amount_in: params.amount,
                amount_out,
            }
        } else {
            let amount_in = calculate_input(reserves_in, reserves_out, params.amount, pool.fee_rate)
                .ok_or(QuoteErrorKind::SequenceExhausted)?;
            EngineQuote {
                amount_in,
                amount_out: params.amount,
            }
        };

        if let Some(max_impact) = self.max_price_impact_pct {
            let impact =
                calculate_price_impact(reserves_in, reserves_out, quote.amount_in, quote.amount_out);
            if impact > max_impact {
                return Err(QuoteErrorKind::PriceLimitExceeded);
            }
        }

        Ok(quote)
    }
}

#[async_trait]
impl QuoteEngine for ConstantProductEngine {
    async fn batch_quote(&self, requests: &[HopQuoteParams]) -> anyhow::Result<Vec<EngineResult>> {
        Ok(requests.iter().map(|params| self.quote(params)).collect())
    }
}

/// Serves pool state from memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryStateFetcher {
    pools: HashMap<PoolId, PoolState>,
    windows: HashMap<WindowKey, PriceRangeWindow>,
}

impl InMemoryStateFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pool together with empty windows around its current tick.
    pub fn with_pool(mut self, state: PoolState) -> Self {
        if state.tick_spacing > 0 {
            for a_to_b in [true, false] {
                for start in
                    window_starts_for_swap(state.tick_current_index, state.tick_spacing, a_to_b)
                {
                    let window = PriceRangeWindow {
                        pool_id: state.pool_id.clone(),
                        start_tick_index: start,
                        ticks: Vec::new(),
                    };
                    self.windows.insert(window.key(), window);
                }
            }
        }
        self.pools.insert(state.pool_id.clone(), state);
        self
    }

    /// Add a pool without any windows.
    pub fn with_bare_pool(mut self, state: PoolState) -> Self {
        self.pools.insert(state.pool_id.clone(), state);
        self
    }

    pub fn with_window(mut self, window: PriceRangeWindow) -> Self {
        self.windows.insert(window.key(), window);
        self
    }
}

#[async_trait]
impl StateFetcher for InMemoryStateFetcher {
    async fn prefetch_pools(&self, pool_ids: &[PoolId]) -> anyhow::Result<Vec<PoolState>> {
        Ok(pool_ids
            .iter()
            .filter_map(|id| self.pools.get(id).cloned())
            .collect())
    }

    async fn prefetch_price_range_windows(
        &self,
        keys: &[WindowKey],
    ) -> anyhow::Result<Vec<PriceRangeWindow>> {
        Ok(keys
            .iter()
            .filter_map(|key| self.windows.get(key).cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PrefetchedState;
    use splitroute_core::TokenId;
    use std::sync::Arc;

    fn pool(reserve_a: u64, reserve_b: u64) -> PoolState {
        PoolState {
            pool_id: PoolId::new("p1"),
            token_a: TokenId::new("sol"),
            token_b: TokenId::new("usdc"),
            reserve_a,
            reserve_b,
            liquidity: 0,
            sqrt_price: 0,
            tick_current_index: 0,
            tick_spacing: 64,
            fee_rate: 3_000,
        }
    }

    async fn params(
        state: PoolState,
        trade_token: &str,
        amount: u64,
        amount_is_input: bool,
    ) -> HopQuoteParams {
        let fetcher = InMemoryStateFetcher::new().with_pool(state.clone());
        let keys: Vec<WindowKey> = [true, false]
            .iter()
            .flat_map(|&dir| {
                window_starts_for_swap(0, 64, dir).into_iter().map(|s| WindowKey {
                    pool_id: PoolId::new("p1"),
                    start_tick_index: s,
                })
            })
            .collect();
        let windows = fetcher.prefetch_price_range_windows(&keys).await.unwrap();
        let prefetched = PrefetchedState::new(vec![state.clone()], windows);
        let trade_token = TokenId::new(trade_token);
        let a_to_b = state.a_to_b(&trade_token, amount_is_input).unwrap();
        HopQuoteParams {
            pool_id: PoolId::new("p1"),
            trade_token,
            amount,
            amount_is_input,
            a_to_b,
            slippage_tolerance_bps: 0,
            windows: prefetched.windows_for(&state, a_to_b).unwrap(),
            pool: Arc::new(state),
        }
    }

    #[tokio::test]
    async fn test_exact_input_quote() {
        let engine = ConstantProductEngine::new();
        let quote = engine
            .quote(&params(pool(1_000_000, 1_000_000), "sol", 10_000, true).await)
            .unwrap();
        assert_eq!(quote.amount_in, 10_000);
        assert_eq!(quote.amount_out, 9_871);
    }

    #[tokio::test]
    async fn test_exact_output_quote_uses_reverse_reserves() {
        let engine = ConstantProductEngine::new();
        // Buying sol with usdc: usdc flows in, so b -> a
        let p = params(pool(1_000_000, 4_000_000), "sol", 1_000, false).await;
        assert!(!p.a_to_b);
        let quote = engine.quote(&p).unwrap();
        assert_eq!(quote.amount_out, 1_000);
        assert!(quote.amount_in > 4_000);
    }

    #[tokio::test]
    async fn test_exact_output_beyond_reserves_exhausts() {
        let engine = ConstantProductEngine::new();
        let p = params(pool(1_000, 1_000), "usdc", 1_000, false).await;
        assert_eq!(engine.quote(&p), Err(QuoteErrorKind::SequenceExhausted));
    }

    #[tokio::test]
    async fn test_dust_input_has_zero_output() {
        let engine = ConstantProductEngine::new();
        let p = params(pool(1_000_000_000, 10), "sol", 1, true).await;
        assert_eq!(engine.quote(&p), Err(QuoteErrorKind::ZeroTradableAmount));
    }

    #[tokio::test]
    async fn test_price_impact_cap() {
        let engine = ConstantProductEngine::with_max_price_impact(1.0);
        let small = params(pool(1_000_000, 1_000_000), "sol", 1_000, true).await;
        assert!(engine.quote(&small).is_ok());
        let large = params(pool(1_000_000, 1_000_000), "sol", 100_000, true).await;
        assert_eq!(engine.quote(&large), Err(QuoteErrorKind::PriceLimitExceeded));
    }

    #[tokio::test]
    async fn test_missing_window_is_uninitialized() {
        let engine = ConstantProductEngine::new();
        let mut p = params(pool(1_000_000, 1_000_000), "sol", 1_000, true).await;
        p.windows = vec![None, None, None];
        assert_eq!(engine.quote(&p), Err(QuoteErrorKind::RangeNotInitialized));
    }

    #[tokio::test]
    async fn test_fetcher_skips_unknown_entities() {
        let fetcher = InMemoryStateFetcher::new().with_bare_pool(pool(1, 1));
        let pools = fetcher
            .prefetch_pools(&[PoolId::new("p1"), PoolId::new("p9")])
            .await
            .unwrap();
        assert_eq!(pools.len(), 1);
        let windows = fetcher
            .prefetch_price_range_windows(&[WindowKey {
                pool_id: PoolId::new("p1"),
                start_tick_index: 0,
            }])
            .await
            .unwrap();
        assert!(windows.is_empty());
    }
}
