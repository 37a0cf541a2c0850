//! Shared fixtures for unit tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use splitroute_core::{PoolId, PoolInfo, PoolRegistry, QuoteErrorKind, Route, TokenId};

use crate::constant_product::InMemoryStateFetcher;
use crate::engine::{EngineQuote, EngineResult, HopQuoteParams, QuoteEngine};
use crate::state::{PoolState, PrefetchedState};

pub const TICK_SPACING: u16 = 64;

pub fn pool_info(id: &str, token_a: &str, token_b: &str) -> PoolInfo {
    PoolInfo {
        token_a: TokenId::new(token_a),
        token_b: TokenId::new(token_b),
        vault_a: format!("{}_vault_a", id),
        vault_b: format!("{}_vault_b", id),
        tick_current_index: 0,
        tick_spacing: TICK_SPACING,
        address: format!("addr_{}", id),
    }
}

pub fn registry(pools: &[(&str, &str, &str)]) -> PoolRegistry {
    pools
        .iter()
        .map(|&(id, a, b)| (PoolId::new(id), pool_info(id, a, b)))
        .collect()
}

pub fn route(pools: &[&str]) -> Route {
    Route::new(pools.iter().map(|p| PoolId::new(*p)).collect())
}

pub fn pool_state(id: &str, token_a: &str, token_b: &str, reserve_a: u64, reserve_b: u64) -> PoolState {
    PoolState {
        pool_id: PoolId::new(id),
        token_a: TokenId::new(token_a),
        token_b: TokenId::new(token_b),
        reserve_a,
        reserve_b,
        liquidity: u128::from(reserve_a.min(reserve_b)),
        sqrt_price: 1 << 64,
        tick_current_index: 0,
        tick_spacing: TICK_SPACING,
        fee_rate: 3_000,
    }
}

/// Prefetched state with deep, balanced reserves for every pool.
pub fn prefetched(pools: &[(&str, &str, &str)]) -> PrefetchedState {
    let states = pools
        .iter()
        .map(|&(id, a, b)| pool_state(id, a, b, 1_000_000_000, 1_000_000_000))
        .collect();
    PrefetchedState::new(states, Vec::new())
}

/// In-memory fetcher holding the given `(id, token_a, token_b, reserve_a, reserve_b)` pools.
pub fn fetcher(pools: &[(&str, &str, &str, u64, u64)]) -> InMemoryStateFetcher {
    pools
        .iter()
        .fold(InMemoryStateFetcher::new(), |fetcher, &(id, a, b, ra, rb)| {
            fetcher.with_pool(pool_state(id, a, b, ra, rb))
        })
}

/// Quote engine with fixed per-pool exchange rates and scripted failures.
///
/// Every batch it receives is recorded as `(pool, amount)` pairs.
#[derive(Default)]
pub struct ScriptedEngine {
    rates: HashMap<PoolId, u64>,
    failures: HashMap<PoolId, QuoteErrorKind>,
    limits: HashMap<PoolId, u64>,
    truncate: bool,
    unavailable: bool,
    batches: Mutex<Vec<Vec<(PoolId, u64)>>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact-input quotes return `amount * rate`; defaults to 1.
    pub fn with_rate(mut self, pool: &str, rate: u64) -> Self {
        self.rates.insert(PoolId::new(pool), rate);
        self
    }

    pub fn failing(mut self, pool: &str, kind: QuoteErrorKind) -> Self {
        self.failures.insert(PoolId::new(pool), kind);
        self
    }

    /// Exhaust the pool for any specified amount above `max_amount`.
    pub fn with_limit(mut self, pool: &str, max_amount: u64) -> Self {
        self.limits.insert(PoolId::new(pool), max_amount);
        self
    }

    pub fn truncating_results(mut self) -> Self {
        self.truncate = true;
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    pub fn batches(&self) -> Vec<Vec<(PoolId, u64)>> {
        self.batches.lock().unwrap().clone()
    }

    fn quote(&self, params: &HopQuoteParams) -> EngineResult {
        if let Some(kind) = self.failures.get(&params.pool_id) {
            return Err(*kind);
        }
        if let Some(&limit) = self.limits.get(&params.pool_id) {
            if params.amount > limit {
                return Err(QuoteErrorKind::SequenceExhausted);
            }
        }
        let rate = self.rates.get(&params.pool_id).copied().unwrap_or(1);
        Ok(if params.amount_is_input {
            EngineQuote {
                amount_in: params.amount,
                amount_out: params.amount * rate,
            }
        } else {
            EngineQuote {
                amount_in: params.amount.div_ceil(rate),
                amount_out: params.amount,
            }
        })
    }
}

#[async_trait]
impl QuoteEngine for ScriptedEngine {
    async fn batch_quote(&self, requests: &[HopQuoteParams]) -> anyhow::Result<Vec<EngineResult>> {
        if self.unavailable {
            anyhow::bail!("quote engine unavailable");
        }
        self.batches.lock().unwrap().push(
            requests
                .iter()
                .map(|r| (r.pool_id.clone(), r.amount))
                .collect(),
        );
        let mut results: Vec<EngineResult> = requests.iter().map(|r| self.quote(r)).collect();
        if self.truncate {
            results.pop();
        }
        Ok(results)
    }
}
