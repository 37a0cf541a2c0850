//! Prefetched Pool State
//!
//! Snapshot of on-chain pool and price-range state, fetched once per
//! optimizer call and shared by every hop.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use splitroute_core::{PoolId, PoolRegistry, RouterError, TokenId};

/// Number of ticks (in units of tick spacing) covered by one window.
pub const TICKS_PER_WINDOW: i32 = 88;

/// Number of windows a single swap may traverse.
pub const WINDOWS_PER_SWAP: usize = 3;

pub const MIN_TICK: i32 = -443_636;
pub const MAX_TICK: i32 = 443_636;

/// Live pool state returned by the state fetcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolState {
    pub pool_id: PoolId,
    pub token_a: TokenId,
    pub token_b: TokenId,
    /// Balance of the `token_a` vault
    pub reserve_a: u64,
    /// Balance of the `token_b` vault
    pub reserve_b: u64,
    pub liquidity: u128,
    pub sqrt_price: u128,
    pub tick_current_index: i32,
    pub tick_spacing: u16,
    /// Swap fee in hundredths of a basis point (3000 = 0.3%)
    pub fee_rate: u32,
}

impl PoolState {
    /// Swap direction when `trade_token` is the token being specified.
    ///
    /// Returns `None` if the token is not one of the pool's sides.
    pub fn a_to_b(&self, trade_token: &TokenId, amount_is_input: bool) -> Option<bool> {
        let is_a = if *trade_token == self.token_a {
            true
        } else if *trade_token == self.token_b {
            false
        } else {
            return None;
        };
        Some(is_a == amount_is_input)
    }

    /// `(input_token, output_token)` for a swap in the given direction.
    pub fn swap_tokens(&self, a_to_b: bool) -> (&TokenId, &TokenId) {
        if a_to_b {
            (&self.token_a, &self.token_b)
        } else {
            (&self.token_b, &self.token_a)
        }
    }

    /// `(reserve_in, reserve_out)` for a swap in the given direction.
    pub fn reserves(&self, a_to_b: bool) -> (u64, u64) {
        if a_to_b {
            (self.reserve_a, self.reserve_b)
        } else {
            (self.reserve_b, self.reserve_a)
        }
    }
}

/// Identifies one price-range window of a pool
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowKey {
    pub pool_id: PoolId,
    pub start_tick_index: i32,
}

/// Liquidity boundary inside a window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializedTick {
    pub tick_index: i32,
    pub liquidity_net: i128,
}

/// A fixed-size run of ticks holding liquidity boundaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeWindow {
    pub pool_id: PoolId,
    pub start_tick_index: i32,
    #[serde(default)]
    pub ticks: Vec<InitializedTick>,
}

impl PriceRangeWindow {
    pub fn key(&self) -> WindowKey {
        WindowKey {
            pool_id: self.pool_id.clone(),
            start_tick_index: self.start_tick_index,
        }
    }
}

fn window_span(tick_spacing: u16) -> i32 {
    i32::from(tick_spacing) * TICKS_PER_WINDOW
}

/// Start index of the window containing `tick`.
pub fn window_start_index(tick: i32, tick_spacing: u16) -> i32 {
    let span = window_span(tick_spacing);
    tick - tick.rem_euclid(span)
}

/// Start indexes of the windows a swap starting at `tick` walks through,
/// nearest first, clamped to the valid tick range.
pub fn window_starts_for_swap(tick: i32, tick_spacing: u16, a_to_b: bool) -> Vec<i32> {
    let span = window_span(tick_spacing);
    let lowest = window_start_index(MIN_TICK, tick_spacing);
    let highest = window_start_index(MAX_TICK, tick_spacing);
    let start = window_start_index(tick.clamp(MIN_TICK, MAX_TICK), tick_spacing);

    (0..WINDOWS_PER_SWAP as i32)
        .map(|i| if a_to_b { start - i * span } else { start + i * span })
        .take_while(|s| (lowest..=highest).contains(s))
        .collect()
}

/// Every window key needed to quote `pool_ids` in both directions.
///
/// Fails if a pool is missing from the registry or has a zero tick spacing.
pub fn plan_window_keys(
    pool_ids: &[PoolId],
    registry: &PoolRegistry,
) -> Result<Vec<WindowKey>, RouterError> {
    let mut keys = BTreeSet::new();
    for pool_id in pool_ids {
        let info = registry
            .get(pool_id)
            .ok_or_else(|| RouterError::general(format!("pool {} is not registered", pool_id)))?;
        if info.tick_spacing == 0 {
            return Err(RouterError::general(format!(
                "pool {} has zero tick spacing",
                pool_id
            )));
        }
        for a_to_b in [true, false] {
            for start in window_starts_for_swap(info.tick_current_index, info.tick_spacing, a_to_b)
            {
                keys.insert(WindowKey {
                    pool_id: pool_id.clone(),
                    start_tick_index: start,
                });
            }
        }
    }
    Ok(keys.into_iter().collect())
}

/// Pool states and windows fetched for one optimizer call
#[derive(Debug, Clone, Default)]
pub struct PrefetchedState {
    pools: HashMap<PoolId, Arc<PoolState>>,
    windows: HashMap<WindowKey, Arc<PriceRangeWindow>>,
}

impl PrefetchedState {
    pub fn new(pools: Vec<PoolState>, windows: Vec<PriceRangeWindow>) -> Self {
        Self {
            pools: pools
                .into_iter()
                .map(|p| (p.pool_id.clone(), Arc::new(p)))
                .collect(),
            windows: windows.into_iter().map(|w| (w.key(), Arc::new(w))).collect(),
        }
    }

    pub fn pool(&self, pool_id: &PoolId) -> Option<&Arc<PoolState>> {
        self.pools.get(pool_id)
    }

    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// Windows for a swap on `pool`, nearest first. Windows that were not
    /// fetched are `None`; the quote engine decides whether it needs them.
    pub fn windows_for(
        &self,
        pool: &PoolState,
        a_to_b: bool,
    ) -> Result<Vec<Option<Arc<PriceRangeWindow>>>, RouterError> {
        if pool.tick_spacing == 0 {
            return Err(RouterError::general(format!(
                "pool {} has zero tick spacing",
                pool.pool_id
            )));
        }
        Ok(
            window_starts_for_swap(pool.tick_current_index, pool.tick_spacing, a_to_b)
                .into_iter()
                .map(|start_tick_index| {
                    self.windows
                        .get(&WindowKey {
                            pool_id: pool.pool_id.clone(),
                            start_tick_index,
                        })
                        .cloned()
                })
                .collect(),
        )
    }
}
