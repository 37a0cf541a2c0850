//! Quote Batch Builder
//!
//! Collects every (slice, route) hop that can be quoted at the current step
//! of the hop loop into one flat batch for the quote engine.

use splitroute_core::{RouterError, TokenId};

use crate::arena::QuoteArena;
use crate::engine::HopQuoteParams;
use crate::quote::HopResult;
use crate::state::PrefetchedState;

/// Where a request's result must be written back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HopSlot {
    pub bucket: usize,
    pub route: usize,
    /// Position of the hop inside the oriented route
    pub position: usize,
}

/// Requests for one step, positionally aligned with their slots
#[derive(Debug, Clone, Default)]
pub struct HopBatch {
    pub slots: Vec<HopSlot>,
    pub params: Vec<HopQuoteParams>,
}

impl HopBatch {
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Hop position quoted at `step` for a route of `route_len` pools.
///
/// Exact-input quotes walk from the first pool forwards; exact-output quotes
/// walk from the last pool backwards. Routes shorter than `step + 1` have no
/// hop at this step.
pub fn hop_position(step: usize, route_len: usize, amount_is_input: bool) -> Option<usize> {
    if step >= route_len {
        return None;
    }
    Some(if amount_is_input {
        step
    } else {
        route_len - 1 - step
    })
}

/// Build the batch for `step`.
///
/// The first hop of each chain trades the slice amount of the token the
/// caller fixed. Later hops trade the neighbouring hop's output (forwards)
/// or required input (backwards); once a hop has failed, nothing further is
/// requested for that chain.
pub fn build_hop_batch(
    arena: &QuoteArena,
    step: usize,
    amount_is_input: bool,
    input_token: &TokenId,
    output_token: &TokenId,
    prefetched: &PrefetchedState,
) -> Result<HopBatch, RouterError> {
    let mut batch = HopBatch::default();

    for (bucket, slice) in arena.slices().iter().enumerate() {
        for (route_idx, oriented) in arena.routes().iter().enumerate() {
            let route_len = oriented.route.len();
            let Some(position) = hop_position(step, route_len, amount_is_input) else {
                continue;
            };
            let chain = arena.chain(bucket, route_idx);

            let (trade_token, amount) = if step == 0 {
                let token = if amount_is_input {
                    input_token
                } else {
                    output_token
                };
                (token.clone(), slice.amount)
            } else {
                let neighbour = if amount_is_input {
                    position - 1
                } else {
                    position + 1
                };
                match chain.get(neighbour) {
                    Some(HopResult::Success(prev)) if amount_is_input => {
                        (prev.output_token.clone(), prev.amount_out)
                    }
                    Some(HopResult::Success(prev)) => (prev.input_token.clone(), prev.amount_in),
                    _ => continue,
                }
            };

            let pool_id = &oriented.route.pools()[position];
            let pool = prefetched.pool(pool_id).ok_or_else(|| {
                RouterError::general(format!("no state fetched for pool {}", pool_id))
            })?;
            let a_to_b = pool.a_to_b(&trade_token, amount_is_input).ok_or_else(|| {
                RouterError::general(format!(
                    "pool {} on route {} does not trade {}",
                    pool_id, oriented.index, trade_token
                ))
            })?;
            let windows = prefetched.windows_for(pool, a_to_b)?;

            batch.slots.push(HopSlot {
                bucket,
                route: route_idx,
                position,
            });
            batch.params.push(HopQuoteParams {
                pool_id: pool_id.clone(),
                trade_token,
                amount,
                amount_is_input,
                a_to_b,
                slippage_tolerance_bps: 0,
                pool: pool.clone(),
                windows,
            });
        }
    }

    Ok(batch)
}
