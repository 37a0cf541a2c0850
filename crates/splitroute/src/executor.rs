//! Hop Quote Executor
//!
//! Sends one batch per hop step to the quote engine and writes each result
//! back to the chain it belongs to.

use splitroute_core::RouterError;

use crate::arena::QuoteArena;
use crate::batch::HopBatch;
use crate::engine::{EngineResult, HopQuoteParams, QuoteEngine};
use crate::quote::{HopQuote, HopResult};

/// Quote `batch` and store the results in `arena`.
///
/// Returns the number of requests the engine rejected. Rejections only mark
/// their own chain; a failed or misaligned batch aborts the call.
pub async fn execute_hop<E>(
    engine: &E,
    batch: &HopBatch,
    arena: &mut QuoteArena,
) -> Result<usize, RouterError>
where
    E: QuoteEngine + ?Sized,
{
    if batch.is_empty() {
        return Ok(0);
    }

    let results = engine.batch_quote(&batch.params).await?;
    if results.len() != batch.len() {
        return Err(RouterError::general(format!(
            "quote engine returned {} results for {} requests",
            results.len(),
            batch.len()
        )));
    }

    let mut failures = 0;
    for ((slot, params), result) in batch.slots.iter().zip(&batch.params).zip(results) {
        let hop = to_hop_result(params, result);
        if let HopResult::Failure(kind) = &hop {
            failures += 1;
            tracing::debug!(
                "Hop {} of route {} failed on pool {} for {} {}: {}",
                slot.position,
                slot.route,
                params.pool_id,
                params.amount,
                params.trade_token,
                kind
            );
        }
        arena
            .chain_mut(slot.bucket, slot.route)
            .set(slot.position, hop);
    }

    Ok(failures)
}

fn to_hop_result(params: &HopQuoteParams, result: EngineResult) -> HopResult {
    match result {
        Ok(quote) => {
            let (input_token, output_token) = params.pool.swap_tokens(params.a_to_b);
            HopResult::Success(HopQuote {
                pool_id: params.pool_id.clone(),
                input_token: input_token.clone(),
                output_token: output_token.clone(),
                amount_in: quote.amount_in,
                amount_out: quote.amount_out,
            })
        }
        Err(kind) => HopResult::Failure(kind),
    }
}
