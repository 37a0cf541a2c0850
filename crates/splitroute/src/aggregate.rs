//! Quote Aggregator
//!
//! Turns finished hop chains into route quotes and records why the
//! unfinished ones failed.

use std::collections::BTreeSet;

use splitroute_core::QuoteErrorKind;

use crate::arena::QuoteArena;
use crate::quote::{HopResult, QuoteBucket, RouteQuote};

/// Failure kinds observed during one optimizer call
pub type FailureSet = BTreeSet<QuoteErrorKind>;

/// Collect complete chains into one bucket per slice.
///
/// The side the caller fixed carries exactly the slice amount; the other
/// side comes from the far end of the chain. Incomplete chains are dropped
/// and their first failure kind is added to `failures`.
pub fn aggregate_quotes(
    arena: &QuoteArena,
    amount_is_input: bool,
    failures: &mut FailureSet,
) -> Vec<QuoteBucket> {
    arena
        .slices()
        .iter()
        .enumerate()
        .map(|(bucket, slice)| {
            let mut quotes = Vec::new();
            for (route_idx, oriented) in arena.routes().iter().enumerate() {
                let chain = arena.chain(bucket, route_idx);
                let hops: Vec<_> = chain
                    .hops()
                    .filter_map(|hop| hop.and_then(HopResult::success))
                    .cloned()
                    .collect();

                if hops.len() != oriented.route.len() {
                    if let Some(kind) = chain.hops().flatten().find_map(HopResult::failure) {
                        failures.insert(kind);
                    }
                    continue;
                }

                let (amount_in, amount_out) = match (hops.first(), hops.last()) {
                    (Some(_), Some(last)) if amount_is_input => (slice.amount, last.amount_out),
                    (Some(first), Some(_)) => (first.amount_in, slice.amount),
                    _ => continue,
                };

                quotes.push(RouteQuote {
                    percent: slice.percent,
                    route_index: oriented.index,
                    route: oriented.route.clone(),
                    amount_in,
                    amount_out,
                    hops,
                });
            }
            QuoteBucket {
                percent: slice.percent,
                amount: slice.amount,
                quotes,
            }
        })
        .collect()
}
