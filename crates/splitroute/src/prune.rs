//! Quote Pruner
//!
//! Keeps the best route quotes of each percentage bucket.

use std::cmp::Ordering;

use crate::quote::{QuoteBucket, RouteQuote};

/// Better quote first: more output for exact input, less input for exact
/// output.
pub fn compare_quotes(a: &RouteQuote, b: &RouteQuote, amount_is_input: bool) -> Ordering {
    if amount_is_input {
        b.amount_out.cmp(&a.amount_out)
    } else {
        a.amount_in.cmp(&b.amount_in)
    }
}

/// Sort every bucket best-first and keep at most `top_k` quotes per bucket.
///
/// The sort is stable, so equal quotes keep route enumeration order.
pub fn prune_buckets(
    buckets: &[QuoteBucket],
    amount_is_input: bool,
    top_k: usize,
) -> Vec<QuoteBucket> {
    buckets
        .iter()
        .map(|bucket| {
            let mut quotes = bucket.quotes.clone();
            quotes.sort_by(|a, b| compare_quotes(a, b, amount_is_input));
            quotes.truncate(top_k);
            QuoteBucket {
                percent: bucket.percent,
                amount: bucket.amount,
                quotes,
            }
        })
        .collect()
}
