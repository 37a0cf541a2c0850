//! Percentage Slicer
//!
//! Splits the trade amount into percentage buckets.

use splitroute_core::RouterError;

/// A percentage of the trade and the absolute amount it represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    pub percent: u8,
    pub amount: u64,
}

/// Build slices at every multiple of `percent_increment` up to 100.
///
/// Amounts use truncating division, so the slices of a split may add up to
/// slightly less than `total`. An increment that does not divide 100 still
/// ends with a 100% slice.
pub fn slice_amount(total: u64, percent_increment: u8) -> Result<Vec<Slice>, RouterError> {
    if total == 0 {
        return Err(RouterError::InvalidAmount {
            message: "cannot slice a zero amount".to_string(),
        });
    }
    if percent_increment == 0 || percent_increment > 100 {
        return Err(RouterError::InvalidConfig {
            message: format!("invalid percent increment {}", percent_increment),
        });
    }

    let mut percents: Vec<u8> = (1..=100 / percent_increment)
        .map(|i| i * percent_increment)
        .collect();
    if percents.last() != Some(&100) {
        percents.push(100);
    }

    Ok(percents
        .into_iter()
        .map(|percent| Slice {
            percent,
            amount: (u128::from(total) * u128::from(percent) / 100) as u64,
        })
        .collect())
}
