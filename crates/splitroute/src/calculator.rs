//! Constant-Product Calculator
//!
//! Swap math for reserve-based pools (x * y = k).

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

/// Fee rates are expressed in hundredths of a basis point.
pub const FEE_RATE_DENOMINATOR: u32 = 1_000_000;

/// Calculate swap output using constant product formula
///
/// Formula: output = (reserves_out * input * fee_num) / (reserves_in * fee_denom + input * fee_num)
pub fn calculate_output(reserves_in: u64, reserves_out: u64, input_amount: u64, fee_rate: u32) -> u64 {
    if reserves_in == 0 || reserves_out == 0 || input_amount == 0 || fee_rate >= FEE_RATE_DENOMINATOR
    {
        return 0;
    }
    let fee_num = BigUint::from(FEE_RATE_DENOMINATOR - fee_rate);
    let fee_denom = BigUint::from(FEE_RATE_DENOMINATOR);

    let numerator = BigUint::from(reserves_out) * BigUint::from(input_amount) * &fee_num;
    let denominator =
        BigUint::from(reserves_in) * fee_denom + BigUint::from(input_amount) * fee_num;

    if denominator.is_zero() {
        return 0;
    }
    (numerator / denominator).to_u64().unwrap_or(0)
}

/// Calculate required input for desired output (reverse calculation)
///
/// Formula: input = (reserves_in * output * fee_denom) / ((reserves_out - output) * fee_num), rounded up
pub fn calculate_input(
    reserves_in: u64,
    reserves_out: u64,
    output_amount: u64,
    fee_rate: u32,
) -> Option<u64> {
    if reserves_in == 0 || reserves_out == 0 || output_amount == 0 {
        return None;
    }
    if output_amount >= reserves_out || fee_rate >= FEE_RATE_DENOMINATOR {
        return None;
    }
    let fee_num = BigUint::from(FEE_RATE_DENOMINATOR - fee_rate);
    let fee_denom = BigUint::from(FEE_RATE_DENOMINATOR);

    let numerator = BigUint::from(reserves_in) * BigUint::from(output_amount) * fee_denom;
    let denominator = BigUint::from(reserves_out - output_amount) * fee_num;

    let result = numerator / denominator + BigUint::from(1u8);
    result.to_u64()
}

/// Calculate price impact as percentage
pub fn calculate_price_impact(
    reserves_in: u64,
    reserves_out: u64,
    input_amount: u64,
    output_amount: u64,
) -> f64 {
    if reserves_in == 0 || input_amount == 0 || output_amount == 0 {
        return 0.0;
    }
    let spot_price = reserves_out as f64 / reserves_in as f64;
    let execution_price = output_amount as f64 / input_amount as f64;
    if spot_price == 0.0 {
        return 0.0;
    }
    ((spot_price - execution_price) / spot_price).abs() * 100.0
}
