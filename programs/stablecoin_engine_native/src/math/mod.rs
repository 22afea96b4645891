//! Wide fixed-point arithmetic
//!
//! 18-decimal products of u128 values can exceed 128 bits, so multiply-divide
//! runs through a 256-bit intermediate instead of truncating.

use crate::error::EngineError;

const LO_MASK: u128 = (1u128 << 64) - 1;

/// Full 128x128 -> 256-bit multiplication, returned as (high, low) halves.
fn mul_wide(a: u128, b: u128) -> (u128, u128) {
    let a_lo = a & LO_MASK;
    let a_hi = a >> 64;
    let b_lo = b & LO_MASK;
    let b_hi = b >> 64;

    let ll = a_lo * b_lo;
    let lh = a_lo * b_hi;
    let hl = a_hi * b_lo;
    let hh = a_hi * b_hi;

    let mid = (ll >> 64) + (lh & LO_MASK) + (hl & LO_MASK);

    let lo = (mid << 64) | (ll & LO_MASK);
    let hi = hh + (lh >> 64) + (hl >> 64) + (mid >> 64);

    (hi, lo)
}

/// Computes `a * b / divisor` with a 256-bit intermediate product.
///
/// Fails with `DivideByZero` when `divisor == 0` and `ArithmeticOverflow`
/// when the quotient does not fit in a u128.
pub fn mul_div(a: u128, b: u128, divisor: u128) -> Result<u128, EngineError> {
    if divisor == 0 {
        return Err(EngineError::DivideByZero);
    }

    let (hi, lo) = mul_wide(a, b);
    if hi == 0 {
        return Ok(lo / divisor);
    }
    if hi >= divisor {
        // quotient >= 2^128
        return Err(EngineError::ArithmeticOverflow);
    }

    // Restoring binary long division of the 256-bit product by the divisor.
    // Invariant: remainder < divisor at the top of each iteration, so the
    // shifted remainder fits in 129 bits and a single carry bit suffices.
    let mut quotient: u128 = 0;
    let mut remainder: u128 = hi;
    for i in (0..128).rev() {
        let carry = remainder >> 127;
        remainder = (remainder << 1) | ((lo >> i) & 1);
        if carry == 1 || remainder >= divisor {
            remainder = remainder.wrapping_sub(divisor);
            quotient |= 1 << i;
        }
    }

    Ok(quotient)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PRECISION;

    #[test]
    fn test_mul_wide_small() {
        assert_eq!(mul_wide(7, 6), (0, 42));
        assert_eq!(mul_wide(u128::MAX, 1), (0, u128::MAX));
    }

    #[test]
    fn test_mul_wide_overflowing() {
        // (2^127) * 2 = 2^128
        let (hi, lo) = mul_wide(1u128 << 127, 2);
        assert_eq!((hi, lo), (1, 0));

        // (2^128 - 1)^2 = 2^256 - 2^129 + 1
        let (hi, lo) = mul_wide(u128::MAX, u128::MAX);
        assert_eq!(lo, 1);
        assert_eq!(hi, u128::MAX - 1);
    }

    #[test]
    fn test_mul_div_fast_path() {
        assert_eq!(mul_div(10, 20, 4).unwrap(), 50);
        assert_eq!(mul_div(0, 12345, 7).unwrap(), 0);
    }

    #[test]
    fn test_mul_div_wide_path() {
        // 2^127 * 4 / 8 = 2^126, product exceeds 128 bits
        assert_eq!(mul_div(1u128 << 127, 4, 8).unwrap(), 1u128 << 126);

        // price-style computation: 30_000e18 USD * 1e18 / 2000e18 price
        let usd = 30_000 * PRECISION;
        let price = 2_000 * PRECISION;
        assert_eq!(mul_div(usd, PRECISION, price).unwrap(), 15 * PRECISION);
    }

    #[test]
    fn test_mul_div_exact_against_truncation() {
        // 0xFFFF...F * 3 / 3 must reproduce the input exactly
        assert_eq!(mul_div(u128::MAX, 3, 3).unwrap(), u128::MAX);
        assert_eq!(mul_div(u128::MAX, 7, 7).unwrap(), u128::MAX);
    }

    #[test]
    fn test_mul_div_rounds_down() {
        assert_eq!(mul_div(10, 10, 3).unwrap(), 33);
    }

    #[test]
    fn test_mul_div_divide_by_zero() {
        assert_eq!(mul_div(1, 1, 0), Err(EngineError::DivideByZero));
    }

    #[test]
    fn test_mul_div_overflow() {
        assert_eq!(mul_div(u128::MAX, u128::MAX, 1), Err(EngineError::ArithmeticOverflow));
        // exactly representable: MAX * 2 / 2
        assert_eq!(mul_div(u128::MAX, 2, 2).unwrap(), u128::MAX);
    }
}
