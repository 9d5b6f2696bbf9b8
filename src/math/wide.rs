//! 256-bit intermediates for products of two `u128` values.
//!
//! Reserves, share supplies, and reward accumulators all fit in `u128`, but
//! their products do not.  The helpers here widen to [`U256`], do the
//! multiply/divide/root there, and narrow back with an explicit overflow
//! check.

use primitive_types::U256;

use crate::domain::Rounding;
use crate::error::AmmError;

/// Narrows a 256-bit value back to `u128`.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] with `context` if `value` does not fit.
pub fn narrow(value: U256, context: &'static str) -> Result<u128, AmmError> {
    if value > U256::from(u128::MAX) {
        return Err(AmmError::Overflow(context));
    }
    Ok(value.low_u128())
}

/// Computes `a * b / denominator` without intermediate overflow.
///
/// # Errors
///
/// - [`AmmError::DivisionByZero`] if `denominator` is zero.
/// - [`AmmError::Overflow`] if the quotient does not fit in `u128`.
///
/// # Examples
///
/// ```
/// use mars_amm::domain::Rounding;
/// use mars_amm::math::mul_div;
///
/// let big = u128::MAX / 2;
/// assert_eq!(mul_div(big, 4, 4, Rounding::Down), Ok(big));
/// assert_eq!(mul_div(10, 1, 3, Rounding::Up), Ok(4));
/// ```
pub fn mul_div(a: u128, b: u128, denominator: u128, rounding: Rounding) -> Result<u128, AmmError> {
    if denominator == 0 {
        return Err(AmmError::DivisionByZero);
    }
    let product = U256::from(a) * U256::from(b);
    let denominator = U256::from(denominator);
    let (mut quotient, remainder) = product.div_mod(denominator);
    if rounding.is_up() && !remainder.is_zero() {
        quotient += U256::one();
    }
    narrow(quotient, "mul_div result exceeds u128")
}

/// Computes `floor(sqrt(a * b))`.
///
/// The result always fits in `u128` because `a * b < 2^256`.
#[must_use]
pub fn sqrt_product(a: u128, b: u128) -> u128 {
    let root = (U256::from(a) * U256::from(b)).integer_sqrt();
    root.low_u128()
}

/// Floor square root of a `u128` value.
#[must_use]
pub fn isqrt(value: u128) -> u128 {
    U256::from(value).integer_sqrt().low_u128()
}
