//! Rounding-aware integer division.
//!
//! [`div_round`] is the one place the crate divides `u128` values in
//! 128 bits.  Wider intermediates go through [`mul_div`](super::mul_div).
//!
//! | Quantity | Direction |
//! |----------|-----------|
//! | Pair output, withdrawal amounts | [`Rounding::Down`] |
//! | Required swap input | [`Rounding::Up`] (plus one) |
//! | Fee reported on a swap | [`Rounding::Down`] |
//!
//! # Examples
//!
//! ```
//! use mars_amm::domain::Rounding;
//! use mars_amm::math::div_round;
//!
//! assert_eq!(div_round(10, 3, Rounding::Down), Some(3));
//! assert_eq!(div_round(10, 3, Rounding::Up), Some(4));
//! assert_eq!(div_round(10, 0, Rounding::Down), None);
//! ```

use crate::domain::Rounding;

/// Divides `numerator` by `denominator` in the given direction.
///
/// Returns [`None`] if `denominator` is zero.  Ceiling division never
/// overflows, even for `u128::MAX`.
#[must_use]
pub const fn div_round(numerator: u128, denominator: u128, rounding: Rounding) -> Option<u128> {
    if denominator == 0 {
        return None;
    }
    let quotient = numerator / denominator;
    match rounding {
        Rounding::Down => Some(quotient),
        Rounding::Up => {
            if numerator % denominator != 0 {
                // quotient < u128::MAX whenever a remainder exists
                Some(quotient + 1)
            } else {
                Some(quotient)
            }
        }
    }
}
