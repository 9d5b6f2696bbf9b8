//! Fallible arithmetic on the crate's quantity newtypes.
//!
//! [`CheckedArithmetic`] turns the `Option`-returning `checked_*` methods on
//! [`Amount`] and [`Liquidity`] into `Result`s carrying a specific
//! [`AmmError`], so pool code can chain them with `?`.
//!
//! # Examples
//!
//! ```
//! use mars_amm::domain::{Amount, Rounding};
//! use mars_amm::math::CheckedArithmetic;
//!
//! let reserve = Amount::new(10_000);
//! let share = reserve.safe_mul_div(1_000, 10_000, Rounding::Down).expect("fits");
//! assert_eq!(share, Amount::new(1_000));
//! ```

use super::wide::mul_div;
use crate::domain::{Amount, Liquidity, Rounding};
use crate::error::AmmError;

/// Fallible arithmetic for quantity newtypes.
///
/// # Contract
///
/// - No panics; every failure is an `Err`.
/// - No saturation.
pub trait CheckedArithmetic: Sized {
    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] on overflow.
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Underflow`] if the result would be negative.
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError>;

    /// Computes `self * numerator / denominator` through a 256-bit
    /// intermediate.
    ///
    /// # Errors
    ///
    /// - [`AmmError::DivisionByZero`] if `denominator` is zero.
    /// - [`AmmError::Overflow`] if the quotient does not fit.
    fn safe_mul_div(
        &self,
        numerator: u128,
        denominator: u128,
        rounding: Rounding,
    ) -> Result<Self, AmmError>;
}

impl CheckedArithmetic for Amount {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_add(other)
            .ok_or(AmmError::Overflow("amount addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_sub(other)
            .ok_or(AmmError::Underflow("amount subtraction underflow"))
    }

    #[inline]
    fn safe_mul_div(
        &self,
        numerator: u128,
        denominator: u128,
        rounding: Rounding,
    ) -> Result<Self, AmmError> {
        mul_div(self.get(), numerator, denominator, rounding).map(Amount::new)
    }
}

impl CheckedArithmetic for Liquidity {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_add(other)
            .ok_or(AmmError::Overflow("liquidity addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_sub(other)
            .ok_or(AmmError::Underflow("liquidity subtraction underflow"))
    }

    #[inline]
    fn safe_mul_div(
        &self,
        numerator: u128,
        denominator: u128,
        rounding: Rounding,
    ) -> Result<Self, AmmError> {
        mul_div(self.get(), numerator, denominator, rounding).map(Liquidity::new)
    }
}
