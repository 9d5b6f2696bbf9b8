//! Basis-point representation for fee rates.

use core::fmt;

use super::{Amount, Rounding};
use crate::error::AmmError;

/// Number of basis points in 100%.
pub const BPS_DENOMINATOR: u32 = 10_000;

/// A rate expressed in basis points (1 bp = 0.01%, 10 000 bp = 100%).
///
/// All `u32` values are representable, but values above 10 000 are
/// meaningless as rates.  Use [`is_valid_percent`](Self::is_valid_percent)
/// for general rates and [`is_valid_swap_fee`](Self::is_valid_swap_fee) for
/// swap fees, which must leave a non-zero complement.
///
/// # Examples
///
/// ```
/// use mars_amm::domain::BasisPoints;
///
/// let fee = BasisPoints::new(30);
/// assert_eq!(fee.complement(), Some(9_970));
/// assert!(fee.is_valid_swap_fee());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct BasisPoints(u32);

impl BasisPoints {
    /// Zero basis points (0%).
    pub const ZERO: Self = Self(0);

    /// 100% expressed in basis points.
    pub const MAX_PERCENT: Self = Self(BPS_DENOMINATOR);

    /// Creates a new `BasisPoints` from a raw `u32` value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the underlying `u32` value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns `true` if the value is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the value is in the valid percentage range (`0..=10_000`).
    #[must_use]
    pub const fn is_valid_percent(&self) -> bool {
        self.0 <= BPS_DENOMINATOR
    }

    /// Returns `true` if the value can be charged as a swap fee (`0..10_000`).
    #[must_use]
    pub const fn is_valid_swap_fee(&self) -> bool {
        self.0 < BPS_DENOMINATOR
    }

    /// Returns `10_000 - self`, or `None` when the rate exceeds 100%.
    #[must_use]
    pub const fn complement(&self) -> Option<u32> {
        BPS_DENOMINATOR.checked_sub(self.0)
    }

    /// Computes `amount * self / 10_000` with explicit rounding.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the intermediate multiplication overflows.
    pub const fn apply(&self, amount: Amount, rounding: Rounding) -> crate::error::Result<Amount> {
        let product = match amount.get().checked_mul(self.0 as u128) {
            Some(v) => v,
            None => return Err(AmmError::Overflow("basis points apply overflow")),
        };
        match crate::math::div_round(product, BPS_DENOMINATOR as u128, rounding) {
            Some(v) => Ok(Amount::new(v)),
            None => Err(AmmError::DivisionByZero),
        }
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bp", self.0)
    }
}
