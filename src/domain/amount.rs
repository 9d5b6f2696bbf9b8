//! Raw asset amount with checked arithmetic.

use core::fmt;

use super::Rounding;

/// A raw asset amount in the asset's smallest unit.
///
/// `Amount` never interprets decimals: `10e18` of an 18-decimal token is
/// `Amount::new(10_000_000_000_000_000_000)`.  All `u128` values are valid.
///
/// Arithmetic methods are checked and return `None` on overflow, underflow,
/// or division by zero instead of panicking.
///
/// # Examples
///
/// ```
/// use mars_amm::domain::{Amount, Rounding};
///
/// let a = Amount::new(100);
/// let b = Amount::new(200);
/// assert_eq!(a.checked_add(&b), Some(Amount::new(300)));
/// assert_eq!(b.checked_div(&Amount::new(3), Rounding::Up), Some(Amount::new(67)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[must_use]
pub struct Amount(u128);

impl Amount {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Maximum representable amount.
    pub const MAX: Self = Self(u128::MAX);

    /// Creates a new `Amount` from a raw `u128` value.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the underlying `u128` value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition. Returns `None` on overflow.
    #[must_use]
    pub const fn checked_add(&self, other: &Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction. Returns `None` on underflow.
    #[must_use]
    pub const fn checked_sub(&self, other: &Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked multiplication. Returns `None` on overflow.
    #[must_use]
    pub const fn checked_mul(&self, other: &Self) -> Option<Self> {
        match self.0.checked_mul(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked division with explicit rounding direction.
    ///
    /// Returns `None` if `divisor` is zero.
    #[must_use]
    pub const fn checked_div(&self, divisor: &Self, rounding: Rounding) -> Option<Self> {
        match crate::math::div_round(self.0, divisor.0, rounding) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Returns the smaller of two amounts.
    pub const fn min(self, other: Self) -> Self {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn new_and_get() {
        assert_eq!(Amount::new(42).get(), 42);
    }

    #[test]
    fn constants() {
        assert_eq!(Amount::ZERO.get(), 0);
        assert_eq!(Amount::MAX.get(), u128::MAX);
        assert_eq!(Amount::default(), Amount::ZERO);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Amount::new(4_984)), "4984");
    }

    // -- checked ops --------------------------------------------------------

    #[test]
    fn add_overflow() {
        assert_eq!(Amount::MAX.checked_add(&Amount::new(1)), None);
    }

    #[test]
    fn sub_underflow() {
        assert_eq!(Amount::new(1).checked_sub(&Amount::new(2)), None);
        assert_eq!(
            Amount::new(5).checked_sub(&Amount::new(5)),
            Some(Amount::ZERO)
        );
    }

    #[test]
    fn mul_overflow() {
        assert_eq!(Amount::MAX.checked_mul(&Amount::new(2)), None);
        assert_eq!(
            Amount::new(7).checked_mul(&Amount::new(6)),
            Some(Amount::new(42))
        );
    }

    #[test]
    fn div_rounding_directions() {
        let n = Amount::new(10);
        let d = Amount::new(3);
        assert_eq!(n.checked_div(&d, Rounding::Down), Some(Amount::new(3)));
        assert_eq!(n.checked_div(&d, Rounding::Up), Some(Amount::new(4)));
    }

    #[test]
    fn div_by_zero() {
        assert_eq!(Amount::new(10).checked_div(&Amount::ZERO, Rounding::Down), None);
    }

    #[test]
    fn div_max_round_up_does_not_overflow() {
        let Some(q) = Amount::MAX.checked_div(&Amount::new(2), Rounding::Up) else {
            panic!("expected Some");
        };
        assert_eq!(q.get(), u128::MAX / 2 + 1);
    }

    #[test]
    fn min_picks_smaller() {
        assert_eq!(Amount::new(3).min(Amount::new(9)), Amount::new(3));
        assert_eq!(Amount::new(9).min(Amount::new(3)), Amount::new(3));
    }
}
