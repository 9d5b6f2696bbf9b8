//! Liquidity-share units.

use core::fmt;

use super::Amount;

/// A quantity of a pair's liquidity shares.
///
/// Shares are distinct from [`Amount`] because they measure proportional
/// ownership of a pair's reserves rather than a quantity of an underlying
/// asset.  At the ledger boundary shares are an ordinary fungible asset, so
/// the two convert losslessly through [`Liquidity::as_amount`] and
/// [`Liquidity::from_amount`].
///
/// # Examples
///
/// ```
/// use mars_amm::domain::Liquidity;
///
/// let a = Liquidity::new(1_000);
/// let b = Liquidity::new(2_000);
/// assert_eq!(a.checked_add(&b), Some(Liquidity::new(3_000)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Liquidity(u128);

impl Liquidity {
    /// No shares.
    pub const ZERO: Self = Self(0);

    /// Creates a new `Liquidity` from a raw `u128` value.
    #[must_use]
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Reinterprets a ledger [`Amount`] of a share token as shares.
    #[must_use]
    pub const fn from_amount(amount: Amount) -> Self {
        Self(amount.get())
    }

    /// Returns the underlying `u128` value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns the shares as a ledger [`Amount`] of the share token.
    pub const fn as_amount(&self) -> Amount {
        Amount::new(self.0)
    }

    /// Returns `true` if there are no shares.
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
}

impl From<Liquidity> for Amount {
    fn from(value: Liquidity) -> Self {
        value.as_amount()
    }
}

impl fmt::Display for Liquidity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_round_trip() {
        let shares = Liquidity::new(7_071_067_811_865_475_144);
        assert_eq!(Liquidity::from_amount(shares.as_amount()), shares);
        assert_eq!(Amount::from(shares).get(), 7_071_067_811_865_475_144);
    }

    #[test]
    fn checked_sub_underflow() {
        assert_eq!(Liquidity::new(1).checked_sub(&Liquidity::new(2)), None);
    }

    #[test]
    fn checked_add_overflow() {
        assert_eq!(Liquidity::new(u128::MAX).checked_add(&Liquidity::new(1)), None);
    }

    #[test]
    fn zero_and_default_agree() {
        assert!(Liquidity::ZERO.is_zero());
        assert_eq!(Liquidity::default(), Liquidity::ZERO);
    }
}
