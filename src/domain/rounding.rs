//! Explicit rounding direction for integer division.

/// Direction in which an integer quotient is rounded.
///
/// Every division in the engine names its direction.  Amounts paid out by a
/// pair round [`Down`](Rounding::Down); amounts a trader must pay in round
/// [`Up`](Rounding::Up), so rounding error always accrues to liquidity
/// providers.
///
/// # Examples
///
/// ```
/// use mars_amm::domain::Rounding;
///
/// assert!(Rounding::Up.is_up());
/// assert_eq!(Rounding::Down.opposite(), Rounding::Up);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rounding {
    /// Towards positive infinity (ceiling).
    Up,
    /// Towards zero (floor).
    #[default]
    Down,
}

impl Rounding {
    /// Returns `true` if this is [`Rounding::Up`].
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }

    /// Returns `true` if this is [`Rounding::Down`].
    #[must_use]
    pub const fn is_down(&self) -> bool {
        matches!(self, Self::Down)
    }

    /// Returns the other direction.
    #[must_use]
    pub const fn opposite(&self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates() {
        assert!(Rounding::Up.is_up());
        assert!(!Rounding::Up.is_down());
        assert!(Rounding::Down.is_down());
        assert!(!Rounding::Down.is_up());
    }

    #[test]
    fn default_is_floor() {
        assert_eq!(Rounding::default(), Rounding::Down);
    }

    #[test]
    fn opposite_is_involution() {
        assert_eq!(Rounding::Up.opposite().opposite(), Rounding::Up);
        assert_eq!(Rounding::Down.opposite(), Rounding::Up);
    }
}
