//! Outcome of a single-pair swap.

use core::fmt;

use super::{Address, Amount};
use crate::error::AmmError;

/// What a pair swap moved.
///
/// `fee` is the swap-fee portion of `amount_in` that stayed in the reserves
/// as liquidity-provider income; it is informational and already included
/// in `amount_in`.
///
/// # Invariants
///
/// - `amount_in > 0` and `amount_out > 0`.
/// - `fee < amount_in`.
///
/// # Examples
///
/// ```
/// use mars_amm::domain::{Address, Amount, SwapResult};
///
/// let result = SwapResult::new(
///     Address::repeat_byte(1),
///     Address::repeat_byte(2),
///     Amount::new(10_000),
///     Amount::new(4_984),
///     Amount::new(30),
/// );
/// assert!(result.is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwapResult {
    token_in: Address,
    token_out: Address,
    amount_in: Amount,
    amount_out: Amount,
    fee: Amount,
}

impl SwapResult {
    /// Creates a validated swap outcome.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidQuantity`] if either amount is zero or the
    /// fee is not below the input.
    pub const fn new(
        token_in: Address,
        token_out: Address,
        amount_in: Amount,
        amount_out: Amount,
        fee: Amount,
    ) -> crate::error::Result<Self> {
        if amount_in.is_zero() {
            return Err(AmmError::InvalidQuantity("amount_in must be positive"));
        }
        if amount_out.is_zero() {
            return Err(AmmError::InvalidQuantity("amount_out must be positive"));
        }
        if fee.get() >= amount_in.get() {
            return Err(AmmError::InvalidQuantity("fee must be less than amount_in"));
        }
        Ok(Self {
            token_in,
            token_out,
            amount_in,
            amount_out,
            fee,
        })
    }

    /// Asset paid into the pair.
    #[must_use]
    pub const fn token_in(&self) -> Address {
        self.token_in
    }

    /// Asset paid out of the pair.
    #[must_use]
    pub const fn token_out(&self) -> Address {
        self.token_out
    }

    /// Input amount, fee included.
    pub const fn amount_in(&self) -> Amount {
        self.amount_in
    }

    /// Output amount.
    pub const fn amount_out(&self) -> Amount {
        self.amount_out
    }

    /// Swap fee retained by the pair.
    pub const fn fee(&self) -> Amount {
        self.fee
    }
}

impl fmt::Display for SwapResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SwapResult(in={}, out={}, fee={})",
            self.amount_in, self.amount_out, self.fee
        )
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn result(amount_in: u128, amount_out: u128, fee: u128) -> crate::error::Result<SwapResult> {
        SwapResult::new(
            Address::repeat_byte(1),
            Address::repeat_byte(2),
            Amount::new(amount_in),
            Amount::new(amount_out),
            Amount::new(fee),
        )
    }

    #[test]
    fn valid_result() {
        let Ok(r) = result(10_000, 4_984, 30) else {
            panic!("expected Ok");
        };
        assert_eq!(r.amount_in(), Amount::new(10_000));
        assert_eq!(r.amount_out(), Amount::new(4_984));
        assert_eq!(r.fee(), Amount::new(30));
        assert_eq!(r.token_in(), Address::repeat_byte(1));
    }

    #[test]
    fn zero_amounts_rejected() {
        assert!(result(0, 1, 0).is_err());
        assert!(result(1, 0, 0).is_err());
    }

    #[test]
    fn fee_must_stay_below_input() {
        assert!(result(100, 50, 100).is_err());
        assert!(result(100, 50, 99).is_ok());
    }

    #[test]
    fn display() {
        let Ok(r) = result(1_000, 498, 3) else {
            panic!("expected Ok");
        };
        assert_eq!(r.to_string(), "SwapResult(in=1000, out=498, fee=3)");
    }
}
