//! Swap request with its slippage bound.

use core::fmt;

use super::Amount;
use crate::error::AmmError;

/// Which side of a swap the caller fixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SwapType {
    /// The input amount is fixed; output is computed.
    ExactIn = 0,
    /// The output amount is fixed; input is computed.
    ExactOut = 1,
}

impl fmt::Display for SwapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExactIn => write!(f, "ExactIn"),
            Self::ExactOut => write!(f, "ExactOut"),
        }
    }
}

/// A single-pair swap request: the fixed amount plus the bound the computed
/// amount must respect.
///
/// # Invariants
///
/// The fixed amount is always non-zero.
///
/// # Examples
///
/// ```
/// use mars_amm::domain::{Amount, SwapSpec};
///
/// let spec = SwapSpec::exact_in(Amount::new(1_000), Amount::new(990)).expect("non-zero");
/// assert!(spec.is_exact_in());
/// assert_eq!(spec.bound(), Amount::new(990));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SwapSpec {
    /// Sell exactly `amount_in`; fail if fewer than `min_out` come back.
    ExactIn {
        /// The fixed input amount.
        amount_in: Amount,
        /// Minimum acceptable output.
        min_out: Amount,
    },
    /// Buy exactly `amount_out`; fail if more than `max_in` is required.
    ExactOut {
        /// The fixed output amount.
        amount_out: Amount,
        /// Maximum acceptable input.
        max_in: Amount,
    },
}

impl SwapSpec {
    /// Creates an exact-input request.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidQuantity`] if `amount_in` is zero.
    pub const fn exact_in(amount_in: Amount, min_out: Amount) -> crate::error::Result<Self> {
        if amount_in.is_zero() {
            return Err(AmmError::InvalidQuantity("swap amount must be non-zero"));
        }
        Ok(Self::ExactIn { amount_in, min_out })
    }

    /// Creates an exact-output request.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidQuantity`] if `amount_out` is zero.
    pub const fn exact_out(amount_out: Amount, max_in: Amount) -> crate::error::Result<Self> {
        if amount_out.is_zero() {
            return Err(AmmError::InvalidQuantity("swap amount must be non-zero"));
        }
        Ok(Self::ExactOut { amount_out, max_in })
    }

    /// Returns `true` for [`SwapSpec::ExactIn`].
    #[must_use]
    pub const fn is_exact_in(&self) -> bool {
        matches!(self, Self::ExactIn { .. })
    }

    /// Returns `true` for [`SwapSpec::ExactOut`].
    #[must_use]
    pub const fn is_exact_out(&self) -> bool {
        matches!(self, Self::ExactOut { .. })
    }

    /// The fixed amount, whichever side it is on.
    pub const fn amount(&self) -> Amount {
        match self {
            Self::ExactIn { amount_in, .. } => *amount_in,
            Self::ExactOut { amount_out, .. } => *amount_out,
        }
    }

    /// The slippage bound on the computed side.
    pub const fn bound(&self) -> Amount {
        match self {
            Self::ExactIn { min_out, .. } => *min_out,
            Self::ExactOut { max_in, .. } => *max_in,
        }
    }

    /// Returns the [`SwapType`] of this request.
    #[must_use]
    pub const fn swap_type(&self) -> SwapType {
        match self {
            Self::ExactIn { .. } => SwapType::ExactIn,
            Self::ExactOut { .. } => SwapType::ExactOut,
        }
    }

    /// Checks a computed amount against the bound.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::SlippageExceeded`] if an exact-in output is below
    /// `min_out` or an exact-out input is above `max_in`.
    pub const fn check(&self, computed: Amount) -> crate::error::Result<()> {
        let violated = match self {
            Self::ExactIn { min_out, .. } => computed.get() < min_out.get(),
            Self::ExactOut { max_in, .. } => computed.get() > max_in.get(),
        };
        if violated {
            return Err(AmmError::SlippageExceeded {
                bound: self.bound(),
                actual: computed,
            });
        }
        Ok(())
    }
}

impl fmt::Display for SwapSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExactIn { amount_in, min_out } => {
                write!(f, "ExactIn({amount_in}, min_out={min_out})")
            }
            Self::ExactOut { amount_out, max_in } => {
                write!(f, "ExactOut({amount_out}, max_in={max_in})")
            }
        }
    }
}
