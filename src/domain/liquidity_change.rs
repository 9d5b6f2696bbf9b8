//! Liquidity requests against a pair and their outcomes.

use core::fmt;

use super::{Amount, Liquidity};
use crate::error::AmmError;

/// Descriptor for the kind of liquidity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ChangeType {
    /// Depositing both assets for new shares.
    Add = 0,
    /// Burning shares for both assets.
    Remove = 1,
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "Add"),
            Self::Remove => write!(f, "Remove"),
        }
    }
}

/// A liquidity request in the pair's `(token0, token1)` order.
///
/// Callers holding amounts in `(token_a, token_b)` order convert with
/// [`PairKey::sort_values`](super::PairKey::sort_values).
///
/// # Examples
///
/// ```
/// use mars_amm::domain::{Amount, LiquidityChange};
///
/// let change = LiquidityChange::add(
///     Amount::new(10_000),
///     Amount::new(10_000),
///     Amount::ZERO,
///     Amount::ZERO,
/// );
/// assert!(change.is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LiquidityChange {
    /// Deposit up to the desired amounts at the current reserve ratio.
    Add {
        /// Most of `token0` the caller will deposit.
        amount0_desired: Amount,
        /// Most of `token1` the caller will deposit.
        amount1_desired: Amount,
        /// Least of `token0` the caller accepts to deposit.
        amount0_min: Amount,
        /// Least of `token1` the caller accepts to deposit.
        amount1_min: Amount,
    },
    /// Burn `shares` for a pro-rata slice of both reserves.
    Remove {
        /// Shares to burn.
        shares: Liquidity,
        /// Least of `token0` the caller accepts back.
        amount0_min: Amount,
        /// Least of `token1` the caller accepts back.
        amount1_min: Amount,
    },
}

impl LiquidityChange {
    /// Creates an `Add` request.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidQuantity`] if either desired amount is zero.
    pub const fn add(
        amount0_desired: Amount,
        amount1_desired: Amount,
        amount0_min: Amount,
        amount1_min: Amount,
    ) -> crate::error::Result<Self> {
        if amount0_desired.is_zero() || amount1_desired.is_zero() {
            return Err(AmmError::InvalidQuantity(
                "both deposit amounts must be positive",
            ));
        }
        Ok(Self::Add {
            amount0_desired,
            amount1_desired,
            amount0_min,
            amount1_min,
        })
    }

    /// Creates a `Remove` request.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidQuantity`] if `shares` is zero.
    pub const fn remove(
        shares: Liquidity,
        amount0_min: Amount,
        amount1_min: Amount,
    ) -> crate::error::Result<Self> {
        if shares.is_zero() {
            return Err(AmmError::InvalidQuantity("shares to burn must be non-zero"));
        }
        Ok(Self::Remove {
            shares,
            amount0_min,
            amount1_min,
        })
    }

    /// Returns the [`ChangeType`] of this request.
    #[must_use]
    pub const fn change_type(&self) -> ChangeType {
        match self {
            Self::Add { .. } => ChangeType::Add,
            Self::Remove { .. } => ChangeType::Remove,
        }
    }

    /// Returns `true` for an `Add` request.
    #[must_use]
    pub const fn is_add(&self) -> bool {
        matches!(self, Self::Add { .. })
    }

    /// Returns `true` for a `Remove` request.
    #[must_use]
    pub const fn is_remove(&self) -> bool {
        matches!(self, Self::Remove { .. })
    }
}

impl fmt::Display for LiquidityChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add {
                amount0_desired,
                amount1_desired,
                ..
            } => write!(f, "Add({amount0_desired}, {amount1_desired})"),
            Self::Remove { shares, .. } => write!(f, "Remove({shares})"),
        }
    }
}

/// Result of a successful deposit, in `(token0, token1)` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LiquidityMinted {
    /// `token0` actually deposited.
    pub amount0: Amount,
    /// `token1` actually deposited.
    pub amount1: Amount,
    /// Shares minted to the depositor.
    pub shares: Liquidity,
    /// Shares locked at the burn address (first deposit only).
    pub locked: Liquidity,
    /// Shares minted to the fee recipient before the deposit was priced.
    pub protocol_fee_shares: Liquidity,
}

/// Result of a successful withdrawal, in `(token0, token1)` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LiquidityBurned {
    /// `token0` paid out.
    pub amount0: Amount,
    /// `token1` paid out.
    pub amount1: Amount,
    /// Shares burned.
    pub shares: Liquidity,
    /// Shares minted to the fee recipient before the withdrawal was priced.
    pub protocol_fee_shares: Liquidity,
}
