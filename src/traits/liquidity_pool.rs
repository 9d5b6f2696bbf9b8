//! Liquidity-side interface of a two-asset pool.
//!
//! # Share Accounting Invariant
//!
//! [`LiquidityPool::total_liquidity`] changes only through
//! [`LiquidityPool::add_liquidity`] and [`LiquidityPool::remove_liquidity`].
//! Swaps grow the reserves behind each share but never the share count.
//!
//! # Protocol Fee
//!
//! When the protocol fee is switched on, both operations first mint the fee
//! recipient's cut of `sqrt(k)` growth since the previous liquidity event,
//! then price the deposit or withdrawal against the diluted supply.

use super::SwapPool;
use crate::domain::{Liquidity, LiquidityBurned, LiquidityChange, LiquidityMinted};
use crate::error::AmmError;

/// Minting and burning liquidity shares.
///
/// # Errors
///
/// - [`AmmError::InvalidQuantity`]: the change is the wrong variant or zero.
/// - [`AmmError::InsufficientLiquidity`]: a deposit is below its minimum or
///   too small to mint shares, or more shares are burned than exist.
/// - [`AmmError::SlippageExceeded`]: a withdrawal pays less than its minimum.
pub trait LiquidityPool: SwapPool {
    /// Deposits both assets at the current ratio and mints shares.
    ///
    /// `protocol_fee_on` reports whether a fee recipient is configured.
    ///
    /// # Errors
    ///
    /// See the trait documentation.
    fn add_liquidity(
        &mut self,
        change: &LiquidityChange,
        protocol_fee_on: bool,
    ) -> Result<LiquidityMinted, AmmError>;

    /// Burns shares for a pro-rata slice of both reserves.
    ///
    /// # Errors
    ///
    /// See the trait documentation.
    fn remove_liquidity(
        &mut self,
        change: &LiquidityChange,
        protocol_fee_on: bool,
    ) -> Result<LiquidityBurned, AmmError>;

    /// Outstanding shares, including the permanently locked minimum.
    #[must_use]
    fn total_liquidity(&self) -> Liquidity;
}
