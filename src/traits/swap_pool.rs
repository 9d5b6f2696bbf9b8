//! Swap-side interface of a two-asset pool.
//!
//! [`SwapPool`] is what the router needs from a pool: read-only quotes in
//! both directions, execution, and the pair's identity and fees.  Quotes
//! and execution share one formula, so a swap executed immediately after a
//! quote always matches it.
//!
//! # Fee Invariant
//!
//! The swap fee is charged on the input side and stays in the reserves:
//!
//! ```text
//! amount_out = in·(10000−f)·r_out / (r_in·10000 + in·(10000−f))
//! ```
//!
//! so `reserve0 · reserve1` never decreases across a swap.

use crate::domain::{Address, Amount, PairKey, PoolFees, SwapResult, SwapSpec};
use crate::error::AmmError;

/// Quoting and executing swaps against a two-asset pool.
///
/// # Errors
///
/// Methods that can fail return [`Result<T, AmmError>`].  Common variants:
///
/// - [`AmmError::InvalidToken`]: the asset is not part of the pair.
/// - [`AmmError::ZeroReserve`]: the pool holds no liquidity.
/// - [`AmmError::InsufficientReserves`]: an exact output is not strictly
///   below the reserve.
/// - [`AmmError::SlippageExceeded`]: the [`SwapSpec`](crate::domain::SwapSpec) bound was violated.
pub trait SwapPool {
    /// Output the pool would pay for `amount_in` of `token_in`.
    ///
    /// # Errors
    ///
    /// See the trait documentation.
    fn quote_out(&self, amount_in: Amount, token_in: &Address) -> Result<Amount, AmmError>;

    /// Input of `token_in` the pool would require to pay `amount_out` of the
    /// other asset.
    ///
    /// # Errors
    ///
    /// See the trait documentation.
    fn quote_in(&self, amount_out: Amount, token_in: &Address) -> Result<Amount, AmmError>;

    /// Executes a swap selling `token_in`.
    ///
    /// On error the pool is unchanged.
    ///
    /// # Errors
    ///
    /// See the trait documentation; additionally
    /// [`AmmError::InvariantViolation`] if the post-swap product fell.
    fn swap(&mut self, spec: SwapSpec, token_in: &Address) -> Result<SwapResult, AmmError>;

    /// Spot price of `base` in units of the other asset, as an exact
    /// `(numerator, denominator)` reserve ratio.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidToken`] if `base` is not in the pair.
    /// - [`AmmError::ZeroReserve`] if the pool is empty.
    fn spot_price(&self, base: &Address) -> Result<(Amount, Amount), AmmError>;

    /// The canonical asset pair.
    #[must_use]
    fn key(&self) -> PairKey;

    /// Current fee parameters.
    #[must_use]
    fn fees(&self) -> PoolFees;
}
