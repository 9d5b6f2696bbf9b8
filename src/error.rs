//! Unified error types for the exchange engine.
//!
//! All fallible operations across the crate return [`AmmError`] as their
//! error type.  Every variant is terminal for the call that raised it: the
//! operation has not mutated any reserve, share balance, or accrual state.
//!
//! Variants that reject a caller-supplied bound carry both the bound and the
//! value that violated it, so a caller can recompute and retry with an
//! adjusted tolerance.

use crate::domain::{Address, Amount, BasisPoints, Timestamp};

/// Convenience alias used throughout the crate.
pub type Result<T, E = AmmError> = core::result::Result<T, E>;

/// Every way an exchange operation can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum AmmError {
    // -- Routing ----------------------------------------------------------
    /// The swap path is shorter than two assets or crosses a pair that is
    /// not registered.
    #[error("invalid path: {0}")]
    InvalidPath(&'static str),

    /// The deadline passed before the call was executed.
    #[error("transaction expired: deadline {deadline}, now {now}")]
    Expired {
        /// Caller-supplied deadline.
        deadline: Timestamp,
        /// Observed execution time.
        now: Timestamp,
    },

    /// An output fell below its minimum or an input rose above its maximum.
    #[error("slippage exceeded: bound {bound}, actual {actual}")]
    SlippageExceeded {
        /// The caller's bound (minimum out or maximum in).
        bound: Amount,
        /// The amount the operation would have produced or required.
        actual: Amount,
    },

    // -- Pool math ----------------------------------------------------------
    /// The requested output is not strictly below the reserve backing it.
    #[error("insufficient reserves: reserve {reserve}, requested {requested}")]
    InsufficientReserves {
        /// Reserve on the output side.
        reserve: Amount,
        /// Output that was requested.
        requested: Amount,
    },

    /// A deposit amount fell below its minimum, or a deposit is too small to
    /// mint any shares.
    #[error("insufficient liquidity: minimum {minimum}, actual {actual}")]
    InsufficientLiquidity {
        /// The required minimum.
        minimum: Amount,
        /// What the deposit would have contributed.
        actual: Amount,
    },

    /// A swap fee at or above 100% was supplied.
    #[error("invalid fee: {0}")]
    InvalidFee(BasisPoints),

    /// Post-swap `reserve0 * reserve1` fell below its pre-swap value.
    ///
    /// Unreachable under correct fee math; signals an implementation bug.
    #[error("constant-product invariant violated")]
    InvariantViolation,

    // -- Staking ------------------------------------------------------------
    /// A deposit would push a user's stake above the per-user cap.
    #[error("pool limit exceeded: limit {limit}, requested balance {requested}")]
    PoolLimitExceeded {
        /// Per-user cap.
        limit: Amount,
        /// Balance the deposit would have produced.
        requested: Amount,
    },

    /// A withdrawal asked for more than the user has staked.
    #[error("insufficient stake: staked {staked}, requested {requested}")]
    InsufficientStake {
        /// Current stake.
        staked: Amount,
        /// Requested withdrawal.
        requested: Amount,
    },

    // -- Registries ---------------------------------------------------------
    /// A pair for these two assets already exists.
    #[error("pair already exists")]
    PairExists,

    /// No pair is registered under the requested identifier.
    #[error("pair not found")]
    PairNotFound,

    /// A staking pool for this staked asset already exists.
    #[error("staking pool already exists for {0}")]
    StakingPoolExists(Address),

    /// No staking pool is registered for this staked asset.
    #[error("no staking pool for {0}")]
    StakingPoolNotFound(Address),

    // -- Asset collaborator -------------------------------------------------
    /// An account does not hold enough of an asset.
    #[error("insufficient balance of {asset}: available {available}, requested {requested}")]
    InsufficientBalance {
        /// Asset being moved.
        asset: Address,
        /// Holder's balance.
        available: Amount,
        /// Amount requested.
        requested: Amount,
    },

    /// A spender has not been approved for enough of an asset.
    #[error("insufficient allowance of {asset}: allowance {allowance}, requested {requested}")]
    InsufficientAllowance {
        /// Asset being moved.
        asset: Address,
        /// Remaining allowance.
        allowance: Amount,
        /// Amount requested.
        requested: Amount,
    },

    // -- Engine -------------------------------------------------------------
    /// An arithmetic result exceeded the representable range.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// A subtraction would have produced a negative value.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// A reserve required by the operation is zero.
    #[error("zero reserve")]
    ZeroReserve,

    /// A quantity argument is out of range (typically zero).
    #[error("invalid quantity: {0}")]
    InvalidQuantity(&'static str),

    /// An asset is not part of the pair, or a pair was built from one asset.
    #[error("invalid token: {0}")]
    InvalidToken(&'static str),

    /// A configuration value is out of range or inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
}

impl AmmError {
    /// Returns `true` for failures a caller can fix by changing its inputs
    /// (bounds, amounts, deadline, path).
    ///
    /// Returns `false` for defensive assertions and arithmetic faults, which
    /// indicate a bug rather than a bad request.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        !matches!(
            self,
            Self::InvariantViolation | Self::Overflow(_) | Self::Underflow(_) | Self::DivisionByZero
        )
    }
}
