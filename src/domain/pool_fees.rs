//! Per-pair fee parameters.

use core::fmt;

use super::BasisPoints;
use crate::error::AmmError;

/// The two fee rates a pair charges.
///
/// - `swap_fee` is taken from every swap input and stays in the reserves,
///   growing `reserve0 * reserve1` for liquidity providers.
/// - `protocol_fee` is the slice of that swap fee (in the same basis-point
///   unit) that is converted into treasury shares on the next liquidity
///   event.  A pair with `swap_fee = 30` and `protocol_fee = 5` diverts
///   `5/30` of fee-driven growth to the treasury.
///
/// # Invariants
///
/// - `swap_fee < 10_000`
/// - `protocol_fee <= swap_fee`
///
/// # Examples
///
/// ```
/// use mars_amm::domain::{BasisPoints, PoolFees};
///
/// let fees = PoolFees::new(BasisPoints::new(30), BasisPoints::new(5)).expect("valid fees");
/// assert_eq!(fees.swap_fee().get(), 30);
/// assert!(PoolFees::new(BasisPoints::new(10_000), BasisPoints::ZERO).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolFees {
    swap_fee: BasisPoints,
    protocol_fee: BasisPoints,
}

impl PoolFees {
    /// 0.30% swap fee with one sixth of it (5 bp) going to the protocol.
    pub const STANDARD: Self = Self {
        swap_fee: BasisPoints::new(30),
        protocol_fee: BasisPoints::new(5),
    };

    /// Creates validated fee parameters.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidFee`] if `swap_fee >= 10_000`.
    /// - [`AmmError::InvalidConfiguration`] if `protocol_fee > swap_fee`.
    pub const fn new(swap_fee: BasisPoints, protocol_fee: BasisPoints) -> crate::error::Result<Self> {
        let fees = Self {
            swap_fee,
            protocol_fee,
        };
        match fees.validate() {
            Ok(()) => Ok(fees),
            Err(e) => Err(e),
        }
    }

    /// Checks both invariants.
    ///
    /// # Errors
    ///
    /// See [`PoolFees::new`].
    pub const fn validate(&self) -> crate::error::Result<()> {
        if !self.swap_fee.is_valid_swap_fee() {
            return Err(AmmError::InvalidFee(self.swap_fee));
        }
        if self.protocol_fee.get() > self.swap_fee.get() {
            return Err(AmmError::InvalidConfiguration(
                "protocol fee cannot exceed the swap fee",
            ));
        }
        Ok(())
    }

    /// Returns the swap fee charged to traders.
    #[must_use]
    pub const fn swap_fee(&self) -> BasisPoints {
        self.swap_fee
    }

    /// Returns the protocol's slice of the swap fee.
    #[must_use]
    pub const fn protocol_fee(&self) -> BasisPoints {
        self.protocol_fee
    }

    /// Returns a copy with a new swap fee, re-validated.
    ///
    /// # Errors
    ///
    /// See [`PoolFees::new`].
    pub const fn with_swap_fee(&self, swap_fee: BasisPoints) -> crate::error::Result<Self> {
        Self::new(swap_fee, self.protocol_fee)
    }

    /// Returns a copy with a new protocol fee, re-validated.
    ///
    /// # Errors
    ///
    /// See [`PoolFees::new`].
    pub const fn with_protocol_fee(&self, protocol_fee: BasisPoints) -> crate::error::Result<Self> {
        Self::new(self.swap_fee, protocol_fee)
    }
}

impl Default for PoolFees {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl fmt::Display for PoolFees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PoolFees(swap={}, protocol={})", self.swap_fee, self.protocol_fee)
    }
}
