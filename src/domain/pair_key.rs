//! Canonical key for an unordered pair of assets.

use core::fmt;

use super::Address;
use crate::error::AmmError;

/// An unordered pair of distinct assets, stored in canonical order.
///
/// The constructor sorts its arguments so that `token0 < token1`; `(A, B)`
/// and `(B, A)` therefore produce the same key and at most one pair can be
/// registered per asset pair.
///
/// # Examples
///
/// ```
/// use mars_amm::domain::{Address, PairKey};
///
/// let usdc = Address::repeat_byte(2);
/// let weth = Address::repeat_byte(1);
///
/// let key = PairKey::new(usdc, weth).expect("distinct assets");
/// assert_eq!(key.token0(), weth);
/// assert_eq!(key.token1(), usdc);
/// assert_eq!(key, PairKey::new(weth, usdc).expect("distinct assets"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PairKey {
    token0: Address,
    token1: Address,
}

impl PairKey {
    /// Creates the canonical key for two assets.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidToken`] if both assets are the same.
    pub fn new(token_a: Address, token_b: Address) -> Result<Self, AmmError> {
        if token_a == token_b {
            return Err(AmmError::InvalidToken(
                "pair requires two distinct assets",
            ));
        }
        let (token0, token1) = if token_a < token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };
        Ok(Self { token0, token1 })
    }

    /// Returns the lower-ordered asset.
    #[must_use]
    pub const fn token0(&self) -> Address {
        self.token0
    }

    /// Returns the higher-ordered asset.
    #[must_use]
    pub const fn token1(&self) -> Address {
        self.token1
    }

    /// Returns `true` if `asset` is one side of the pair.
    #[must_use]
    pub fn contains(&self, asset: &Address) -> bool {
        self.token0 == *asset || self.token1 == *asset
    }

    /// Returns `true` if `asset` is `token0`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidToken`] if `asset` is not in the pair.
    pub fn is_token0(&self, asset: &Address) -> Result<bool, AmmError> {
        if *asset == self.token0 {
            Ok(true)
        } else if *asset == self.token1 {
            Ok(false)
        } else {
            Err(AmmError::InvalidToken("asset is not part of this pair"))
        }
    }

    /// Returns the counterpart of `asset`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidToken`] if `asset` is not in the pair.
    pub fn other(&self, asset: &Address) -> Result<Address, AmmError> {
        Ok(if self.is_token0(asset)? {
            self.token1
        } else {
            self.token0
        })
    }

    /// Reorders `(for_token_a, for_token_b)` values into `(token0, token1)`
    /// order, where `token_a` is the asset the values were given for first.
    ///
    /// The same call also maps `(token0, token1)` values back into caller
    /// order, since the permutation is its own inverse.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidToken`] if `token_a` is not in the pair.
    pub fn sort_values<T>(&self, token_a: &Address, values: (T, T)) -> Result<(T, T), AmmError> {
        Ok(if self.is_token0(token_a)? {
            values
        } else {
            (values.1, values.0)
        })
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.token0, self.token1)
    }
}
