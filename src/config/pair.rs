//! Configuration for a constant-product pair.

use crate::domain::{Address, Liquidity, PairKey, PoolFees};
use crate::error::AmmError;

/// Immutable-at-birth parameters of one pair.
///
/// Fees may later be changed through the registry; the key, share token,
/// and minimum liquidity are fixed for the pair's lifetime.
///
/// # Validation
///
/// - Fees satisfy [`PoolFees::validate`].
/// - The share token is neither zero nor one of the pair's own assets.
///
/// # Examples
///
/// ```
/// use mars_amm::config::PairConfig;
/// use mars_amm::domain::{Address, Liquidity, PairKey, PoolFees};
///
/// let key = PairKey::new(Address::repeat_byte(1), Address::repeat_byte(2)).expect("distinct");
/// let cfg = PairConfig::new(key, Address::derived(0xA1, 0), PoolFees::STANDARD, Liquidity::new(100));
/// assert!(cfg.is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PairConfig {
    key: PairKey,
    share_token: Address,
    fees: PoolFees,
    minimum_liquidity: Liquidity,
}

impl PairConfig {
    /// Creates a validated pair configuration.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidFee`] / [`AmmError::InvalidConfiguration`] for
    ///   bad fees.
    /// - [`AmmError::InvalidToken`] for an unusable share-token address.
    pub fn new(
        key: PairKey,
        share_token: Address,
        fees: PoolFees,
        minimum_liquidity: Liquidity,
    ) -> Result<Self, AmmError> {
        let config = Self {
            key,
            share_token,
            fees,
            minimum_liquidity,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// See [`PairConfig::new`].
    pub fn validate(&self) -> Result<(), AmmError> {
        self.fees.validate()?;
        if self.share_token.is_zero() || self.key.contains(&self.share_token) {
            return Err(AmmError::InvalidToken(
                "share token must be a distinct, non-zero address",
            ));
        }
        Ok(())
    }

    /// The pair's assets.
    #[must_use]
    pub const fn key(&self) -> PairKey {
        self.key
    }

    /// Address of the pair's share token and custody account.
    #[must_use]
    pub const fn share_token(&self) -> Address {
        self.share_token
    }

    /// Initial fee parameters.
    #[must_use]
    pub const fn fees(&self) -> PoolFees {
        self.fees
    }

    /// Shares locked forever on the first deposit.
    #[must_use]
    pub const fn minimum_liquidity(&self) -> Liquidity {
        self.minimum_liquidity
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn key() -> PairKey {
        let Ok(key) = PairKey::new(Address::repeat_byte(1), Address::repeat_byte(2)) else {
            panic!("expected Ok");
        };
        key
    }

    #[test]
    fn valid_config() {
        let Ok(cfg) = PairConfig::new(key(), Address::repeat_byte(9), PoolFees::STANDARD, Liquidity::new(100))
        else {
            panic!("expected Ok");
        };
        assert_eq!(cfg.key(), key());
        assert_eq!(cfg.minimum_liquidity(), Liquidity::new(100));
        assert_eq!(cfg.fees(), PoolFees::STANDARD);
    }

    #[test]
    fn share_token_cannot_alias_an_asset() {
        let result = PairConfig::new(key(), Address::repeat_byte(1), PoolFees::STANDARD, Liquidity::ZERO);
        assert!(matches!(result, Err(AmmError::InvalidToken(_))));
        let result = PairConfig::new(key(), Address::ZERO, PoolFees::STANDARD, Liquidity::ZERO);
        assert!(result.is_err());
    }
}
