//! Exchange-wide configuration.

use crate::domain::{Address, Liquidity, PoolFees};
use crate::error::AmmError;

/// Top-level parameters shared by every pair and staking pool.
///
/// | Field | Default |
/// |-------|---------|
/// | `minimum_liquidity` | 100 shares locked on each first deposit |
/// | `reward_precision` | `1e30` fixed-point scale for reward-per-share |
/// | `default_fees` | 30 bp swap, 5 bp protocol |
/// | `wrapped_native` | [`ExchangeConfig::DEFAULT_WRAPPED_NATIVE`] |
/// | `router` | [`ExchangeConfig::DEFAULT_ROUTER`] |
/// | `fee_to` | `None` (protocol fee off) |
///
/// With the `serde` feature every field is optional when deserializing;
/// missing fields take their defaults.
///
/// # Examples
///
/// ```
/// use mars_amm::config::ExchangeConfig;
/// use mars_amm::domain::Liquidity;
///
/// let cfg = ExchangeConfig::default();
/// assert_eq!(cfg.minimum_liquidity(), Liquidity::new(100));
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExchangeConfig {
    minimum_liquidity: Liquidity,
    reward_precision: u128,
    default_fees: PoolFees,
    wrapped_native: Address,
    router: Address,
    fee_to: Option<Address>,
}

impl ExchangeConfig {
    /// Shares permanently locked on a pair's first deposit.
    pub const MINIMUM_LIQUIDITY: Liquidity = Liquidity::new(100);

    /// Fixed-point scale of the staking reward-per-share accumulator.
    pub const REWARD_PRECISION: u128 = 1_000_000_000_000_000_000_000_000_000_000;

    /// Wrapped-native asset address used when none is configured.
    pub const DEFAULT_WRAPPED_NATIVE: Address = Address::derived(0x57, 1);

    /// Router spender address used when none is configured.
    pub const DEFAULT_ROUTER: Address = Address::derived(0x52, 1);

    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// See [`ExchangeConfig::validate`].
    pub fn new(
        minimum_liquidity: Liquidity,
        reward_precision: u128,
        default_fees: PoolFees,
        wrapped_native: Address,
        router: Address,
    ) -> Result<Self, AmmError> {
        let config = Self {
            minimum_liquidity,
            reward_precision,
            default_fees,
            wrapped_native,
            router,
            fee_to: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] if `reward_precision` is zero or
    ///   the router address is unusable.
    /// - [`AmmError::InvalidToken`] if the wrapped-native address is zero or
    ///   the native pseudo-asset.
    /// - Fee errors from [`PoolFees::validate`].
    pub fn validate(&self) -> Result<(), AmmError> {
        if self.reward_precision == 0 {
            return Err(AmmError::InvalidConfiguration(
                "reward precision must be non-zero",
            ));
        }
        if self.wrapped_native.is_zero() || self.wrapped_native == Address::NATIVE {
            return Err(AmmError::InvalidToken(
                "wrapped native must be a real asset address",
            ));
        }
        if self.router.is_zero() || self.router == self.wrapped_native {
            return Err(AmmError::InvalidConfiguration(
                "router address must be distinct and non-zero",
            ));
        }
        if self.fee_to.is_some_and(|to| to.is_zero()) {
            return Err(AmmError::InvalidConfiguration(
                "fee recipient cannot be the burn address",
            ));
        }
        self.default_fees.validate()
    }

    /// Returns a copy with a protocol-fee recipient set.
    #[must_use]
    pub const fn with_fee_to(mut self, fee_to: Option<Address>) -> Self {
        self.fee_to = fee_to;
        self
    }

    /// Shares locked on each pair's first deposit.
    #[must_use]
    pub const fn minimum_liquidity(&self) -> Liquidity {
        self.minimum_liquidity
    }

    /// Reward-per-share fixed-point scale.
    #[must_use]
    pub const fn reward_precision(&self) -> u128 {
        self.reward_precision
    }

    /// Fees given to pairs created without explicit fees.
    #[must_use]
    pub const fn default_fees(&self) -> PoolFees {
        self.default_fees
    }

    /// Wrapped-native asset.
    #[must_use]
    pub const fn wrapped_native(&self) -> Address {
        self.wrapped_native
    }

    /// Address the router spends allowances as.
    #[must_use]
    pub const fn router(&self) -> Address {
        self.router
    }

    /// Initial protocol-fee recipient.
    #[must_use]
    pub const fn fee_to(&self) -> Option<Address> {
        self.fee_to
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            minimum_liquidity: Self::MINIMUM_LIQUIDITY,
            reward_precision: Self::REWARD_PRECISION,
            default_fees: PoolFees::STANDARD,
            wrapped_native: Self::DEFAULT_WRAPPED_NATIVE,
            router: Self::DEFAULT_ROUTER,
            fee_to: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = ExchangeConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.reward_precision(), 10_u128.pow(30));
        assert_eq!(cfg.default_fees(), PoolFees::STANDARD);
        assert_eq!(cfg.fee_to(), None);
    }

    #[test]
    fn zero_precision_rejected() {
        let result = ExchangeConfig::new(
            Liquidity::new(100),
            0,
            PoolFees::STANDARD,
            ExchangeConfig::DEFAULT_WRAPPED_NATIVE,
            ExchangeConfig::DEFAULT_ROUTER,
        );
        assert!(matches!(result, Err(AmmError::InvalidConfiguration(_))));
    }

    #[test]
    fn native_pseudo_asset_cannot_be_wrapped_native() {
        let result = ExchangeConfig::new(
            Liquidity::new(100),
            1,
            PoolFees::STANDARD,
            Address::NATIVE,
            ExchangeConfig::DEFAULT_ROUTER,
        );
        assert!(matches!(result, Err(AmmError::InvalidToken(_))));
    }

    #[test]
    fn burn_address_fee_recipient_rejected() {
        let cfg = ExchangeConfig::default().with_fee_to(Some(Address::ZERO));
        assert!(cfg.validate().is_err());
        let cfg = ExchangeConfig::default().with_fee_to(Some(Address::repeat_byte(0xFE)));
        assert!(cfg.validate().is_ok());
    }
}
