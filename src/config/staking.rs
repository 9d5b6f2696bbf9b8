//! Configuration for a reward-accrual staking pool.

use crate::domain::{Address, Amount, Timestamp};
use crate::error::AmmError;

/// Parameters of one staking pool.
///
/// Rewards stream at `reward_per_second` between `start_time` and
/// `bonus_end_time`, split across stakers by stake size.  A
/// `pool_limit_per_user` of zero means no cap.
///
/// # Validation
///
/// - `staked_asset != reward_asset`.
/// - `start_time <= bonus_end_time`.
///
/// # Examples
///
/// ```
/// use mars_amm::config::StakingPoolConfig;
/// use mars_amm::domain::{Address, Amount, Timestamp};
///
/// let cfg = StakingPoolConfig::new(
///     Address::repeat_byte(1),
///     Address::repeat_byte(2),
///     Amount::new(10_000),
///     Timestamp::new(1_000),
///     Timestamp::new(1_000 + 43_200 * 30),
///     Amount::ZERO,
///     Address::repeat_byte(0xAD),
/// );
/// assert!(cfg.is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StakingPoolConfig {
    staked_asset: Address,
    reward_asset: Address,
    reward_per_second: Amount,
    start_time: Timestamp,
    bonus_end_time: Timestamp,
    pool_limit_per_user: Amount,
    admin: Address,
}

impl StakingPoolConfig {
    /// Creates a validated staking configuration.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidToken`] if the staked and reward assets match.
    /// - [`AmmError::InvalidConfiguration`] if the window ends before it
    ///   starts.
    pub fn new(
        staked_asset: Address,
        reward_asset: Address,
        reward_per_second: Amount,
        start_time: Timestamp,
        bonus_end_time: Timestamp,
        pool_limit_per_user: Amount,
        admin: Address,
    ) -> Result<Self, AmmError> {
        let config = Self {
            staked_asset,
            reward_asset,
            reward_per_second,
            start_time,
            bonus_end_time,
            pool_limit_per_user,
            admin,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// See [`StakingPoolConfig::new`].
    pub fn validate(&self) -> Result<(), AmmError> {
        if self.staked_asset == self.reward_asset {
            return Err(AmmError::InvalidToken(
                "staked and reward assets must differ",
            ));
        }
        if self.start_time > self.bonus_end_time {
            return Err(AmmError::InvalidConfiguration(
                "reward window ends before it starts",
            ));
        }
        Ok(())
    }

    /// Asset users lock in the pool.
    #[must_use]
    pub const fn staked_asset(&self) -> Address {
        self.staked_asset
    }

    /// Asset paid out as rewards.
    #[must_use]
    pub const fn reward_asset(&self) -> Address {
        self.reward_asset
    }

    /// Reward units emitted per second across all stakers.
    pub const fn reward_per_second(&self) -> Amount {
        self.reward_per_second
    }

    /// First second of accrual.
    #[must_use]
    pub const fn start_time(&self) -> Timestamp {
        self.start_time
    }

    /// Accrual stops at this second.
    #[must_use]
    pub const fn bonus_end_time(&self) -> Timestamp {
        self.bonus_end_time
    }

    /// Per-user stake cap; zero for none.
    pub const fn pool_limit_per_user(&self) -> Amount {
        self.pool_limit_per_user
    }

    /// Administrator recorded for the pool.
    #[must_use]
    pub const fn admin(&self) -> Address {
        self.admin
    }
}
