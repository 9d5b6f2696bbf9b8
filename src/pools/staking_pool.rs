//! Time-based reward accrual for staked pair shares (MasterChef style).
//!
//! A [`StakingPool`] streams `reward_per_second` units of a reward asset
//! across everyone who has staked its staked asset, in proportion to stake
//! size, for every second of the `[start_time, bonus_end_time)` window.
//!
//! # Accumulator
//!
//! ```text
//! elapsed   = min(now, bonus_end) − max(last_reward_time, start)      (≥ 0)
//! acc      += elapsed · reward_per_second · PRECISION / total_staked
//! pending   = amount · acc / PRECISION − reward_debt
//! ```
//!
//! `acc` is carried in 256 bits so `PRECISION` can be large (1e30 by
//! default): the floor in each accumulator step then costs a staker less
//! than `amount / PRECISION` units of reward.
//!
//! Settlement is lazy: every deposit, withdrawal, and harvest first brings
//! the accumulator up to `now`, then pays the caller's pending reward and
//! resets their `reward_debt` to `amount · acc / PRECISION`.
//! `last_reward_time` advances even while nothing is staked, so an empty
//! pool never accrues retroactively.
//!
//! Like [`Pair`](super::Pair), the pool is pure accounting: returned
//! amounts describe transfers the caller settles against an asset ledger.

use std::collections::BTreeMap;

use primitive_types::U256;
use tracing::debug;

use crate::config::StakingPoolConfig;
use crate::domain::{Address, Amount, StakingPhase, Timestamp};
use crate::error::AmmError;
use crate::math::narrow;

/// A staker's position in one pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserInfo {
    /// Staked balance.
    pub amount: Amount,
    /// `amount · acc / PRECISION` at the user's last settlement.
    pub reward_debt: u128,
}

/// Reward-accrual ledger for one staked asset.
///
/// # Example
///
/// ```rust
/// use mars_amm::config::{ExchangeConfig, StakingPoolConfig};
/// use mars_amm::domain::{Address, Amount, Timestamp};
/// use mars_amm::pools::StakingPool;
///
/// let alice = Address::repeat_byte(0xA1);
/// let cfg = StakingPoolConfig::new(
///     Address::repeat_byte(1),
///     Address::repeat_byte(2),
///     Amount::new(10_000),
///     Timestamp::new(1_000),
///     Timestamp::new(2_000),
///     Amount::ZERO,
///     Address::repeat_byte(0xAD),
/// )
/// .expect("valid config");
/// let mut pool = StakingPool::new(&cfg, Address::derived(0x53, 0), ExchangeConfig::REWARD_PRECISION)
///     .expect("valid pool");
///
/// pool.deposit(&alice, Amount::new(1_000_000_000_000_000_000), Timestamp::new(1_000))
///     .expect("deposit ok");
/// let reward = pool.withdraw(&alice, Amount::new(1_000_000_000_000_000_000), Timestamp::new(1_100))
///     .expect("withdraw ok");
/// assert_eq!(reward, Amount::new(1_000_000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakingPool {
    account: Address,
    staked_asset: Address,
    reward_asset: Address,
    reward_per_second: Amount,
    start_time: Timestamp,
    bonus_end_time: Timestamp,
    pool_limit_per_user: Amount,
    admin: Address,
    precision: u128,
    acc_reward_per_share: U256,
    last_reward_time: Timestamp,
    total_staked: Amount,
    users: BTreeMap<Address, UserInfo>,
}

impl StakingPool {
    /// Creates an empty pool whose custody account is `account`.
    ///
    /// # Errors
    ///
    /// - Propagates [`StakingPoolConfig::validate`].
    /// - [`AmmError::InvalidConfiguration`] if `precision` is zero.
    pub fn new(
        config: &StakingPoolConfig,
        account: Address,
        precision: u128,
    ) -> Result<Self, AmmError> {
        config.validate()?;
        if precision == 0 {
            return Err(AmmError::InvalidConfiguration(
                "reward precision must be non-zero",
            ));
        }
        Ok(Self {
            account,
            staked_asset: config.staked_asset(),
            reward_asset: config.reward_asset(),
            reward_per_second: config.reward_per_second(),
            start_time: config.start_time(),
            bonus_end_time: config.bonus_end_time(),
            pool_limit_per_user: config.pool_limit_per_user(),
            admin: config.admin(),
            precision,
            acc_reward_per_share: U256::zero(),
            last_reward_time: config.start_time(),
            total_staked: Amount::ZERO,
            users: BTreeMap::new(),
        })
    }

    /// Custody account holding staked principal and the reward budget.
    #[must_use]
    pub const fn account(&self) -> Address {
        self.account
    }

    /// Asset users stake.
    #[must_use]
    pub const fn staked_asset(&self) -> Address {
        self.staked_asset
    }

    /// Asset rewards are paid in.
    #[must_use]
    pub const fn reward_asset(&self) -> Address {
        self.reward_asset
    }

    /// Reward emitted per second across all stakers.
    #[must_use]
    pub const fn reward_per_second(&self) -> Amount {
        self.reward_per_second
    }

    /// First second of the reward window.
    #[must_use]
    pub const fn start_time(&self) -> Timestamp {
        self.start_time
    }

    /// First second after the reward window.
    #[must_use]
    pub const fn bonus_end_time(&self) -> Timestamp {
        self.bonus_end_time
    }

    /// Per-user stake cap, zero for none.
    #[must_use]
    pub const fn pool_limit_per_user(&self) -> Amount {
        self.pool_limit_per_user
    }

    /// Administrator recorded at deployment.
    #[must_use]
    pub const fn admin(&self) -> Address {
        self.admin
    }

    /// Sum of every user's stake.
    #[must_use]
    pub const fn total_staked(&self) -> Amount {
        self.total_staked
    }

    /// Reward per staked unit, scaled by the precision.
    #[must_use]
    pub const fn acc_reward_per_share(&self) -> U256 {
        self.acc_reward_per_share
    }

    /// Time of the last settlement.
    #[must_use]
    pub const fn last_reward_time(&self) -> Timestamp {
        self.last_reward_time
    }

    /// Where `now` falls relative to the reward window.
    #[must_use]
    pub fn phase(&self, now: Timestamp) -> StakingPhase {
        StakingPhase::at(now, self.start_time, self.bonus_end_time)
    }

    /// `user`'s position; zero if they never staked.
    #[must_use]
    pub fn user_info(&self, user: &Address) -> UserInfo {
        self.users.get(user).copied().unwrap_or_default()
    }

    /// Reward `user` would receive if they harvested at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the accrual does not fit `u128`.
    pub fn pending_reward(&self, user: &Address, now: Timestamp) -> Result<Amount, AmmError> {
        let acc = self.accumulator_at(now)?;
        self.pending_at(&self.user_info(user), acc)
    }

    /// Settles, pays `user`'s pending reward, and stakes `amount` more.
    ///
    /// A zero `amount` only harvests.  Returns the reward paid.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PoolLimitExceeded`] if the new stake would exceed the
    ///   per-user cap.
    /// - [`AmmError::Overflow`] on arithmetic overflow.
    pub fn deposit(
        &mut self,
        user: &Address,
        amount: Amount,
        now: Timestamp,
    ) -> Result<Amount, AmmError> {
        let acc = self.accumulator_at(now)?;
        let info = self.user_info(user);
        let reward = self.pending_at(&info, acc)?;

        let staked = info
            .amount
            .checked_add(&amount)
            .ok_or(AmmError::Overflow("user stake overflow"))?;
        if !self.pool_limit_per_user.is_zero() && staked > self.pool_limit_per_user {
            return Err(AmmError::PoolLimitExceeded {
                limit: self.pool_limit_per_user,
                requested: staked,
            });
        }
        let total = self
            .total_staked
            .checked_add(&amount)
            .ok_or(AmmError::Overflow("total stake overflow"))?;
        let reward_debt = self.debt_for(staked, acc)?;

        self.commit_accumulator(acc, now);
        self.total_staked = total;
        self.users.insert(
            *user,
            UserInfo {
                amount: staked,
                reward_debt,
            },
        );
        debug!(
            pool = %self.account,
            %user,
            %amount,
            %reward,
            total_staked = %self.total_staked,
            "stake deposited"
        );
        Ok(reward)
    }

    /// Settles, pays `user`'s pending reward, and unstakes `amount`.
    ///
    /// Returns the reward paid.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientStake`] if `amount` exceeds the user's stake.
    /// - [`AmmError::Overflow`] on arithmetic overflow.
    pub fn withdraw(
        &mut self,
        user: &Address,
        amount: Amount,
        now: Timestamp,
    ) -> Result<Amount, AmmError> {
        let info = self.user_info(user);
        let staked = info
            .amount
            .checked_sub(&amount)
            .ok_or(AmmError::InsufficientStake {
                staked: info.amount,
                requested: amount,
            })?;
        let acc = self.accumulator_at(now)?;
        let reward = self.pending_at(&info, acc)?;
        let total = self
            .total_staked
            .checked_sub(&amount)
            .ok_or(AmmError::Underflow("total stake underflow"))?;
        let reward_debt = self.debt_for(staked, acc)?;

        self.commit_accumulator(acc, now);
        self.total_staked = total;
        self.users.insert(
            *user,
            UserInfo {
                amount: staked,
                reward_debt,
            },
        );
        debug!(
            pool = %self.account,
            %user,
            %amount,
            %reward,
            total_staked = %self.total_staked,
            "stake withdrawn"
        );
        Ok(reward)
    }

    /// Settles and pays `user`'s pending reward without touching the stake.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] on arithmetic overflow.
    pub fn harvest(&mut self, user: &Address, now: Timestamp) -> Result<Amount, AmmError> {
        self.deposit(user, Amount::ZERO, now)
    }

    /// Returns `user`'s whole stake and forfeits their pending reward.
    ///
    /// The accumulator is not settled.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Underflow`] if the pool's totals are inconsistent.
    pub fn emergency_withdraw(&mut self, user: &Address) -> Result<Amount, AmmError> {
        let info = self.user_info(user);
        let total = self
            .total_staked
            .checked_sub(&info.amount)
            .ok_or(AmmError::Underflow("total stake underflow"))?;
        self.total_staked = total;
        self.users.remove(user);
        debug!(pool = %self.account, %user, amount = %info.amount, "emergency withdrawal");
        Ok(info.amount)
    }

    /// Accumulator value after settling up to `now`, without mutating.
    fn accumulator_at(&self, now: Timestamp) -> Result<U256, AmmError> {
        if now <= self.last_reward_time || self.total_staked.is_zero() {
            return Ok(self.acc_reward_per_share);
        }
        let from = self.last_reward_time.max(self.start_time);
        let to = now.min(self.bonus_end_time);
        let elapsed = to.seconds_since(from);
        if elapsed == 0 {
            return Ok(self.acc_reward_per_share);
        }
        let reward = self
            .reward_per_second
            .get()
            .checked_mul(u128::from(elapsed))
            .ok_or(AmmError::Overflow("reward emission overflow"))?;
        // both factors are u128, so the product fits
        let increment =
            U256::from(reward) * U256::from(self.precision) / U256::from(self.total_staked.get());
        self.acc_reward_per_share
            .checked_add(increment)
            .ok_or(AmmError::Overflow("reward accumulator overflow"))
    }

    fn debt_for(&self, amount: Amount, acc: U256) -> Result<u128, AmmError> {
        let scaled = U256::from(amount.get())
            .checked_mul(acc)
            .ok_or(AmmError::Overflow("reward debt overflow"))?;
        narrow(scaled / U256::from(self.precision), "reward debt exceeds u128")
    }

    fn pending_at(&self, info: &UserInfo, acc: U256) -> Result<Amount, AmmError> {
        let accrued = self.debt_for(info.amount, acc)?;
        accrued
            .checked_sub(info.reward_debt)
            .map(Amount::new)
            .ok_or(AmmError::Underflow("reward debt exceeds accrual"))
    }

    fn commit_accumulator(&mut self, acc: U256, now: Timestamp) {
        if acc != self.acc_reward_per_share {
            debug!(
                pool = %self.account,
                acc_reward_per_share = %acc,
                %now,
                "rewards settled"
            );
        }
        self.acc_reward_per_share = acc;
        if now > self.last_reward_time {
            self.last_reward_time = now;
        }
    }
}
