//! Add-liquidity-and-stake composition.
//!
//! [`Farming`] chains router and staking calls on a scratch copy of the
//! [`Exchange`] and swaps the copy in only once every step succeeded, so an
//! investment either both mints and stakes its shares or does nothing.
//!
//! The staking pool for a pair is the one whose staked asset is the pair's
//! share token.  A farmer approves the router for the underlying assets
//! and the pool's custody address for the share token.

use tracing::info;

use crate::domain::{Address, Amount, Liquidity, Timestamp, TxContext};
use crate::error::AmmError;
use crate::exchange::Exchange;
use crate::pools::UserInfo;
use crate::traits::WrappedNative;

/// Outcome of [`Farming::invest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Investment {
    /// Deposited amount of the first asset.
    pub amount_a: Amount,
    /// Deposited amount of the second asset.
    pub amount_b: Amount,
    /// Shares minted and staked.
    pub shares: Liquidity,
    /// Reward paid out by the stake.
    pub reward: Amount,
}

/// Outcome of [`Farming::withdraw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Redemption {
    /// Amount of the first asset paid out.
    pub amount_a: Amount,
    /// Amount of the second asset paid out.
    pub amount_b: Amount,
    /// Reward paid out by the unstake.
    pub reward: Amount,
}

/// Farming view over an [`Exchange`].
#[derive(Debug)]
pub struct Farming<'a, L> {
    exchange: &'a mut Exchange<L>,
}

impl<'a, L: WrappedNative + Clone> Farming<'a, L> {
    /// Creates a farming view.
    pub fn new(exchange: &'a mut Exchange<L>) -> Self {
        Self { exchange }
    }

    /// Adds liquidity to `(token_a, token_b)` and stakes every minted share
    /// for `tx.sender`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PairNotFound`] / [`AmmError::StakingPoolNotFound`] if
    ///   the pair or its pool does not exist.
    /// - Any error of [`Router::add_liquidity`](crate::router::Router::add_liquidity)
    ///   or [`Exchange::stake`].
    #[allow(clippy::too_many_arguments)]
    pub fn invest(
        &mut self,
        tx: TxContext,
        token_a: Address,
        token_b: Address,
        amount_a_desired: Amount,
        amount_b_desired: Amount,
        amount_a_min: Amount,
        amount_b_min: Amount,
    ) -> Result<Investment, AmmError> {
        let share_token = self.farm(token_a, token_b)?;
        let mut scratch = self.exchange.clone();
        let (amount_a, amount_b, shares) = scratch.router().add_liquidity(
            tx,
            token_a,
            token_b,
            amount_a_desired,
            amount_b_desired,
            amount_a_min,
            amount_b_min,
            tx.sender,
            tx.now,
        )?;
        let reward = scratch.stake(tx, share_token, shares.as_amount(), tx.sender)?;
        *self.exchange = scratch;
        info!(farmer = %tx.sender, farm = %share_token, %shares, %reward, "invested");
        Ok(Investment {
            amount_a,
            amount_b,
            shares,
            reward,
        })
    }

    /// Adds liquidity to `(token, wrapped native)` paying native coin, and
    /// stakes the minted shares.
    ///
    /// # Errors
    ///
    /// As [`invest`](Self::invest), via
    /// [`Router::add_liquidity_native`](crate::router::Router::add_liquidity_native).
    pub fn invest_native(
        &mut self,
        tx: TxContext,
        token: Address,
        amount_token_desired: Amount,
        amount_token_min: Amount,
        amount_native_min: Amount,
        value: Amount,
    ) -> Result<Investment, AmmError> {
        let wrapped = self.exchange.ledger().wrapped_native();
        let share_token = self.farm(token, wrapped)?;
        let mut scratch = self.exchange.clone();
        let (amount_a, amount_b, shares) = scratch.router().add_liquidity_native(
            tx,
            token,
            amount_token_desired,
            amount_token_min,
            amount_native_min,
            value,
            tx.sender,
            tx.now,
        )?;
        let reward = scratch.stake(tx, share_token, shares.as_amount(), tx.sender)?;
        *self.exchange = scratch;
        info!(farmer = %tx.sender, farm = %share_token, %shares, %reward, "invested native");
        Ok(Investment {
            amount_a,
            amount_b,
            shares,
            reward,
        })
    }

    /// Unstakes `shares` and removes them from the pair, paying both assets
    /// and the accrued reward to `tx.sender`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientStake`] if more is withdrawn than staked.
    /// - Any error of [`Router::remove_liquidity`](crate::router::Router::remove_liquidity).
    pub fn withdraw(
        &mut self,
        tx: TxContext,
        token_a: Address,
        token_b: Address,
        shares: Liquidity,
        amount_a_min: Amount,
        amount_b_min: Amount,
    ) -> Result<Redemption, AmmError> {
        let share_token = self.farm(token_a, token_b)?;
        let mut scratch = self.exchange.clone();
        let reward = scratch.unstake(tx, share_token, shares.as_amount(), tx.sender)?;
        let (amount_a, amount_b) = scratch.router().remove_liquidity(
            tx,
            token_a,
            token_b,
            shares,
            amount_a_min,
            amount_b_min,
            tx.sender,
            tx.now,
        )?;
        *self.exchange = scratch;
        info!(farmer = %tx.sender, farm = %share_token, %shares, %reward, "withdrawn");
        Ok(Redemption {
            amount_a,
            amount_b,
            reward,
        })
    }

    /// Unstakes `shares` of a `(token, wrapped native)` farm and pays the
    /// token and native coin to `tx.sender`.
    ///
    /// # Errors
    ///
    /// As [`withdraw`](Self::withdraw).
    pub fn withdraw_native(
        &mut self,
        tx: TxContext,
        token: Address,
        shares: Liquidity,
        amount_token_min: Amount,
        amount_native_min: Amount,
    ) -> Result<Redemption, AmmError> {
        let wrapped = self.exchange.ledger().wrapped_native();
        let share_token = self.farm(token, wrapped)?;
        let mut scratch = self.exchange.clone();
        let reward = scratch.unstake(tx, share_token, shares.as_amount(), tx.sender)?;
        let (amount_a, amount_b) = scratch.router().remove_liquidity_native(
            tx,
            token,
            shares,
            amount_token_min,
            amount_native_min,
            tx.sender,
            tx.now,
        )?;
        *self.exchange = scratch;
        info!(farmer = %tx.sender, farm = %share_token, %shares, %reward, "withdrawn native");
        Ok(Redemption {
            amount_a,
            amount_b,
            reward,
        })
    }

    /// Pays `tx.sender`'s accrued reward from the pair's farm.
    ///
    /// # Errors
    ///
    /// As [`Exchange::harvest`].
    pub fn harvest(
        &mut self,
        tx: TxContext,
        token_a: Address,
        token_b: Address,
    ) -> Result<Amount, AmmError> {
        let share_token = self.farm(token_a, token_b)?;
        self.exchange.harvest(tx, share_token)
    }

    /// `user`'s stake in the pair's farm.
    ///
    /// # Errors
    ///
    /// [`AmmError::PairNotFound`] / [`AmmError::StakingPoolNotFound`].
    pub fn user_info(
        &self,
        token_a: Address,
        token_b: Address,
        user: &Address,
    ) -> Result<UserInfo, AmmError> {
        let share_token = self.farm(token_a, token_b)?;
        self.exchange.user_info(share_token, user)
    }

    /// Reward `user` would harvest at `now`.
    ///
    /// # Errors
    ///
    /// As [`user_info`](Self::user_info).
    pub fn pending_reward(
        &self,
        token_a: Address,
        token_b: Address,
        user: &Address,
        now: Timestamp,
    ) -> Result<Amount, AmmError> {
        let share_token = self.farm(token_a, token_b)?;
        self.exchange.pending_reward(share_token, user, now)
    }

    /// Share token of the pair, checked to have a staking pool.
    fn farm(&self, token_a: Address, token_b: Address) -> Result<Address, AmmError> {
        let share_token = self.exchange.pairs().pair(token_a, token_b)?.share_token();
        self.exchange.staking().pool(&share_token)?;
        Ok(share_token)
    }
}
