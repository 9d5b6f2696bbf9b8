//! Constant-product pair ledger (Uniswap V2 style).
//!
//! A [`Pair`] tracks the reserves and share supply of one asset pair and
//! enforces `reserve0 · reserve1` monotonicity on every swap.  It never
//! holds balances itself: the caller settles the asset movements described
//! by the returned [`SwapResult`], [`LiquidityMinted`], or
//! [`LiquidityBurned`] against an [`AssetLedger`](crate::traits::AssetLedger).
//!
//! # Swap Algorithm (exact input, `token0 → token1`)
//!
//! 1. `amount_out = in·(10000−f)·r1 / (r0·10000 + in·(10000−f))`
//! 2. `reserve0 += amount_in` (the fee stays in the pool)
//! 3. `reserve1 -= amount_out`
//! 4. reject if `reserve0' · reserve1' < reserve0 · reserve1`
//!
//! # Liquidity
//!
//! | Event | Shares minted |
//! |-------|---------------|
//! | First deposit | `sqrt(a0 · a1) − minimum_liquidity` (the minimum is locked at [`Address::ZERO`]) |
//! | Later deposit | `min(a0 · T / r0, a1 · T / r1)` after clamping to the reserve ratio |
//!
//! Withdrawals pay `r · shares / T` of each asset, rounded down.
//!
//! # Protocol Fee
//!
//! While a fee recipient is configured the pair remembers
//! `root_k_last = sqrt(r0 · r1)` after each liquidity event.  The next
//! event first mints the recipient's cut of the growth in `sqrt(k)` (see
//! [`protocol_fee_shares`]), then prices the deposit or withdrawal against
//! the enlarged supply.

use primitive_types::U256;
use tracing::{debug, info};

use crate::config::PairConfig;
use crate::domain::{
    Address, Amount, Liquidity, LiquidityBurned, LiquidityChange, LiquidityMinted, PairKey,
    PoolFees, Rounding, SwapResult, SwapSpec,
};
use crate::error::AmmError;
use crate::math::{amount_in, amount_out, mul_div, protocol_fee_shares, quote, root_k, sqrt_product};
use crate::traits::{FromConfig, LiquidityPool, SwapPool};

/// Reserves and share supply of one asset pair.
///
/// Created from a [`PairConfig`] via [`FromConfig`], normally by the
/// [`PairRegistry`](crate::factory::PairRegistry).  A new pair is empty;
/// the first deposit sets its price.
///
/// # State
///
/// - `reserve0` / `reserve1`: custody balances of `token0` / `token1`
/// - `total_supply`: outstanding shares, including the locked minimum
/// - `root_k_last`: `sqrt(reserve0 · reserve1)` after the last liquidity
///   event while the protocol fee was on, otherwise `0`
///
/// # Example
///
/// ```rust
/// use mars_amm::config::PairConfig;
/// use mars_amm::domain::{Address, Amount, Liquidity, LiquidityChange, PairKey, PoolFees, SwapSpec};
/// use mars_amm::pools::Pair;
/// use mars_amm::traits::{FromConfig, LiquidityPool, SwapPool};
///
/// let t0 = Address::repeat_byte(1);
/// let t1 = Address::repeat_byte(2);
/// let key = PairKey::new(t0, t1).expect("distinct");
/// let cfg = PairConfig::new(key, Address::derived(0xA1, 0), PoolFees::STANDARD, Liquidity::new(100))
///     .expect("valid config");
/// let mut pair = Pair::from_config(&cfg).expect("pair created");
///
/// let deposit = LiquidityChange::add(
///     Amount::new(10_000_000_000_000_000_000),
///     Amount::new(5_000_000_000_000_000_000),
///     Amount::ZERO,
///     Amount::ZERO,
/// )
/// .expect("non-zero");
/// pair.add_liquidity(&deposit, false).expect("deposit ok");
///
/// let spec = SwapSpec::exact_in(Amount::new(10_000), Amount::ZERO).expect("non-zero");
/// let result = pair.swap(spec, &t0).expect("swap ok");
/// assert_eq!(result.amount_out(), Amount::new(4_984));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    key: PairKey,
    share_token: Address,
    fees: PoolFees,
    minimum_liquidity: Liquidity,
    reserve0: Amount,
    reserve1: Amount,
    total_supply: Liquidity,
    root_k_last: u128,
}

impl Pair {
    /// Returns `(reserve0, reserve1)`.
    #[must_use]
    pub const fn reserves(&self) -> (Amount, Amount) {
        (self.reserve0, self.reserve1)
    }

    /// Returns `(reserve_in, reserve_out)` for a trade selling `token_in`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidToken`] if `token_in` is not in the pair.
    pub fn reserves_for(&self, token_in: &Address) -> Result<(Amount, Amount), AmmError> {
        self.key
            .sort_values(token_in, (self.reserve0, self.reserve1))
    }

    /// Address of the share token, which is also the pair's custody account.
    #[must_use]
    pub const fn share_token(&self) -> Address {
        self.share_token
    }

    /// Shares locked at the burn address on the first deposit.
    #[must_use]
    pub const fn minimum_liquidity(&self) -> Liquidity {
        self.minimum_liquidity
    }

    /// `sqrt(reserve0 · reserve1)` recorded after the last liquidity event,
    /// or `0` while the protocol fee is off.
    #[must_use]
    pub const fn root_k_last(&self) -> u128 {
        self.root_k_last
    }

    /// Replaces the fee parameters.
    ///
    /// # Errors
    ///
    /// Propagates [`PoolFees::validate`]; the pair is unchanged on error.
    pub fn set_fees(&mut self, fees: PoolFees) -> Result<(), AmmError> {
        fees.validate()?;
        debug!(pair = %self.key, %fees, "pair fees updated");
        self.fees = fees;
        Ok(())
    }

    /// Amount of the other asset worth `amount` of `token` at the current
    /// reserve ratio, fee-free.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidToken`] if `token` is not in the pair.
    /// - [`AmmError::ZeroReserve`] if the pair is empty.
    pub fn quote(&self, amount: Amount, token: &Address) -> Result<Amount, AmmError> {
        let (reserve_a, reserve_b) = self.reserves_for(token)?;
        quote(amount, reserve_a, reserve_b)
    }

    /// Shares a deposit of `(amount0_desired, amount1_desired)` would mint
    /// right now, without the protocol-fee adjustment.
    ///
    /// # Errors
    ///
    /// Same as [`LiquidityPool::add_liquidity`] with zero minimums.
    pub fn preview_mint(
        &self,
        amount0_desired: Amount,
        amount1_desired: Amount,
    ) -> Result<Liquidity, AmmError> {
        let (amount0, amount1) =
            self.optimal_amounts(amount0_desired, amount1_desired, Amount::ZERO, Amount::ZERO)?;
        let (shares, _) = self.shares_for(amount0, amount1, self.total_supply)?;
        Ok(shares)
    }

    /// Clamps a deposit to the current reserve ratio.
    fn optimal_amounts(
        &self,
        amount0_desired: Amount,
        amount1_desired: Amount,
        amount0_min: Amount,
        amount1_min: Amount,
    ) -> Result<(Amount, Amount), AmmError> {
        if self.reserve0.is_zero() && self.reserve1.is_zero() {
            return Ok((amount0_desired, amount1_desired));
        }
        let amount1_optimal = quote(amount0_desired, self.reserve0, self.reserve1)?;
        if amount1_optimal <= amount1_desired {
            if amount1_optimal < amount1_min {
                return Err(AmmError::InsufficientLiquidity {
                    minimum: amount1_min,
                    actual: amount1_optimal,
                });
            }
            return Ok((amount0_desired, amount1_optimal));
        }
        let amount0_optimal = quote(amount1_desired, self.reserve1, self.reserve0)?;
        if amount0_optimal < amount0_min {
            return Err(AmmError::InsufficientLiquidity {
                minimum: amount0_min,
                actual: amount0_optimal,
            });
        }
        Ok((amount0_optimal, amount1_desired))
    }

    /// Returns `(shares_to_depositor, shares_locked)` for a clamped deposit
    /// against `supply`.
    fn shares_for(
        &self,
        amount0: Amount,
        amount1: Amount,
        supply: Liquidity,
    ) -> Result<(Liquidity, Liquidity), AmmError> {
        if supply.is_zero() {
            let root = sqrt_product(amount0.get(), amount1.get());
            let locked = self.minimum_liquidity.get();
            if root <= locked {
                return Err(AmmError::InsufficientLiquidity {
                    minimum: Amount::new(locked.saturating_add(1)),
                    actual: Amount::new(root),
                });
            }
            return Ok((Liquidity::new(root - locked), self.minimum_liquidity));
        }
        let by0 = mul_div(amount0.get(), supply.get(), self.reserve0.get(), Rounding::Down)?;
        let by1 = mul_div(amount1.get(), supply.get(), self.reserve1.get(), Rounding::Down)?;
        let shares = by0.min(by1);
        if shares == 0 {
            return Err(AmmError::InsufficientLiquidity {
                minimum: Amount::new(1),
                actual: Amount::ZERO,
            });
        }
        Ok((Liquidity::new(shares), Liquidity::ZERO))
    }

    /// Protocol-fee shares owed before the next liquidity event.
    fn accrued_protocol_fee(&self, protocol_fee_on: bool) -> Result<Liquidity, AmmError> {
        if !protocol_fee_on || self.root_k_last == 0 {
            return Ok(Liquidity::ZERO);
        }
        protocol_fee_shares(
            self.total_supply,
            root_k(self.reserve0, self.reserve1),
            self.root_k_last,
            self.fees,
        )
    }

    fn record_root_k(&mut self, protocol_fee_on: bool) {
        self.root_k_last = if protocol_fee_on {
            root_k(self.reserve0, self.reserve1)
        } else {
            0
        };
    }
}

impl FromConfig<PairConfig> for Pair {
    /// Creates an empty pair.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`PairConfig::validate`].
    fn from_config(config: &PairConfig) -> Result<Self, AmmError> {
        config.validate()?;
        Ok(Self {
            key: config.key(),
            share_token: config.share_token(),
            fees: config.fees(),
            minimum_liquidity: config.minimum_liquidity(),
            reserve0: Amount::ZERO,
            reserve1: Amount::ZERO,
            total_supply: Liquidity::ZERO,
            root_k_last: 0,
        })
    }
}

impl SwapPool for Pair {
    fn quote_out(&self, amount: Amount, token_in: &Address) -> Result<Amount, AmmError> {
        let (reserve_in, reserve_out) = self.reserves_for(token_in)?;
        amount_out(amount, reserve_in, reserve_out, self.fees.swap_fee())
    }

    fn quote_in(&self, amount: Amount, token_in: &Address) -> Result<Amount, AmmError> {
        let (reserve_in, reserve_out) = self.reserves_for(token_in)?;
        amount_in(amount, reserve_in, reserve_out, self.fees.swap_fee())
    }

    /// Executes a swap and updates the reserves.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidToken`] if `token_in` is not in the pair.
    /// - [`AmmError::ZeroReserve`] if the pair has no liquidity.
    /// - [`AmmError::InsufficientReserves`] if an exact output is not below
    ///   the reserve.
    /// - [`AmmError::InvalidQuantity`] if the output rounds to zero.
    /// - [`AmmError::SlippageExceeded`] if the swap's bound is violated.
    /// - [`AmmError::InvariantViolation`] if the product would fall.
    fn swap(&mut self, spec: SwapSpec, token_in: &Address) -> Result<SwapResult, AmmError> {
        let zero_for_one = self.key.is_token0(token_in)?;
        let token_out = self.key.other(token_in)?;
        let (reserve_in, reserve_out) = self.reserves_for(token_in)?;

        let (paid_in, paid_out) = match spec {
            SwapSpec::ExactIn { amount_in: sold, .. } => {
                let out = self.quote_out(sold, token_in)?;
                spec.check(out)?;
                (sold, out)
            }
            SwapSpec::ExactOut {
                amount_out: bought,
                ..
            } => {
                let required = self.quote_in(bought, token_in)?;
                spec.check(required)?;
                (required, bought)
            }
        };
        if paid_out.is_zero() {
            return Err(AmmError::InvalidQuantity("swap output rounds to zero"));
        }

        let new_in = reserve_in
            .checked_add(&paid_in)
            .ok_or(AmmError::Overflow("reserve_in overflow after swap"))?;
        let new_out = reserve_out
            .checked_sub(&paid_out)
            .ok_or(AmmError::InsufficientReserves {
                reserve: reserve_out,
                requested: paid_out,
            })?;

        let k_before = U256::from(reserve_in.get()) * U256::from(reserve_out.get());
        let k_after = U256::from(new_in.get()) * U256::from(new_out.get());
        if k_after < k_before {
            return Err(AmmError::InvariantViolation);
        }

        let fee = self.fees.swap_fee().apply(paid_in, Rounding::Down)?;
        let result = SwapResult::new(*token_in, token_out, paid_in, paid_out, fee)?;

        if zero_for_one {
            self.reserve0 = new_in;
            self.reserve1 = new_out;
        } else {
            self.reserve1 = new_in;
            self.reserve0 = new_out;
        }
        debug!(
            pair = %self.key,
            %token_in,
            amount_in = %paid_in,
            amount_out = %paid_out,
            %fee,
            reserve0 = %self.reserve0,
            reserve1 = %self.reserve1,
            "swap executed"
        );
        Ok(result)
    }

    /// Returns `(reserve_other, reserve_base)`: one unit of `base` is worth
    /// `numerator / denominator` units of the other asset.
    fn spot_price(&self, base: &Address) -> Result<(Amount, Amount), AmmError> {
        let (reserve_base, reserve_other) = self.reserves_for(base)?;
        if reserve_base.is_zero() || reserve_other.is_zero() {
            return Err(AmmError::ZeroReserve);
        }
        Ok((reserve_other, reserve_base))
    }

    fn key(&self) -> PairKey {
        self.key
    }

    fn fees(&self) -> PoolFees {
        self.fees
    }
}

impl LiquidityPool for Pair {
    /// Deposits both assets at the current ratio and mints shares.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidQuantity`] if `change` is not an `Add` request.
    /// - [`AmmError::InsufficientLiquidity`] if a clamped amount is below its
    ///   minimum, or the deposit mints no shares.
    /// - [`AmmError::Overflow`] if a reserve or the supply would overflow.
    fn add_liquidity(
        &mut self,
        change: &LiquidityChange,
        protocol_fee_on: bool,
    ) -> Result<LiquidityMinted, AmmError> {
        let LiquidityChange::Add {
            amount0_desired,
            amount1_desired,
            amount0_min,
            amount1_min,
        } = *change
        else {
            return Err(AmmError::InvalidQuantity(
                "expected LiquidityChange::Add variant",
            ));
        };

        let (amount0, amount1) =
            self.optimal_amounts(amount0_desired, amount1_desired, amount0_min, amount1_min)?;
        let fee_shares = self.accrued_protocol_fee(protocol_fee_on)?;
        let supply = self
            .total_supply
            .checked_add(&fee_shares)
            .ok_or(AmmError::Overflow("share supply overflow"))?;
        let (shares, locked) = self.shares_for(amount0, amount1, supply)?;

        let reserve0 = self
            .reserve0
            .checked_add(&amount0)
            .ok_or(AmmError::Overflow("reserve0 overflow on deposit"))?;
        let reserve1 = self
            .reserve1
            .checked_add(&amount1)
            .ok_or(AmmError::Overflow("reserve1 overflow on deposit"))?;
        let total_supply = supply
            .checked_add(&shares)
            .and_then(|s| s.checked_add(&locked))
            .ok_or(AmmError::Overflow("share supply overflow"))?;

        self.reserve0 = reserve0;
        self.reserve1 = reserve1;
        self.total_supply = total_supply;
        self.record_root_k(protocol_fee_on);

        if !fee_shares.is_zero() {
            info!(pair = %self.key, shares = %fee_shares, "protocol fee minted");
        }
        debug!(
            pair = %self.key,
            %amount0,
            %amount1,
            %shares,
            %locked,
            total_supply = %self.total_supply,
            "liquidity added"
        );
        Ok(LiquidityMinted {
            amount0,
            amount1,
            shares,
            locked,
            protocol_fee_shares: fee_shares,
        })
    }

    /// Burns shares for a pro-rata slice of both reserves.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidQuantity`] if `change` is not a `Remove` request.
    /// - [`AmmError::InsufficientLiquidity`] if more shares are burned than
    ///   exist, or the withdrawal rounds to zero on either side.
    /// - [`AmmError::SlippageExceeded`] if either payout is below its minimum.
    fn remove_liquidity(
        &mut self,
        change: &LiquidityChange,
        protocol_fee_on: bool,
    ) -> Result<LiquidityBurned, AmmError> {
        let LiquidityChange::Remove {
            shares,
            amount0_min,
            amount1_min,
        } = *change
        else {
            return Err(AmmError::InvalidQuantity(
                "expected LiquidityChange::Remove variant",
            ));
        };
        if shares > self.total_supply {
            return Err(AmmError::InsufficientLiquidity {
                minimum: shares.as_amount(),
                actual: self.total_supply.as_amount(),
            });
        }

        let fee_shares = self.accrued_protocol_fee(protocol_fee_on)?;
        let supply = self
            .total_supply
            .checked_add(&fee_shares)
            .ok_or(AmmError::Overflow("share supply overflow"))?;

        let amount0 = Amount::new(mul_div(
            shares.get(),
            self.reserve0.get(),
            supply.get(),
            Rounding::Down,
        )?);
        let amount1 = Amount::new(mul_div(
            shares.get(),
            self.reserve1.get(),
            supply.get(),
            Rounding::Down,
        )?);
        if amount0.is_zero() || amount1.is_zero() {
            return Err(AmmError::InsufficientLiquidity {
                minimum: Amount::new(1),
                actual: amount0.min(amount1),
            });
        }
        if amount0 < amount0_min {
            return Err(AmmError::SlippageExceeded {
                bound: amount0_min,
                actual: amount0,
            });
        }
        if amount1 < amount1_min {
            return Err(AmmError::SlippageExceeded {
                bound: amount1_min,
                actual: amount1,
            });
        }

        let reserve0 = self
            .reserve0
            .checked_sub(&amount0)
            .ok_or(AmmError::Underflow("reserve0 underflow on withdrawal"))?;
        let reserve1 = self
            .reserve1
            .checked_sub(&amount1)
            .ok_or(AmmError::Underflow("reserve1 underflow on withdrawal"))?;
        let total_supply = supply
            .checked_sub(&shares)
            .ok_or(AmmError::Underflow("share supply underflow"))?;

        self.reserve0 = reserve0;
        self.reserve1 = reserve1;
        self.total_supply = total_supply;
        self.record_root_k(protocol_fee_on);

        if !fee_shares.is_zero() {
            info!(pair = %self.key, shares = %fee_shares, "protocol fee minted");
        }
        debug!(
            pair = %self.key,
            %amount0,
            %amount1,
            %shares,
            total_supply = %self.total_supply,
            "liquidity removed"
        );
        Ok(LiquidityBurned {
            amount0,
            amount1,
            shares,
            protocol_fee_shares: fee_shares,
        })
    }

    fn total_liquidity(&self) -> Liquidity {
        self.total_supply
    }
}
