//! State-changing router entry points.

use tracing::{info, instrument, warn};

use super::RouteQuoter;
use crate::config::ExchangeConfig;
use crate::domain::{
    Address, Amount, Liquidity, LiquidityChange, Path, SwapSpec, SwapType, Timestamp, TxContext,
};
use crate::error::AmmError;
use crate::factory::PairRegistry;
use crate::ledger::Settlement;
use crate::pools::Pair;
use crate::traits::{LiquidityPool, SwapPool, WrappedNative};

/// How the trader's side of a call is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    /// An ordinary asset moved on the router's allowance.
    Asset,
    /// Native coin, wrapped on the way in or unwrapped on the way out.
    Native,
}

fn rejected(err: AmmError) -> AmmError {
    warn!(%err, "router call rejected");
    err
}

/// Executes swaps and liquidity changes against a [`PairRegistry`] and an
/// asset ledger.
///
/// Every call follows the same shape: check the deadline, quote against
/// the committed pairs, check the caller's bound, stage the pair updates on
/// clones, settle every asset movement as one [`Settlement`], and only then
/// commit the staged pairs.  A failure at any step leaves both the
/// registry and the ledger untouched.
///
/// Assets are pulled from the caller with
/// [`transfer_from`](crate::traits::AssetLedger::transfer_from), spending
/// the allowance granted to [`ExchangeConfig::router`].
#[derive(Debug)]
pub struct Router<'a, L> {
    pairs: &'a mut PairRegistry,
    ledger: &'a mut L,
    config: &'a ExchangeConfig,
}

impl<'a, L: WrappedNative + Clone> Router<'a, L> {
    /// Creates a router view over the given state.
    pub fn new(pairs: &'a mut PairRegistry, ledger: &'a mut L, config: &'a ExchangeConfig) -> Self {
        Self {
            pairs,
            ledger,
            config,
        }
    }

    /// Read-only quoter over the same pairs.
    #[must_use]
    pub fn quoter(&self) -> RouteQuoter<'_> {
        RouteQuoter::new(&*self.pairs)
    }

    // -- Swaps ----------------------------------------------------------------

    /// Sells exactly `amount_in` of `path.first()` for at least
    /// `amount_out_min` of `path.last()`, paid to `to`.
    ///
    /// Returns the amount at every step of the path.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Expired`] if `tx.now > deadline`.
    /// - [`AmmError::InvalidPath`] for unregistered hops.
    /// - [`AmmError::SlippageExceeded`] if the output is below the minimum.
    /// - Ledger errors if the caller's balance or allowance is short.
    #[instrument(skip(self, path), fields(sender = %tx.sender, path = %path))]
    pub fn swap_exact_tokens_for_tokens(
        &mut self,
        tx: TxContext,
        amount_in: Amount,
        amount_out_min: Amount,
        path: &Path,
        to: Address,
        deadline: Timestamp,
    ) -> Result<Vec<Amount>, AmmError> {
        tx.ensure_before(deadline).map_err(rejected)?;
        let amounts = self.quoter().get_amounts_out(amount_in, path)?;
        check_min_out(&amounts, amount_out_min)?;
        self.execute_swap(tx, path, &amounts, SwapType::ExactIn, Side::Asset, Side::Asset, to)
    }

    /// Buys exactly `amount_out` of `path.last()` for at most
    /// `amount_in_max` of `path.first()`.
    ///
    /// # Errors
    ///
    /// As [`swap_exact_tokens_for_tokens`](Self::swap_exact_tokens_for_tokens),
    /// with [`AmmError::SlippageExceeded`] when the required input exceeds
    /// the maximum.
    #[instrument(skip(self, path), fields(sender = %tx.sender, path = %path))]
    pub fn swap_tokens_for_exact_tokens(
        &mut self,
        tx: TxContext,
        amount_out: Amount,
        amount_in_max: Amount,
        path: &Path,
        to: Address,
        deadline: Timestamp,
    ) -> Result<Vec<Amount>, AmmError> {
        tx.ensure_before(deadline).map_err(rejected)?;
        let amounts = self.quoter().get_amounts_in(amount_out, path)?;
        check_max_in(&amounts, amount_in_max)?;
        self.execute_swap(tx, path, &amounts, SwapType::ExactOut, Side::Asset, Side::Asset, to)
    }

    /// Sells exactly `value` native coin along a path that starts at the
    /// wrapped-native asset.
    ///
    /// # Errors
    ///
    /// [`AmmError::InvalidPath`] if the path does not start with the
    /// wrapped-native asset; otherwise as
    /// [`swap_exact_tokens_for_tokens`](Self::swap_exact_tokens_for_tokens).
    #[instrument(skip(self, path), fields(sender = %tx.sender, path = %path))]
    pub fn swap_exact_native_for_tokens(
        &mut self,
        tx: TxContext,
        value: Amount,
        amount_out_min: Amount,
        path: &Path,
        to: Address,
        deadline: Timestamp,
    ) -> Result<Vec<Amount>, AmmError> {
        tx.ensure_before(deadline).map_err(rejected)?;
        self.require_native_start(path)?;
        let amounts = self.quoter().get_amounts_out(value, path)?;
        check_min_out(&amounts, amount_out_min)?;
        self.execute_swap(tx, path, &amounts, SwapType::ExactIn, Side::Native, Side::Asset, to)
    }

    /// Buys exactly `amount_out` along a path that starts at the
    /// wrapped-native asset, spending at most `value` native coin.
    ///
    /// Only the required input is wrapped; the rest of `value` stays with
    /// the caller.
    ///
    /// # Errors
    ///
    /// As [`swap_exact_native_for_tokens`](Self::swap_exact_native_for_tokens).
    #[instrument(skip(self, path), fields(sender = %tx.sender, path = %path))]
    pub fn swap_native_for_exact_tokens(
        &mut self,
        tx: TxContext,
        amount_out: Amount,
        value: Amount,
        path: &Path,
        to: Address,
        deadline: Timestamp,
    ) -> Result<Vec<Amount>, AmmError> {
        tx.ensure_before(deadline).map_err(rejected)?;
        self.require_native_start(path)?;
        let amounts = self.quoter().get_amounts_in(amount_out, path)?;
        check_max_in(&amounts, value)?;
        self.execute_swap(tx, path, &amounts, SwapType::ExactOut, Side::Native, Side::Asset, to)
    }

    /// Sells exactly `amount_in` along a path that ends at the
    /// wrapped-native asset and pays `to` in native coin.
    ///
    /// # Errors
    ///
    /// [`AmmError::InvalidPath`] if the path does not end with the
    /// wrapped-native asset; otherwise as
    /// [`swap_exact_tokens_for_tokens`](Self::swap_exact_tokens_for_tokens).
    #[instrument(skip(self, path), fields(sender = %tx.sender, path = %path))]
    pub fn swap_exact_tokens_for_native(
        &mut self,
        tx: TxContext,
        amount_in: Amount,
        amount_out_min: Amount,
        path: &Path,
        to: Address,
        deadline: Timestamp,
    ) -> Result<Vec<Amount>, AmmError> {
        tx.ensure_before(deadline).map_err(rejected)?;
        self.require_native_end(path)?;
        let amounts = self.quoter().get_amounts_out(amount_in, path)?;
        check_min_out(&amounts, amount_out_min)?;
        self.execute_swap(tx, path, &amounts, SwapType::ExactIn, Side::Asset, Side::Native, to)
    }

    /// Buys exactly `amount_out` native coin along a path that ends at the
    /// wrapped-native asset.
    ///
    /// # Errors
    ///
    /// As [`swap_exact_tokens_for_native`](Self::swap_exact_tokens_for_native).
    #[instrument(skip(self, path), fields(sender = %tx.sender, path = %path))]
    pub fn swap_tokens_for_exact_native(
        &mut self,
        tx: TxContext,
        amount_out: Amount,
        amount_in_max: Amount,
        path: &Path,
        to: Address,
        deadline: Timestamp,
    ) -> Result<Vec<Amount>, AmmError> {
        tx.ensure_before(deadline).map_err(rejected)?;
        self.require_native_end(path)?;
        let amounts = self.quoter().get_amounts_in(amount_out, path)?;
        check_max_in(&amounts, amount_in_max)?;
        self.execute_swap(tx, path, &amounts, SwapType::ExactOut, Side::Asset, Side::Native, to)
    }

    // -- Liquidity --------------------------------------------------------------

    /// Deposits up to the desired amounts of both assets at the pair's
    /// current ratio and mints shares to `to`.
    ///
    /// Creates the pair with [`ExchangeConfig::default_fees`] if it does not
    /// exist yet; the creation is part of the same atomic call.
    ///
    /// Returns `(amount_a, amount_b, shares)`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Expired`] if `tx.now > deadline`.
    /// - [`AmmError::InsufficientLiquidity`] if a clamped amount is below its
    ///   minimum or the deposit mints nothing.
    /// - Ledger errors if the caller's balance or allowance is short.
    #[allow(clippy::too_many_arguments)]
    #[instrument(skip(self), fields(sender = %tx.sender))]
    pub fn add_liquidity(
        &mut self,
        tx: TxContext,
        token_a: Address,
        token_b: Address,
        amount_a_desired: Amount,
        amount_b_desired: Amount,
        amount_a_min: Amount,
        amount_b_min: Amount,
        to: Address,
        deadline: Timestamp,
    ) -> Result<(Amount, Amount, Liquidity), AmmError> {
        tx.ensure_before(deadline).map_err(rejected)?;
        self.mint_liquidity(
            tx,
            (token_a, token_b),
            (amount_a_desired, amount_b_desired),
            (amount_a_min, amount_b_min),
            Side::Asset,
            to,
        )
    }

    /// Deposits `token` and native coin.  `value` is the most native coin
    /// the caller will pay; only the clamped amount is wrapped.
    ///
    /// Returns `(amount_token, amount_native, shares)`.
    ///
    /// # Errors
    ///
    /// As [`add_liquidity`](Self::add_liquidity).
    #[allow(clippy::too_many_arguments)]
    #[instrument(skip(self), fields(sender = %tx.sender))]
    pub fn add_liquidity_native(
        &mut self,
        tx: TxContext,
        token: Address,
        amount_token_desired: Amount,
        amount_token_min: Amount,
        amount_native_min: Amount,
        value: Amount,
        to: Address,
        deadline: Timestamp,
    ) -> Result<(Amount, Amount, Liquidity), AmmError> {
        tx.ensure_before(deadline).map_err(rejected)?;
        let wrapped = self.ledger.wrapped_native();
        self.mint_liquidity(
            tx,
            (token, wrapped),
            (amount_token_desired, value),
            (amount_token_min, amount_native_min),
            Side::Native,
            to,
        )
    }

    /// Burns `shares` of the caller's pair shares and pays both assets to
    /// `to`.
    ///
    /// Returns `(amount_a, amount_b)`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Expired`] if `tx.now > deadline`.
    /// - [`AmmError::PairNotFound`] if the pair does not exist.
    /// - [`AmmError::InsufficientLiquidity`] if more shares are burned than
    ///   exist.
    /// - [`AmmError::SlippageExceeded`] if a payout is below its minimum.
    #[allow(clippy::too_many_arguments)]
    #[instrument(skip(self), fields(sender = %tx.sender))]
    pub fn remove_liquidity(
        &mut self,
        tx: TxContext,
        token_a: Address,
        token_b: Address,
        shares: Liquidity,
        amount_a_min: Amount,
        amount_b_min: Amount,
        to: Address,
        deadline: Timestamp,
    ) -> Result<(Amount, Amount), AmmError> {
        tx.ensure_before(deadline).map_err(rejected)?;
        self.burn_liquidity(
            tx,
            (token_a, token_b),
            shares,
            (amount_a_min, amount_b_min),
            Side::Asset,
            to,
        )
    }

    /// Burns shares of a `(token, wrapped-native)` pair and pays `to` the
    /// token and native coin.
    ///
    /// Returns `(amount_token, amount_native)`.
    ///
    /// # Errors
    ///
    /// As [`remove_liquidity`](Self::remove_liquidity).
    #[allow(clippy::too_many_arguments)]
    #[instrument(skip(self), fields(sender = %tx.sender))]
    pub fn remove_liquidity_native(
        &mut self,
        tx: TxContext,
        token: Address,
        shares: Liquidity,
        amount_token_min: Amount,
        amount_native_min: Amount,
        to: Address,
        deadline: Timestamp,
    ) -> Result<(Amount, Amount), AmmError> {
        tx.ensure_before(deadline).map_err(rejected)?;
        let wrapped = self.ledger.wrapped_native();
        self.burn_liquidity(
            tx,
            (token, wrapped),
            shares,
            (amount_token_min, amount_native_min),
            Side::Native,
            to,
        )
    }

    // -- Internals --------------------------------------------------------------

    fn require_native_start(&self, path: &Path) -> Result<(), AmmError> {
        if path.first() != self.ledger.wrapped_native() {
            return Err(AmmError::InvalidPath(
                "path must start with the wrapped native asset",
            ));
        }
        Ok(())
    }

    fn require_native_end(&self, path: &Path) -> Result<(), AmmError> {
        if path.last() != self.ledger.wrapped_native() {
            return Err(AmmError::InvalidPath(
                "path must end with the wrapped native asset",
            ));
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn execute_swap(
        &mut self,
        tx: TxContext,
        path: &Path,
        amounts: &[Amount],
        kind: SwapType,
        funding: Side,
        payout: Side,
        to: Address,
    ) -> Result<Vec<Amount>, AmmError> {
        let wrapped = self.ledger.wrapped_native();
        let router = self.config.router();
        let pairs = RouteQuoter::new(&*self.pairs).resolve(path)?;
        let (Some(first), Some(&paid), Some(&received)) =
            (pairs.first(), amounts.first(), amounts.last())
        else {
            return Err(AmmError::InvalidPath("path crosses no pair"));
        };

        let mut batch = Settlement::new();
        match funding {
            Side::Asset => {
                batch.transfer_from(path.first(), router, tx.sender, first.share_token(), paid);
            }
            Side::Native => {
                batch
                    .wrap(tx.sender, paid)
                    .transfer(wrapped, tx.sender, first.share_token(), paid);
            }
        }

        let mut staged: Vec<Pair> = Vec::with_capacity(path.hop_count());
        for (i, (pair, hop)) in pairs.iter().zip(path.hops()).enumerate() {
            let spec = match kind {
                SwapType::ExactIn => SwapSpec::exact_in(amounts[i], amounts[i + 1])?,
                SwapType::ExactOut => SwapSpec::exact_out(amounts[i + 1], amounts[i])?,
            };
            let mut next = (*pair).clone();
            let result = next.swap(spec, &hop.token_in)?;
            let recipient = pairs.get(i + 1).map_or(to, |p| p.share_token());
            batch.transfer(hop.token_out, next.share_token(), recipient, result.amount_out());
            staged.push(next);
        }
        if payout == Side::Native {
            batch.unwrap(to, received);
        }

        batch.apply(&mut *self.ledger)?;
        self.pairs.commit(staged);
        info!(
            sender = %tx.sender,
            %to,
            %path,
            amount_in = %paid,
            amount_out = %received,
            "swap routed"
        );
        Ok(amounts.to_vec())
    }

    fn staged_pair(&self, token_a: Address, token_b: Address) -> Result<Pair, AmmError> {
        match self.pairs.pair(token_a, token_b) {
            Ok(pair) => Ok(pair.clone()),
            Err(AmmError::PairNotFound) => {
                self.pairs
                    .prepare_pair(token_a, token_b, self.config.default_fees())
            }
            Err(err) => Err(err),
        }
    }

    fn mint_liquidity(
        &mut self,
        tx: TxContext,
        (token_a, token_b): (Address, Address),
        desired: (Amount, Amount),
        minimums: (Amount, Amount),
        side_b: Side,
        to: Address,
    ) -> Result<(Amount, Amount, Liquidity), AmmError> {
        let mut pair = self.staged_pair(token_a, token_b)?;
        let key = pair.key();
        let (desired0, desired1) = key.sort_values(&token_a, desired)?;
        let (min0, min1) = key.sort_values(&token_a, minimums)?;
        let change = LiquidityChange::add(desired0, desired1, min0, min1)?;
        let minted = pair.add_liquidity(&change, self.pairs.protocol_fee_on())?;
        let (amount_a, amount_b) = key.sort_values(&token_a, (minted.amount0, minted.amount1))?;

        let router = self.config.router();
        let share = pair.share_token();
        let mut batch = Settlement::new();
        batch.transfer_from(token_a, router, tx.sender, share, amount_a);
        match side_b {
            Side::Asset => {
                batch.transfer_from(token_b, router, tx.sender, share, amount_b);
            }
            Side::Native => {
                batch
                    .wrap(tx.sender, amount_b)
                    .transfer(token_b, tx.sender, share, amount_b);
            }
        }
        batch
            .mint(share, to, minted.shares.as_amount())
            .mint(share, Address::ZERO, minted.locked.as_amount());
        if let Some(fee_to) = self.pairs.fee_to() {
            batch.mint(share, fee_to, minted.protocol_fee_shares.as_amount());
        }

        batch.apply(&mut *self.ledger)?;
        self.pairs.commit([pair]);
        info!(
            sender = %tx.sender,
            %to,
            pair = %key,
            %amount_a,
            %amount_b,
            shares = %minted.shares,
            "liquidity added"
        );
        Ok((amount_a, amount_b, minted.shares))
    }

    fn burn_liquidity(
        &mut self,
        tx: TxContext,
        (token_a, token_b): (Address, Address),
        shares: Liquidity,
        minimums: (Amount, Amount),
        side_b: Side,
        to: Address,
    ) -> Result<(Amount, Amount), AmmError> {
        let mut pair = self.pairs.pair(token_a, token_b)?.clone();
        let key = pair.key();
        let (min0, min1) = key.sort_values(&token_a, minimums)?;
        let change = LiquidityChange::remove(shares, min0, min1)?;
        let burned = pair
            .remove_liquidity(&change, self.pairs.protocol_fee_on())
            .map_err(|err| match err {
                AmmError::SlippageExceeded { .. } => rejected(err),
                other => other,
            })?;
        let (amount_a, amount_b) = key.sort_values(&token_a, (burned.amount0, burned.amount1))?;

        let share = pair.share_token();
        let mut batch = Settlement::new();
        batch
            .transfer_from(share, self.config.router(), tx.sender, share, shares.as_amount())
            .burn(share, share, shares.as_amount());
        if let Some(fee_to) = self.pairs.fee_to() {
            batch.mint(share, fee_to, burned.protocol_fee_shares.as_amount());
        }
        batch
            .transfer(token_a, share, to, amount_a)
            .transfer(token_b, share, to, amount_b);
        if side_b == Side::Native {
            batch.unwrap(to, amount_b);
        }

        batch.apply(&mut *self.ledger)?;
        self.pairs.commit([pair]);
        info!(
            sender = %tx.sender,
            %to,
            pair = %key,
            %amount_a,
            %amount_b,
            %shares,
            "liquidity removed"
        );
        Ok((amount_a, amount_b))
    }
}

fn check_min_out(amounts: &[Amount], amount_out_min: Amount) -> Result<(), AmmError> {
    let out = amounts.last().copied().unwrap_or(Amount::ZERO);
    if out < amount_out_min {
        return Err(rejected(AmmError::SlippageExceeded {
            bound: amount_out_min,
            actual: out,
        }));
    }
    Ok(())
}

fn check_max_in(amounts: &[Amount], amount_in_max: Amount) -> Result<(), AmmError> {
    let required = amounts.first().copied().unwrap_or(Amount::ZERO);
    if required > amount_in_max {
        return Err(rejected(AmmError::SlippageExceeded {
            bound: amount_in_max,
            actual: required,
        }));
    }
    Ok(())
}
