//! The exchange facade.
//!
//! [`Exchange`] owns every piece of state (the pair and staking
//! registries, the asset ledger, and the configuration) and hands out
//! short-lived component views over it:
//!
//! ```text
//!                    ┌──────────────┐
//!   router() ───────▶│    Router    │──┐
//!   quoter() ───────▶│ RouteQuoter  │  │   &mut PairRegistry
//!   valuator() ─────▶│  Valuator    │  ├─▶ &mut ledger
//!   farming() ──────▶│   Farming    │──┘   &ExchangeConfig
//!                    └──────────────┘
//!   stake() / unstake() / harvest() ──▶ StakingRegistry + ledger
//! ```
//!
//! Staking calls follow the router's shape: the pool is updated on a
//! clone, the asset movements are applied as one
//! [`Settlement`](crate::ledger::Settlement), and the clone is committed
//! only after the ledger accepted every leg.

use tracing::{info, warn};

use crate::config::{ExchangeConfig, StakingPoolConfig};
use crate::domain::{Address, Amount, PoolFees, Timestamp, TxContext};
use crate::error::AmmError;
use crate::factory::{PairRegistry, StakingRegistry};
use crate::farming::Farming;
use crate::ledger::{InMemoryLedger, Settlement};
use crate::pools::UserInfo;
use crate::router::{RouteQuoter, Router};
use crate::traits::WrappedNative;
use crate::valuator::LiquidityValuator;

/// One staking-pool mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StakeAction {
    Deposit(Amount),
    Withdraw(Amount),
    Harvest,
    Emergency,
}

/// Registries, ledger, and configuration of one exchange deployment.
///
/// # Example
///
/// ```rust
/// use mars_amm::config::ExchangeConfig;
/// use mars_amm::domain::{Address, Amount, Path, Timestamp, TxContext};
/// use mars_amm::exchange::Exchange;
/// use mars_amm::traits::AssetLedger;
///
/// let (a, b) = (Address::repeat_byte(1), Address::repeat_byte(2));
/// let alice = Address::repeat_byte(0xA1);
/// let mut exchange = Exchange::new(ExchangeConfig::default()).expect("valid config");
/// let router = exchange.config().router();
/// for token in [a, b] {
///     let ledger = exchange.ledger_mut();
///     ledger.mint(&token, &alice, Amount::new(1_000_000)).expect("minted");
///     ledger.approve(&token, &alice, &router, Amount::MAX).expect("approved");
/// }
///
/// let tx = TxContext::new(alice, Timestamp::new(1));
/// exchange
///     .router()
///     .add_liquidity(
///         tx, a, b,
///         Amount::new(100_000), Amount::new(100_000),
///         Amount::ZERO, Amount::ZERO,
///         alice, Timestamp::MAX,
///     )
///     .expect("added");
///
/// let path = Path::new(vec![a, b]).expect("valid path");
/// let amounts = exchange.quoter().get_amounts_out(Amount::new(1_000), &path).expect("quoted");
/// assert_eq!(amounts[1], Amount::new(987));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange<L = InMemoryLedger> {
    config: ExchangeConfig,
    pairs: PairRegistry,
    staking: StakingRegistry,
    ledger: L,
}

impl Exchange<InMemoryLedger> {
    /// Creates an empty exchange backed by an [`InMemoryLedger`].
    ///
    /// # Errors
    ///
    /// Propagates [`ExchangeConfig::validate`].
    pub fn new(config: ExchangeConfig) -> Result<Self, AmmError> {
        let ledger = InMemoryLedger::new(config.wrapped_native());
        Self::with_ledger(config, ledger)
    }
}

impl<L: WrappedNative + Clone> Exchange<L> {
    /// Creates an empty exchange over an existing ledger.
    ///
    /// # Errors
    ///
    /// - Propagates [`ExchangeConfig::validate`].
    /// - [`AmmError::InvalidConfiguration`] if the ledger wraps a different
    ///   asset than the configuration names.
    pub fn with_ledger(config: ExchangeConfig, ledger: L) -> Result<Self, AmmError> {
        config.validate()?;
        if ledger.wrapped_native() != config.wrapped_native() {
            return Err(AmmError::InvalidConfiguration(
                "ledger and configuration disagree on the wrapped native asset",
            ));
        }
        let mut pairs = PairRegistry::new(config.minimum_liquidity());
        pairs.set_fee_to(config.fee_to());
        Ok(Self {
            config,
            pairs,
            staking: StakingRegistry::new(config.reward_precision()),
            ledger,
        })
    }

    /// Exchange-wide parameters.
    #[must_use]
    pub const fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// The asset ledger.
    #[must_use]
    pub const fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Mutable access to the asset ledger, for funding and approvals.
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    /// The pair registry.
    #[must_use]
    pub const fn pairs(&self) -> &PairRegistry {
        &self.pairs
    }

    /// Mutable access to the pair registry, for fee administration.
    pub fn pairs_mut(&mut self) -> &mut PairRegistry {
        &mut self.pairs
    }

    /// The staking registry.
    #[must_use]
    pub const fn staking(&self) -> &StakingRegistry {
        &self.staking
    }

    // -- Component views --------------------------------------------------------

    /// Swap and liquidity entry points.
    pub fn router(&mut self) -> Router<'_, L> {
        Router::new(&mut self.pairs, &mut self.ledger, &self.config)
    }

    /// Read-only path quotes.
    #[must_use]
    pub fn quoter(&self) -> RouteQuoter<'_> {
        RouteQuoter::new(&self.pairs)
    }

    /// Read-only share valuation.
    #[must_use]
    pub fn valuator(&self) -> LiquidityValuator<'_, L> {
        LiquidityValuator::new(&self.pairs, &self.ledger)
    }

    /// Add-liquidity-and-stake composition.
    pub fn farming(&mut self) -> Farming<'_, L> {
        Farming::new(self)
    }

    // -- Registries ---------------------------------------------------------------

    /// Creates a pair with the configured default fees and returns its
    /// share-token address.
    ///
    /// # Errors
    ///
    /// See [`PairRegistry::create_pair`].
    pub fn create_pair(&mut self, token_a: Address, token_b: Address) -> Result<Address, AmmError> {
        self.pairs
            .create_pair(token_a, token_b, self.config.default_fees())
    }

    /// Creates a pair with explicit fees.
    ///
    /// # Errors
    ///
    /// See [`PairRegistry::create_pair`].
    pub fn create_pair_with_fees(
        &mut self,
        token_a: Address,
        token_b: Address,
        fees: PoolFees,
    ) -> Result<Address, AmmError> {
        self.pairs.create_pair(token_a, token_b, fees)
    }

    /// Deploys a staking pool and returns its custody address.
    ///
    /// The pool pays rewards out of the reward-asset balance held at that
    /// address; fund it with an ordinary transfer.
    ///
    /// # Errors
    ///
    /// See [`StakingRegistry::deploy_pool`].
    pub fn deploy_pool(&mut self, config: &StakingPoolConfig) -> Result<Address, AmmError> {
        self.staking.deploy_pool(config)
    }

    // -- Staking --------------------------------------------------------------------

    /// Stakes `amount` of `staked_asset` from `tx.sender` into
    /// `recipient`'s position, paying `recipient` the reward it had
    /// accrued so far.
    ///
    /// The stake is pulled from `tx.sender` with `transfer_from` on the
    /// allowance granted to the pool's custody address.  Returns the reward
    /// paid.
    ///
    /// # Errors
    ///
    /// - [`AmmError::StakingPoolNotFound`] if no pool stakes `staked_asset`.
    /// - [`AmmError::PoolLimitExceeded`] above the per-user cap.
    /// - [`AmmError::InsufficientBalance`] if the pool cannot fund the
    ///   reward.
    /// - Ledger errors if the caller's balance or allowance is short.
    pub fn stake(
        &mut self,
        tx: TxContext,
        staked_asset: Address,
        amount: Amount,
        recipient: Address,
    ) -> Result<Amount, AmmError> {
        self.settle_stake(tx, staked_asset, StakeAction::Deposit(amount), recipient)
    }

    /// Unstakes `amount` from `tx.sender`'s position and sends the
    /// principal together with the accrued reward to `recipient`.
    ///
    /// Returns the reward paid.
    ///
    /// # Errors
    ///
    /// - [`AmmError::StakingPoolNotFound`] if no pool stakes `staked_asset`.
    /// - [`AmmError::InsufficientStake`] if `amount` exceeds the stake.
    /// - [`AmmError::InsufficientBalance`] if the pool cannot fund the
    ///   reward.
    pub fn unstake(
        &mut self,
        tx: TxContext,
        staked_asset: Address,
        amount: Amount,
        recipient: Address,
    ) -> Result<Amount, AmmError> {
        self.settle_stake(tx, staked_asset, StakeAction::Withdraw(amount), recipient)
    }

    /// Pays out `tx.sender`'s accrued reward.
    ///
    /// # Errors
    ///
    /// As [`unstake`](Self::unstake), without the stake check.
    pub fn harvest(&mut self, tx: TxContext, staked_asset: Address) -> Result<Amount, AmmError> {
        self.settle_stake(tx, staked_asset, StakeAction::Harvest, tx.sender)
    }

    /// Returns `tx.sender`'s whole stake and forfeits the pending reward.
    ///
    /// Returns the principal paid back.
    ///
    /// # Errors
    ///
    /// [`AmmError::StakingPoolNotFound`] if no pool stakes `staked_asset`.
    pub fn emergency_withdraw(
        &mut self,
        tx: TxContext,
        staked_asset: Address,
    ) -> Result<Amount, AmmError> {
        self.settle_stake(tx, staked_asset, StakeAction::Emergency, tx.sender)
    }

    /// Reward `user` would receive by harvesting at `now`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::StakingPoolNotFound`] if no pool stakes `staked_asset`.
    /// - [`AmmError::Overflow`] from the accrual math.
    pub fn pending_reward(
        &self,
        staked_asset: Address,
        user: &Address,
        now: Timestamp,
    ) -> Result<Amount, AmmError> {
        self.staking.pool(&staked_asset)?.pending_reward(user, now)
    }

    /// `user`'s stake and reward debt.
    ///
    /// # Errors
    ///
    /// [`AmmError::StakingPoolNotFound`] if no pool stakes `staked_asset`.
    pub fn user_info(&self, staked_asset: Address, user: &Address) -> Result<UserInfo, AmmError> {
        Ok(self.staking.pool(&staked_asset)?.user_info(user))
    }

    fn settle_stake(
        &mut self,
        tx: TxContext,
        staked_asset: Address,
        action: StakeAction,
        recipient: Address,
    ) -> Result<Amount, AmmError> {
        let mut pool = self.staking.pool(&staked_asset)?.clone();
        let custody = pool.account();
        let reward_asset = pool.reward_asset();
        let user = tx.sender;

        let mut batch = Settlement::new();
        let paid = match action {
            StakeAction::Deposit(amount) => {
                let reward = pool.deposit(&recipient, amount, tx.now)?;
                batch
                    .transfer(reward_asset, custody, recipient, reward)
                    .transfer_from(staked_asset, custody, user, custody, amount);
                reward
            }
            StakeAction::Withdraw(amount) => {
                let reward = pool.withdraw(&user, amount, tx.now)?;
                batch
                    .transfer(reward_asset, custody, recipient, reward)
                    .transfer(staked_asset, custody, recipient, amount);
                reward
            }
            StakeAction::Harvest => {
                let reward = pool.harvest(&user, tx.now)?;
                batch.transfer(reward_asset, custody, user, reward);
                reward
            }
            StakeAction::Emergency => {
                let principal = pool.emergency_withdraw(&user)?;
                batch.transfer(staked_asset, custody, user, principal);
                principal
            }
        };

        if !matches!(action, StakeAction::Emergency) {
            let available = self.ledger.balance_of(&reward_asset, &custody);
            if available < paid {
                let err = AmmError::InsufficientBalance {
                    asset: reward_asset,
                    available,
                    requested: paid,
                };
                warn!(%err, pool = %custody, %user, %recipient, "reward budget exhausted");
                return Err(err);
            }
        }

        batch.apply(&mut self.ledger)?;
        self.staking.commit(pool);
        info!(
            pool = %custody,
            %user,
            %recipient,
            ?action,
            %paid,
            now = %tx.now,
            "staking settled"
        );
        Ok(paid)
    }
}
