//! Arena of staking pools keyed by staked asset.

use std::collections::BTreeMap;

use tracing::info;

use crate::config::{ExchangeConfig, StakingPoolConfig};
use crate::domain::Address;
use crate::error::AmmError;
use crate::pools::StakingPool;

/// Namespace byte of staking-pool custody addresses.
pub const STAKING_ADDRESS_TAG: u8 = 0x53;

/// Owns every [`StakingPool`]; at most one per staked asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakingRegistry {
    pools: BTreeMap<Address, StakingPool>,
    deployed: Vec<Address>,
    precision: u128,
}

impl StakingRegistry {
    /// Creates an empty registry whose pools use `precision` as the
    /// reward-per-share scale.
    #[must_use]
    pub const fn new(precision: u128) -> Self {
        Self {
            pools: BTreeMap::new(),
            deployed: Vec::new(),
            precision,
        }
    }

    /// Deploys a pool and returns its custody address.
    ///
    /// # Errors
    ///
    /// - [`AmmError::StakingPoolExists`] if the staked asset already has a
    ///   pool.
    /// - Validation errors from [`StakingPool::new`].
    pub fn deploy_pool(&mut self, config: &StakingPoolConfig) -> Result<Address, AmmError> {
        let staked = config.staked_asset();
        if self.pools.contains_key(&staked) {
            return Err(AmmError::StakingPoolExists(staked));
        }
        let account = Address::derived(STAKING_ADDRESS_TAG, self.deployed.len() as u64);
        let pool = StakingPool::new(config, account, self.precision)?;

        self.pools.insert(staked, pool);
        self.deployed.push(staked);
        info!(
            %staked,
            reward = %config.reward_asset(),
            reward_per_second = %config.reward_per_second(),
            start = %config.start_time(),
            bonus_end = %config.bonus_end_time(),
            %account,
            "staking pool deployed"
        );
        Ok(account)
    }

    /// Custody address of the pool for `staked_asset`.
    #[must_use]
    pub fn get_pool(&self, staked_asset: &Address) -> Option<Address> {
        self.pools.get(staked_asset).map(StakingPool::account)
    }

    /// The pool for `staked_asset`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::StakingPoolNotFound`] if none is deployed.
    pub fn pool(&self, staked_asset: &Address) -> Result<&StakingPool, AmmError> {
        self.pools
            .get(staked_asset)
            .ok_or(AmmError::StakingPoolNotFound(*staked_asset))
    }

    /// Every pool, in deployment order.
    pub fn all_pools(&self) -> impl Iterator<Item = &StakingPool> + '_ {
        self.deployed.iter().filter_map(|asset| self.pools.get(asset))
    }

    /// Replaces a pool with an updated copy staged by the caller.
    pub fn commit(&mut self, pool: StakingPool) {
        if let Some(slot) = self.pools.get_mut(&pool.staked_asset()) {
            *slot = pool;
        }
    }
}

impl Default for StakingRegistry {
    fn default() -> Self {
        Self::new(ExchangeConfig::REWARD_PRECISION)
    }
}
