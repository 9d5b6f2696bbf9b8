//! Arena of pairs keyed by their canonical asset pair.

use std::collections::BTreeMap;

use tracing::info;

use crate::config::PairConfig;
use crate::domain::{Address, BasisPoints, Liquidity, PairKey, PoolFees};
use crate::error::AmmError;
use crate::pools::Pair;
use crate::traits::{FromConfig, SwapPool};

/// Namespace byte of pair share-token addresses.
pub const PAIR_ADDRESS_TAG: u8 = 0x50;

/// Owns every [`Pair`] and the exchange-wide fee recipient.
///
/// At most one pair exists per unordered asset pair.  Each new pair is
/// assigned a share-token address derived from its creation index, which is
/// also the custody account that holds its reserves in the asset ledger.
///
/// # Example
///
/// ```rust
/// use mars_amm::domain::{Address, Liquidity, PoolFees};
/// use mars_amm::factory::PairRegistry;
///
/// let mut registry = PairRegistry::new(Liquidity::new(100));
/// let a = Address::repeat_byte(1);
/// let b = Address::repeat_byte(2);
///
/// let pair = registry.create_pair(a, b, PoolFees::STANDARD).expect("new pair");
/// assert_eq!(registry.get_pair(b, a), Some(pair));
/// assert!(registry.create_pair(b, a, PoolFees::STANDARD).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairRegistry {
    pairs: BTreeMap<PairKey, Pair>,
    created: Vec<PairKey>,
    fee_to: Option<Address>,
    minimum_liquidity: Liquidity,
}

impl PairRegistry {
    /// Creates an empty registry whose pairs lock `minimum_liquidity`
    /// shares on their first deposit.
    #[must_use]
    pub const fn new(minimum_liquidity: Liquidity) -> Self {
        Self {
            pairs: BTreeMap::new(),
            created: Vec::new(),
            fee_to: None,
            minimum_liquidity,
        }
    }

    /// Registers a new, empty pair and returns its share-token address.
    ///
    /// # Errors
    ///
    /// See [`prepare_pair`](Self::prepare_pair).
    pub fn create_pair(
        &mut self,
        token_a: Address,
        token_b: Address,
        fees: PoolFees,
    ) -> Result<Address, AmmError> {
        let pair = self.prepare_pair(token_a, token_b, fees)?;
        let share_token = pair.share_token();
        self.register(pair);
        Ok(share_token)
    }

    /// Builds the pair [`create_pair`](Self::create_pair) would register,
    /// without registering it.
    ///
    /// Handing the result to [`commit`](Self::commit) registers it, so an
    /// operation can create a pair and fund it in one atomic step.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidToken`] if `token_a == token_b`.
    /// - [`AmmError::PairExists`] if the pair is already registered.
    /// - Fee validation errors from [`PairConfig::new`].
    pub fn prepare_pair(
        &self,
        token_a: Address,
        token_b: Address,
        fees: PoolFees,
    ) -> Result<Pair, AmmError> {
        let key = PairKey::new(token_a, token_b)?;
        if self.pairs.contains_key(&key) {
            return Err(AmmError::PairExists);
        }
        let share_token = Address::derived(PAIR_ADDRESS_TAG, self.created.len() as u64);
        let config = PairConfig::new(key, share_token, fees, self.minimum_liquidity)?;
        Pair::from_config(&config)
    }

    fn register(&mut self, pair: Pair) {
        let key = pair.key();
        info!(
            %key,
            share_token = %pair.share_token(),
            fees = %pair.fees(),
            index = self.created.len(),
            "pair created"
        );
        self.created.push(key);
        self.pairs.insert(key, pair);
    }

    /// Share-token address of the pair for `(token_a, token_b)`, in either
    /// order.
    #[must_use]
    pub fn get_pair(&self, token_a: Address, token_b: Address) -> Option<Address> {
        let key = PairKey::new(token_a, token_b).ok()?;
        self.pairs.get(&key).map(Pair::share_token)
    }

    /// The pair for `(token_a, token_b)`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidToken`] if `token_a == token_b`.
    /// - [`AmmError::PairNotFound`] if no such pair exists.
    pub fn pair(&self, token_a: Address, token_b: Address) -> Result<&Pair, AmmError> {
        self.pair_by_key(&PairKey::new(token_a, token_b)?)
    }

    /// The pair registered under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PairNotFound`] if no such pair exists.
    pub fn pair_by_key(&self, key: &PairKey) -> Result<&Pair, AmmError> {
        self.pairs.get(key).ok_or(AmmError::PairNotFound)
    }

    fn pair_mut(&mut self, token_a: Address, token_b: Address) -> Result<&mut Pair, AmmError> {
        let key = PairKey::new(token_a, token_b)?;
        self.pairs.get_mut(&key).ok_or(AmmError::PairNotFound)
    }

    /// Every pair, in creation order.
    pub fn all_pairs(&self) -> impl Iterator<Item = &Pair> + '_ {
        self.created.iter().filter_map(|key| self.pairs.get(key))
    }

    /// Number of registered pairs.
    #[must_use]
    pub fn all_pairs_length(&self) -> usize {
        self.created.len()
    }

    /// Sets one pair's swap fee.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PairNotFound`] if no such pair exists.
    /// - [`AmmError::InvalidFee`] / [`AmmError::InvalidConfiguration`] if
    ///   the new fee is out of range or below the protocol fee.
    pub fn set_swap_fee(
        &mut self,
        token_a: Address,
        token_b: Address,
        swap_fee: BasisPoints,
    ) -> Result<(), AmmError> {
        let pair = self.pair_mut(token_a, token_b)?;
        let fees = pair.fees().with_swap_fee(swap_fee)?;
        pair.set_fees(fees)
    }

    /// Sets one pair's protocol fee.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PairNotFound`] if no such pair exists.
    /// - [`AmmError::InvalidConfiguration`] if it exceeds the swap fee.
    pub fn set_protocol_fee(
        &mut self,
        token_a: Address,
        token_b: Address,
        protocol_fee: BasisPoints,
    ) -> Result<(), AmmError> {
        let pair = self.pair_mut(token_a, token_b)?;
        let fees = pair.fees().with_protocol_fee(protocol_fee)?;
        pair.set_fees(fees)
    }

    /// Sets or clears the protocol-fee recipient.
    ///
    /// Clearing it switches the protocol fee off; each pair forgets its
    /// `root_k_last` on its next liquidity event.
    pub fn set_fee_to(&mut self, fee_to: Option<Address>) {
        info!(?fee_to, "fee recipient updated");
        self.fee_to = fee_to;
    }

    /// Current protocol-fee recipient.
    #[must_use]
    pub const fn fee_to(&self) -> Option<Address> {
        self.fee_to
    }

    /// Returns `true` while a fee recipient is configured.
    #[must_use]
    pub const fn protocol_fee_on(&self) -> bool {
        self.fee_to.is_some()
    }

    /// Replaces pairs with updated copies.
    ///
    /// Callers stage mutations on clones obtained from [`pair`](Self::pair)
    /// or [`prepare_pair`](Self::prepare_pair) and commit them only once
    /// every step of an operation has succeeded.  A staged pair whose key is
    /// not yet registered is registered.
    pub fn commit(&mut self, staged: impl IntoIterator<Item = Pair>) {
        for pair in staged {
            match self.pairs.get_mut(&pair.key()) {
                Some(slot) => *slot = pair,
                None => self.register(pair),
            }
        }
    }
}

impl Default for PairRegistry {
    fn default() -> Self {
        Self::new(crate::config::ExchangeConfig::MINIMUM_LIQUIDITY)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Amount, LiquidityChange};
    use crate::traits::LiquidityPool;

    fn a() -> Address {
        Address::repeat_byte(1)
    }

    fn b() -> Address {
        Address::repeat_byte(2)
    }

    fn c() -> Address {
        Address::repeat_byte(3)
    }

    fn registry_with_pair() -> (PairRegistry, Address) {
        let mut registry = PairRegistry::default();
        let Ok(addr) = registry.create_pair(a(), b(), PoolFees::STANDARD) else {
            panic!("expected Ok");
        };
        (registry, addr)
    }

    #[test]
    fn create_and_lookup_in_either_order() {
        let (registry, addr) = registry_with_pair();
        assert_eq!(registry.get_pair(a(), b()), Some(addr));
        assert_eq!(registry.get_pair(b(), a()), Some(addr));
        assert_eq!(registry.get_pair(a(), c()), None);
        let Ok(pair) = registry.pair(b(), a()) else {
            panic!("expected Ok");
        };
        assert_eq!(pair.share_token(), addr);
        assert_eq!(pair.fees(), PoolFees::STANDARD);
    }

    #[test]
    fn duplicate_pair_rejected() {
        let (mut registry, _) = registry_with_pair();
        assert_eq!(
            registry.create_pair(b(), a(), PoolFees::STANDARD),
            Err(AmmError::PairExists)
        );
        assert_eq!(registry.all_pairs_length(), 1);
    }

    #[test]
    fn identical_tokens_rejected() {
        let mut registry = PairRegistry::default();
        assert!(matches!(
            registry.create_pair(a(), a(), PoolFees::STANDARD),
            Err(AmmError::InvalidToken(_))
        ));
    }

    #[test]
    fn share_tokens_are_distinct_and_ordered() {
        let (mut registry, first) = registry_with_pair();
        let Ok(second) = registry.create_pair(a(), c(), PoolFees::STANDARD) else {
            panic!("expected Ok");
        };
        assert_ne!(first, second);
        let order: Vec<Address> = registry.all_pairs().map(Pair::share_token).collect();
        assert_eq!(order, vec![first, second]);
    }

    #[test]
    fn missing_pair_is_not_found() {
        let registry = PairRegistry::default();
        assert!(matches!(registry.pair(a(), b()), Err(AmmError::PairNotFound)));
    }

    #[test]
    fn fee_setters_validate() {
        let (mut registry, _) = registry_with_pair();
        let Ok(()) = registry.set_swap_fee(a(), b(), BasisPoints::new(25)) else {
            panic!("expected Ok");
        };
        assert!(registry
            .set_protocol_fee(a(), b(), BasisPoints::new(26))
            .is_err());
        assert!(registry
            .set_swap_fee(a(), b(), BasisPoints::MAX_PERCENT)
            .is_err());
        let Ok(pair) = registry.pair(a(), b()) else {
            panic!("expected Ok");
        };
        assert_eq!(pair.fees().swap_fee(), BasisPoints::new(25));
        assert_eq!(pair.fees().protocol_fee(), BasisPoints::new(5));
        assert!(matches!(
            registry.set_swap_fee(a(), c(), BasisPoints::new(10)),
            Err(AmmError::PairNotFound)
        ));
    }

    #[test]
    fn fee_to_toggles_protocol_fee() {
        let mut registry = PairRegistry::default();
        assert!(!registry.protocol_fee_on());
        registry.set_fee_to(Some(c()));
        assert_eq!(registry.fee_to(), Some(c()));
        assert!(registry.protocol_fee_on());
        registry.set_fee_to(None);
        assert!(!registry.protocol_fee_on());
    }

    #[test]
    fn commit_replaces_staged_pair() {
        let (mut registry, _) = registry_with_pair();
        let Ok(pair) = registry.pair(a(), b()) else {
            panic!("expected Ok");
        };
        let mut staged = pair.clone();
        let Ok(change) = LiquidityChange::add(
            Amount::new(10_000),
            Amount::new(10_000),
            Amount::ZERO,
            Amount::ZERO,
        ) else {
            panic!("valid change");
        };
        let Ok(_) = staged.add_liquidity(&change, false) else {
            panic!("expected Ok");
        };
        registry.commit([staged]);
        let Ok(pair) = registry.pair(a(), b()) else {
            panic!("expected Ok");
        };
        assert_eq!(pair.total_liquidity(), Liquidity::new(10_000));
    }

    #[test]
    fn prepared_pair_registers_on_commit() {
        let mut registry = PairRegistry::default();
        let Ok(prepared) = registry.prepare_pair(a(), b(), PoolFees::STANDARD) else {
            panic!("expected Ok");
        };
        assert_eq!(registry.get_pair(a(), b()), None);
        let addr = prepared.share_token();
        registry.commit([prepared]);
        assert_eq!(registry.get_pair(a(), b()), Some(addr));
        assert_eq!(registry.all_pairs_length(), 1);
    }
}
