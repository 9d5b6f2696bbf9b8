//! Read-only multi-hop quotes.

use std::collections::BTreeSet;

use crate::domain::{Address, Amount, Hop, Path, Rounding};
use crate::error::AmmError;
use crate::factory::PairRegistry;
use crate::math::mul_div;
use crate::pools::Pair;
use crate::traits::SwapPool;

/// Composes per-pair quotes along a [`Path`].
///
/// # Example
///
/// ```rust
/// use mars_amm::domain::{Address, Amount, LiquidityChange, Path, PoolFees};
/// use mars_amm::factory::PairRegistry;
/// use mars_amm::router::RouteQuoter;
/// use mars_amm::traits::LiquidityPool;
///
/// let a = Address::repeat_byte(1);
/// let b = Address::repeat_byte(2);
/// let mut registry = PairRegistry::default();
/// registry.create_pair(a, b, PoolFees::STANDARD).expect("created");
///
/// let mut pair = registry.pair(a, b).expect("exists").clone();
/// let deposit = LiquidityChange::add(
///     Amount::new(10_000_000_000_000_000_000),
///     Amount::new(5_000_000_000_000_000_000),
///     Amount::ZERO,
///     Amount::ZERO,
/// )
/// .expect("non-zero");
/// pair.add_liquidity(&deposit, false).expect("funded");
/// registry.commit([pair]);
///
/// let path = Path::new(vec![a, b]).expect("valid path");
/// let amounts = RouteQuoter::new(&registry)
///     .get_amounts_out(Amount::new(10_000), &path)
///     .expect("quoted");
/// assert_eq!(amounts, vec![Amount::new(10_000), Amount::new(4_984)]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RouteQuoter<'a> {
    pairs: &'a PairRegistry,
}

impl<'a> RouteQuoter<'a> {
    /// Creates a quoter over `pairs`.
    #[must_use]
    pub const fn new(pairs: &'a PairRegistry) -> Self {
        Self { pairs }
    }

    /// Resolves every hop of `path` to its pair.
    ///
    /// # Errors
    ///
    /// [`AmmError::InvalidPath`] if a hop has no pair, or the path crosses
    /// the same pair twice.
    pub fn resolve(&self, path: &Path) -> Result<Vec<&'a Pair>, AmmError> {
        let mut seen = BTreeSet::new();
        path.hops()
            .map(|hop| {
                let pair = self.hop_pair(&hop)?;
                if !seen.insert(pair.key()) {
                    return Err(AmmError::InvalidPath("path crosses the same pair twice"));
                }
                Ok(pair)
            })
            .collect()
    }

    fn hop_pair(&self, hop: &Hop) -> Result<&'a Pair, AmmError> {
        self.pairs
            .pair(hop.token_in, hop.token_out)
            .map_err(|err| match err {
                AmmError::PairNotFound => AmmError::InvalidPath("no pair registered for hop"),
                other => other,
            })
    }

    /// Amounts at every step of `path` when selling exactly `amount_in`.
    ///
    /// Element `0` is `amount_in`; the last element is what the trader
    /// receives.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidPath`] from [`resolve`](Self::resolve).
    /// - Any per-pair quoting error, e.g. [`AmmError::ZeroReserve`].
    pub fn get_amounts_out(&self, amount_in: Amount, path: &Path) -> Result<Vec<Amount>, AmmError> {
        let pairs = self.resolve(path)?;
        let mut amounts = Vec::with_capacity(path.len());
        amounts.push(amount_in);
        let mut current = amount_in;
        for (pair, hop) in pairs.iter().zip(path.hops()) {
            current = pair.quote_out(current, &hop.token_in)?;
            amounts.push(current);
        }
        Ok(amounts)
    }

    /// Amounts at every step of `path` when buying exactly `amount_out`.
    ///
    /// Computed back to front; element `0` is what the trader must pay.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidPath`] from [`resolve`](Self::resolve).
    /// - [`AmmError::InsufficientReserves`] if a hop cannot pay its output.
    pub fn get_amounts_in(&self, amount_out: Amount, path: &Path) -> Result<Vec<Amount>, AmmError> {
        let pairs = self.resolve(path)?;
        let mut amounts = vec![Amount::ZERO; path.len()];
        amounts[path.len() - 1] = amount_out;
        let mut current = amount_out;
        for (i, (pair, hop)) in pairs.iter().zip(path.hops()).enumerate().rev() {
            current = pair.quote_in(current, &hop.token_in)?;
            amounts[i] = current;
        }
        Ok(amounts)
    }

    /// Percentage by which the quoted output of selling `amount_in` falls
    /// short of the fee-free spot-price output, rounded half up.
    ///
    /// The spot output chains every hop's reserve ratio, so it is in the
    /// same asset as the quoted output.
    ///
    /// Display only; a trade's bounds are checked against exact quotes.
    ///
    /// # Errors
    ///
    /// Same as [`get_amounts_out`](Self::get_amounts_out).
    pub fn price_impact(&self, amount_in: Amount, path: &Path) -> Result<u32, AmmError> {
        let amounts = self.get_amounts_out(amount_in, path)?;
        let pairs = self.resolve(path)?;

        let mut spot = amount_in.get();
        for (pair, hop) in pairs.iter().zip(path.hops()) {
            let (numerator, denominator) = pair.spot_price(&hop.token_in)?;
            spot = mul_div(spot, numerator.get(), denominator.get(), Rounding::Down)?;
        }
        let quoted = amounts.last().map_or(0, Amount::get);
        if spot == 0 || quoted >= spot {
            return Ok(0);
        }
        let doubled = mul_div(spot - quoted, 200, spot, Rounding::Down)?;
        Ok(u32::try_from((doubled + 1) / 2).unwrap_or(100))
    }

    /// Amount of `token_b` worth `amount_a` of `token_a` at the pair's
    /// reserve ratio, fee-free.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PairNotFound`] if the pair does not exist.
    /// - [`AmmError::ZeroReserve`] if it is empty.
    pub fn quote(&self, amount_a: Amount, token_a: Address, token_b: Address) -> Result<Amount, AmmError> {
        self.pairs.pair(token_a, token_b)?.quote(amount_a, &token_a)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{LiquidityChange, PoolFees};
    use crate::traits::LiquidityPool;

    const E18: u128 = 1_000_000_000_000_000_000;

    fn a() -> Address {
        Address::repeat_byte(1)
    }

    fn b() -> Address {
        Address::repeat_byte(2)
    }

    fn c() -> Address {
        Address::repeat_byte(3)
    }

    fn fund(registry: &mut PairRegistry, x: Address, y: Address, rx: u128, ry: u128) {
        let Ok(_) = registry.create_pair(x, y, PoolFees::STANDARD) else {
            panic!("expected Ok");
        };
        let Ok(pair) = registry.pair(x, y) else {
            panic!("expected Ok");
        };
        let mut staged = pair.clone();
        let Ok((r0, r1)) = staged.key().sort_values(&x, (Amount::new(rx), Amount::new(ry))) else {
            panic!("expected Ok");
        };
        let Ok(change) = LiquidityChange::add(r0, r1, Amount::ZERO, Amount::ZERO) else {
            panic!("valid change");
        };
        let Ok(_) = staged.add_liquidity(&change, false) else {
            panic!("expected Ok");
        };
        registry.commit([staged]);
    }

    fn path(assets: &[Address]) -> Path {
        let Ok(path) = Path::new(assets.to_vec()) else {
            panic!("valid path");
        };
        path
    }

    fn registry() -> PairRegistry {
        let mut registry = PairRegistry::default();
        fund(&mut registry, a(), b(), 10 * E18, 5 * E18);
        fund(&mut registry, b(), c(), 5 * E18, 20 * E18);
        registry
    }

    #[test]
    fn amounts_out_single_hop() {
        let registry = registry();
        let quoter = RouteQuoter::new(&registry);
        let Ok(amounts) = quoter.get_amounts_out(Amount::new(1_000), &path(&[a(), b()])) else {
            panic!("expected Ok");
        };
        assert_eq!(amounts, vec![Amount::new(1_000), Amount::new(498)]);
    }

    #[test]
    fn amounts_in_single_hop() {
        let registry = registry();
        let quoter = RouteQuoter::new(&registry);
        let Ok(amounts) = quoter.get_amounts_in(Amount::new(5_000), &path(&[a(), b()])) else {
            panic!("expected Ok");
        };
        assert_eq!(amounts, vec![Amount::new(10_031), Amount::new(5_000)]);
    }

    #[test]
    fn multi_hop_chains_quotes() {
        let registry = registry();
        let quoter = RouteQuoter::new(&registry);
        let route = path(&[a(), b(), c()]);
        let Ok(out) = quoter.get_amounts_out(Amount::new(1_000_000), &route) else {
            panic!("expected Ok");
        };
        assert_eq!(out.len(), 3);
        let Ok(back) = quoter.get_amounts_in(out[2], &route) else {
            panic!("expected Ok");
        };
        assert_eq!(back[2], out[2]);
        let Ok(again) = quoter.get_amounts_out(back[0], &route) else {
            panic!("expected Ok");
        };
        assert!(again[2] >= out[2]);
    }

    #[test]
    fn unregistered_hop_is_invalid_path() {
        let registry = registry();
        let quoter = RouteQuoter::new(&registry);
        assert!(matches!(
            quoter.get_amounts_out(Amount::new(1_000), &path(&[a(), c()])),
            Err(AmmError::InvalidPath(_))
        ));
        assert!(matches!(
            quoter.get_amounts_in(Amount::new(1_000), &path(&[c(), a()])),
            Err(AmmError::InvalidPath(_))
        ));
    }

    #[test]
    fn repeated_pair_is_invalid_path() {
        let registry = registry();
        let quoter = RouteQuoter::new(&registry);
        assert!(matches!(
            quoter.get_amounts_out(Amount::new(1_000), &path(&[a(), b(), a()])),
            Err(AmmError::InvalidPath(_))
        ));
    }

    #[test]
    fn price_impact_grows_with_size() {
        let registry = registry();
        let quoter = RouteQuoter::new(&registry);
        let route = path(&[a(), b()]);
        let Ok(small) = quoter.price_impact(Amount::new(10_000), &route) else {
            panic!("expected Ok");
        };
        // 4_984 against a spot of 5_000
        assert_eq!(small, 0);
        let Ok(large) = quoter.price_impact(Amount::new(E18), &route) else {
            panic!("expected Ok");
        };
        // 0.4533e18 against 0.5e18: 9.3%
        assert_eq!(large, 9);
    }

    #[test]
    fn price_impact_compounds_across_hops() {
        let registry = registry();
        let quoter = RouteQuoter::new(&registry);
        let Ok(first_leg) = quoter.price_impact(Amount::new(E18), &path(&[a(), b()])) else {
            panic!("expected Ok");
        };
        let Ok(whole) = quoter.price_impact(Amount::new(E18), &path(&[a(), b(), c()])) else {
            panic!("expected Ok");
        };
        // 1.6579e18 of c against a spot of 2e18 through both reserve ratios
        assert_eq!(whole, 17);
        assert!(whole > first_leg);
    }

    #[test]
    fn quote_uses_reserve_ratio() {
        let registry = registry();
        let quoter = RouteQuoter::new(&registry);
        let Ok(amount) = quoter.quote(Amount::new(1_000), a(), b()) else {
            panic!("expected Ok");
        };
        assert_eq!(amount, Amount::new(500));
        let Ok(amount) = quoter.quote(Amount::new(1_000), b(), a()) else {
            panic!("expected Ok");
        };
        assert_eq!(amount, Amount::new(2_000));
    }
}
