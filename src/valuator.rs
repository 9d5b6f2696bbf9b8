//! Read-only valuation of pair shares.
//!
//! | Query | Result |
//! |-------|--------|
//! | [`LiquidityValuator::get_liquidity_value`] | `reserve · shares / total_supply` of each asset, rounded down |
//! | [`LiquidityValuator::get_share_of_pool`] | Whole-percent ownership after a prospective deposit |
//!
//! Nothing here mutates a pair or the ledger.

use crate::domain::{Address, Amount, Liquidity, Rounding};
use crate::error::AmmError;
use crate::factory::PairRegistry;
use crate::math::{mul_div, CheckedArithmetic};
use crate::traits::{AssetLedger, LiquidityPool, SwapPool};

/// Converts share amounts into underlying assets and pool percentages.
#[derive(Debug, Clone, Copy)]
pub struct LiquidityValuator<'a, L> {
    pairs: &'a PairRegistry,
    ledger: &'a L,
}

impl<'a, L: AssetLedger> LiquidityValuator<'a, L> {
    /// Creates a valuator over `pairs`, reading share balances from `ledger`.
    #[must_use]
    pub const fn new(pairs: &'a PairRegistry, ledger: &'a L) -> Self {
        Self { pairs, ledger }
    }

    /// Assets `shares` would redeem for right now, in `(token_a, token_b)`
    /// order.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PairNotFound`] if the pair does not exist.
    /// - [`AmmError::ZeroReserve`] if the pair has no shares outstanding.
    /// - [`AmmError::InsufficientLiquidity`] if `shares` exceeds the supply.
    pub fn get_liquidity_value(
        &self,
        token_a: Address,
        token_b: Address,
        shares: Liquidity,
    ) -> Result<(Amount, Amount), AmmError> {
        let pair = self.pairs.pair(token_a, token_b)?;
        let total = pair.total_liquidity();
        if total.is_zero() {
            return Err(AmmError::ZeroReserve);
        }
        if shares > total {
            return Err(AmmError::InsufficientLiquidity {
                minimum: shares.as_amount(),
                actual: total.as_amount(),
            });
        }
        let (reserve_a, reserve_b) = pair.key().sort_values(&token_a, pair.reserves())?;
        Ok((
            reserve_a.safe_mul_div(shares.get(), total.get(), Rounding::Down)?,
            reserve_b.safe_mul_div(shares.get(), total.get(), Rounding::Down)?,
        ))
    }

    /// Whole percentage of the pair `holder` would own after depositing
    /// `(amount_a, amount_b)`.
    ///
    /// With `amounts_are_shares` set, `amount_a` is taken as a share count
    /// and `amount_b` is ignored; pass zero to ask about the current
    /// holding.  Otherwise the amounts are clamped to the reserve ratio and
    /// converted to the shares they would mint.
    ///
    /// ```text
    /// pct = floor((held + s) · 100 / (total_supply + s))
    /// ```
    ///
    /// The locked minimum liquidity is never held, so the result is at most
    /// 99.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PairNotFound`] if the pair does not exist.
    /// - [`AmmError::InsufficientLiquidity`] / [`AmmError::InvalidQuantity`]
    ///   if the amounts would not mint shares.
    pub fn get_share_of_pool(
        &self,
        token_a: Address,
        token_b: Address,
        holder: &Address,
        (amount_a, amount_b): (Amount, Amount),
        amounts_are_shares: bool,
    ) -> Result<u8, AmmError> {
        let pair = self.pairs.pair(token_a, token_b)?;
        let total = pair.total_liquidity();
        let (added, locked) = if amounts_are_shares {
            (amount_a.get(), 0)
        } else {
            let (amount0, amount1) = pair.key().sort_values(&token_a, (amount_a, amount_b))?;
            let minted = pair.preview_mint(amount0, amount1)?;
            let locked = if total.is_zero() {
                pair.minimum_liquidity().get()
            } else {
                0
            };
            (minted.get(), locked)
        };

        let held = self.ledger.balance_of(&pair.share_token(), holder).get();
        let owned = held
            .checked_add(added)
            .ok_or(AmmError::Overflow("share count overflow"))?;
        let supply = total
            .get()
            .checked_add(added)
            .and_then(|s| s.checked_add(locked))
            .ok_or(AmmError::Overflow("share supply overflow"))?;
        if supply == 0 {
            return Ok(0);
        }
        let pct = mul_div(owned.min(supply), 100, supply, Rounding::Down)?;
        Ok(u8::try_from(pct).unwrap_or(100))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::config::ExchangeConfig;
    use crate::domain::{Timestamp, TxContext};
    use crate::ledger::InMemoryLedger;
    use crate::router::Router;

    const E18: u128 = 1_000_000_000_000_000_000;

    fn a() -> Address {
        Address::repeat_byte(1)
    }

    fn b() -> Address {
        Address::repeat_byte(2)
    }

    fn alice() -> Address {
        Address::repeat_byte(0xA1)
    }

    fn bob() -> Address {
        Address::repeat_byte(0xB0)
    }

    fn deposit(
        pairs: &mut PairRegistry,
        ledger: &mut InMemoryLedger,
        config: &ExchangeConfig,
        who: Address,
        amount_a: u128,
        amount_b: u128,
    ) -> Liquidity {
        for token in [a(), b()] {
            let Ok(()) = ledger.mint(&token, &who, Amount::new(1_000 * E18)) else {
                panic!("expected Ok");
            };
            let Ok(()) = ledger.approve(&token, &who, &config.router(), Amount::MAX) else {
                panic!("expected Ok");
            };
        }
        let Ok((_, _, shares)) = Router::new(pairs, ledger, config).add_liquidity(
            TxContext::new(who, Timestamp::new(1)),
            a(),
            b(),
            Amount::new(amount_a),
            Amount::new(amount_b),
            Amount::ZERO,
            Amount::ZERO,
            who,
            Timestamp::MAX,
        ) else {
            panic!("deposit");
        };
        shares
    }

    fn seeded() -> (PairRegistry, InMemoryLedger, ExchangeConfig, Liquidity) {
        let config = ExchangeConfig::default();
        let mut pairs = PairRegistry::default();
        let mut ledger = InMemoryLedger::new(config.wrapped_native());
        let shares = deposit(&mut pairs, &mut ledger, &config, alice(), 10 * E18, 5 * E18);
        (pairs, ledger, config, shares)
    }

    #[test]
    fn liquidity_value_of_first_provider() {
        let (pairs, ledger, _, shares) = seeded();
        let valuator = LiquidityValuator::new(&pairs, &ledger);
        let Ok(value) = valuator.get_liquidity_value(a(), b(), shares) else {
            panic!("expected Ok");
        };
        assert_eq!(
            value,
            (
                Amount::new(9_999_999_999_999_999_858),
                Amount::new(4_999_999_999_999_999_929)
            )
        );
        let Ok(flipped) = valuator.get_liquidity_value(b(), a(), shares) else {
            panic!("expected Ok");
        };
        assert_eq!(flipped, (value.1, value.0));
    }

    #[test]
    fn liquidity_value_rejects_excess_shares() {
        let (pairs, ledger, _, _) = seeded();
        let valuator = LiquidityValuator::new(&pairs, &ledger);
        assert!(matches!(
            valuator.get_liquidity_value(a(), b(), Liquidity::new(u128::MAX)),
            Err(AmmError::InsufficientLiquidity { .. })
        ));
    }

    #[test]
    fn sole_provider_owns_ninety_nine_percent() {
        let (pairs, ledger, _, _) = seeded();
        let valuator = LiquidityValuator::new(&pairs, &ledger);
        let Ok(pct) = valuator.get_share_of_pool(
            a(),
            b(),
            &alice(),
            (Amount::new(E18 / 10), Amount::new(3 * E18 / 10)),
            false,
        ) else {
            panic!("expected Ok");
        };
        assert_eq!(pct, 99);
        let Ok(pct) = valuator.get_share_of_pool(a(), b(), &alice(), (Amount::ZERO, Amount::ZERO), true)
        else {
            panic!("expected Ok");
        };
        assert_eq!(pct, 99);
    }

    #[test]
    fn small_second_provider_rounds_down() {
        let (mut pairs, mut ledger, config, _) = seeded();
        deposit(&mut pairs, &mut ledger, &config, bob(), E18 / 10, 3 * E18 / 10);
        let valuator = LiquidityValuator::new(&pairs, &ledger);
        let Ok(bob_pct) =
            valuator.get_share_of_pool(a(), b(), &bob(), (Amount::ZERO, Amount::ZERO), true)
        else {
            panic!("expected Ok");
        };
        assert_eq!(bob_pct, 0);
        let Ok(alice_pct) =
            valuator.get_share_of_pool(a(), b(), &alice(), (Amount::ZERO, Amount::ZERO), true)
        else {
            panic!("expected Ok");
        };
        assert_eq!(alice_pct, 99);
    }

    #[test]
    fn prospective_deposit_on_empty_pair_counts_lock() {
        let config = ExchangeConfig::default();
        let mut pairs = PairRegistry::default();
        let Ok(_) = pairs.create_pair(a(), b(), config.default_fees()) else {
            panic!("expected Ok");
        };
        let ledger = InMemoryLedger::new(config.wrapped_native());
        let valuator = LiquidityValuator::new(&pairs, &ledger);
        let Ok(pct) = valuator.get_share_of_pool(
            a(),
            b(),
            &alice(),
            (Amount::new(10_000), Amount::new(10_000)),
            false,
        ) else {
            panic!("expected Ok");
        };
        // 9_900 of 10_000 shares
        assert_eq!(pct, 99);
    }
}
