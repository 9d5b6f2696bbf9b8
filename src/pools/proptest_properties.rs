//! Property-based tests using `proptest` for pair and staking invariants.
//!
//! 1. **Swap reversibility**: a round trip `token0 → token1 → token0`
//!    returns at most the original input.
//! 2. **Invariant preservation**: `reserve0 · reserve1` never falls across
//!    a sequence of swaps.
//! 3. **Output monotonicity**: a larger input never yields less output.
//! 4. **Quote agreement**: `amount_out(amount_in(y)) >= y` and
//!    `amount_in(amount_out(x)) <= x + 1`.
//! 5. **Liquidity conservation**: a proportional add then remove returns
//!    the deposit to within one unit per asset.
//! 6. **Reward conservation**: stakers are never owed more than the pool
//!    emitted.

use primitive_types::U256;
use proptest::prelude::*;

use super::{Pair, StakingPool};
use crate::config::{PairConfig, StakingPoolConfig};
use crate::domain::{
    Address, Amount, BasisPoints, Liquidity, LiquidityChange, PairKey, PoolFees, SwapSpec,
    Timestamp,
};
use crate::math::{amount_in, amount_out};
use crate::traits::{FromConfig, LiquidityPool, SwapPool};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn t0() -> Address {
    Address::repeat_byte(1)
}

fn t1() -> Address {
    Address::repeat_byte(2)
}

fn make_pair(r0: u128, r1: u128) -> Pair {
    let Ok(key) = PairKey::new(t0(), t1()) else {
        panic!("valid key");
    };
    let Ok(cfg) = PairConfig::new(
        key,
        Address::derived(0xA1, 0),
        PoolFees::STANDARD,
        Liquidity::new(100),
    ) else {
        panic!("valid config");
    };
    let Ok(mut pair) = Pair::from_config(&cfg) else {
        panic!("valid pair");
    };
    let Ok(change) = LiquidityChange::add(Amount::new(r0), Amount::new(r1), Amount::ZERO, Amount::ZERO)
    else {
        panic!("valid change");
    };
    let Ok(_) = pair.add_liquidity(&change, false) else {
        panic!("initial deposit");
    };
    pair
}

fn k(pair: &Pair) -> U256 {
    let (r0, r1) = pair.reserves();
    U256::from(r0.get()) * U256::from(r1.get())
}

fn sell(pair: &mut Pair, amount: u128, token: &Address) -> Option<u128> {
    let spec = SwapSpec::exact_in(Amount::new(amount), Amount::ZERO).ok()?;
    pair.swap(spec, token).ok().map(|r| r.amount_out().get())
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Reserve values in range [10_000, 10^24] to cover both dust and 18-decimal pools.
fn reserve_strategy() -> impl Strategy<Value = u128> {
    10_000u128..=1_000_000_000_000_000_000_000_000u128
}

/// Swap fees from zero up to 10%.
fn fee_strategy() -> impl Strategy<Value = u32> {
    0u32..=1_000u32
}

// ---------------------------------------------------------------------------
// Pair properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_swap_reversibility(
        r0 in reserve_strategy(),
        r1 in reserve_strategy(),
    ) {
        let mut pair = make_pair(r0, r1);
        let swap_in = (r0 / 1_000).max(1);
        let Some(received) = sell(&mut pair, swap_in, &t0()) else {
            return Ok(());
        };
        let Some(back) = sell(&mut pair, received, &t1()) else {
            return Ok(());
        };
        prop_assert!(
            back <= swap_in,
            "round-trip should lose value: final={} > original={}",
            back, swap_in
        );
    }

    #[test]
    fn prop_invariant_preservation(
        r0 in reserve_strategy(),
        r1 in reserve_strategy(),
        sizes in prop::collection::vec(1u128..=1_000u128, 1..8),
    ) {
        let mut pair = make_pair(r0, r1);
        let mut last = k(&pair);
        for (i, per_mille) in sizes.into_iter().enumerate() {
            let token = if i % 2 == 0 { t0() } else { t1() };
            let Ok((reserve_in, _)) = pair.reserves_for(&token) else {
                return Ok(());
            };
            let amount = (reserve_in.get() / 1_000).saturating_mul(per_mille).max(1);
            if sell(&mut pair, amount, &token).is_none() {
                continue;
            }
            let now = k(&pair);
            prop_assert!(now >= last, "k decreased: {} < {}", now, last);
            last = now;
        }
    }

    #[test]
    fn prop_output_monotonic_in_input(
        r0 in reserve_strategy(),
        r1 in reserve_strategy(),
        small in 1u128..=1_000_000u128,
        extra in 0u128..=1_000_000u128,
    ) {
        let pair = make_pair(r0, r1);
        let (Ok(a), Ok(b)) = (
            pair.quote_out(Amount::new(small), &t0()),
            pair.quote_out(Amount::new(small + extra), &t0()),
        ) else {
            return Ok(());
        };
        prop_assert!(b >= a);
    }

    #[test]
    fn prop_quotes_agree(
        reserve_in in reserve_strategy(),
        reserve_out in reserve_strategy(),
        fee in fee_strategy(),
        x in 1u128..=1_000_000_000u128,
    ) {
        let fee = BasisPoints::new(fee);
        let (rin, rout) = (Amount::new(reserve_in), Amount::new(reserve_out));

        if let Ok(out) = amount_out(Amount::new(x), rin, rout, fee) {
            if !out.is_zero() {
                let Ok(needed) = amount_in(out, rin, rout, fee) else {
                    return Ok(());
                };
                // the +1 ceiling may overshoot by one unit
                prop_assert!(needed.get() <= x + 1, "amount_in {} exceeds sold {}", needed, x);
            }
        }
        if x < reserve_out {
            let Ok(needed) = amount_in(Amount::new(x), rin, rout, fee) else {
                return Ok(());
            };
            let Ok(got) = amount_out(needed, rin, rout, fee) else {
                return Ok(());
            };
            prop_assert!(got.get() >= x, "paying {} bought only {} < {}", needed, got, x);
        }
    }

    #[test]
    fn prop_liquidity_conservation(
        r0 in reserve_strategy(),
        r1 in reserve_strategy(),
        multiple in 1u128..=100u128,
    ) {
        let mut pair = make_pair(r0, r1);
        let (d0, d1) = (r0 * multiple, r1 * multiple);
        let Ok(add) = LiquidityChange::add(Amount::new(d0), Amount::new(d1), Amount::ZERO, Amount::ZERO)
        else {
            return Ok(());
        };
        let Ok(minted) = pair.add_liquidity(&add, false) else {
            return Ok(());
        };
        let Ok(remove) = LiquidityChange::remove(minted.shares, Amount::ZERO, Amount::ZERO) else {
            return Ok(());
        };
        let Ok(burned) = pair.remove_liquidity(&remove, false) else {
            return Ok(());
        };
        prop_assert!(burned.amount0 <= minted.amount0);
        prop_assert!(burned.amount1 <= minted.amount1);
        prop_assert!(minted.amount0.get() - burned.amount0.get() <= 1);
        prop_assert!(minted.amount1.get() - burned.amount1.get() <= 1);
    }
}

// ---------------------------------------------------------------------------
// Staking properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_rewards_never_exceed_emission(
        stakes in prop::collection::vec(1u128..=1_000_000_000_000_000_000u128, 1..5),
        gaps in prop::collection::vec(0u64..=200u64, 1..5),
    ) {
        let Ok(cfg) = StakingPoolConfig::new(
            t0(),
            t1(),
            Amount::new(10_000),
            Timestamp::new(1_000),
            Timestamp::new(2_000),
            Amount::ZERO,
            Address::ZERO,
        ) else {
            panic!("valid config");
        };
        let Ok(mut pool) = StakingPool::new(&cfg, Address::derived(0x53, 0), 1_000_000_000_000) else {
            panic!("valid pool");
        };

        let mut now = 1_000u64;
        let mut paid = 0u128;
        let users: Vec<Address> = (1..=stakes.len() as u64).map(Address::from_low_u64).collect();
        for (i, (user, stake)) in users.iter().zip(&stakes).enumerate() {
            now += gaps.get(i).copied().unwrap_or(0);
            let Ok(reward) = pool.deposit(user, Amount::new(*stake), Timestamp::new(now)) else {
                return Ok(());
            };
            paid += reward.get();
        }
        let end = Timestamp::new(now + 100);
        for user in &users {
            let Ok(pending) = pool.pending_reward(user, end) else {
                return Ok(());
            };
            paid += pending.get();
        }
        let emitted = u128::from(end.get().min(2_000) - 1_000) * 10_000;
        prop_assert!(paid <= emitted, "owed {} > emitted {}", paid, emitted);
    }
}
