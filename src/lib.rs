//! # Mars AMM
//!
//! Constant-product exchange engine: paired liquidity pools, multi-hop
//! routing with exact quotes, and time-based staking rewards for pool
//! shares.
//!
//! Every amount is an unsigned integer.  Intermediate products are carried
//! in 256 bits, so no operation loses precision before its final rounding.
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `serde` | yes | `Serialize`/`Deserialize` on value and config types |
//!
//! # Quick Start
//!
//! ```rust
//! use mars_amm::prelude::*;
//!
//! let (usdc, weth) = (Address::repeat_byte(1), Address::repeat_byte(2));
//! let alice = Address::repeat_byte(0xA1);
//!
//! // 1. An exchange with default parameters (30 bp swap fee)
//! let mut exchange = Exchange::new(ExchangeConfig::default()).expect("valid config");
//!
//! // 2. Fund alice and let the router spend for her
//! let router = exchange.config().router();
//! for token in [usdc, weth] {
//!     let ledger = exchange.ledger_mut();
//!     ledger.mint(&token, &alice, Amount::new(1_000_000_000)).expect("minted");
//!     ledger.approve(&token, &alice, &router, Amount::MAX).expect("approved");
//! }
//!
//! // 3. Seed the pair; the first deposit creates it
//! let tx = TxContext::new(alice, Timestamp::new(1));
//! let (_, _, shares) = exchange
//!     .router()
//!     .add_liquidity(
//!         tx, usdc, weth,
//!         Amount::new(10_000_000), Amount::new(5_000_000),
//!         Amount::ZERO, Amount::ZERO,
//!         alice, Timestamp::MAX,
//!     )
//!     .expect("liquidity added");
//! assert_eq!(shares, Liquidity::new(7_070_967));
//!
//! // 4. Swap along a path
//! let path = Path::new(vec![usdc, weth]).expect("valid path");
//! let amounts = exchange
//!     .router()
//!     .swap_exact_tokens_for_tokens(tx, Amount::new(10_000), Amount::new(4_900), &path, alice, Timestamp::MAX)
//!     .expect("swapped");
//! assert_eq!(amounts[1], Amount::new(4_980));
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   Exchange   │  owns registries + ledger, hands out views
//! └──────┬───────┘
//!        │ router() / quoter() / valuator() / farming() / stake()
//!        ▼
//! ┌──────────────┐
//! │ Router, etc. │  stage on clones, settle, commit
//! └──────┬───────┘
//!        │ SwapPool + LiquidityPool, StakingPool
//!        ▼
//! ┌──────────────┐
//! │    Pools     │  Pair (reserves, shares), StakingPool (accrual)
//! └──────┬───────┘
//!        │ fee oracle, 256-bit mul_div
//!        ▼
//! ┌──────────────┐
//! │  Math/Domain │  Amount, Liquidity, PairKey, Path, …
//! └──────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Newtype value types: [`Amount`](domain::Amount), [`PairKey`](domain::PairKey), [`Path`](domain::Path), etc. |
//! | [`traits`] | [`SwapPool`](traits::SwapPool), [`LiquidityPool`](traits::LiquidityPool), [`AssetLedger`](traits::AssetLedger), [`WrappedNative`](traits::WrappedNative), [`FromConfig`](traits::FromConfig) |
//! | [`config`] | Validated parameters: [`ExchangeConfig`](config::ExchangeConfig), [`PairConfig`](config::PairConfig), [`StakingPoolConfig`](config::StakingPoolConfig) |
//! | [`pools`] | [`Pair`](pools::Pair) and [`StakingPool`](pools::StakingPool) |
//! | [`factory`] | [`PairRegistry`](factory::PairRegistry) and [`StakingRegistry`](factory::StakingRegistry) |
//! | [`router`] | [`RouteQuoter`](router::RouteQuoter) and [`Router`](router::Router) |
//! | [`valuator`] | [`LiquidityValuator`](valuator::LiquidityValuator) |
//! | [`farming`] | [`Farming`](farming::Farming): add liquidity and stake in one call |
//! | [`ledger`] | [`InMemoryLedger`](ledger::InMemoryLedger) and [`Settlement`](ledger::Settlement) |
//! | [`exchange`] | [`Exchange`](exchange::Exchange) facade |
//! | [`math`] | Checked arithmetic, fee oracle, 256-bit helpers |
//! | [`error`] | [`AmmError`](error::AmmError) unified error enum |
//! | [`prelude`] | Convenience re-exports for common types and traits |

pub mod config;
pub mod domain;
pub mod error;
pub mod exchange;
pub mod factory;
pub mod farming;
pub mod ledger;
pub mod math;
pub mod pools;
pub mod prelude;
pub mod router;
pub mod traits;
pub mod valuator;
