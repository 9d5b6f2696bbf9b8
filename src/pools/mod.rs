//! Stateful ledgers: the constant-product [`Pair`] and the reward-accrual
//! [`StakingPool`].
//!
//! Both are pure accounting.  They validate a request, update their own
//! state, and report the asset movements the caller must settle; neither
//! touches an [`AssetLedger`](crate::traits::AssetLedger) directly.  A
//! failed call leaves the ledger exactly as it was.
//!
//! | Type | Role | Style |
//! |------|------|-------|
//! | [`Pair`] | Reserves, share supply, swaps | Uniswap V2 |
//! | [`StakingPool`] | Reward-per-share accumulator | MasterChef |

pub mod pair;
pub mod staking_pool;

#[cfg(test)]
#[allow(clippy::panic)]
mod proptest_properties;

pub use pair::Pair;
pub use staking_pool::{StakingPool, UserInfo};
