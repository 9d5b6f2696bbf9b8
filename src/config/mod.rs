//! Validated configuration structs.
//!
//! Every config follows the same shape: a checked `new` that calls
//! `validate()`, const accessors, and optional `serde` derives so a
//! deployment can be described in JSON or TOML.
//!
//! | Config | Builds |
//! |--------|--------|
//! | [`ExchangeConfig`] | [`Exchange`](crate::exchange::Exchange) |
//! | [`PairConfig`] | [`Pair`](crate::pools::Pair) |
//! | [`StakingPoolConfig`] | [`StakingPool`](crate::pools::StakingPool) |

mod exchange;
mod pair;
mod staking;

pub use exchange::ExchangeConfig;
pub use pair::PairConfig;
pub use staking::StakingPoolConfig;
