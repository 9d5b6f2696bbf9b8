//! Registries that create and own pairs and staking pools.
//!
//! [`PairRegistry`] and [`StakingRegistry`] are arenas keyed by stable
//! identifiers: the canonical [`PairKey`](crate::domain::PairKey) for pairs
//! and the staked asset for staking pools.  Both validate a configuration
//! before building the runtime value, then assign it a deterministic
//! address in their own namespace.
//!
//! # Flow
//!
//! ```text
//! create_pair(a, b, fees)
//!   -> PairKey::new        rejects a == b
//!   -> PairConfig::new     validates fees
//!   -> Pair::from_config   empty reserves, zero supply
//!   -> arena insert        rejects duplicates
//! ```
//!
//! Operations that touch several pairs stage clones and hand them back
//! through [`PairRegistry::commit`] once every step has succeeded.

mod pair_registry;
mod staking_registry;

pub use pair_registry::{PairRegistry, PAIR_ADDRESS_TAG};
pub use staking_registry::{StakingRegistry, STAKING_ADDRESS_TAG};
