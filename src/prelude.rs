//! Convenience re-exports for common types and traits.
//!
//! The prelude provides a single import to bring all commonly used items
//! into scope:
//!
//! ```rust
//! use mars_amm::prelude::*;
//! ```

pub use crate::domain::{
    Address, Amount, BasisPoints, Liquidity, PairKey, Path, PoolFees, Rounding, StakingPhase,
    Timestamp, TxContext,
};

pub use crate::traits::{AssetLedger, FromConfig, LiquidityPool, SwapPool, WrappedNative};

pub use crate::config::{ExchangeConfig, PairConfig, StakingPoolConfig};

pub use crate::error::{AmmError, Result};

pub use crate::exchange::Exchange;
pub use crate::factory::{PairRegistry, StakingRegistry};
pub use crate::farming::{Farming, Investment, Redemption};
pub use crate::ledger::{InMemoryLedger, Settlement};
pub use crate::pools::{Pair, StakingPool, UserInfo};
pub use crate::router::{RouteQuoter, Router};
pub use crate::valuator::LiquidityValuator;
