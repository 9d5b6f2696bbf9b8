//! Value types shared by every layer of the exchange.
//!
//! All quantities are unsigned integers in the asset's smallest unit; the
//! engine never touches floating point.  Newtypes with validated
//! constructors carry the invariants:
//!
//! | Type | Meaning |
//! |------|---------|
//! | [`Amount`] | Raw asset quantity (`u128`) |
//! | [`Liquidity`] | Pair share quantity (`u128`) |
//! | [`BasisPoints`] | Fee rate, 1 bp = 0.01% |
//! | [`PoolFees`] | A pair's swap and protocol fee |
//! | [`Address`] | Account / asset / pool identifier |
//! | [`PairKey`] | Canonically ordered asset pair |
//! | [`Path`] | Ordered multi-hop route |
//! | [`Timestamp`] | Caller-supplied time in seconds |
//! | [`TxContext`] | Sender and time of one call |

mod address;
mod amount;
mod basis_points;
mod liquidity;
mod liquidity_change;
mod pair_key;
mod path;
mod pool_fees;
mod rounding;
mod staking_phase;
mod swap_result;
mod swap_spec;
mod timestamp;
mod tx_context;

pub use address::Address;
pub use amount::Amount;
pub use basis_points::{BasisPoints, BPS_DENOMINATOR};
pub use liquidity::Liquidity;
pub use liquidity_change::{ChangeType, LiquidityBurned, LiquidityChange, LiquidityMinted};
pub use pair_key::PairKey;
pub use path::{Hop, Hops, Path};
pub use pool_fees::PoolFees;
pub use rounding::Rounding;
pub use staking_phase::StakingPhase;
pub use swap_result::SwapResult;
pub use swap_spec::{SwapSpec, SwapType};
pub use timestamp::Timestamp;
pub use tx_context::TxContext;
