//! Trait seams between pools, routing, and asset custody.
//!
//! - [`SwapPool`] and [`LiquidityPool`] are implemented by
//!   [`Pair`](crate::pools::Pair) and consumed by the router and valuator.
//! - [`AssetLedger`] and [`WrappedNative`] are the external asset
//!   collaborator; [`InMemoryLedger`](crate::ledger::InMemoryLedger) is the
//!   bundled implementation.
//! - [`FromConfig`] builds runtime state from validated configuration.

mod asset_ledger;
mod from_config;
mod liquidity_pool;
mod swap_pool;

pub use asset_ledger::{AssetLedger, WrappedNative};
pub use from_config::FromConfig;
pub use liquidity_pool::LiquidityPool;
pub use swap_pool::SwapPool;
