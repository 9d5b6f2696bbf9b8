//! Multi-hop routing: quotes and execution.
//!
//! | Type | Role |
//! |------|------|
//! | [`RouteQuoter`] | Read-only `get_amounts_out` / `get_amounts_in`, price impact, ratio quotes |
//! | [`Router`] | Swaps (asset and native variants) and liquidity add/remove |
//!
//! A [`Path`](crate::domain::Path) of `n` assets is walked as `n − 1`
//! [`Hop`](crate::domain::Hop)s.  Every hop must have a registered pair, and
//! a path may cross each pair at most once.  Execution re-runs the quoted
//! amounts hop by hop on staged copies of the pairs:
//!
//! ```text
//! caller ──amounts[0]──▶ pair₀ ──amounts[1]──▶ pair₁ ── … ──amounts[n−1]──▶ to
//! ```
//!
//! Deadline and slippage bounds are checked before anything is staged.

mod executor;
mod quoter;

pub use executor::Router;
pub use quoter::RouteQuoter;
