//! Integer arithmetic for the exchange.
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`CheckedArithmetic`] | `Result`-returning ops on [`Amount`](crate::domain::Amount) and [`Liquidity`](crate::domain::Liquidity) |
//! | [`div_round`] | `u128` division with explicit [`Rounding`](crate::domain::Rounding) |
//! | [`mul_div`], [`sqrt_product`], [`isqrt`] | 256-bit intermediates |
//! | [`amount_out`], [`amount_in`], [`quote`], [`protocol_fee_shares`] | Pricing formulas shared by pairs and the router |

mod checked;
mod fee_oracle;
mod rounding;
mod wide;

pub use checked::CheckedArithmetic;
pub use fee_oracle::{amount_in, amount_out, protocol_fee_shares, quote, root_k};
pub use rounding::div_round;
pub use wide::{isqrt, mul_div, narrow, sqrt_product};
