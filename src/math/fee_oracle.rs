//! Pure constant-product pricing with a basis-point swap fee.
//!
//! These are the only formulas the pair and the router use to turn a trade
//! size into its counterpart amount:
//!
//! ```text
//! amount_out = floor( in·(10000−f)·r_out / (r_in·10000 + in·(10000−f)) )
//! amount_in  = floor( r_in·out·10000 / ((r_out−out)·(10000−f)) ) + 1
//! ```
//!
//! The `+ 1` on the input side means the pair never undercharges: selling
//! `amount_in(x)` always yields at least `x`.
//!
//! Products are formed in 256 bits; a result that does not fit `u128`
//! surfaces as [`AmmError::Overflow`].

use primitive_types::U256;

use super::wide::{mul_div, narrow, sqrt_product};
use crate::domain::{Amount, BasisPoints, Liquidity, PoolFees, Rounding, BPS_DENOMINATOR};
use crate::error::AmmError;

fn fee_complement(fee: BasisPoints) -> Result<u128, AmmError> {
    match fee.complement() {
        Some(c) if c > 0 => Ok(u128::from(c)),
        _ => Err(AmmError::InvalidFee(fee)),
    }
}

fn require_reserves(reserve_in: Amount, reserve_out: Amount) -> Result<(), AmmError> {
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(AmmError::ZeroReserve);
    }
    Ok(())
}

/// Output a pair pays for `amount_in`, fee deducted.
///
/// # Errors
///
/// - [`AmmError::InvalidFee`] if `fee >= 10_000`.
/// - [`AmmError::InvalidQuantity`] if `amount_in` is zero.
/// - [`AmmError::ZeroReserve`] if either reserve is empty.
///
/// # Examples
///
/// ```
/// use mars_amm::domain::{Amount, BasisPoints};
/// use mars_amm::math::amount_out;
///
/// let out = amount_out(
///     Amount::new(10_000),
///     Amount::new(10_000_000_000_000_000_000),
///     Amount::new(5_000_000_000_000_000_000),
///     BasisPoints::new(30),
/// )
/// .expect("valid quote");
/// assert_eq!(out, Amount::new(4_984));
/// ```
pub fn amount_out(
    amount_in: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
    fee: BasisPoints,
) -> Result<Amount, AmmError> {
    let complement = fee_complement(fee)?;
    if amount_in.is_zero() {
        return Err(AmmError::InvalidQuantity("input amount must be non-zero"));
    }
    require_reserves(reserve_in, reserve_out)?;

    let in_with_fee = U256::from(amount_in.get()) * U256::from(complement);
    let numerator = in_with_fee
        .checked_mul(U256::from(reserve_out.get()))
        .ok_or(AmmError::Overflow("amount_out numerator overflow"))?;
    let denominator = (U256::from(reserve_in.get()) * U256::from(BPS_DENOMINATOR))
        .checked_add(in_with_fee)
        .ok_or(AmmError::Overflow("amount_out denominator overflow"))?;
    let out = narrow(numerator / denominator, "amount_out exceeds u128")?;
    Ok(Amount::new(out))
}

/// Input a pair requires to pay out exactly `amount_out`, fee included.
///
/// # Errors
///
/// - [`AmmError::InvalidFee`] if `fee >= 10_000`.
/// - [`AmmError::InvalidQuantity`] if `amount_out` is zero.
/// - [`AmmError::ZeroReserve`] if either reserve is empty.
/// - [`AmmError::InsufficientReserves`] if `amount_out >= reserve_out`.
///
/// # Examples
///
/// ```
/// use mars_amm::domain::{Amount, BasisPoints};
/// use mars_amm::math::amount_in;
///
/// let required = amount_in(
///     Amount::new(5_000),
///     Amount::new(10_000_000_000_000_000_000),
///     Amount::new(5_000_000_000_000_000_000),
///     BasisPoints::new(30),
/// )
/// .expect("valid quote");
/// assert_eq!(required, Amount::new(10_031));
/// ```
pub fn amount_in(
    amount_out: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
    fee: BasisPoints,
) -> Result<Amount, AmmError> {
    let complement = fee_complement(fee)?;
    if amount_out.is_zero() {
        return Err(AmmError::InvalidQuantity("output amount must be non-zero"));
    }
    require_reserves(reserve_in, reserve_out)?;
    if amount_out >= reserve_out {
        return Err(AmmError::InsufficientReserves {
            reserve: reserve_out,
            requested: amount_out,
        });
    }

    let numerator = (U256::from(reserve_in.get()) * U256::from(amount_out.get()))
        .checked_mul(U256::from(BPS_DENOMINATOR))
        .ok_or(AmmError::Overflow("amount_in numerator overflow"))?;
    let remaining = reserve_out.get() - amount_out.get();
    let denominator = U256::from(remaining) * U256::from(complement);
    let floor = narrow(numerator / denominator, "amount_in exceeds u128")?;
    floor
        .checked_add(1)
        .map(Amount::new)
        .ok_or(AmmError::Overflow("amount_in exceeds u128"))
}

/// Amount of `B` worth `amount_a` of `A` at the current reserve ratio,
/// fee-free and rounded down.
///
/// # Errors
///
/// - [`AmmError::InvalidQuantity`] if `amount_a` is zero.
/// - [`AmmError::ZeroReserve`] if either reserve is empty.
pub fn quote(amount_a: Amount, reserve_a: Amount, reserve_b: Amount) -> Result<Amount, AmmError> {
    if amount_a.is_zero() {
        return Err(AmmError::InvalidQuantity("quote amount must be non-zero"));
    }
    require_reserves(reserve_a, reserve_b)?;
    mul_div(amount_a.get(), reserve_b.get(), reserve_a.get(), Rounding::Down).map(Amount::new)
}

/// Shares to mint to the fee recipient for growth in `sqrt(k)` since the
/// last liquidity event.
///
/// With `d = root_k − root_k_last`, `p` the protocol fee and `s` the swap
/// fee, the recipient receives
///
/// ```text
/// shares = total_supply · d · p / (root_k · s − d · p)
/// ```
///
/// which dilutes existing holders so the recipient owns exactly `p / s` of
/// the fee-driven growth.  For `s = 30, p = 5` this is the familiar
/// one-sixth rule `T·d / (5·root_k + root_k_last)`.
///
/// Returns zero when the protocol fee is zero or `k` has not grown.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] if the share count does not fit `u128`.
pub fn protocol_fee_shares(
    total_supply: Liquidity,
    root_k: u128,
    root_k_last: u128,
    fees: PoolFees,
) -> Result<Liquidity, AmmError> {
    let p = fees.protocol_fee().get();
    let s = fees.swap_fee().get();
    if p == 0 || s == 0 || root_k <= root_k_last || total_supply.is_zero() {
        return Ok(Liquidity::ZERO);
    }
    let growth = U256::from(root_k - root_k_last);
    let numerator = (U256::from(total_supply.get()) * growth)
        .checked_mul(U256::from(p))
        .ok_or(AmmError::Overflow("protocol fee numerator overflow"))?;
    let scaled_root = U256::from(root_k) * U256::from(s);
    let diverted = growth * U256::from(p);
    if scaled_root <= diverted {
        return Ok(Liquidity::ZERO);
    }
    let shares = narrow(numerator / (scaled_root - diverted), "protocol fee shares exceed u128")?;
    Ok(Liquidity::new(shares))
}

/// `floor(sqrt(reserve0 · reserve1))`.
#[must_use]
pub fn root_k(reserve0: Amount, reserve1: Amount) -> u128 {
    sqrt_product(reserve0.get(), reserve1.get())
}
