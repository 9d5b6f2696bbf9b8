//! Fungible-asset bookkeeping the exchange settles against.
//!
//! Pairs and staking pools are pure accounting: they never hold balances
//! themselves.  Every asset movement (trader deposits, pair payouts, share
//! mints, reward payments) is executed against an [`AssetLedger`], and
//! native-coin wrapping against a [`WrappedNative`] ledger.
//!
//! # Conventions
//!
//! - Liquidity shares are an ordinary asset whose address is the pair's
//!   share-token address.
//! - The native coin is tracked as the asset [`Address::NATIVE`].
//! - An allowance of [`Amount::MAX`] is unlimited and never decremented.

use crate::domain::{Address, Amount};
use crate::error::AmmError;

/// Balances, allowances, and supply of fungible assets.
///
/// # Errors
///
/// - [`AmmError::InsufficientBalance`]: the debited account holds too little.
/// - [`AmmError::InsufficientAllowance`]: the spender is not approved for
///   enough.
/// - [`AmmError::Overflow`]: a credit or mint would exceed `u128`.
///
/// A failed call leaves the ledger unchanged.
pub trait AssetLedger {
    /// Balance of `asset` held by `account`.
    #[must_use]
    fn balance_of(&self, asset: &Address, account: &Address) -> Amount;

    /// Amount of `owner`'s `asset` that `spender` may move.
    #[must_use]
    fn allowance(&self, asset: &Address, owner: &Address, spender: &Address) -> Amount;

    /// Total outstanding supply of `asset`.
    #[must_use]
    fn total_supply(&self, asset: &Address) -> Amount;

    /// Sets `spender`'s allowance over `owner`'s `asset` to `amount`.
    ///
    /// # Errors
    ///
    /// Implementations may reject approvals for the zero address.
    fn approve(
        &mut self,
        asset: &Address,
        owner: &Address,
        spender: &Address,
        amount: Amount,
    ) -> Result<(), AmmError>;

    /// Moves `amount` of `asset` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// See the trait documentation.
    fn transfer(
        &mut self,
        asset: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), AmmError>;

    /// Moves `amount` of `asset` from `from` to `to` on `spender`'s
    /// allowance, consuming it.
    ///
    /// # Errors
    ///
    /// See the trait documentation.
    fn transfer_from(
        &mut self,
        asset: &Address,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), AmmError>;

    /// Creates `amount` of `asset` in `to`'s balance.
    ///
    /// # Errors
    ///
    /// See the trait documentation.
    fn mint(&mut self, asset: &Address, to: &Address, amount: Amount) -> Result<(), AmmError>;

    /// Destroys `amount` of `asset` from `from`'s balance.
    ///
    /// # Errors
    ///
    /// See the trait documentation.
    fn burn(&mut self, asset: &Address, from: &Address, amount: Amount) -> Result<(), AmmError>;
}

/// A ledger that can wrap the native coin into a fungible asset.
///
/// Wrapping moves native coin from the account into the custody of the
/// wrapped asset's own address and mints the same amount of the wrapped
/// asset to the account.  Unwrapping reverses both legs.
pub trait WrappedNative: AssetLedger {
    /// Address of the wrapped-native asset.
    #[must_use]
    fn wrapped_native(&self) -> Address;

    /// Converts `amount` of `account`'s native coin into wrapped-native.
    ///
    /// # Errors
    ///
    /// [`AmmError::InsufficientBalance`] if the native balance is too low.
    fn wrap(&mut self, account: &Address, amount: Amount) -> Result<(), AmmError>;

    /// Converts `amount` of `account`'s wrapped-native back into native coin.
    ///
    /// # Errors
    ///
    /// [`AmmError::InsufficientBalance`] if the wrapped balance is too low.
    fn unwrap(&mut self, account: &Address, amount: Amount) -> Result<(), AmmError>;
}
