//! In-process asset ledger and all-or-nothing settlement batches.
//!
//! [`InMemoryLedger`] keeps one book per asset: balances, allowances, and
//! total supply.  The native coin is the asset [`Address::NATIVE`]; wrapping
//! parks native coin at the wrapped asset's own address and mints the
//! wrapped asset one to one.
//!
//! A [`Settlement`] collects the asset movements of one exchange operation
//! and applies them as a unit: every leg runs against a scratch copy, and
//! the ledger is replaced only after the last leg succeeds.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::{Address, Amount};
use crate::error::AmmError;
use crate::traits::{AssetLedger, WrappedNative};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct AssetBook {
    balances: BTreeMap<Address, Amount>,
    allowances: BTreeMap<(Address, Address), Amount>,
    total_supply: Amount,
}

impl AssetBook {
    fn balance(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(Amount::ZERO)
    }

    fn debit(&mut self, asset: &Address, account: &Address, amount: Amount) -> Result<(), AmmError> {
        let available = self.balance(account);
        let remaining = available
            .checked_sub(&amount)
            .ok_or(AmmError::InsufficientBalance {
                asset: *asset,
                available,
                requested: amount,
            })?;
        if remaining.is_zero() {
            self.balances.remove(account);
        } else {
            self.balances.insert(*account, remaining);
        }
        Ok(())
    }

    fn credit(&mut self, account: &Address, amount: Amount) -> Result<(), AmmError> {
        if amount.is_zero() {
            return Ok(());
        }
        let updated = self
            .balance(account)
            .checked_add(&amount)
            .ok_or(AmmError::Overflow("balance overflow"))?;
        self.balances.insert(*account, updated);
        Ok(())
    }
}

/// Balances and allowances of every asset, held in memory.
///
/// # Example
///
/// ```rust
/// use mars_amm::domain::{Address, Amount};
/// use mars_amm::ledger::InMemoryLedger;
/// use mars_amm::traits::{AssetLedger, WrappedNative};
///
/// let weth = Address::repeat_byte(0x57);
/// let alice = Address::repeat_byte(0xA1);
/// let mut ledger = InMemoryLedger::new(weth);
///
/// ledger.fund_native(&alice, Amount::new(1_000)).expect("funded");
/// ledger.wrap(&alice, Amount::new(400)).expect("wrapped");
/// assert_eq!(ledger.balance_of(&weth, &alice), Amount::new(400));
/// assert_eq!(ledger.balance_of(&Address::NATIVE, &alice), Amount::new(600));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryLedger {
    books: BTreeMap<Address, AssetBook>,
    wrapped_native: Address,
}

impl InMemoryLedger {
    /// Creates an empty ledger whose wrapped-native asset is
    /// `wrapped_native`.
    #[must_use]
    pub const fn new(wrapped_native: Address) -> Self {
        Self {
            books: BTreeMap::new(),
            wrapped_native,
        }
    }

    /// Credits `account` with newly created native coin.
    ///
    /// # Errors
    ///
    /// [`AmmError::Overflow`] if the balance or supply would overflow.
    pub fn fund_native(&mut self, account: &Address, amount: Amount) -> Result<(), AmmError> {
        self.mint(&Address::NATIVE, account, amount)
    }

    /// Number of accounts holding a non-zero balance of `asset`.
    #[must_use]
    pub fn holder_count(&self, asset: &Address) -> usize {
        self.books.get(asset).map_or(0, |book| book.balances.len())
    }

    fn book(&self, asset: &Address) -> Option<&AssetBook> {
        self.books.get(asset)
    }

    fn book_mut(&mut self, asset: &Address) -> &mut AssetBook {
        self.books.entry(*asset).or_default()
    }

    fn move_balance(
        &mut self,
        asset: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        if amount.is_zero() || from == to {
            let available = self.balance_of(asset, from);
            if available < amount {
                return Err(AmmError::InsufficientBalance {
                    asset: *asset,
                    available,
                    requested: amount,
                });
            }
            return Ok(());
        }
        let mut book = self.book(asset).cloned().unwrap_or_default();
        book.debit(asset, from, amount)?;
        book.credit(to, amount)?;
        self.books.insert(*asset, book);
        Ok(())
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new(crate::config::ExchangeConfig::DEFAULT_WRAPPED_NATIVE)
    }
}

impl AssetLedger for InMemoryLedger {
    fn balance_of(&self, asset: &Address, account: &Address) -> Amount {
        self.book(asset)
            .map_or(Amount::ZERO, |book| book.balance(account))
    }

    fn allowance(&self, asset: &Address, owner: &Address, spender: &Address) -> Amount {
        self.book(asset)
            .and_then(|book| book.allowances.get(&(*owner, *spender)).copied())
            .unwrap_or(Amount::ZERO)
    }

    fn total_supply(&self, asset: &Address) -> Amount {
        self.book(asset)
            .map_or(Amount::ZERO, |book| book.total_supply)
    }

    fn approve(
        &mut self,
        asset: &Address,
        owner: &Address,
        spender: &Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        if spender.is_zero() {
            return Err(AmmError::InvalidConfiguration(
                "cannot approve the burn address",
            ));
        }
        let book = self.book_mut(asset);
        if amount.is_zero() {
            book.allowances.remove(&(*owner, *spender));
        } else {
            book.allowances.insert((*owner, *spender), amount);
        }
        debug!(%asset, %owner, %spender, %amount, "allowance set");
        Ok(())
    }

    fn transfer(
        &mut self,
        asset: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        self.move_balance(asset, from, to, amount)
    }

    fn transfer_from(
        &mut self,
        asset: &Address,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        let allowance = self.allowance(asset, from, spender);
        if allowance < amount {
            return Err(AmmError::InsufficientAllowance {
                asset: *asset,
                allowance,
                requested: amount,
            });
        }
        self.move_balance(asset, from, to, amount)?;
        if allowance != Amount::MAX && !amount.is_zero() {
            let remaining = Amount::new(allowance.get() - amount.get());
            let book = self.book_mut(asset);
            if remaining.is_zero() {
                book.allowances.remove(&(*from, *spender));
            } else {
                book.allowances.insert((*from, *spender), remaining);
            }
        }
        Ok(())
    }

    fn mint(&mut self, asset: &Address, to: &Address, amount: Amount) -> Result<(), AmmError> {
        if amount.is_zero() {
            return Ok(());
        }
        let mut book = self.book(asset).cloned().unwrap_or_default();
        book.total_supply = book
            .total_supply
            .checked_add(&amount)
            .ok_or(AmmError::Overflow("total supply overflow"))?;
        book.credit(to, amount)?;
        self.books.insert(*asset, book);
        Ok(())
    }

    fn burn(&mut self, asset: &Address, from: &Address, amount: Amount) -> Result<(), AmmError> {
        if amount.is_zero() {
            return Ok(());
        }
        let mut book = self.book(asset).cloned().unwrap_or_default();
        book.debit(asset, from, amount)?;
        book.total_supply = book
            .total_supply
            .checked_sub(&amount)
            .ok_or(AmmError::Underflow("total supply underflow"))?;
        self.books.insert(*asset, book);
        Ok(())
    }
}

impl WrappedNative for InMemoryLedger {
    fn wrapped_native(&self) -> Address {
        self.wrapped_native
    }

    fn wrap(&mut self, account: &Address, amount: Amount) -> Result<(), AmmError> {
        let wrapped = self.wrapped_native;
        let mut scratch = self.clone();
        scratch.transfer(&Address::NATIVE, account, &wrapped, amount)?;
        scratch.mint(&wrapped, account, amount)?;
        *self = scratch;
        debug!(%account, %amount, "native wrapped");
        Ok(())
    }

    fn unwrap(&mut self, account: &Address, amount: Amount) -> Result<(), AmmError> {
        let wrapped = self.wrapped_native;
        let mut scratch = self.clone();
        scratch.burn(&wrapped, account, amount)?;
        scratch.transfer(&Address::NATIVE, &wrapped, account, amount)?;
        *self = scratch;
        debug!(%account, %amount, "native unwrapped");
        Ok(())
    }
}

/// One asset movement inside a [`Settlement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leg {
    /// [`AssetLedger::transfer`].
    Transfer {
        /// Asset moved.
        asset: Address,
        /// Debited account.
        from: Address,
        /// Credited account.
        to: Address,
        /// Quantity.
        amount: Amount,
    },
    /// [`AssetLedger::transfer_from`].
    TransferFrom {
        /// Asset moved.
        asset: Address,
        /// Account spending the allowance.
        spender: Address,
        /// Debited account.
        from: Address,
        /// Credited account.
        to: Address,
        /// Quantity.
        amount: Amount,
    },
    /// [`AssetLedger::mint`].
    Mint {
        /// Asset created.
        asset: Address,
        /// Credited account.
        to: Address,
        /// Quantity.
        amount: Amount,
    },
    /// [`AssetLedger::burn`].
    Burn {
        /// Asset destroyed.
        asset: Address,
        /// Debited account.
        from: Address,
        /// Quantity.
        amount: Amount,
    },
    /// [`WrappedNative::wrap`].
    Wrap {
        /// Account converting native coin.
        account: Address,
        /// Quantity.
        amount: Amount,
    },
    /// [`WrappedNative::unwrap`].
    Unwrap {
        /// Account converting wrapped-native.
        account: Address,
        /// Quantity.
        amount: Amount,
    },
}

impl Leg {
    fn run<L: WrappedNative>(&self, ledger: &mut L) -> Result<(), AmmError> {
        match *self {
            Self::Transfer {
                asset,
                from,
                to,
                amount,
            } => ledger.transfer(&asset, &from, &to, amount),
            Self::TransferFrom {
                asset,
                spender,
                from,
                to,
                amount,
            } => ledger.transfer_from(&asset, &spender, &from, &to, amount),
            Self::Mint { asset, to, amount } => ledger.mint(&asset, &to, amount),
            Self::Burn {
                asset,
                from,
                amount,
            } => ledger.burn(&asset, &from, amount),
            Self::Wrap { account, amount } => ledger.wrap(&account, amount),
            Self::Unwrap { account, amount } => ledger.unwrap(&account, amount),
        }
    }
}

/// An ordered batch of [`Leg`]s applied atomically.
///
/// # Example
///
/// ```rust
/// use mars_amm::domain::{Address, Amount};
/// use mars_amm::ledger::{InMemoryLedger, Settlement};
/// use mars_amm::traits::AssetLedger;
///
/// let token = Address::repeat_byte(1);
/// let alice = Address::repeat_byte(0xA1);
/// let bob = Address::repeat_byte(0xB0);
/// let mut ledger = InMemoryLedger::default();
/// ledger.mint(&token, &alice, Amount::new(100)).expect("minted");
///
/// let mut batch = Settlement::new();
/// batch.transfer(token, alice, bob, Amount::new(60));
/// batch.transfer(token, alice, bob, Amount::new(60));
/// assert!(batch.apply(&mut ledger).is_err());
/// assert_eq!(ledger.balance_of(&token, &alice), Amount::new(100));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settlement {
    legs: Vec<Leg>,
}

impl Settlement {
    /// Creates an empty batch.
    #[must_use]
    pub const fn new() -> Self {
        Self { legs: Vec::new() }
    }

    /// Legs queued so far.
    #[must_use]
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Queues an arbitrary leg.
    pub fn push(&mut self, leg: Leg) -> &mut Self {
        self.legs.push(leg);
        self
    }

    /// Queues a transfer.
    pub fn transfer(&mut self, asset: Address, from: Address, to: Address, amount: Amount) -> &mut Self {
        self.push(Leg::Transfer {
            asset,
            from,
            to,
            amount,
        })
    }

    /// Queues an allowance-spending transfer.
    pub fn transfer_from(
        &mut self,
        asset: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> &mut Self {
        self.push(Leg::TransferFrom {
            asset,
            spender,
            from,
            to,
            amount,
        })
    }

    /// Queues a mint; zero amounts are skipped.
    pub fn mint(&mut self, asset: Address, to: Address, amount: Amount) -> &mut Self {
        if amount.is_zero() {
            return self;
        }
        self.push(Leg::Mint { asset, to, amount })
    }

    /// Queues a burn.
    pub fn burn(&mut self, asset: Address, from: Address, amount: Amount) -> &mut Self {
        self.push(Leg::Burn {
            asset,
            from,
            amount,
        })
    }

    /// Queues a native-to-wrapped conversion.
    pub fn wrap(&mut self, account: Address, amount: Amount) -> &mut Self {
        self.push(Leg::Wrap { account, amount })
    }

    /// Queues a wrapped-to-native conversion.
    pub fn unwrap(&mut self, account: Address, amount: Amount) -> &mut Self {
        self.push(Leg::Unwrap { account, amount })
    }

    /// Runs every leg in order against a copy of `ledger` and keeps the
    /// result only if all of them succeed.
    ///
    /// # Errors
    ///
    /// The first leg's error; `ledger` is unchanged.
    pub fn apply<L: WrappedNative + Clone>(&self, ledger: &mut L) -> Result<(), AmmError> {
        let mut scratch = ledger.clone();
        for leg in &self.legs {
            leg.run(&mut scratch)?;
        }
        *ledger = scratch;
        debug!(legs = self.legs.len(), "settlement applied");
        Ok(())
    }
}
