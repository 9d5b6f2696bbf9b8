//! Account and asset identifiers.

use core::fmt;

/// A 20-byte identifier for an account, an asset, or a pool.
///
/// The engine does not distinguish the three roles at the type level: a
/// pair's share token is an asset whose address is also the pair's custody
/// account, exactly as on an EVM chain.
///
/// Two addresses are reserved:
///
/// - [`Address::ZERO`] is the burn sink.  Locked minimum liquidity is minted
///   there and can never move.
/// - [`Address::NATIVE`] names the chain's native coin in the asset ledger.
///
/// # Examples
///
/// ```
/// use mars_amm::domain::Address;
///
/// let alice = Address::repeat_byte(0xA1);
/// assert_eq!(alice.as_bytes(), [0xA1; 20]);
/// assert!(Address::ZERO < alice);
/// assert_eq!(Address::from_low_u64(1).to_string(), "0x0000000000000000000000000000000000000001");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Address([u8; 20]);

impl Address {
    /// The all-zero burn address.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Pseudo-asset for the native coin (`0xEEEE…EEEE`).
    pub const NATIVE: Self = Self([0xEE; 20]);

    /// Creates an `Address` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Creates an address with every byte set to `byte`.
    #[must_use]
    pub const fn repeat_byte(byte: u8) -> Self {
        Self([byte; 20])
    }

    /// Creates an address whose low eight bytes hold `value` big-endian.
    #[must_use]
    pub const fn from_low_u64(value: u64) -> Self {
        let be = value.to_be_bytes();
        let mut bytes = [0u8; 20];
        let mut i = 0;
        while i < 8 {
            bytes[12 + i] = be[i];
            i += 1;
        }
        Self(bytes)
    }

    /// Derives a system-assigned address from a namespace tag and an index.
    ///
    /// Registries use this to give every pair and staking pool a stable,
    /// collision-free custody account.  The tag occupies the first byte,
    /// the index the low eight bytes.
    #[must_use]
    pub const fn derived(tag: u8, index: u64) -> Self {
        let mut addr = Self::from_low_u64(index);
        addr.0[0] = tag;
        addr
    }

    /// Returns the underlying 20-byte representation.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 20] {
        self.0
    }

    /// Returns `true` for the burn address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}
