//! Multi-hop swap paths.

use core::fmt;

use super::Address;
use crate::error::AmmError;

/// An ordered list of assets a swap travels through.
///
/// A path of `n` assets crosses `n - 1` pairs.  The first asset is what the
/// trader pays, the last is what they receive.
///
/// # Invariants
///
/// - At least two assets.
/// - No two consecutive assets are equal.
///
/// # Examples
///
/// ```
/// use mars_amm::domain::{Address, Path};
///
/// let a = Address::repeat_byte(1);
/// let b = Address::repeat_byte(2);
/// let c = Address::repeat_byte(3);
///
/// let path = Path::new(vec![a, b, c]).expect("valid path");
/// assert_eq!(path.hop_count(), 2);
/// let hops: Vec<_> = path.hops().collect();
/// assert_eq!(hops[1].token_in, b);
/// assert_eq!(hops[1].token_out, c);
///
/// assert!(Path::new(vec![a]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<Address>", into = "Vec<Address>"))]
pub struct Path(Vec<Address>);

impl Path {
    /// Validates and wraps a list of assets.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidPath`] if the path has fewer than two
    /// assets or repeats an asset in adjacent positions.
    pub fn new(assets: Vec<Address>) -> Result<Self, AmmError> {
        if assets.len() < 2 {
            return Err(AmmError::InvalidPath("path needs at least two assets"));
        }
        if assets.windows(2).any(|w| w[0] == w[1]) {
            return Err(AmmError::InvalidPath("adjacent path entries must differ"));
        }
        Ok(Self(assets))
    }

    /// Returns the assets in order.
    #[must_use]
    pub fn assets(&self) -> &[Address] {
        &self.0
    }

    /// Number of assets on the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; a validated path holds at least two assets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of pairs the path crosses.
    #[must_use]
    pub fn hop_count(&self) -> usize {
        self.0.len() - 1
    }

    /// The asset paid in.
    #[must_use]
    pub fn first(&self) -> Address {
        self.0[0]
    }

    /// The asset paid out.
    #[must_use]
    pub fn last(&self) -> Address {
        self.0[self.0.len() - 1]
    }

    /// Iterates the adjacent `(token_in, token_out)` pairs front to back.
    pub fn hops(&self) -> Hops<'_> {
        Hops {
            inner: self.0.windows(2),
        }
    }
}

impl TryFrom<Vec<Address>> for Path {
    type Error = AmmError;

    fn try_from(assets: Vec<Address>) -> Result<Self, Self::Error> {
        Self::new(assets)
    }
}

impl From<Path> for Vec<Address> {
    fn from(path: Path) -> Self {
        path.0
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, asset) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{asset}")?;
        }
        Ok(())
    }
}

/// One leg of a [`Path`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hop {
    /// Asset entering the pair.
    pub token_in: Address,
    /// Asset leaving the pair.
    pub token_out: Address,
}

/// Iterator over the legs of a [`Path`], see [`Path::hops`].
#[derive(Debug, Clone)]
pub struct Hops<'a> {
    inner: core::slice::Windows<'a, Address>,
}

impl Iterator for Hops<'_> {
    type Item = Hop;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|w| Hop {
            token_in: w[0],
            token_out: w[1],
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Hops<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|w| Hop {
            token_in: w[0],
            token_out: w[1],
        })
    }
}

impl ExactSizeIterator for Hops<'_> {}
