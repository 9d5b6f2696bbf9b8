//! Caller-supplied block time.

use core::fmt;

/// Seconds since an arbitrary epoch, supplied by the caller on every
/// time-dependent operation.
///
/// The engine never reads a clock.  Deadlines and staking accrual compare
/// against the `now` value passed in, which keeps every operation
/// deterministic and testable.
///
/// # Examples
///
/// ```
/// use mars_amm::domain::Timestamp;
///
/// let start = Timestamp::new(1_000);
/// let now = Timestamp::new(1_100);
/// assert_eq!(now.seconds_since(start), 100);
/// assert_eq!(start.seconds_since(now), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch.
    pub const ZERO: Self = Self(0);

    /// The far future; useful as a deadline that never expires.
    pub const MAX: Self = Self(u64::MAX);

    /// Creates a timestamp from raw seconds.
    #[must_use]
    pub const fn new(seconds: u64) -> Self {
        Self(seconds)
    }

    /// Returns the raw seconds.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Seconds elapsed from `earlier` to `self`, saturating at zero.
    #[must_use]
    pub const fn seconds_since(&self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Returns the timestamp `seconds` later, saturating at [`Timestamp::MAX`].
    #[must_use]
    pub const fn plus(&self, seconds: u64) -> Self {
        Self(self.0.saturating_add(seconds))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
