//! Lifecycle phase of a staking pool.

use core::fmt;

use super::Timestamp;

/// Where a staking pool sits relative to its reward window.
///
/// | Phase     | Condition                         | Accrual |
/// |-----------|-----------------------------------|---------|
/// | `Pending` | `now < start_time`                | none    |
/// | `Active`  | `start_time <= now < bonus_end`   | yes     |
/// | `Ended`   | `now >= bonus_end`                | none    |
///
/// Deposits, withdrawals, and harvests are accepted in every phase.
///
/// # Examples
///
/// ```
/// use mars_amm::domain::{StakingPhase, Timestamp};
///
/// let phase = StakingPhase::at(Timestamp::new(50), Timestamp::new(100), Timestamp::new(200));
/// assert_eq!(phase, StakingPhase::Pending);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StakingPhase {
    /// Rewards have not started.
    Pending,
    /// Rewards are streaming.
    Active,
    /// The reward window has closed.
    Ended,
}

impl StakingPhase {
    /// Classifies `now` against a `[start, bonus_end)` window.
    #[must_use]
    pub fn at(now: Timestamp, start: Timestamp, bonus_end: Timestamp) -> Self {
        if now >= bonus_end {
            Self::Ended
        } else if now < start {
            Self::Pending
        } else {
            Self::Active
        }
    }

    /// Returns `true` while rewards stream.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for StakingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Active => write!(f, "Active"),
            Self::Ended => write!(f, "Ended"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: u64) -> Timestamp {
        Timestamp::new(s)
    }

    #[test]
    fn window_boundaries() {
        assert_eq!(StakingPhase::at(t(99), t(100), t(200)), StakingPhase::Pending);
        assert_eq!(StakingPhase::at(t(100), t(100), t(200)), StakingPhase::Active);
        assert_eq!(StakingPhase::at(t(199), t(100), t(200)), StakingPhase::Active);
        assert_eq!(StakingPhase::at(t(200), t(100), t(200)), StakingPhase::Ended);
    }

    #[test]
    fn empty_window_never_activates() {
        assert_eq!(StakingPhase::at(t(0), t(100), t(100)), StakingPhase::Pending);
        assert_eq!(StakingPhase::at(t(100), t(100), t(100)), StakingPhase::Ended);
    }

    #[test]
    fn display() {
        assert_eq!(StakingPhase::Active.to_string(), "Active");
    }
}
