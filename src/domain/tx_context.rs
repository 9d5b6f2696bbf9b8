//! Who is calling, and when.

use super::{Address, Timestamp};
use crate::error::AmmError;

/// Caller identity and execution time of one state-changing call.
///
/// # Examples
///
/// ```
/// use mars_amm::domain::{Address, Timestamp, TxContext};
///
/// let tx = TxContext::new(Address::repeat_byte(0xA1), Timestamp::new(100));
/// assert!(tx.ensure_before(Timestamp::new(100)).is_ok());
/// assert!(tx.ensure_before(Timestamp::new(99)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxContext {
    /// Account the call acts for.
    pub sender: Address,
    /// Execution time.
    pub now: Timestamp,
}

impl TxContext {
    /// Creates a context.
    #[must_use]
    pub const fn new(sender: Address, now: Timestamp) -> Self {
        Self { sender, now }
    }

    /// Rejects the call once `now` is past `deadline`.
    ///
    /// # Errors
    ///
    /// [`AmmError::Expired`] if `now > deadline`.
    pub fn ensure_before(&self, deadline: Timestamp) -> Result<(), AmmError> {
        if self.now > deadline {
            return Err(AmmError::Expired {
                deadline,
                now: self.now,
            });
        }
        Ok(())
    }
}
