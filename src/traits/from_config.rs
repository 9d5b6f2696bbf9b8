//! Construction of runtime state from a validated configuration.
//!
//! [`FromConfig`] gives registries one uniform way to turn a parameter
//! struct into a live object:
//!
//! ```text
//! PairConfig => Pair::from_config(&cfg)
//! ```
//!
//! There is no blanket implementation; every pairing is written out so its
//! validation is specific to the type being built.

use crate::error::AmmError;

/// Builds `Self` from a configuration of type `C`.
///
/// Implementations re-run the configuration's validation, so a value built
/// through this trait always starts in a valid state even if the config was
/// deserialized rather than constructed through its checked constructor.
///
/// # Errors
///
/// Returns [`AmmError::InvalidConfiguration`] (or a more specific variant
/// such as [`AmmError::InvalidFee`]) if the configuration is invalid.
pub trait FromConfig<C> {
    /// Creates a new instance from `config`.
    ///
    /// # Errors
    ///
    /// See the trait documentation.
    fn from_config(config: &C) -> Result<Self, AmmError>
    where
        Self: Sized;
}
