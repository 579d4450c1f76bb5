//! Error types for the freqcache library.
//!
//! The cache operations themselves never fail for valid inputs: a miss is an
//! ordinary `None`, capacity 0 is a supported "cache disabled" configuration,
//! and eviction is internal. The one error type here backs the structural
//! validators (`check_invariants`) used by tests and debugging.

use std::fmt;

/// Error returned when internal cache invariants are violated.
///
/// Produced by `check_invariants` on [`FrequencyLedger`] and [`LfuCache`].
/// Carries a human-readable description of which invariant failed.
///
/// [`FrequencyLedger`]: crate::ds::FrequencyLedger
/// [`LfuCache`]: crate::policy::lfu::LfuCache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}
