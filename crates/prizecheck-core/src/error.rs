//! Engine error types.
//!
//! The engines are total over well-typed input, so the taxonomy is small:
//! a deck too short to deal from, and tier names that do not parse.

use thiserror::Error;

/// Errors raised by the core engines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The card list cannot fill both the hand and the prize slices.
    #[error("not enough cards to deal: need at least {required}, got {actual}")]
    InsufficientCards { required: usize, actual: usize },

    /// A tier name did not match any known tier.
    #[error("unknown tier: {0}")]
    UnknownTier(String),
}

impl CoreError {
    /// Returns `true` if the error comes from a deck that is too small.
    pub fn is_insufficient_cards(&self) -> bool {
        matches!(self, CoreError::InsufficientCards { .. })
    }
}
