//! Crate error taxonomy.
//!
//! Only two conditions are fatal to a call: a structural contract violation
//! ([`Error::InvalidInput`]) and the exhaustion of every matrix strategy
//! ([`Error::MatrixUnavailable`]). Stop-level infeasibility is never an
//! error — the solver resolves it by dropping the stop at a penalty.

use thiserror::Error;

/// Errors surfaced by the routing core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A structural contract violation in the inputs: mismatched matrix
    /// dimensions, negative demand or capacity, an empty fleet with stops
    /// present, or an out-of-range configuration value.
    ///
    /// Never silently repaired; the call fails.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Every configured matrix strategy failed. The haversine fallback is
    /// infallible in practice, so this is a defensive signal rather than an
    /// expected condition.
    #[error("no cost matrix strategy produced a result")]
    MatrixUnavailable,
}

impl Error {
    /// Shorthand for an [`Error::InvalidInput`] with a formatted message.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
