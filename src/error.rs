//! Error type shared by posterior models, policies and harnesses.

use thiserror::Error;

/// Errors raised by `banditry`.
///
/// Sampling is infallible; only state mutation and construction can fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BanditError {
    /// An observation fell outside the support of the posterior family
    /// (e.g. a Beta-Binomial arm was trained with something other than 0 or 1).
    #[error("invalid observation {value} for {family} model")]
    InvalidObservation { family: &'static str, value: f64 },

    /// The policy variant has no notion of the requested capability.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    /// A caller-supplied argument was out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BanditError>;

impl BanditError {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
