//! Errors returned by the statistics engine and the optimizer.

/// Everything that can go wrong while evaluating or optimizing a portfolio.
///
/// Every variant is terminal for the call that produced it; nothing is retried
/// and no partial result is returned.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    /// Malformed arguments: empty or mismatched lists, bad weights, unknown mode.
    #[error("{0}")]
    InvalidInput(String),

    /// Ticker not present in the instrument table.
    #[error("Unknown ticker: {0}")]
    UnknownInstrument(String),

    /// The grid search produced no usable candidate.
    #[error("no feasible solution: {0}")]
    NoFeasibleSolution(String),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
