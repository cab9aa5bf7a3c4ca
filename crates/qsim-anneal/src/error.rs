//! Error types for the annealer.

use thiserror::Error;

/// Errors raised while parsing or solving a QUBO problem.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum AnnealError {
    /// A coefficient key or weight is malformed.
    #[error("Invalid coefficient '{key}': {reason}")]
    Parse {
        /// The offending key.
        key: String,
        /// What is wrong with it.
        reason: String,
    },

    /// `numReads` must be positive.
    #[error("Number of reads must be positive, got {0}")]
    InvalidReads(u32),

    /// Schedule parameters out of range.
    #[error("Invalid annealing schedule: {0}")]
    InvalidSchedule(String),

    /// No coefficients at all.
    #[error("QUBO problem has no variables")]
    EmptyProblem,
}

/// Result type for annealer operations.
pub type AnnealResult<T> = Result<T, AnnealError>;
