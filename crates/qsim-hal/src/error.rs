//! Error types for the HAL crate.

use qsim_ir::IrError;
use thiserror::Error;

/// Errors that can occur while validating or executing a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// The circuit description is invalid.
    #[error("Invalid circuit: {0}")]
    InvalidCircuit(#[from] IrError),

    /// The circuit contains a gate kind with no simulation kernel.
    #[error("Unsupported gate: {0}")]
    UnsupportedGate(String),

    /// Circuit exceeds the configured qubit ceiling.
    #[error("Circuit has {requested} qubits but the limit is {max}")]
    ResourceLimit {
        /// Qubits requested by the circuit.
        requested: u32,
        /// Configured ceiling.
        max: u32,
    },

    /// Invalid number of shots.
    #[error("Invalid shots: {0}")]
    InvalidShots(String),

    /// Probability mass drifted beyond tolerance in strict mode.
    #[error("Numerical instability after gate {gate_index} ({gate_name}): norm drift {drift:e}")]
    NumericalInstability {
        /// Position of the offending gate in the circuit.
        gate_index: usize,
        /// Name of the offending gate.
        gate_name: String,
        /// Absolute change of the squared norm.
        drift: f64,
    },

    /// Execution deadline passed between two gate applications.
    #[error("Deadline of {limit_ms} ms exceeded after {gates_applied} gates")]
    DeadlineExceeded {
        /// Configured deadline.
        limit_ms: u64,
        /// Gates completed before the check fired.
        gates_applied: usize,
    },

    /// No circuit registered under this id.
    #[error("Circuit not found: {0}")]
    CircuitNotFound(String),

    /// Illegal execution-state transition.
    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition {
        /// Current state.
        from: String,
        /// Requested state.
        to: String,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic backend error.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
