//! Error types for the IR crate.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors raised while building a circuit description.
///
/// Every variant means the circuit is invalid; they are all raised
/// synchronously by [`Circuit::add_gate`](crate::Circuit::add_gate) or the
/// constructors, never during execution.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum IrError {
    /// A circuit must have at least one qubit.
    #[error("Circuit must have at least one qubit")]
    NoQubits,

    /// Gate references a qubit outside `[0, num_qubits)`.
    #[error("Qubit {qubit} out of range for {num_qubits}-qubit circuit (gate: {gate_name})")]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// Width of the circuit.
        num_qubits: u32,
        /// Gate being added.
        gate_name: String,
    },

    /// Gate was given the wrong number of operands.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Human-readable operand requirement ("2", "at least 2").
        expected: String,
        /// Actual number of qubits provided.
        got: usize,
    },

    /// Duplicate qubit in one gate's operand list.
    #[error("Duplicate qubit {qubit} in operation (gate: {gate_name})")]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Gate being added.
        gate_name: String,
    },

    /// Rotation gate without an angle.
    #[error("Gate '{0}' requires a rotation parameter")]
    MissingParameter(String),

    /// Angle is NaN or infinite.
    #[error("Gate '{gate_name}' has non-finite parameter {value}")]
    NonFiniteParameter {
        /// Name of the gate.
        gate_name: String,
        /// The rejected value.
        value: f64,
    },

    /// A bitstring argument contained something other than `0`/`1`, or had
    /// the wrong width.
    #[error("Invalid bitstring '{0}'")]
    InvalidBitstring(String),

    /// A Pauli-sum Hamiltonian could not be parsed or is malformed.
    #[error("Invalid Hamiltonian: {0}")]
    InvalidHamiltonian(String),

    /// A library circuit factory was given inconsistent arguments.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
