//! qsim Circuit Description
//!
//! This crate provides the immutable description of a gate-based quantum
//! circuit consumed by the qsim simulator. It contains no execution logic.
//!
//! # Core Components
//!
//! - **Qubits**: [`QubitId`]
//! - **Gates**: [`StandardGate`] for the supported gate kinds, [`GateKind`]
//!   (standard or unrecognized name) and [`Gate`] combining a kind with its
//!   operands and optional angle
//! - **Circuit**: [`Circuit`] builder that validates every gate as it is added
//! - **Wire form**: [`CircuitSpec`], the serde representation of a submission
//! - **Hamiltonians**: [`PauliSum`] of [`PauliTerm`]s, input to
//!   [`Circuit::trotter`]
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qsim_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell_state", 2, 2).unwrap();
//!
//! // |00⟩ → (|00⟩ + |11⟩)/√2
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.measure_all().unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.depth(), 3);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Parameter | Description |
//! |------|--------|-----------|-------------|
//! | `H` | 1 | – | Hadamard gate |
//! | `X`, `Y`, `Z` | 1 | – | Pauli gates |
//! | `RX`, `RY`, `RZ` | 1 | θ | Rotation gates |
//! | `CNOT` | 2 | – | Controlled-NOT, `[control, target]` |
//! | `CZ` | 2 | – | Controlled-Z |
//! | `ZZ` | 2 | θ | Phase `+θ` on equal bits, `−θ` otherwise |
//! | `TOFFOLI` | 3 | – | Doubly-controlled NOT |
//! | `MCZ` | ≥2 | – | Multi-controlled Z |
//! | `MEASURE` | ≥1 | – | End-of-circuit measurement marker |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod library;
pub mod pauli;
pub mod qubit;

pub use circuit::{Circuit, CircuitSpec};
pub use error::{IrError, IrResult};
pub use gate::{Arity, Gate, GateKind, StandardGate};
pub use pauli::{Pauli, PauliSum, PauliTerm};
pub use qubit::QubitId;
