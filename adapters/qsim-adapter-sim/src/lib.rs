//! qsim Local State-Vector Simulator
//!
//! Exact simulation of gate circuits over a dense amplitude buffer, followed
//! by end-of-circuit sampling of every qubit.
//!
//! # Components
//!
//! - [`StateVector`]: interleaved `f64` amplitude buffer and gate kernels
//! - [`Engine`]: applies a circuit gate by gate, enforcing the qubit
//!   ceiling, the norm policy and an optional deadline
//! - [`Sampler`]: draws shots from the final state into a histogram
//! - [`SimulatorBackend`]: the [`qsim_hal::Backend`] implementation, with a
//!   registry of circuits that can be executed by id
//!
//! # Performance
//!
//! | Qubits | Memory | Simulation Speed |
//! |--------|--------|------------------|
//! | 10 | ~16 KB | Instant |
//! | 15 | ~512 KB | Fast |
//! | 20 | ~16 MB | Moderate |
//! | 25 | ~512 MB | Slow |
//!
//! The default ceiling is 20 qubits; wider circuits fail with
//! [`qsim_hal::HalError::ResourceLimit`] before anything is allocated.
//!
//! # Example
//!
//! ```ignore
//! use qsim_adapter_sim::SimulatorBackend;
//! use qsim_hal::{Backend, ExecutionOptions};
//! use qsim_ir::Circuit;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SimulatorBackend::new();
//!     println!("Max qubits: {}", backend.capabilities().max_qubits);
//!
//!     let circuit = Circuit::bell()?;
//!     let result = backend.run(&circuit, &ExecutionOptions::with_shots(1000)).await?;
//!
//!     // Expect ~50% |00⟩ and ~50% |11⟩
//!     println!("Results: {:?}", result.counts);
//!     Ok(())
//! }
//! ```

pub mod engine;
pub mod sampler;
mod simulator;
pub mod statevector;

pub use engine::{Engine, EngineConfig, Evolution, MAX_SUPPORTED_QUBITS, NormPolicy};
pub use sampler::{BitOrder, Sampler};
pub use simulator::{DEFAULT_MAX_SHOTS, SimulatorBackend, SimulatorConfig};
pub use statevector::StateVector;
