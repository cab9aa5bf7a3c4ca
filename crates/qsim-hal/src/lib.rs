//! qsim Execution Contract
//!
//! Types shared by every qsim backend and by its callers:
//!
//! - [`Backend`] trait: validate a circuit, then run it asynchronously
//! - [`ExecutionOptions`] and the [`ExecutionRequest`] wire envelope
//! - [`ExecutionResult`] with its [`Counts`] histogram
//! - [`ExecutionState`] lifecycle (`Created → Ready → Executing → Completed | Failed`)
//! - [`Capabilities`] for introspection
//! - [`HalError`] for everything that can go wrong
//!
//! # Example
//!
//! ```ignore
//! use qsim_hal::{Backend, ExecutionOptions};
//! use qsim_adapter_sim::SimulatorBackend;
//! use qsim_ir::Circuit;
//!
//! let backend = SimulatorBackend::new();
//! let circuit = Circuit::bell()?;
//! let result = backend.run(&circuit, &ExecutionOptions::with_shots(1000).seed(7)).await?;
//! if let Some((bitstring, count)) = result.counts.most_frequent() {
//!     println!("Most frequent: {bitstring} ({count} times)");
//! }
//! ```

pub mod backend;
pub mod capability;
pub mod error;
pub mod job;
pub mod options;
pub mod result;

pub use backend::{Backend, BackendConfig, BackendFactory};
pub use capability::Capabilities;
pub use error::{HalError, HalResult};
pub use job::{Execution, ExecutionState};
pub use options::{CircuitSource, DEFAULT_SHOTS, ExecutionOptions, ExecutionRequest};
pub use result::{Counts, ExecutionResult};
