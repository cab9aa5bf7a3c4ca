//! qsim QUBO Annealer
//!
//! A classical simulated-annealing solver for quadratic unconstrained
//! binary optimization. It stands in for annealing hardware and makes no
//! claim of quantum speedup; it never touches the state-vector simulator.
//!
//! # Example
//!
//! ```rust
//! use qsim_anneal::{QuboProblem, SimulatedAnnealer, AnnealerConfig};
//!
//! let problem = QuboProblem::from_coefficients([("x0", -1.0), ("x1", 0.5), ("x0,x1", 2.0)]).unwrap();
//! let annealer = SimulatedAnnealer::new(AnnealerConfig { seed: Some(7), ..Default::default() });
//! let result = annealer.anneal(&problem, 10, 20.0).unwrap();
//!
//! assert_eq!(result.lowest_energy, -1.0);
//! assert_eq!(result.best_solution["x0"], 1);
//! assert_eq!(result.best_solution["x1"], 0);
//! ```

pub mod annealer;
pub mod error;
pub mod qubo;

pub use annealer::{
    AnnealSchedule, AnnealerConfig, AnnealingResult, QuboSubmission, SimulatedAnnealer,
};
pub use error::{AnnealError, AnnealResult};
pub use qubo::QuboProblem;
