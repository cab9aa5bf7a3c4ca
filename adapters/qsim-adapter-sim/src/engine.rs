//! Gate-by-gate evolution of a state vector.

use std::time::{Duration, Instant};

use qsim_hal::{HalError, HalResult};
use qsim_ir::Circuit;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::statevector::StateVector;

/// Allowed deviation of `Σ|amplitude|²` from its expected value.
pub const NORM_TOLERANCE: f64 = 1e-9;

/// Default qubit ceiling.
pub const DEFAULT_MAX_QUBITS: u32 = 20;

/// Hard ceiling on any configured width; `2^30` amplitudes is 16 GiB.
pub const MAX_SUPPORTED_QUBITS: u32 = 30;

/// What to do when the state's norm leaves `1 ± NORM_TOLERANCE`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormPolicy {
    /// Abort with [`HalError::NumericalInstability`].
    Strict,
    /// Renormalize and log a warning.
    #[default]
    Relaxed,
}

/// Engine limits.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Widest circuit the engine will allocate for.
    pub max_qubits: u32,
    /// Norm drift handling.
    pub norm_policy: NormPolicy,
    /// Wall-clock budget, checked between gates.
    pub max_duration: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_qubits: DEFAULT_MAX_QUBITS,
            norm_policy: NormPolicy::default(),
            max_duration: None,
        }
    }
}

/// Final state plus what happened on the way there.
#[derive(Debug, Clone)]
pub struct Evolution {
    /// State after the last gate.
    pub state: StateVector,
    /// Number of gates applied.
    pub gates_applied: usize,
    /// Largest `|1 − Σ|amplitude|²|` seen after any gate.
    pub max_drift: f64,
    /// How many times the state was renormalized.
    pub renormalizations: usize,
}

impl Evolution {
    /// `1 − max_drift`, clamped to `[0, 1]`.
    pub fn fidelity(&self) -> f64 {
        (1.0 - self.max_drift).clamp(0.0, 1.0)
    }
}

/// Stateless state-vector engine; reentrant across executions.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Create an engine.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// The engine's limits.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The configured ceiling, capped at [`MAX_SUPPORTED_QUBITS`].
    pub fn max_qubits(&self) -> u32 {
        self.config.max_qubits.min(MAX_SUPPORTED_QUBITS)
    }

    /// Fail fast if `circuit` is wider than the effective ceiling.
    pub fn check_resources(&self, circuit: &Circuit) -> HalResult<()> {
        let max = self.max_qubits();
        if circuit.num_qubits() > max {
            return Err(HalError::ResourceLimit {
                requested: circuit.num_qubits(),
                max,
            });
        }
        Ok(())
    }

    /// Allocate `|0…0⟩` and apply every gate of `circuit` in order.
    pub fn execute(&self, circuit: &Circuit) -> HalResult<Evolution> {
        self.check_resources(circuit)?;
        self.evolve(StateVector::new(circuit.num_qubits()), circuit)
    }

    /// Apply every gate of `circuit` to `state`.
    pub fn evolve(&self, mut state: StateVector, circuit: &Circuit) -> HalResult<Evolution> {
        if state.num_qubits() != circuit.num_qubits() {
            return Err(HalError::Backend(format!(
                "state has {} qubits, circuit has {}",
                state.num_qubits(),
                circuit.num_qubits()
            )));
        }

        let start = Instant::now();
        let mut max_drift = 0.0f64;
        let mut renormalizations = 0;

        for (index, gate) in circuit.gates().iter().enumerate() {
            if let Some(limit) = self.config.max_duration {
                if index > 0 && start.elapsed() > limit {
                    return Err(HalError::DeadlineExceeded {
                        limit_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                        gates_applied: index,
                    });
                }
            }

            let before = state.norm_sqr();
            state.apply(gate)?;
            let after = state.norm_sqr();
            debug_assert!(
                (after - before).abs() < NORM_TOLERANCE,
                "gate {index} ({}) changed the norm from {before} to {after}",
                gate.name()
            );

            let drift = (after - 1.0).abs();
            max_drift = max_drift.max(drift);
            if drift > NORM_TOLERANCE {
                match self.config.norm_policy {
                    NormPolicy::Strict => {
                        return Err(HalError::NumericalInstability {
                            gate_index: index,
                            gate_name: gate.name().to_string(),
                            drift,
                        });
                    }
                    NormPolicy::Relaxed => {
                        warn!(
                            gate_index = index,
                            gate = gate.name(),
                            drift,
                            "state norm drifted, renormalizing"
                        );
                        state.renormalize();
                        renormalizations += 1;
                    }
                }
            }
        }

        debug!(
            circuit_id = circuit.id(),
            num_qubits = circuit.num_qubits(),
            gates = circuit.depth(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "state evolution finished"
        );

        Ok(Evolution {
            state,
            gates_applied: circuit.depth(),
            max_drift,
            renormalizations,
        })
    }
}
