//! Backend capability introspection.

use qsim_ir::StandardGate;
use serde::{Deserialize, Serialize};

/// Static description of what a backend can run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Widest circuit the backend accepts.
    pub max_qubits: u32,
    /// Supported gate kinds, by wire name.
    pub gate_set: Vec<String>,
    /// Maximum number of shots per run.
    pub max_shots: u32,
    /// Whether this is a simulator.
    pub is_simulator: bool,
    /// Average gate fidelity; 1.0 for an ideal simulator.
    pub gate_fidelity: f64,
    /// Additional capability flags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl Capabilities {
    /// Create capabilities for the state-vector simulator.
    pub fn simulator(max_qubits: u32, max_shots: u32) -> Self {
        Self {
            name: "simulator".into(),
            max_qubits,
            gate_set: StandardGate::ALL
                .iter()
                .map(|g| g.name().to_string())
                .collect(),
            max_shots,
            is_simulator: true,
            gate_fidelity: 1.0,
            features: vec!["statevector".into(), "seeded_sampling".into()],
        }
    }

    /// Check whether a gate name is in the supported set.
    pub fn supports_gate(&self, name: &str) -> bool {
        self.gate_set.iter().any(|g| g.eq_ignore_ascii_case(name))
    }
}
