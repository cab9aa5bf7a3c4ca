//! Execution options and request envelopes.

use qsim_ir::{Circuit, CircuitSpec};
use serde::{Deserialize, Serialize};

use crate::error::{HalError, HalResult};

/// Shots used when a request does not name a count.
pub const DEFAULT_SHOTS: u32 = 1024;

/// Per-run options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionOptions {
    /// Number of measurement draws. Must be positive.
    pub shots: u32,
    /// Accepted for interface compatibility; the simulator does not
    /// optimize circuits.
    #[serde(default)]
    pub optimization_level: u8,
    /// Preferred backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_name: Option<String>,
    /// Sampler seed. Overrides the backend's configured seed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            shots: DEFAULT_SHOTS,
            optimization_level: 0,
            backend_name: None,
            seed: None,
        }
    }
}

impl ExecutionOptions {
    /// Options with the given shot count.
    pub fn with_shots(shots: u32) -> Self {
        Self {
            shots,
            ..Self::default()
        }
    }

    /// Set the sampler seed.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the preferred backend.
    #[must_use]
    pub fn backend(mut self, name: impl Into<String>) -> Self {
        self.backend_name = Some(name.into());
        self
    }

    /// Reject a zero shot count or one above `max_shots`.
    pub fn validate(&self, max_shots: u32) -> HalResult<()> {
        if self.shots == 0 {
            return Err(HalError::InvalidShots("shots must be positive".into()));
        }
        if self.shots > max_shots {
            return Err(HalError::InvalidShots(format!(
                "{} shots requested, limit is {max_shots}",
                self.shots
            )));
        }
        Ok(())
    }
}

/// Which circuit a request refers to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CircuitSource {
    /// An inline circuit description.
    Inline {
        /// The circuit.
        circuit: CircuitSpec,
    },
    /// A circuit previously registered with the backend.
    Registered {
        /// Registry id.
        #[serde(rename = "circuitId")]
        circuit_id: String,
    },
}

/// Wire form of an execution request:
/// `{ circuit | circuitId, shots, backend?, seed? }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRequest {
    /// Circuit to run.
    #[serde(flatten)]
    pub source: CircuitSource,
    /// Number of shots.
    #[serde(default = "default_shots")]
    pub shots: u32,
    /// Preferred backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    /// Sampler seed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_shots() -> u32 {
    DEFAULT_SHOTS
}

impl ExecutionRequest {
    /// Request to run an inline circuit.
    pub fn inline(circuit: &Circuit, shots: u32) -> Self {
        Self {
            source: CircuitSource::Inline {
                circuit: circuit.to_spec(),
            },
            shots,
            backend: None,
            seed: None,
        }
    }

    /// Request to run a registered circuit.
    pub fn by_id(circuit_id: impl Into<String>, shots: u32) -> Self {
        Self {
            source: CircuitSource::Registered {
                circuit_id: circuit_id.into(),
            },
            shots,
            backend: None,
            seed: None,
        }
    }

    /// Execution options carried by this request.
    pub fn options(&self) -> ExecutionOptions {
        ExecutionOptions {
            shots: self.shots,
            optimization_level: 0,
            backend_name: self.backend.clone(),
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shot_validation() {
        assert!(ExecutionOptions::with_shots(10).validate(100).is_ok());
        assert!(matches!(
            ExecutionOptions::with_shots(0).validate(100),
            Err(HalError::InvalidShots(_))
        ));
        assert!(matches!(
            ExecutionOptions::with_shots(101).validate(100),
            Err(HalError::InvalidShots(_))
        ));
    }

    #[test]
    fn test_request_inline_wire_form() {
        let json = r#"{
            "circuit": {"numQubits": 1, "gates": [{"kind": "H", "qubits": [0]}]},
            "shots": 50,
            "seed": 7
        }"#;
        let request: ExecutionRequest = serde_json::from_str(json).unwrap();
        assert!(matches!(request.source, CircuitSource::Inline { .. }));
        let options = request.options();
        assert_eq!(options.shots, 50);
        assert_eq!(options.seed, Some(7));
    }

    #[test]
    fn test_request_by_id_wire_form() {
        let json = r#"{"circuitId": "abc", "backend": "simulator"}"#;
        let request: ExecutionRequest = serde_json::from_str(json).unwrap();
        match &request.source {
            CircuitSource::Registered { circuit_id } => assert_eq!(circuit_id, "abc"),
            other => panic!("unexpected source: {other:?}"),
        }
        assert_eq!(request.shots, DEFAULT_SHOTS);
        assert_eq!(request.options().backend_name.as_deref(), Some("simulator"));
    }
}
