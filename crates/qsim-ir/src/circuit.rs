//! High-level circuit builder API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, GateKind, StandardGate};
use crate::qubit::QubitId;

/// A quantum circuit: a fixed register width and an ordered gate list.
///
/// Every gate is validated as it is added, so a `Circuit` value is always
/// well formed. Executors borrow it immutably and may run it any number of
/// times.
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    /// Identifier used by circuit registries.
    id: String,
    /// Name of the circuit.
    name: String,
    /// Number of qubits.
    num_qubits: u32,
    /// Number of classical bits.
    num_clbits: u32,
    /// Gates in application order.
    gates: Vec<Gate>,
}

impl Circuit {
    /// Create an empty circuit with a given number of qubits and classical bits.
    ///
    /// The circuit receives a fresh UUID v4 id.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> IrResult<Self> {
        if num_qubits == 0 {
            return Err(IrError::NoQubits);
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            num_qubits,
            num_clbits,
            gates: vec![],
        })
    }

    /// Replace the generated id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Validate and append a gate.
    pub fn add_gate(&mut self, gate: Gate) -> IrResult<&mut Self> {
        gate.validate(self.num_qubits)?;
        self.gates.push(gate);
        Ok(self)
    }

    fn push(&mut self, gate: StandardGate, qubits: &[QubitId]) -> IrResult<&mut Self> {
        self.add_gate(Gate::new(gate, qubits.iter().copied()))
    }

    fn push_rotation(
        &mut self,
        gate: StandardGate,
        qubits: &[QubitId],
        theta: f64,
    ) -> IrResult<&mut Self> {
        self.add_gate(Gate::with_parameter(gate, qubits.iter().copied(), theta))
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(StandardGate::H, &[qubit])
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(StandardGate::X, &[qubit])
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(StandardGate::Y, &[qubit])
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(StandardGate::Z, &[qubit])
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_rotation(StandardGate::Rx, &[qubit], theta)
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_rotation(StandardGate::Ry, &[qubit], theta)
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_rotation(StandardGate::Rz, &[qubit], theta)
    }

    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(StandardGate::CX, &[control, target])
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.push(StandardGate::CZ, &[q1, q2])
    }

    /// Apply ZZ phase interaction.
    pub fn zz(&mut self, theta: f64, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.push_rotation(StandardGate::ZZ, &[q1, q2], theta)
    }

    /// Apply Toffoli (CCX) gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(StandardGate::CCX, &[c1, c2, target])
    }

    /// Apply a multi-controlled Z over all given qubits.
    pub fn mcz(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.add_gate(Gate::new(StandardGate::MCZ, qubits))
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Apply a gate by kind name. Unknown names become custom gates.
    pub fn gate(
        &mut self,
        kind: impl Into<GateKind>,
        qubits: impl IntoIterator<Item = QubitId>,
        parameter: Option<f64>,
    ) -> IrResult<&mut Self> {
        let mut gate = Gate::new(kind, qubits);
        gate.parameter = parameter;
        self.add_gate(gate)
    }

    /// Mark a qubit for measurement.
    pub fn measure(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(StandardGate::Measure, &[qubit])
    }

    /// Mark all qubits for measurement, growing the classical register to
    /// match the qubit count if needed.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        self.num_clbits = self.num_clbits.max(self.num_qubits);
        let qubits: Vec<_> = self.qubit_ids().collect();
        self.add_gate(Gate::new(StandardGate::Measure, qubits))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> u32 {
        self.num_clbits
    }

    /// Get the gates in application order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Circuit depth, counted as the number of gates.
    pub fn depth(&self) -> usize {
        self.gates.len()
    }

    /// Check whether the circuit contains any measurement marker.
    pub fn has_measurements(&self) -> bool {
        self.gates
            .iter()
            .any(|g| g.kind == GateKind::Standard(StandardGate::Measure))
    }

    /// Iterate over all qubit ids of the register.
    pub fn qubit_ids(&self) -> impl Iterator<Item = QubitId> + use<> {
        (0..self.num_qubits).map(QubitId)
    }

    // =========================================================================
    // Wire form
    // =========================================================================

    /// Build a circuit from its submission form, validating every gate.
    pub fn from_spec(spec: CircuitSpec) -> IrResult<Self> {
        let mut circuit = Self::with_size(
            spec.name.unwrap_or_else(|| "circuit".into()),
            spec.num_qubits,
            spec.num_classical_bits,
        )?;
        if let Some(id) = spec.id {
            circuit.id = id;
        }
        for gate in spec.gates {
            circuit.add_gate(gate)?;
        }
        Ok(circuit)
    }

    /// Convert to the submission form.
    pub fn to_spec(&self) -> CircuitSpec {
        CircuitSpec {
            id: Some(self.id.clone()),
            name: Some(self.name.clone()),
            num_qubits: self.num_qubits,
            num_classical_bits: self.num_clbits,
            gates: self.gates.clone(),
        }
    }
}

/// Serialized circuit submission.
///
/// ```json
/// { "numQubits": 2, "numClassicalBits": 2,
///   "gates": [ {"kind": "H", "qubits": [0]}, {"kind": "CNOT", "qubits": [0, 1]} ] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitSpec {
    /// Optional caller-chosen id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Register width.
    pub num_qubits: u32,
    /// Classical register width.
    #[serde(default)]
    pub num_classical_bits: u32,
    /// Gates in application order.
    #[serde(default)]
    pub gates: Vec<Gate>,
}

impl TryFrom<CircuitSpec> for Circuit {
    type Error = IrError;

    fn try_from(spec: CircuitSpec) -> IrResult<Self> {
        Circuit::from_spec(spec)
    }
}
