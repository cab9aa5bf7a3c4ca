//! Quantum gate types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::qubit::QubitId;

/// Standard gates with known semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardGate {
    /// Hadamard gate.
    H,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Rotation around X axis.
    Rx,
    /// Rotation around Y axis.
    Ry,
    /// Rotation around Z axis.
    Rz,
    /// Controlled-X (CNOT) gate. Operands: `[control, target]`.
    CX,
    /// Controlled-Z gate.
    CZ,
    /// ZZ phase interaction. Operands: `[q1, q2]`, parameter `θ`.
    ZZ,
    /// Toffoli gate. Operands: `[control1, control2, target]`.
    CCX,
    /// Multi-controlled Z over every listed qubit.
    MCZ,
    /// Measurement marker, resolved at the end of the circuit.
    Measure,
}

/// Operand-count requirement of a gate kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many qubits.
    Exactly(usize),
    /// This many qubits or more.
    AtLeast(usize),
}

impl Arity {
    /// Check whether `n` operands satisfy this requirement.
    #[inline]
    pub fn accepts(self, n: usize) -> bool {
        match self {
            Arity::Exactly(k) => n == k,
            Arity::AtLeast(k) => n >= k,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(k) => write!(f, "{k}"),
            Arity::AtLeast(k) => write!(f, "at least {k}"),
        }
    }
}

impl StandardGate {
    /// Every standard gate, in declaration order.
    pub const ALL: [StandardGate; 13] = [
        StandardGate::H,
        StandardGate::X,
        StandardGate::Y,
        StandardGate::Z,
        StandardGate::Rx,
        StandardGate::Ry,
        StandardGate::Rz,
        StandardGate::CX,
        StandardGate::CZ,
        StandardGate::ZZ,
        StandardGate::CCX,
        StandardGate::MCZ,
        StandardGate::Measure,
    ];

    /// Canonical wire name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::H => "H",
            StandardGate::X => "X",
            StandardGate::Y => "Y",
            StandardGate::Z => "Z",
            StandardGate::Rx => "RX",
            StandardGate::Ry => "RY",
            StandardGate::Rz => "RZ",
            StandardGate::CX => "CNOT",
            StandardGate::CZ => "CZ",
            StandardGate::ZZ => "ZZ",
            StandardGate::CCX => "TOFFOLI",
            StandardGate::MCZ => "MCZ",
            StandardGate::Measure => "MEASURE",
        }
    }

    /// Look up a gate by name, case-insensitively. `CX` and `CCX` are
    /// accepted as aliases of `CNOT` and `TOFFOLI`.
    pub fn from_name(name: &str) -> Option<Self> {
        let gate = match name.trim().to_ascii_uppercase().as_str() {
            "H" => StandardGate::H,
            "X" => StandardGate::X,
            "Y" => StandardGate::Y,
            "Z" => StandardGate::Z,
            "RX" => StandardGate::Rx,
            "RY" => StandardGate::Ry,
            "RZ" => StandardGate::Rz,
            "CNOT" | "CX" => StandardGate::CX,
            "CZ" => StandardGate::CZ,
            "ZZ" => StandardGate::ZZ,
            "TOFFOLI" | "CCX" => StandardGate::CCX,
            "MCZ" => StandardGate::MCZ,
            "MEASURE" => StandardGate::Measure,
            _ => return None,
        };
        Some(gate)
    }

    /// Number of qubits this gate operates on.
    #[inline]
    pub fn arity(&self) -> Arity {
        match self {
            StandardGate::H
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::Rx
            | StandardGate::Ry
            | StandardGate::Rz => Arity::Exactly(1),

            StandardGate::CX | StandardGate::CZ | StandardGate::ZZ => Arity::Exactly(2),

            StandardGate::CCX => Arity::Exactly(3),

            StandardGate::MCZ => Arity::AtLeast(2),
            StandardGate::Measure => Arity::AtLeast(1),
        }
    }

    /// Check if this gate takes an angle.
    pub fn is_parameterized(&self) -> bool {
        matches!(
            self,
            StandardGate::Rx | StandardGate::Ry | StandardGate::Rz | StandardGate::ZZ
        )
    }
}

impl fmt::Display for StandardGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The kind of a gate: either one of the standard gates or an unrecognized
/// name carried through to the executor.
///
/// Custom kinds are allowed in a circuit description so that submissions
/// round-trip, but no simulator kernel exists for them; execution fails
/// with an unsupported-gate error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GateKind {
    /// A standard gate with known semantics.
    Standard(StandardGate),
    /// A gate name with no known semantics.
    Custom(String),
}

impl GateKind {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            GateKind::Standard(g) => g.name(),
            GateKind::Custom(name) => name,
        }
    }

    /// Operand requirement. Custom gates accept any non-empty operand list.
    pub fn arity(&self) -> Arity {
        match self {
            GateKind::Standard(g) => g.arity(),
            GateKind::Custom(_) => Arity::AtLeast(1),
        }
    }

    /// The standard gate, if this is one.
    pub fn as_standard(&self) -> Option<StandardGate> {
        match self {
            GateKind::Standard(g) => Some(*g),
            GateKind::Custom(_) => None,
        }
    }
}

impl From<StandardGate> for GateKind {
    fn from(gate: StandardGate) -> Self {
        GateKind::Standard(gate)
    }
}

impl From<String> for GateKind {
    fn from(name: String) -> Self {
        match StandardGate::from_name(&name) {
            Some(gate) => GateKind::Standard(gate),
            None => GateKind::Custom(name),
        }
    }
}

impl From<&str> for GateKind {
    fn from(name: &str) -> Self {
        GateKind::from(name.to_string())
    }
}

impl From<GateKind> for String {
    fn from(kind: GateKind) -> Self {
        match kind {
            GateKind::Standard(g) => g.name().to_string(),
            GateKind::Custom(name) => name,
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A gate applied to an ordered list of qubits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// The kind of gate.
    pub kind: GateKind,
    /// Operands, in the order the kind defines (controls before target).
    pub qubits: Vec<QubitId>,
    /// Rotation angle for parameterized kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<f64>,
}

impl Gate {
    /// Create a gate without a parameter.
    pub fn new(kind: impl Into<GateKind>, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: kind.into(),
            qubits: qubits.into_iter().collect(),
            parameter: None,
        }
    }

    /// Create a parameterized gate.
    pub fn with_parameter(
        kind: impl Into<GateKind>,
        qubits: impl IntoIterator<Item = QubitId>,
        theta: f64,
    ) -> Self {
        Self {
            parameter: Some(theta),
            ..Self::new(kind, qubits)
        }
    }

    /// Get the name of this gate.
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// The angle of a parameterized gate, or an error if it is absent.
    pub fn angle(&self) -> IrResult<f64> {
        self.parameter
            .ok_or_else(|| IrError::MissingParameter(self.name().to_string()))
    }

    /// Check the gate in isolation against a circuit width.
    ///
    /// Operand count, index range, operand uniqueness and parameter
    /// presence are checked; nothing about the circuit's state is.
    pub fn validate(&self, num_qubits: u32) -> IrResult<()> {
        let arity = self.kind.arity();
        if !arity.accepts(self.qubits.len()) {
            return Err(IrError::QubitCountMismatch {
                gate_name: self.name().to_string(),
                expected: arity.to_string(),
                got: self.qubits.len(),
            });
        }

        for (pos, &qubit) in self.qubits.iter().enumerate() {
            if qubit.0 >= num_qubits {
                return Err(IrError::QubitOutOfRange {
                    qubit,
                    num_qubits,
                    gate_name: self.name().to_string(),
                });
            }
            if self.qubits[..pos].contains(&qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: self.name().to_string(),
                });
            }
        }

        if let Some(gate) = self.kind.as_standard() {
            if gate.is_parameterized() {
                let theta = self.angle()?;
                if !theta.is_finite() {
                    return Err(IrError::NonFiniteParameter {
                        gate_name: self.name().to_string(),
                        value: theta,
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_standard_gate_properties() {
        assert_eq!(StandardGate::H.arity(), Arity::Exactly(1));
        assert_eq!(StandardGate::CX.arity(), Arity::Exactly(2));
        assert_eq!(StandardGate::CCX.arity(), Arity::Exactly(3));
        assert_eq!(StandardGate::MCZ.arity(), Arity::AtLeast(2));

        assert!(!StandardGate::H.is_parameterized());
        assert!(StandardGate::Rx.is_parameterized());
        assert!(StandardGate::ZZ.is_parameterized());
    }

    #[test]
    fn test_name_lookup_is_case_insensitive() {
        assert_eq!(StandardGate::from_name("cnot"), Some(StandardGate::CX));
        assert_eq!(StandardGate::from_name("CX"), Some(StandardGate::CX));
        assert_eq!(StandardGate::from_name("Toffoli"), Some(StandardGate::CCX));
        assert_eq!(StandardGate::from_name("rz"), Some(StandardGate::Rz));
        assert_eq!(StandardGate::from_name("SWAP"), None);

        for gate in StandardGate::ALL {
            assert_eq!(StandardGate::from_name(gate.name()), Some(gate));
        }
    }

    #[test]
    fn test_unknown_kind_is_custom() {
        assert_eq!(GateKind::from("swap"), GateKind::Custom("swap".into()));
        assert_eq!(GateKind::from("h"), GateKind::Standard(StandardGate::H));
    }

    #[test]
    fn test_validate_operand_count() {
        let err = Gate::new(StandardGate::CX, [QubitId(0)]).validate(2).unwrap_err();
        assert!(matches!(err, IrError::QubitCountMismatch { got: 1, .. }));

        let err = Gate::new(StandardGate::MCZ, [QubitId(0)]).validate(2).unwrap_err();
        assert!(matches!(err, IrError::QubitCountMismatch { .. }));

        assert!(Gate::new(StandardGate::MCZ, [QubitId(0), QubitId(1), QubitId(2)])
            .validate(3)
            .is_ok());
    }

    #[test]
    fn test_validate_range_and_duplicates() {
        let err = Gate::new(StandardGate::H, [QubitId(2)]).validate(2).unwrap_err();
        assert!(matches!(err, IrError::QubitOutOfRange { num_qubits: 2, .. }));

        let err = Gate::new(StandardGate::CZ, [QubitId(1), QubitId(1)])
            .validate(2)
            .unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { .. }));
    }

    #[test]
    fn test_validate_parameter() {
        let err = Gate::new(StandardGate::Rx, [QubitId(0)]).validate(1).unwrap_err();
        assert_eq!(err, IrError::MissingParameter("RX".into()));

        let err = Gate::with_parameter(StandardGate::Ry, [QubitId(0)], f64::NAN)
            .validate(1)
            .unwrap_err();
        assert!(matches!(err, IrError::NonFiniteParameter { .. }));

        assert!(Gate::with_parameter(StandardGate::Rz, [QubitId(0)], PI)
            .validate(1)
            .is_ok());
    }

    #[test]
    fn test_gate_serde_wire_form() {
        let gate = Gate::with_parameter(StandardGate::ZZ, [QubitId(0), QubitId(1)], 0.5);
        let json = serde_json::to_value(&gate).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "ZZ", "qubits": [0, 1], "parameter": 0.5})
        );

        let parsed: Gate = serde_json::from_str(r#"{"kind":"cnot","qubits":[1,0]}"#).unwrap();
        assert_eq!(parsed.kind, GateKind::Standard(StandardGate::CX));
        assert_eq!(parsed.qubits, vec![QubitId(1), QubitId(0)]);
        assert_eq!(parsed.parameter, None);
    }
}
