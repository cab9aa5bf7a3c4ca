//! Property-based tests for circuit validation.
//!
//! Every gate accepted by `add_gate` must reference in-range, distinct
//! qubits with the operand count its kind requires; the JSON wire form must
//! rebuild the same circuit.

use proptest::prelude::*;
use qsim_ir::{Circuit, CircuitSpec, Gate, QubitId, StandardGate};

/// Random gate over a register that may be wider than the circuit, so that
/// some operands fall out of range.
fn arb_gate(max_index: u32) -> impl Strategy<Value = Gate> {
    let kind = prop::sample::select(StandardGate::ALL.to_vec());
    (
        kind,
        prop::collection::vec(0..max_index, 0..5),
        prop::option::of(-10.0f64..10.0),
    )
        .prop_map(|(kind, qubits, parameter)| Gate {
            kind: kind.into(),
            qubits: qubits.into_iter().map(QubitId).collect(),
            parameter,
        })
}

proptest! {
    #[test]
    fn accepted_gates_satisfy_invariants(
        num_qubits in 1u32..=5,
        gates in prop::collection::vec(arb_gate(7), 1..20),
    ) {
        let mut circuit = Circuit::with_size("prop", num_qubits, 0).unwrap();
        for gate in gates {
            let _ = circuit.add_gate(gate);
        }

        for gate in circuit.gates() {
            prop_assert!(gate.kind.arity().accepts(gate.qubits.len()));
            for (i, q) in gate.qubits.iter().enumerate() {
                prop_assert!(q.0 < num_qubits);
                prop_assert!(!gate.qubits[..i].contains(q));
            }
            if gate.kind.as_standard().is_some_and(|g| g.is_parameterized()) {
                prop_assert!(gate.parameter.is_some());
            }
        }
    }

    #[test]
    fn json_wire_form_rebuilds_circuit(
        num_qubits in 1u32..=4,
        gates in prop::collection::vec(arb_gate(4), 1..15),
    ) {
        let mut circuit = Circuit::with_size("prop", num_qubits, num_qubits).unwrap();
        for gate in gates {
            let _ = circuit.add_gate(gate);
        }

        let json = serde_json::to_string(&circuit.to_spec()).unwrap();
        let spec: CircuitSpec = serde_json::from_str(&json).unwrap();
        let rebuilt = Circuit::from_spec(spec).unwrap();

        prop_assert_eq!(rebuilt.depth(), circuit.depth());
        prop_assert_eq!(rebuilt.id(), circuit.id());
        for (a, b) in rebuilt.gates().iter().zip(circuit.gates()) {
            prop_assert_eq!(&a.kind, &b.kind);
            prop_assert_eq!(&a.qubits, &b.qubits);
            match (a.parameter, b.parameter) {
                (Some(x), Some(y)) => prop_assert!((x - y).abs() < 1e-12),
                (x, y) => prop_assert_eq!(x, y),
            }
        }
    }
}
