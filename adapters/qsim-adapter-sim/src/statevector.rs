//! Amplitude buffer and gate kernels.
//!
//! Amplitudes are stored interleaved: basis state `i` occupies slots
//! `[2i, 2i + 1]` (real, imaginary). Kernels read both members of a pair
//! before writing either, so every update is computed from the unmodified
//! original pair.

use std::f64::consts::FRAC_1_SQRT_2;

use num_complex::Complex64;
use qsim_hal::{HalError, HalResult};
use qsim_ir::{Gate, GateKind, QubitId, StandardGate};

/// A 2×2 unitary, row-major.
type Matrix2 = [[Complex64; 2]; 2];

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// A pure quantum state over `num_qubits` qubits.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    data: Vec<f64>,
    num_qubits: u32,
}

impl StateVector {
    /// Allocate `|0…0⟩`.
    ///
    /// Callers bound `num_qubits` before calling; the buffer holds
    /// `2 · 2^num_qubits` doubles.
    pub fn new(num_qubits: u32) -> Self {
        let dim = 1usize << num_qubits;
        let mut data = vec![0.0; 2 * dim];
        data[0] = 1.0;
        Self { data, num_qubits }
    }

    /// Build a state from explicit amplitudes. The length must be a power
    /// of two; no normalization is applied.
    pub fn from_amplitudes(amplitudes: &[Complex64]) -> HalResult<Self> {
        let dim = amplitudes.len();
        if dim < 2 || !dim.is_power_of_two() {
            return Err(HalError::Backend(format!(
                "amplitude count {dim} is not a power of two"
            )));
        }
        let data = amplitudes.iter().flat_map(|c| [c.re, c.im]).collect();
        Ok(Self {
            data,
            num_qubits: dim.trailing_zeros(),
        })
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Number of basis states, `2^num_qubits`.
    pub fn dim(&self) -> usize {
        self.data.len() / 2
    }

    /// The raw interleaved buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Amplitude of basis state `index`.
    #[inline]
    pub fn amplitude(&self, index: usize) -> Complex64 {
        Complex64::new(self.data[2 * index], self.data[2 * index + 1])
    }

    #[inline]
    fn store(&mut self, index: usize, value: Complex64) {
        self.data[2 * index] = value.re;
        self.data[2 * index + 1] = value.im;
    }

    #[inline]
    fn swap_amplitudes(&mut self, i: usize, j: usize) {
        self.data.swap(2 * i, 2 * j);
        self.data.swap(2 * i + 1, 2 * j + 1);
    }

    #[inline]
    fn negate(&mut self, index: usize) {
        self.data[2 * index] = -self.data[2 * index];
        self.data[2 * index + 1] = -self.data[2 * index + 1];
    }

    /// `|amplitude_i|²` for every basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.data
            .chunks_exact(2)
            .map(|c| c[0] * c[0] + c[1] * c[1])
            .collect()
    }

    /// `Σ |amplitude_i|²`.
    pub fn norm_sqr(&self) -> f64 {
        self.data.iter().map(|x| x * x).sum()
    }

    /// Scale to unit norm. A zero state is left untouched.
    pub fn renormalize(&mut self) {
        let norm = self.norm_sqr().sqrt();
        if norm > 0.0 {
            for x in &mut self.data {
                *x /= norm;
            }
        }
    }

    /// Apply one gate.
    ///
    /// `MEASURE` leaves the amplitudes alone. A custom kind has no kernel
    /// and yields [`HalError::UnsupportedGate`]. Operands are checked
    /// against this state's width; a bad gate yields
    /// [`HalError::InvalidCircuit`] and leaves the state untouched.
    pub fn apply(&mut self, gate: &Gate) -> HalResult<()> {
        let standard = match &gate.kind {
            GateKind::Standard(g) => *g,
            GateKind::Custom(name) => return Err(HalError::UnsupportedGate(name.clone())),
        };
        gate.validate(self.num_qubits)?;
        let q = |k: usize| gate.qubits[k].index();

        match standard {
            StandardGate::H => self.apply_h(q(0)),
            StandardGate::X => self.apply_x(q(0)),
            StandardGate::Y => self.apply_y(q(0)),
            StandardGate::Z => self.apply_z(q(0)),
            StandardGate::Rx => self.apply_rx(q(0), gate.angle()?),
            StandardGate::Ry => self.apply_ry(q(0), gate.angle()?),
            StandardGate::Rz => self.apply_rz(q(0), gate.angle()?),
            StandardGate::CX => self.apply_cx(q(0), q(1)),
            StandardGate::CZ => self.apply_mcz(gate.qubits.iter().copied()),
            StandardGate::ZZ => self.apply_zz(q(0), q(1), gate.angle()?),
            StandardGate::CCX => self.apply_ccx(q(0), q(1), q(2)),
            StandardGate::MCZ => self.apply_mcz(gate.qubits.iter().copied()),
            StandardGate::Measure => {}
        }
        Ok(())
    }

    // =========================================================================
    // Single-qubit gate implementations
    // =========================================================================

    fn apply_single(&mut self, qubit: usize, m: &Matrix2) {
        let mask = 1 << qubit;
        for i in 0..self.dim() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitude(i);
                let b = self.amplitude(j);
                self.store(i, m[0][0] * a + m[0][1] * b);
                self.store(j, m[1][0] * a + m[1][1] * b);
            }
        }
    }

    pub(crate) fn apply_h(&mut self, qubit: usize) {
        let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
        self.apply_single(qubit, &[[h, h], [h, -h]]);
    }

    pub(crate) fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.dim() {
            if i & mask == 0 {
                self.swap_amplitudes(i, i | mask);
            }
        }
    }

    fn apply_y(&mut self, qubit: usize) {
        let i_val = Complex64::new(0.0, 1.0);
        self.apply_single(qubit, &[[ZERO, -i_val], [i_val, ZERO]]);
    }

    fn apply_z(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.dim() {
            if i & mask != 0 {
                self.negate(i);
            }
        }
    }

    fn apply_rx(&mut self, qubit: usize, theta: f64) {
        let c = Complex64::new((theta / 2.0).cos(), 0.0);
        let neg_i_s = Complex64::new(0.0, -(theta / 2.0).sin());
        self.apply_single(qubit, &[[c, neg_i_s], [neg_i_s, c]]);
    }

    fn apply_ry(&mut self, qubit: usize, theta: f64) {
        let c = Complex64::new((theta / 2.0).cos(), 0.0);
        let s = Complex64::new((theta / 2.0).sin(), 0.0);
        self.apply_single(qubit, &[[c, -s], [s, c]]);
    }

    fn apply_rz(&mut self, qubit: usize, theta: f64) {
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        self.apply_single(qubit, &[[phase_0, ZERO], [ZERO, phase_1]]);
    }

    // =========================================================================
    // Two-qubit gate implementations
    // =========================================================================

    pub(crate) fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        // Each pair is visited once, from its target-bit-0 member.
        for i in 0..self.dim() {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                self.swap_amplitudes(i, i | tgt_mask);
            }
        }
    }

    /// Phase `e^{+iθ}` where the two bits agree, `e^{-iθ}` where they differ.
    fn apply_zz(&mut self, q1: usize, q2: usize, theta: f64) {
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        let same = Complex64::from_polar(1.0, theta);
        let diff = Complex64::from_polar(1.0, -theta);
        for i in 0..self.dim() {
            let phase = if (i & mask1 != 0) ^ (i & mask2 != 0) {
                diff
            } else {
                same
            };
            let a = self.amplitude(i);
            self.store(i, a * phase);
        }
    }

    // =========================================================================
    // Multi-qubit gate implementations
    // =========================================================================

    fn apply_ccx(&mut self, c1: usize, c2: usize, target: usize) {
        let ctrl_mask = (1 << c1) | (1 << c2);
        let tgt_mask = 1 << target;
        for i in 0..self.dim() {
            if (i & ctrl_mask == ctrl_mask) && (i & tgt_mask == 0) {
                self.swap_amplitudes(i, i | tgt_mask);
            }
        }
    }

    /// Negate every amplitude whose listed bits are all 1. Covers CZ.
    fn apply_mcz(&mut self, qubits: impl IntoIterator<Item = QubitId>) {
        let mask = qubits.into_iter().fold(0usize, |m, q| m | q.mask());
        for i in 0..self.dim() {
            if i & mask == mask {
                self.negate(i);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    fn gate(kind: StandardGate, qubits: &[u32]) -> Gate {
        Gate::new(kind, qubits.iter().copied().map(QubitId))
    }

    fn rotation(kind: StandardGate, theta: f64, qubits: &[u32]) -> Gate {
        Gate::with_parameter(kind, qubits.iter().copied().map(QubitId), theta)
    }

    #[test]
    fn test_initial_state() {
        let sv = StateVector::new(2);
        assert_eq!(sv.as_slice().len(), 8);
        assert!(approx_eq(sv.amplitude(0), ONE));
        for i in 1..4 {
            assert!(approx_eq(sv.amplitude(i), ZERO));
        }
    }

    #[test]
    fn test_hadamard() {
        let mut sv = StateVector::new(1);
        sv.apply_h(0);

        assert!(approx_eq(sv.amplitude(0), Complex64::new(FRAC_1_SQRT_2, 0.0)));
        assert!(approx_eq(sv.amplitude(1), Complex64::new(FRAC_1_SQRT_2, 0.0)));
    }

    #[test]
    fn test_bell_state() {
        let mut sv = StateVector::new(2);
        sv.apply_h(0);
        sv.apply_cx(0, 1);

        assert!(approx_eq(sv.amplitude(0), Complex64::new(FRAC_1_SQRT_2, 0.0)));
        assert!(approx_eq(sv.amplitude(1), ZERO));
        assert!(approx_eq(sv.amplitude(2), ZERO));
        assert!(approx_eq(sv.amplitude(3), Complex64::new(FRAC_1_SQRT_2, 0.0)));
    }

    #[test]
    fn test_cnot_flips_target_once() {
        // |01⟩ (qubit 0 set) → |11⟩
        let mut sv = StateVector::new(2);
        sv.apply_x(0);
        sv.apply_cx(0, 1);
        assert!(approx_eq(sv.amplitude(3), ONE));

        // control clear: nothing happens
        let mut sv = StateVector::new(2);
        sv.apply_cx(0, 1);
        assert!(approx_eq(sv.amplitude(0), ONE));
    }

    #[test]
    fn test_y_gate() {
        let mut sv = StateVector::new(1);
        sv.apply(&gate(StandardGate::Y, &[0])).unwrap();
        assert!(approx_eq(sv.amplitude(1), Complex64::new(0.0, 1.0)));
    }

    #[test]
    fn test_rx_pi_is_x_up_to_phase() {
        let mut sv = StateVector::new(1);
        sv.apply(&rotation(StandardGate::Rx, PI, &[0])).unwrap();
        assert!(approx_eq(sv.amplitude(0), ZERO));
        assert!((sv.amplitude(1).norm() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_ry_quarter_turn() {
        let mut sv = StateVector::new(1);
        sv.apply(&rotation(StandardGate::Ry, PI / 2.0, &[0])).unwrap();
        assert!(approx_eq(sv.amplitude(0), Complex64::new(FRAC_1_SQRT_2, 0.0)));
        assert!(approx_eq(sv.amplitude(1), Complex64::new(FRAC_1_SQRT_2, 0.0)));
    }

    #[test]
    fn test_rz_phases() {
        let mut sv = StateVector::new(1);
        sv.apply_h(0);
        sv.apply(&rotation(StandardGate::Rz, PI, &[0])).unwrap();
        let expected = FRAC_1_SQRT_2;
        assert!(approx_eq(sv.amplitude(0), Complex64::new(0.0, -expected)));
        assert!(approx_eq(sv.amplitude(1), Complex64::new(0.0, expected)));
    }

    #[test]
    fn test_zz_phase_convention() {
        let theta = 0.3;
        let mut sv = StateVector::new(2);
        sv.apply_h(0);
        sv.apply_h(1);
        sv.apply(&rotation(StandardGate::ZZ, theta, &[0, 1])).unwrap();

        let half = Complex64::new(0.5, 0.0);
        let same = half * Complex64::from_polar(1.0, theta);
        let diff = half * Complex64::from_polar(1.0, -theta);
        assert!(approx_eq(sv.amplitude(0b00), same));
        assert!(approx_eq(sv.amplitude(0b01), diff));
        assert!(approx_eq(sv.amplitude(0b10), diff));
        assert!(approx_eq(sv.amplitude(0b11), same));
    }

    #[test]
    fn test_cz_and_mcz() {
        let mut sv = StateVector::new(3);
        for q in 0..3 {
            sv.apply_h(q);
        }
        sv.apply(&gate(StandardGate::MCZ, &[0, 1, 2])).unwrap();
        let a = 1.0 / 8f64.sqrt();
        assert!(approx_eq(sv.amplitude(0b111), Complex64::new(-a, 0.0)));
        assert!(approx_eq(sv.amplitude(0b011), Complex64::new(a, 0.0)));

        sv.apply(&gate(StandardGate::CZ, &[0, 1])).unwrap();
        assert!(approx_eq(sv.amplitude(0b011), Complex64::new(-a, 0.0)));
        assert!(approx_eq(sv.amplitude(0b111), Complex64::new(a, 0.0)));
    }

    #[test]
    fn test_toffoli() {
        let mut sv = StateVector::new(3);
        sv.apply_x(0);
        sv.apply(&gate(StandardGate::CCX, &[0, 1, 2])).unwrap();
        assert!(approx_eq(sv.amplitude(0b001), ONE));

        sv.apply_x(1);
        sv.apply(&gate(StandardGate::CCX, &[0, 1, 2])).unwrap();
        assert!(approx_eq(sv.amplitude(0b111), ONE));
    }

    #[test]
    fn test_measure_is_noop() {
        let mut sv = StateVector::new(2);
        sv.apply_h(1);
        let before = sv.clone();
        sv.apply(&gate(StandardGate::Measure, &[0, 1])).unwrap();
        assert_eq!(sv, before);
    }

    #[test]
    fn test_custom_gate_rejected() {
        let mut sv = StateVector::new(1);
        let custom = Gate::new(GateKind::Custom("SWAP".into()), [QubitId(0)]);
        assert!(matches!(
            sv.apply(&custom),
            Err(HalError::UnsupportedGate(name)) if name == "SWAP"
        ));
    }

    #[test]
    fn test_from_amplitudes() {
        let sv = StateVector::from_amplitudes(&[ZERO, ONE, ZERO, ZERO]).unwrap();
        assert_eq!(sv.num_qubits(), 2);
        assert!(approx_eq(sv.amplitude(1), ONE));
        assert!(StateVector::from_amplitudes(&[ONE, ZERO, ZERO]).is_err());
        assert!(StateVector::from_amplitudes(&[ONE]).is_err());
    }

    #[test]
    fn test_renormalize() {
        let mut sv = StateVector::from_amplitudes(&[Complex64::new(2.0, 0.0), ZERO]).unwrap();
        assert!((sv.norm_sqr() - 4.0).abs() < 1e-12);
        sv.renormalize();
        assert!((sv.norm_sqr() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_apply_rejects_malformed_gates() {
        let mut sv = StateVector::new(2);
        let before = sv.clone();

        // CNOT with a single operand
        assert!(matches!(
            sv.apply(&gate(StandardGate::CX, &[0])),
            Err(HalError::InvalidCircuit(_))
        ));
        // X beyond the register
        assert!(matches!(
            sv.apply(&gate(StandardGate::X, &[5])),
            Err(HalError::InvalidCircuit(_))
        ));
        // Rotation without an angle
        assert!(matches!(
            sv.apply(&gate(StandardGate::Rz, &[0])),
            Err(HalError::InvalidCircuit(_))
        ));
        assert_eq!(sv, before);
    }
}
