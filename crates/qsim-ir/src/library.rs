//! Pre-built circuits.
//!
//! Bitstring arguments (`basis_state`, `grover`) use the same order as the
//! simulator's default histogram keys: the leftmost character is the
//! highest-numbered qubit, the rightmost character is qubit 0.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::circuit::Circuit;
use crate::error::{IrError, IrResult};
use crate::pauli::{Pauli, PauliSum, PauliTerm};
use crate::qubit::QubitId;

/// Parse a `0`/`1` string into per-qubit bits, indexed by qubit number.
fn parse_bits(bits: &str) -> IrResult<Vec<bool>> {
    if bits.is_empty() {
        return Err(IrError::InvalidBitstring(bits.to_string()));
    }
    bits.chars()
        .rev()
        .map(|c| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            _ => Err(IrError::InvalidBitstring(bits.to_string())),
        })
        .collect()
}

fn width(bits: &[bool]) -> IrResult<u32> {
    u32::try_from(bits.len()).map_err(|_| IrError::InvalidArgument("bitstring too long".into()))
}

impl Circuit {
    /// Create a Bell state circuit.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_size("bell", 2, 2)?;
        circuit.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?.measure_all()?;
        Ok(circuit)
    }

    /// Create a GHZ state circuit.
    pub fn ghz(n: u32) -> IrResult<Self> {
        let mut circuit = Self::with_size("ghz", n, n)?;

        circuit.h(QubitId(0))?;
        for i in 0..n - 1 {
            circuit.cx(QubitId(i), QubitId(i + 1))?;
        }

        circuit.measure_all()?;
        Ok(circuit)
    }

    /// Hadamard on every qubit, then measure.
    pub fn uniform_superposition(n: u32) -> IrResult<Self> {
        let mut circuit = Self::with_size("uniform", n, n)?;
        for q in circuit.qubit_ids() {
            circuit.h(q)?;
        }
        circuit.measure_all()?;
        Ok(circuit)
    }

    /// Prepare the computational basis state named by `bits`.
    pub fn basis_state(bits: &str) -> IrResult<Self> {
        let parsed = parse_bits(bits)?;
        let n = width(&parsed)?;
        let mut circuit = Self::with_size(format!("basis_{bits}"), n, n)?;
        for (q, &set) in parsed.iter().enumerate() {
            if set {
                circuit.x(QubitId(q as u32))?;
            }
        }
        Ok(circuit)
    }

    /// Grover search over one or more marked basis states.
    ///
    /// Every target must have the same width. The oracle flips the phase of
    /// each target in turn (X-conjugated multi-controlled Z); the diffusion
    /// operator is `H·X·MCZ·X·H`. `iterations` defaults to
    /// `⌊π/4 · √(2^n / M)⌋` for `M` targets, at least 1.
    pub fn grover(targets: &[&str], iterations: Option<u32>) -> IrResult<Self> {
        let Some(first) = targets.first() else {
            return Err(IrError::InvalidArgument(
                "Grover needs at least one target".into(),
            ));
        };
        let marked = targets
            .iter()
            .map(|t| parse_bits(t))
            .collect::<IrResult<Vec<_>>>()?;
        let n = width(&marked[0])?;
        if n > 62 {
            return Err(IrError::InvalidArgument(format!(
                "Grover target of {n} qubits is too wide"
            )));
        }
        for (pos, (bits, text)) in marked.iter().zip(targets).enumerate() {
            if bits.len() != marked[0].len() {
                return Err(IrError::InvalidBitstring(format!(
                    "{text} (expected {n} bits like '{first}')"
                )));
            }
            if marked[..pos].contains(bits) {
                return Err(IrError::InvalidArgument(format!(
                    "Grover target {text} listed twice"
                )));
            }
        }

        let iterations = iterations.unwrap_or_else(|| {
            let ratio = (1u64 << n) as f64 / marked.len() as f64;
            ((PI / 4.0) * ratio.sqrt()).floor().max(1.0) as u32
        });

        let mut circuit = Self::with_size("grover", n, n)?;
        for q in circuit.qubit_ids() {
            circuit.h(q)?;
        }

        for _ in 0..iterations {
            // Oracle: map each |target⟩ to |1…1⟩, flip its phase, map back.
            for bits in &marked {
                for (q, &set) in bits.iter().enumerate() {
                    if !set {
                        circuit.x(QubitId(q as u32))?;
                    }
                }
                circuit.phase_flip_all_ones()?;
                for (q, &set) in bits.iter().enumerate() {
                    if !set {
                        circuit.x(QubitId(q as u32))?;
                    }
                }
            }

            // Diffusion: reflect about the uniform superposition.
            for q in circuit.qubit_ids() {
                circuit.h(q)?;
                circuit.x(q)?;
            }
            circuit.phase_flip_all_ones()?;
            for q in circuit.qubit_ids() {
                circuit.x(q)?;
                circuit.h(q)?;
            }
        }

        circuit.measure_all()?;
        Ok(circuit)
    }

    /// Negate the amplitude of `|1…1⟩`: MCZ over the register, or Z for a
    /// single qubit.
    fn phase_flip_all_ones(&mut self) -> IrResult<&mut Self> {
        if self.num_qubits() == 1 {
            self.z(QubitId(0))
        } else {
            let qubits: Vec<_> = self.qubit_ids().collect();
            self.mcz(qubits)
        }
    }

    /// QAOA ansatz for a quadratic cost matrix.
    ///
    /// `cost` is a dense symmetric matrix: the diagonal holds linear
    /// coefficients, the upper triangle couplings. Each layer `p` applies
    /// `RZ(2·γ_p·c_ii)` for non-zero diagonal entries, `ZZ(γ_p·c_ij)` for
    /// every non-zero `i < j`, and an `RX(2β_p)` mixer on every qubit. The
    /// circuit starts in the uniform superposition and ends with a full
    /// measurement.
    pub fn qaoa(cost: &[Vec<f64>], gammas: &[f64], betas: &[f64]) -> IrResult<Self> {
        let n = cost.len();
        if cost.iter().any(|row| row.len() != n) {
            return Err(IrError::InvalidArgument(
                "QAOA cost matrix must be square".into(),
            ));
        }
        if gammas.len() != betas.len() || gammas.is_empty() {
            return Err(IrError::InvalidArgument(format!(
                "QAOA needs matching non-empty gamma/beta schedules, got {} and {}",
                gammas.len(),
                betas.len()
            )));
        }
        let n = u32::try_from(n)
            .map_err(|_| IrError::InvalidArgument("QAOA cost matrix too large".into()))?;

        let mut circuit = Self::with_size("qaoa", n, n)?;
        for q in circuit.qubit_ids() {
            circuit.h(q)?;
        }

        for (&gamma, &beta) in gammas.iter().zip(betas) {
            for (i, row) in cost.iter().enumerate() {
                if row[i] != 0.0 {
                    circuit.rz(2.0 * gamma * row[i], QubitId(i as u32))?;
                }
                for (j, &weight) in row.iter().enumerate().skip(i + 1) {
                    if weight != 0.0 {
                        circuit.zz(gamma * weight, QubitId(i as u32), QubitId(j as u32))?;
                    }
                }
            }
            for q in circuit.qubit_ids() {
                circuit.rx(2.0 * beta, q)?;
            }
        }

        circuit.measure_all()?;
        Ok(circuit)
    }

    /// Variational classifier over `features.len()` qubits.
    ///
    /// Feature `x_i` is angle-encoded as `RY(π·x_i)` on qubit `i`. Each of
    /// the `layers` then applies `RY`, `RZ` on every qubit, a CNOT chain
    /// `0→1→…→n-1`, and a closing `RY` on every qubit, consuming `3n`
    /// weights in that order.
    pub fn vqc(features: &[f64], weights: &[f64], layers: u32) -> IrResult<Self> {
        let n = u32::try_from(features.len())
            .map_err(|_| IrError::InvalidArgument("too many VQC features".into()))?;
        let expected = 3 * features.len() * layers as usize;
        if weights.len() != expected {
            return Err(IrError::InvalidArgument(format!(
                "VQC with {n} qubits and {layers} layers needs {expected} weights, got {}",
                weights.len()
            )));
        }

        let mut circuit = Self::with_size("vqc", n, n)?;
        for (q, &x) in circuit.qubit_ids().zip(features) {
            circuit.ry(PI * x, q)?;
        }

        let mut weights = weights.iter().copied();
        let mut next = || weights.next().unwrap_or_default();
        for _ in 0..layers {
            for q in circuit.qubit_ids() {
                circuit.ry(next(), q)?;
                circuit.rz(next(), q)?;
            }
            for i in 1..n {
                circuit.cx(QubitId(i - 1), QubitId(i))?;
            }
            for q in circuit.qubit_ids() {
                circuit.ry(next(), q)?;
            }
        }

        circuit.measure_all()?;
        Ok(circuit)
    }

    /// Quantum Fourier transform on `n` qubits, without measurement.
    ///
    /// Acts on the basis index with qubit 0 least significant:
    /// `|x⟩ → Σ_k e^{2πi·xk/2^n} |k⟩ / √2^n`. The forward circuit runs from
    /// the highest qubit down, applying `H` then `CP(π/2^(i-j))` from every
    /// lower qubit `j`, and finishes with the bit-reversal swaps. `inverse`
    /// emits the exact reverse with negated angles. Controlled phases and
    /// swaps are decomposed into `RZ` and CNOT, so the result matches the
    /// textbook transform up to a global phase.
    pub fn qft(n: u32, inverse: bool) -> IrResult<Self> {
        let name = if inverse { "iqft" } else { "qft" };
        let mut circuit = Self::with_size(name, n, n)?;
        let angle = |i: u32, j: u32| PI / (1u64 << (i - j).min(63)) as f64;

        if inverse {
            circuit.reverse_bits()?;
            for i in 0..n {
                for j in 0..i {
                    circuit.cphase(-angle(i, j), QubitId(j), QubitId(i))?;
                }
                circuit.h(QubitId(i))?;
            }
        } else {
            for i in (0..n).rev() {
                circuit.h(QubitId(i))?;
                for j in (0..i).rev() {
                    circuit.cphase(angle(i, j), QubitId(j), QubitId(i))?;
                }
            }
            circuit.reverse_bits()?;
        }
        Ok(circuit)
    }

    /// `CP(θ)` up to a global phase: `RZ(θ/2)` on both qubits around a
    /// CNOT-conjugated `RZ(-θ/2)` on the target.
    fn cphase(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.rz(theta / 2.0, control)?
            .rz(theta / 2.0, target)?
            .cx(control, target)?
            .rz(-theta / 2.0, target)?
            .cx(control, target)
    }

    /// Swap qubit `i` with qubit `n-1-i`, each swap as three CNOTs.
    fn reverse_bits(&mut self) -> IrResult<&mut Self> {
        let n = self.num_qubits();
        for i in 0..n / 2 {
            let (a, b) = (QubitId(i), QubitId(n - 1 - i));
            self.cx(a, b)?.cx(b, a)?.cx(a, b)?;
        }
        Ok(self)
    }

    /// First-order Trotterized evolution `e^{-iHt}` from `|+…+⟩`.
    ///
    /// Each of the `steps` slices applies `e^{-i·c·P·t/steps}` per term.
    /// Single-factor terms become `RX`/`RY`/`RZ(2·c·dt)`; longer products
    /// rotate X and Y factors into the Z basis, collect parity with a
    /// CNOT ladder onto the last factor, apply `RZ(2·c·dt)` there and
    /// undo. Identity terms only contribute a global phase and are skipped.
    pub fn trotter(hamiltonian: &PauliSum, time: f64, steps: u32) -> IrResult<Self> {
        if steps == 0 {
            return Err(IrError::InvalidArgument(
                "Trotter evolution needs at least one step".into(),
            ));
        }
        if !time.is_finite() {
            return Err(IrError::InvalidArgument(format!(
                "Trotter evolution time {time} is not finite"
            )));
        }
        let n = hamiltonian.num_qubits();
        let dt = time / f64::from(steps);

        let mut circuit = Self::with_size("trotter", n, n)?;
        for q in circuit.qubit_ids() {
            circuit.h(q)?;
        }
        for _ in 0..steps {
            for term in hamiltonian.terms() {
                circuit.pauli_rotation(term, 2.0 * term.coefficient * dt)?;
            }
        }
        circuit.measure_all()?;
        Ok(circuit)
    }

    /// `e^{-i·θ/2·P}` for the Pauli string of `term`.
    fn pauli_rotation(&mut self, term: &PauliTerm, theta: f64) -> IrResult<&mut Self> {
        match term.factors.as_slice() {
            [] => Ok(self),
            [(q, Pauli::X)] => self.rx(theta, *q),
            [(q, Pauli::Y)] => self.ry(theta, *q),
            [(q, Pauli::Z)] => self.rz(theta, *q),
            factors => {
                for &(q, pauli) in factors {
                    self.rotate_into_z(pauli, q, false)?;
                }
                for pair in factors.windows(2) {
                    self.cx(pair[0].0, pair[1].0)?;
                }
                let last = factors[factors.len() - 1].0;
                self.rz(theta, last)?;
                for pair in factors.windows(2).rev() {
                    self.cx(pair[0].0, pair[1].0)?;
                }
                for &(q, pauli) in factors {
                    self.rotate_into_z(pauli, q, true)?;
                }
                Ok(self)
            }
        }
    }

    /// Map `pauli` on `qubit` to Z (`undo = false`) or back.
    fn rotate_into_z(&mut self, pauli: Pauli, qubit: QubitId, undo: bool) -> IrResult<&mut Self> {
        match pauli {
            Pauli::X => self.h(qubit),
            Pauli::Y if undo => self.rx(-FRAC_PI_2, qubit),
            Pauli::Y => self.rx(FRAC_PI_2, qubit),
            Pauli::Z => Ok(self),
        }
    }
}
