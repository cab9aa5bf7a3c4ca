//! Measurement sampling.
//!
//! All qubits are measured once, at the end of the circuit, by drawing
//! from the cumulative distribution of `|amplitude_i|²`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use qsim_hal::Counts;

use crate::engine::NORM_TOLERANCE;
use crate::statevector::StateVector;

/// Shots per RNG stream in parallel mode.
pub const PARALLEL_CHUNK_SHOTS: u32 = 4096;

/// Golden-ratio increment used to spread chunk seeds.
const CHUNK_SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Character order of histogram keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BitOrder {
    /// Leftmost character is the highest-numbered qubit.
    #[default]
    MsbFirst,
    /// Leftmost character is qubit 0.
    QubitZeroFirst,
}

impl BitOrder {
    /// Render basis index `index` as a `width`-character bitstring.
    pub fn format(self, index: usize, width: u32) -> String {
        let msb_first = format!("{index:0width$b}", width = width as usize);
        match self {
            BitOrder::MsbFirst => msb_first,
            BitOrder::QubitZeroFirst => msb_first.chars().rev().collect(),
        }
    }
}

/// Cumulative probability table for one final state.
#[derive(Debug, Clone)]
pub struct Distribution {
    cumulative: Vec<f64>,
    last_nonzero: usize,
    num_qubits: u32,
}

impl Distribution {
    /// Build the table from a state.
    ///
    /// Negative round-off is clamped to zero; the table is renormalized if
    /// the total mass deviates from 1 by more than the norm tolerance.
    pub fn new(state: &StateVector) -> Self {
        let mut cumulative = Vec::with_capacity(state.dim());
        let mut total = 0.0;
        let mut last_nonzero = 0;
        for (i, p) in state.probabilities().into_iter().enumerate() {
            let p = p.max(0.0);
            if p > 0.0 {
                last_nonzero = i;
            }
            total += p;
            cumulative.push(total);
        }

        if (total - 1.0).abs() > NORM_TOLERANCE && total > 0.0 {
            warn!(total, "probability mass off by more than tolerance, renormalizing");
            for c in &mut cumulative {
                *c /= total;
            }
        }

        Self {
            cumulative,
            last_nonzero,
            num_qubits: state.num_qubits(),
        }
    }

    /// Basis index selected by a uniform draw `u ∈ [0, 1)`.
    pub fn index_for(&self, u: f64) -> usize {
        self.cumulative
            .partition_point(|&c| c <= u)
            .min(self.last_nonzero)
    }

    /// Number of qubits of the underlying state.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    fn draw_indices(&self, rng: &mut StdRng, shots: u32) -> FxHashMap<usize, u64> {
        let mut tally = FxHashMap::default();
        for _ in 0..shots {
            let u: f64 = rng.r#gen();
            *tally.entry(self.index_for(u)).or_insert(0) += 1;
        }
        tally
    }
}

/// Draws shots from a final state.
#[derive(Debug, Clone, Default)]
pub struct Sampler {
    bit_order: BitOrder,
    parallel: bool,
}

impl Sampler {
    /// Create a sequential sampler.
    pub fn new(bit_order: BitOrder) -> Self {
        Self {
            bit_order,
            parallel: false,
        }
    }

    /// Split shots across threads in fixed-size chunks.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// The bitstring order used for histogram keys.
    pub fn bit_order(&self) -> BitOrder {
        self.bit_order
    }

    /// Draw `shots` outcomes. The same seed, state and shot count always
    /// produce the same histogram; parallel and sequential modes use
    /// different streams and so differ from each other.
    pub fn sample(&self, state: &StateVector, shots: u32, seed: Option<u64>) -> Counts {
        let distribution = Distribution::new(state);
        let seed = seed.unwrap_or_else(|| rand::thread_rng().r#gen());

        let tally = if self.parallel && shots > PARALLEL_CHUNK_SHOTS {
            let chunks = shots.div_ceil(PARALLEL_CHUNK_SHOTS);
            debug!(shots, chunks, "sampling in parallel");
            (0..chunks)
                .into_par_iter()
                .map(|k| {
                    let chunk_shots = PARALLEL_CHUNK_SHOTS.min(shots - k * PARALLEL_CHUNK_SHOTS);
                    let mut rng = StdRng::seed_from_u64(
                        seed.wrapping_add(u64::from(k + 1).wrapping_mul(CHUNK_SEED_STRIDE)),
                    );
                    distribution.draw_indices(&mut rng, chunk_shots)
                })
                .reduce(FxHashMap::default, |mut acc, part| {
                    for (index, count) in part {
                        *acc.entry(index).or_insert(0) += count;
                    }
                    acc
                })
        } else {
            let mut rng = StdRng::seed_from_u64(seed);
            distribution.draw_indices(&mut rng, shots)
        };

        let width = distribution.num_qubits();
        tally
            .into_iter()
            .map(|(index, count)| (self.bit_order.format(index, width), count))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    fn plus_state() -> StateVector {
        let a = Complex64::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
        StateVector::from_amplitudes(&[a, a]).unwrap()
    }

    #[test]
    fn test_bit_order() {
        assert_eq!(BitOrder::MsbFirst.format(0b001, 3), "001");
        assert_eq!(BitOrder::QubitZeroFirst.format(0b001, 3), "100");
        assert_eq!(BitOrder::MsbFirst.format(0b110, 3), "110");
    }

    #[test]
    fn test_index_lookup_skips_zero_mass() {
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        let state = StateVector::from_amplitudes(&[zero, one, zero, zero]).unwrap();
        let dist = Distribution::new(&state);

        assert_eq!(dist.index_for(0.0), 1);
        assert_eq!(dist.index_for(0.5), 1);
        assert_eq!(dist.index_for(0.999_999_999_999), 1);
    }

    #[test]
    fn test_unnormalized_distribution() {
        let state = StateVector::from_amplitudes(&[
            Complex64::new(1.0, 0.0),
            Complex64::new(1.0, 0.0),
        ])
        .unwrap();
        let dist = Distribution::new(&state);
        assert_eq!(dist.index_for(0.49), 0);
        assert_eq!(dist.index_for(0.51), 1);
    }

    #[test]
    fn test_counts_sum_to_shots() {
        let sampler = Sampler::default();
        let counts = sampler.sample(&plus_state(), 1000, Some(1));
        assert_eq!(counts.total_shots(), 1000);
        assert!(counts.get("0") > 0 && counts.get("1") > 0);
    }

    #[test]
    fn test_seeded_sampling_is_reproducible() {
        let sampler = Sampler::default();
        let a = sampler.sample(&plus_state(), 500, Some(42));
        let b = sampler.sample(&plus_state(), 500, Some(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_parallel_sampling() {
        let sampler = Sampler::default().with_parallel(true);
        let shots = 3 * PARALLEL_CHUNK_SHOTS + 17;
        let a = sampler.sample(&plus_state(), shots, Some(9));
        let b = sampler.sample(&plus_state(), shots, Some(9));
        assert_eq!(a.total_shots(), u64::from(shots));
        assert_eq!(a, b);
    }
}
