//! Simulated annealing over binary variables.
//!
//! Classical Metropolis annealing. Each read starts from a random
//! assignment, flips one uniformly chosen variable per step and accepts the
//! flip if it lowers the energy or with probability `exp(−ΔE/T)`. The
//! temperature decays geometrically from `initial_temperature`.

use std::collections::BTreeMap;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AnnealError, AnnealResult};
use crate::qubo::QuboProblem;

/// Cooling schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnnealSchedule {
    /// Starting temperature `T₀`.
    pub initial_temperature: f64,
    /// Factor applied to the temperature after every step.
    pub cooling_rate: f64,
    /// Steps granted per unit of annealing time.
    pub steps_per_time_unit: f64,
    /// Upper bound on steps per read.
    pub max_steps: usize,
}

impl Default for AnnealSchedule {
    fn default() -> Self {
        Self {
            initial_temperature: 1.0,
            cooling_rate: 0.95,
            steps_per_time_unit: 50.0,
            max_steps: 1000,
        }
    }
}

impl AnnealSchedule {
    /// Check that every parameter is in range.
    pub fn validate(&self) -> AnnealResult<()> {
        if !(self.initial_temperature.is_finite() && self.initial_temperature > 0.0) {
            return Err(AnnealError::InvalidSchedule(format!(
                "initial temperature must be positive, got {}",
                self.initial_temperature
            )));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate <= 1.0) {
            return Err(AnnealError::InvalidSchedule(format!(
                "cooling rate must be in (0, 1], got {}",
                self.cooling_rate
            )));
        }
        if !(self.steps_per_time_unit.is_finite() && self.steps_per_time_unit > 0.0) {
            return Err(AnnealError::InvalidSchedule(format!(
                "steps per time unit must be positive, got {}",
                self.steps_per_time_unit
            )));
        }
        if self.max_steps == 0 {
            return Err(AnnealError::InvalidSchedule("max steps must be positive".into()));
        }
        Ok(())
    }

    /// Steps per read for `annealing_time`:
    /// `clamp(⌈annealing_time · steps_per_time_unit⌉, 1, max_steps)`.
    pub fn steps_for(&self, annealing_time: f64) -> AnnealResult<usize> {
        if !(annealing_time.is_finite() && annealing_time > 0.0) {
            return Err(AnnealError::InvalidSchedule(format!(
                "annealing time must be positive, got {annealing_time}"
            )));
        }
        let raw = (annealing_time * self.steps_per_time_unit).ceil();
        if raw >= self.max_steps as f64 {
            Ok(self.max_steps)
        } else {
            Ok((raw as usize).max(1))
        }
    }
}

/// Annealer settings, as read from a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealerConfig {
    /// Cooling schedule.
    pub schedule: AnnealSchedule,
    /// Run reads on the rayon pool.
    pub parallel: bool,
    /// Base seed; read `r` uses `seed + r`.
    pub seed: Option<u64>,
}

/// Wire form of a QUBO submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuboSubmission {
    /// `"x"` or `"x,y"` → weight.
    pub coefficients: BTreeMap<String, f64>,
    /// Independent annealing runs.
    #[serde(default = "default_num_reads")]
    pub num_reads: u32,
    /// Bounds the step count, not wall-clock time.
    #[serde(default = "default_annealing_time")]
    pub annealing_time: f64,
}

fn default_num_reads() -> u32 {
    100
}

fn default_annealing_time() -> f64 {
    20.0
}

/// Best assignment found across all reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnealingResult {
    /// Energy of `best_solution`.
    pub lowest_energy: f64,
    /// Variable name → 0 or 1.
    pub best_solution: BTreeMap<String, u8>,
    /// Always 0: there is no embedding onto physical qubits.
    pub chain_break_fraction: f64,
    /// Reads performed.
    pub num_reads: u32,
    /// Metropolis steps per read.
    pub steps_per_read: usize,
    /// Wall-clock time of the solve.
    pub processing_time_ms: u64,
}

/// Best state one read visited.
#[derive(Debug, Clone)]
struct ReadOutcome {
    read: u32,
    energy: f64,
    assignment: Vec<bool>,
}

impl ReadOutcome {
    /// Lower energy wins; ties go to the lower read index.
    fn better(self, other: ReadOutcome) -> ReadOutcome {
        let order = self
            .energy
            .total_cmp(&other.energy)
            .then(self.read.cmp(&other.read));
        if order.is_le() { self } else { other }
    }
}

/// Simulated-annealing QUBO solver.
#[derive(Debug, Clone, Default)]
pub struct SimulatedAnnealer {
    config: AnnealerConfig,
}

impl SimulatedAnnealer {
    /// Create an annealer.
    pub fn new(config: AnnealerConfig) -> Self {
        Self { config }
    }

    /// The annealer's settings.
    pub fn config(&self) -> &AnnealerConfig {
        &self.config
    }

    /// Parse and solve a wire-form submission.
    pub fn solve(&self, submission: &QuboSubmission) -> AnnealResult<AnnealingResult> {
        let problem = QuboProblem::from_map(&submission.coefficients)?;
        self.anneal(&problem, submission.num_reads, submission.annealing_time)
    }

    /// Run `num_reads` independent reads and keep the lowest-energy result.
    pub fn anneal(
        &self,
        problem: &QuboProblem,
        num_reads: u32,
        annealing_time: f64,
    ) -> AnnealResult<AnnealingResult> {
        if num_reads == 0 {
            return Err(AnnealError::InvalidReads(num_reads));
        }
        let schedule = &self.config.schedule;
        schedule.validate()?;
        let steps = schedule.steps_for(annealing_time)?;
        let base_seed = self
            .config
            .seed
            .unwrap_or_else(|| rand::thread_rng().r#gen());

        let start = Instant::now();
        info!(
            variables = problem.num_variables(),
            num_reads,
            steps,
            parallel = self.config.parallel,
            "starting annealing"
        );

        let run = |read: u32| run_read(problem, schedule, steps, base_seed, read);
        let best = if self.config.parallel {
            (0..num_reads).into_par_iter().map(run).reduce_with(ReadOutcome::better)
        } else {
            (0..num_reads).map(run).reduce(ReadOutcome::better)
        }
        .ok_or(AnnealError::InvalidReads(num_reads))?;

        let elapsed = start.elapsed();
        debug!(
            best_read = best.read,
            lowest_energy = best.energy,
            elapsed_ms = elapsed.as_millis() as u64,
            "annealing finished"
        );

        Ok(AnnealingResult {
            lowest_energy: best.energy,
            best_solution: problem.solution(&best.assignment),
            chain_break_fraction: 0.0,
            num_reads,
            steps_per_read: steps,
            processing_time_ms: elapsed.as_millis() as u64,
        })
    }
}

fn run_read(
    problem: &QuboProblem,
    schedule: &AnnealSchedule,
    steps: usize,
    base_seed: u64,
    read: u32,
) -> ReadOutcome {
    let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(u64::from(read)));
    let n = problem.num_variables();

    let mut assignment: Vec<bool> = (0..n).map(|_| rng.r#gen()).collect();
    let mut energy = problem.energy(&assignment);
    let mut best = assignment.clone();
    let mut best_energy = energy;
    let mut temperature = schedule.initial_temperature;

    for _ in 0..steps {
        let k = rng.gen_range(0..n);
        let delta = problem.flip_delta(&assignment, k);
        let accept = delta < 0.0 || rng.r#gen::<f64>() < (-delta / temperature).exp();
        if accept {
            assignment[k] = !assignment[k];
            energy += delta;
            if energy < best_energy {
                best_energy = energy;
                best.clone_from(&assignment);
            }
        }
        temperature *= schedule.cooling_rate;
    }

    ReadOutcome {
        read,
        // Recomputed so accumulated round-off never leaks into the result.
        energy: problem.energy(&best),
        assignment: best,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> SimulatedAnnealer {
        SimulatedAnnealer::new(AnnealerConfig {
            seed: Some(seed),
            ..AnnealerConfig::default()
        })
    }

    #[test]
    fn test_steps_for() {
        let schedule = AnnealSchedule::default();
        assert_eq!(schedule.steps_for(20.0).unwrap(), 1000);
        assert_eq!(schedule.steps_for(1.0).unwrap(), 50);
        assert_eq!(schedule.steps_for(0.001).unwrap(), 1);
        assert_eq!(schedule.steps_for(1e9).unwrap(), 1000);
        assert!(schedule.steps_for(0.0).is_err());
        assert!(schedule.steps_for(f64::NAN).is_err());
    }

    #[test]
    fn test_schedule_validation() {
        assert!(AnnealSchedule::default().validate().is_ok());
        let bad = AnnealSchedule {
            cooling_rate: 1.5,
            ..AnnealSchedule::default()
        };
        assert!(matches!(bad.validate(), Err(AnnealError::InvalidSchedule(_))));
        let bad = AnnealSchedule {
            initial_temperature: 0.0,
            ..AnnealSchedule::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_single_negative_linear_term() {
        let problem = QuboProblem::from_coefficients([("x0", -1.0)]).unwrap();
        let result = seeded(1).anneal(&problem, 10, 20.0).unwrap();
        assert_eq!(result.best_solution["x0"], 1);
        assert_eq!(result.lowest_energy, -1.0);
        assert_eq!(result.chain_break_fraction, 0.0);
        assert_eq!(result.num_reads, 10);
        assert_eq!(result.steps_per_read, 1000);
    }

    #[test]
    fn test_zero_reads_rejected() {
        let problem = QuboProblem::from_coefficients([("x0", -1.0)]).unwrap();
        assert_eq!(
            seeded(1).anneal(&problem, 0, 20.0),
            Err(AnnealError::InvalidReads(0))
        );
    }

    #[test]
    fn test_better_prefers_lower_energy_then_lower_read() {
        let a = ReadOutcome {
            read: 3,
            energy: -2.0,
            assignment: vec![true],
        };
        let b = ReadOutcome {
            read: 1,
            energy: -2.0,
            assignment: vec![false],
        };
        let c = ReadOutcome {
            read: 0,
            energy: -1.0,
            assignment: vec![false],
        };
        assert_eq!(a.clone().better(b.clone()).read, 1);
        assert_eq!(b.clone().better(a.clone()).read, 1);
        assert_eq!(c.clone().better(a).read, 3);
    }

    #[test]
    fn test_solve_submission() {
        let submission: QuboSubmission = serde_json::from_str(
            r#"{"coefficients": {"a": 1.0, "b": 1.0, "a,b": -3.0}, "numReads": 20}"#,
        )
        .unwrap();
        assert_eq!(submission.annealing_time, 20.0);

        let result = seeded(5).solve(&submission).unwrap();
        assert_eq!(result.lowest_energy, -1.0);
        assert_eq!(result.best_solution["a"], 1);
        assert_eq!(result.best_solution["b"], 1);
    }

    #[test]
    fn test_result_wire_form() {
        let problem = QuboProblem::from_coefficients([("x0", -1.0)]).unwrap();
        let result = seeded(2).anneal(&problem, 3, 1.0).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["lowestEnergy"], -1.0);
        assert_eq!(json["bestSolution"]["x0"], 1);
        assert_eq!(json["chainBreakFraction"], 0.0);
        assert_eq!(json["stepsPerRead"], 50);
    }
}
