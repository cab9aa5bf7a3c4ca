//! Library command implementation.

use anyhow::{Context, Result};
use clap::ValueEnum;
use console::style;

use qsim_adapter_sim::SimulatorBackend;
use qsim_hal::{Backend, ExecutionOptions};
use qsim_ir::{Circuit, PauliSum};

use super::common::{print_json, print_results, spinner};
use crate::config::CliConfig;

/// Built-in circuits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LibraryCircuit {
    /// Two-qubit Bell pair
    Bell,
    /// n-qubit GHZ state
    Ghz,
    /// Grover search for one or more marked bitstrings
    Grover,
    /// Hadamard on every qubit
    Uniform,
    /// Quantum Fourier transform of |0…0⟩
    Qft,
    /// Variational classifier
    Vqc,
    /// Trotterized evolution under a Pauli-sum Hamiltonian
    Trotter,
}

/// Parameters shared by the library circuits.
#[derive(Debug, Clone, Default)]
pub struct LibraryParams {
    pub qubits: Option<u32>,
    pub targets: Vec<String>,
    pub iterations: Option<u32>,
    pub inverse: bool,
    pub features: Vec<f64>,
    pub weights: Vec<f64>,
    pub layers: Option<u32>,
    pub hamiltonian: Option<String>,
    pub time: Option<f64>,
    pub steps: Option<u32>,
}

/// Build the requested circuit.
pub fn build(kind: LibraryCircuit, params: &LibraryParams) -> Result<Circuit> {
    let circuit = match kind {
        LibraryCircuit::Bell => Circuit::bell(),
        LibraryCircuit::Ghz => Circuit::ghz(params.qubits.unwrap_or(3)),
        LibraryCircuit::Uniform => Circuit::uniform_superposition(params.qubits.unwrap_or(3)),
        LibraryCircuit::Grover => {
            if params.targets.is_empty() {
                anyhow::bail!("grover needs --target <bitstring>");
            }
            let targets: Vec<&str> = params.targets.iter().map(String::as_str).collect();
            Circuit::grover(&targets, params.iterations)
        }
        LibraryCircuit::Qft => Circuit::qft(params.qubits.unwrap_or(3), params.inverse),
        LibraryCircuit::Vqc => {
            Circuit::vqc(&params.features, &params.weights, params.layers.unwrap_or(1))
        }
        LibraryCircuit::Trotter => {
            let hamiltonian = params
                .hamiltonian
                .as_deref()
                .context("trotter needs --hamiltonian <terms>")?
                .parse::<PauliSum>()
                .context("Invalid --hamiltonian")?;
            Circuit::trotter(
                &hamiltonian,
                params.time.unwrap_or(1.0),
                params.steps.unwrap_or(10),
            )
        }
    };
    circuit.with_context(|| format!("Failed to build {kind:?} circuit"))
}

/// Execute the library command.
pub async fn execute(
    kind: LibraryCircuit,
    params: &LibraryParams,
    shots: u32,
    seed: Option<u64>,
    config: &CliConfig,
    json: bool,
) -> Result<()> {
    let circuit = build(kind, params)?;

    if !json {
        println!(
            "{} Running {} on {} ({} shots)",
            style("→").cyan().bold(),
            style(circuit.name()).green(),
            style("simulator").yellow(),
            shots
        );
        println!(
            "  Built: {} qubits, {} gates",
            circuit.num_qubits(),
            circuit.depth()
        );
    }

    let backend = SimulatorBackend::with_config(config.simulator.clone());
    let mut options = ExecutionOptions::with_shots(shots);
    options.seed = seed;

    let pb = spinner("Simulating...", json);
    let outcome = backend.run(&circuit, &options).await;
    pb.finish_and_clear();
    let result = outcome?;

    if json {
        print_json(&result)?;
    } else {
        print_results(&result);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_defaults() {
        let ghz = build(LibraryCircuit::Ghz, &LibraryParams::default()).unwrap();
        assert_eq!(ghz.num_qubits(), 3);

        let bell = build(LibraryCircuit::Bell, &LibraryParams::default()).unwrap();
        assert_eq!(bell.num_qubits(), 2);
    }

    #[test]
    fn test_build_grover() {
        let params = LibraryParams {
            targets: vec!["101".into()],
            ..LibraryParams::default()
        };
        let circuit = build(LibraryCircuit::Grover, &params).unwrap();
        assert_eq!(circuit.num_qubits(), 3);

        let params = LibraryParams {
            targets: vec!["101".into(), "010".into()],
            ..LibraryParams::default()
        };
        assert!(build(LibraryCircuit::Grover, &params).is_ok());

        assert!(build(LibraryCircuit::Grover, &LibraryParams::default()).is_err());

        let bad = LibraryParams {
            targets: vec!["10x".into()],
            ..LibraryParams::default()
        };
        assert!(build(LibraryCircuit::Grover, &bad).is_err());
    }

    #[test]
    fn test_build_qft_vqc_trotter() {
        let qft = build(
            LibraryCircuit::Qft,
            &LibraryParams {
                qubits: Some(4),
                inverse: true,
                ..LibraryParams::default()
            },
        )
        .unwrap();
        assert_eq!(qft.name(), "iqft");
        assert_eq!(qft.num_qubits(), 4);

        let vqc = LibraryParams {
            features: vec![0.2, 0.8],
            weights: vec![0.1; 6],
            ..LibraryParams::default()
        };
        assert_eq!(build(LibraryCircuit::Vqc, &vqc).unwrap().num_qubits(), 2);
        let short = LibraryParams {
            weights: vec![0.1; 5],
            ..vqc
        };
        assert!(build(LibraryCircuit::Vqc, &short).is_err());

        let trotter = LibraryParams {
            hamiltonian: Some("Z0 + 0.5*X1*X2".into()),
            steps: Some(3),
            ..LibraryParams::default()
        };
        assert_eq!(build(LibraryCircuit::Trotter, &trotter).unwrap().num_qubits(), 3);
        assert!(build(LibraryCircuit::Trotter, &LibraryParams::default()).is_err());
        let garbled = LibraryParams {
            hamiltonian: Some("Z0 + W1".into()),
            ..LibraryParams::default()
        };
        assert!(build(LibraryCircuit::Trotter, &garbled).is_err());
    }

    #[tokio::test]
    async fn test_execute_bell() {
        let result = execute(
            LibraryCircuit::Bell,
            &LibraryParams::default(),
            100,
            Some(1),
            &CliConfig::default(),
            true,
        )
        .await;
        assert!(result.is_ok());
    }
}
