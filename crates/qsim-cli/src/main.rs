//! qsim Command-Line Interface
//!
//! Runs gate circuits on the local state-vector simulator and QUBO problems
//! on the simulated annealer.
//!
//! ```text
//! qsim run --input bell.json --shots 1000 --seed 7
//! qsim anneal --input maxcut.json --reads 200
//! qsim library grover --target 101
//! qsim library trotter --hamiltonian "Z0 + 0.5*X0*X1" --time 2 --steps 20
//! qsim capabilities --json
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::library::{LibraryCircuit, LibraryParams};
use commands::{anneal, capabilities, library, run, version};
use config::CliConfig;

/// qsim - local quantum circuit simulation and QUBO annealing
#[derive(Parser)]
#[command(name = "qsim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (defaults to ~/.qsim/config.yaml)
    #[arg(long, global = true, env = "QSIM_CONFIG")]
    config: Option<String>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a circuit on the simulator
    Run {
        /// Input file: an execution request or a bare circuit (JSON)
        #[arg(short, long)]
        input: String,

        /// Number of shots (overrides the file)
        #[arg(short, long)]
        shots: Option<u32>,

        /// Sampler seed (overrides the file and the config)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Solve a QUBO problem with simulated annealing
    Anneal {
        /// Input file: {"coefficients": {...}, "numReads": N, "annealingTime": T}
        #[arg(short, long)]
        input: String,

        /// Number of reads (overrides the file)
        #[arg(short, long)]
        reads: Option<u32>,

        /// Base seed (overrides the config)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run a built-in circuit
    Library {
        /// Circuit to build
        #[arg(value_enum)]
        circuit: LibraryCircuit,

        /// Register width for ghz, uniform and qft
        #[arg(short, long)]
        qubits: Option<u32>,

        /// Marked bitstring for grover, qubit 0 rightmost; repeat or
        /// comma-separate for several
        #[arg(short, long = "target", value_delimiter = ',')]
        targets: Vec<String>,

        /// Grover iterations (default ⌊π/4·√(2ⁿ/M)⌋ for M targets)
        #[arg(long)]
        iterations: Option<u32>,

        /// Emit the inverse qft
        #[arg(long)]
        inverse: bool,

        /// Input features for vqc, one qubit each
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        features: Vec<f64>,

        /// Trainable vqc weights, 3 per qubit per layer
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        weights: Vec<f64>,

        /// Number of vqc layers
        #[arg(long)]
        layers: Option<u32>,

        /// Pauli-sum Hamiltonian for trotter, e.g. "Z0 + 0.5*X0*X1"
        #[arg(long)]
        hamiltonian: Option<String>,

        /// Evolution time for trotter
        #[arg(long)]
        time: Option<f64>,

        /// Trotter steps
        #[arg(long)]
        steps: Option<u32>,

        /// Number of shots
        #[arg(short, long, default_value = "1024")]
        shots: u32,

        /// Sampler seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show simulator capabilities
    Capabilities,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match CliConfig::load(cli.config.as_deref()) {
        Err(e) => Err(anyhow::anyhow!("Failed to load configuration: {e}")),
        Ok(config) => match cli.command {
            Commands::Run { input, shots, seed } => {
                run::execute(&input, shots, seed, &config, cli.json).await
            }

            Commands::Anneal { input, reads, seed } => {
                anneal::execute(&input, reads, seed, &config, cli.json).await
            }

            Commands::Library {
                circuit,
                qubits,
                targets,
                iterations,
                inverse,
                features,
                weights,
                layers,
                hamiltonian,
                time,
                steps,
                shots,
                seed,
            } => {
                let params = LibraryParams {
                    qubits,
                    targets,
                    iterations,
                    inverse,
                    features,
                    weights,
                    layers,
                    hamiltonian,
                    time,
                    steps,
                };
                library::execute(circuit, &params, shots, seed, &config, cli.json).await
            }

            Commands::Capabilities => capabilities::execute(&config, cli.json),

            Commands::Version => {
                version::execute();
                Ok(())
            }
        },
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
