//! Anneal command implementation.

use anyhow::{Context, Result};
use console::style;

use qsim_anneal::{AnnealingResult, QuboSubmission, SimulatedAnnealer};

use super::common::{load_json, print_json, spinner};
use crate::config::CliConfig;

/// Execute the anneal command.
pub async fn execute(
    input: &str,
    reads: Option<u32>,
    seed: Option<u64>,
    config: &CliConfig,
    json: bool,
) -> Result<()> {
    let mut submission: QuboSubmission = load_json(input)?;
    if let Some(reads) = reads {
        submission.num_reads = reads;
    }

    let mut annealer_config = config.annealer.clone();
    if seed.is_some() {
        annealer_config.seed = seed;
    }

    if !json {
        println!(
            "{} Annealing {} ({} terms, {} reads)",
            style("→").cyan().bold(),
            style(input).green(),
            submission.coefficients.len(),
            submission.num_reads
        );
    }

    let pb = spinner("Annealing...", json);
    let annealer = SimulatedAnnealer::new(annealer_config);
    let outcome = tokio::task::spawn_blocking(move || annealer.solve(&submission))
        .await
        .context("Annealing task failed")?;
    pb.finish_and_clear();
    let result = outcome.map_err(|e| anyhow::anyhow!("Invalid QUBO submission: {e}"))?;

    if json {
        print_json(&result)
    } else {
        print_solution(&result);
        Ok(())
    }
}

fn print_solution(result: &AnnealingResult) {
    println!(
        "\n{} Lowest energy: {}",
        style("✓").green().bold(),
        style(result.lowest_energy).yellow()
    );
    println!("\n  Solution:");
    for (name, value) in &result.best_solution {
        let value = if *value == 1 {
            style(value.to_string()).green()
        } else {
            style(value.to_string()).dim()
        };
        println!("    {}: {}", style(name).cyan(), value);
    }
    println!(
        "\n  Reads: {}, steps per read: {}",
        result.num_reads, result.steps_per_read
    );
    println!(
        "  Execution time: {} ms",
        style(result.processing_time_ms).yellow()
    );
}
