//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use qsim_hal::{CircuitSource, DEFAULT_SHOTS, ExecutionRequest, ExecutionResult};
use qsim_ir::CircuitSpec;

/// Read and deserialize a JSON file.
pub fn load_json<T: DeserializeOwned>(path: &str) -> Result<T> {
    if !Path::new(path).exists() {
        anyhow::bail!("File not found: {path}");
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;

    serde_json::from_str(&source).with_context(|| format!("Invalid JSON in {path}"))
}

/// A circuit file holds either a full request or a bare circuit.
#[derive(Deserialize)]
#[serde(untagged)]
enum CircuitFile {
    Request(ExecutionRequest),
    Bare(CircuitSpec),
}

impl From<CircuitFile> for ExecutionRequest {
    fn from(file: CircuitFile) -> Self {
        match file {
            CircuitFile::Request(request) => request,
            CircuitFile::Bare(circuit) => ExecutionRequest {
                source: CircuitSource::Inline { circuit },
                shots: DEFAULT_SHOTS,
                backend: None,
                seed: None,
            },
        }
    }
}

/// Load an execution request from JSON.
///
/// Accepts `{"circuit": {...}, "shots": N, "seed": S}` as well as a bare
/// circuit description, which runs with the default shot count.
pub fn load_request(path: &str) -> Result<ExecutionRequest> {
    load_json::<CircuitFile>(path).map(ExecutionRequest::from)
}

/// Spinner shown while a blocking job runs; hidden in JSON mode.
pub fn spinner(message: &str, json: bool) -> ProgressBar {
    if json {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(template);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Print any serializable value as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{text}");
    Ok(())
}

/// Print execution results in a table format (shared by run and library).
pub fn print_results(result: &ExecutionResult) {
    if !result.successful {
        println!(
            "\n{} Execution failed: {}",
            style("✗").red().bold(),
            result.error_message.as_deref().unwrap_or("unknown error")
        );
        return;
    }

    println!(
        "\n{} Results ({} shots):",
        style("✓").green().bold(),
        result.shots
    );

    let sorted = result.counts.sorted();
    let total = result.counts.total_shots() as f64;

    for (bitstring, count) in sorted.iter().take(16) {
        let prob = **count as f64 / total * 100.0;
        let bar_len = (prob / 2.0).round() as usize;
        let bar: String = "█".repeat(bar_len);

        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            style(bitstring).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }

    if sorted.len() > 16 {
        println!("  ... and {} more outcomes", sorted.len() - 16);
    }

    println!(
        "\n  Execution time: {} ms",
        style(result.processing_time_ms).yellow()
    );
    println!("  Fidelity:       {:.9}", result.fidelity);
}
