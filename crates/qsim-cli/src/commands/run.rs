//! Run command implementation.

use anyhow::Result;
use console::style;

use qsim_adapter_sim::SimulatorBackend;

use super::common::{load_request, print_json, print_results, spinner};
use crate::config::CliConfig;

/// Execute the run command.
pub async fn execute(
    input: &str,
    shots: Option<u32>,
    seed: Option<u64>,
    config: &CliConfig,
    json: bool,
) -> Result<()> {
    let mut request = load_request(input)?;
    if let Some(shots) = shots {
        request.shots = shots;
    }
    if seed.is_some() {
        request.seed = seed;
    }

    if !json {
        println!(
            "{} Running {} on {} ({} shots)",
            style("→").cyan().bold(),
            style(input).green(),
            style("simulator").yellow(),
            request.shots
        );
    }

    let backend = SimulatorBackend::with_config(config.simulator.clone());

    let pb = spinner("Simulating...", json);
    let outcome = backend.handle_request(request).await;
    pb.finish_and_clear();
    let result = outcome?;

    if json {
        print_json(&result)?;
    } else {
        print_results(&result);
    }

    if !result.successful {
        anyhow::bail!(
            "Execution failed: {}",
            result.error_message.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(())
}
