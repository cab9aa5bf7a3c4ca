//! Capabilities command implementation.

use anyhow::Result;
use console::style;

use qsim_adapter_sim::SimulatorBackend;
use qsim_hal::Backend;

use super::common::print_json;
use crate::config::CliConfig;

/// Execute the capabilities command.
pub fn execute(config: &CliConfig, json: bool) -> Result<()> {
    let backend = SimulatorBackend::with_config(config.simulator.clone());
    let caps = backend.capabilities();

    if json {
        return print_json(caps);
    }

    println!(
        "  {} {} {}",
        style("●").green(),
        style(&caps.name).bold(),
        if caps.is_simulator { "(local)" } else { "" }
    );
    println!("    Qubits: {}", caps.max_qubits);
    println!("    Max shots: {}", caps.max_shots);
    println!("    Gates: {}", caps.gate_set.join(", "));
    println!("    Gate fidelity: {}", caps.gate_fidelity);
    if !caps.features.is_empty() {
        println!("    Features: {}", caps.features.join(", "));
    }
    println!(
        "    Norm policy: {:?}, bit order: {:?}",
        config.simulator.norm_policy, config.simulator.bit_order
    );
    Ok(())
}
