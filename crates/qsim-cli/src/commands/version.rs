//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - local state-vector simulation and QUBO annealing",
        style("qsim").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qsim-ir           Circuit description");
    println!("  qsim-hal          Backend abstraction and result types");
    println!("  qsim-adapter-sim  State-vector simulator");
    println!("  qsim-anneal       Simulated-annealing QUBO solver");
    println!("  qsim-cli          Command-line interface");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
