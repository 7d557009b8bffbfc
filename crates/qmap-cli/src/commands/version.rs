//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - qubit placement and SWAP routing",
        style("qmap").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qmap-core  Interaction graph, placement and routing");
    println!("  qmap-qasm  OpenQASM 2 front-end and back-end");
    println!("  qmap-cli   Command-line interface");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
