//! Topology command implementation.

use anyhow::{Context, Result};
use console::style;
use qmap_core::physical_label;

use super::common::load_config;

/// Execute the topology command.
pub fn execute(config_path: Option<&str>) -> Result<()> {
    let config = load_config(config_path)?;
    let topology = config
        .mapper
        .topology
        .build()
        .context("Invalid topology")?;

    println!(
        "{} {} qubits, {} edges",
        style("Topology:").cyan().bold(),
        style(topology.num_qubits()).yellow(),
        style(topology.edges().len()).yellow()
    );
    println!("  Center: {}", style(physical_label(topology.center()?)).green());
    println!();

    for &qubit in topology.qubits() {
        let neighbors: Vec<String> = topology
            .neighbors(qubit)
            .iter()
            .map(|&n| physical_label(n))
            .collect();
        println!(
            "  {:>6} -- {}",
            style(physical_label(qubit)).cyan(),
            neighbors.join(" ")
        );
    }

    Ok(())
}
