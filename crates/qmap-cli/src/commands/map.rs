//! Map command implementation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use qmap_core::{MeetingStrategy, MoverStrategy};
use qmap_qasm::{RemapReport, remap};
use serde::Serialize;
use tracing::info;

use super::common::{collect_inputs, load_config};

#[derive(Debug, Serialize)]
struct FileReport {
    input: String,
    output: String,
    #[serde(flatten)]
    report: RemapReport,
}

#[derive(Debug, Serialize)]
struct Summary {
    files: Vec<FileReport>,
    total: RemapReport,
}

/// Execute the map command.
pub fn execute(
    input: &str,
    output: &str,
    config_path: Option<&str>,
    mover: Option<MoverStrategy>,
    meeting: Option<MeetingStrategy>,
    report: &str,
) -> Result<()> {
    let json = match report.to_lowercase().as_str() {
        "table" => false,
        "json" => true,
        other => anyhow::bail!("Unknown report format: '{other}'. Available: table, json"),
    };

    let mut config = load_config(config_path)?;
    if let Some(mover) = mover {
        config.mapper.mover = mover;
    }
    if let Some(meeting) = meeting {
        config.mapper.meeting = meeting;
    }

    let topology = config
        .mapper
        .topology
        .build()
        .context("Invalid topology")?;
    let inputs = collect_inputs(Path::new(input))?;

    let out_dir = Path::new(output);
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create directory: {}", out_dir.display()))?;

    if !json {
        println!(
            "{} Mapping {} file(s) onto {} qubits (mover {}, meeting {})",
            style("→").cyan().bold(),
            style(inputs.len()).green(),
            style(topology.num_qubits()).yellow(),
            config.mapper.mover,
            config.mapper.meeting
        );
    }

    let bar = if inputs.len() > 1 && !json {
        let bar = ProgressBar::new(inputs.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{bar:40.cyan/blue} {pos}/{len} {msg}")?
                .progress_chars("=> "),
        );
        bar
    } else {
        ProgressBar::hidden()
    };

    let mut files = Vec::with_capacity(inputs.len());
    for path in &inputs {
        let name = path
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("Not a file: {}", path.display()))?;
        bar.set_message(name.to_string_lossy().into_owned());

        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        let remapped = remap(&source, &topology, &config.mapper, &config.costs)
            .with_context(|| format!("Failed to map {}", path.display()))?;

        let out_path = out_dir.join(name);
        fs::write(&out_path, &remapped.qasm)
            .with_context(|| format!("Failed to write file: {}", out_path.display()))?;
        info!(
            "{} -> {}: {} swaps",
            path.display(),
            out_path.display(),
            remapped.report.metrics.swaps
        );

        files.push(FileReport {
            input: path.display().to_string(),
            output: out_path.display().to_string(),
            report: remapped.report,
        });
        bar.inc(1);
    }
    bar.finish_and_clear();

    let total = RemapReport {
        metrics: files.iter().map(|f| f.report.metrics).sum(),
        cost: files.iter().map(|f| f.report.cost).sum(),
    };

    if json {
        let summary = Summary { files, total };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    for file in &files {
        println!(
            "  {}: {} two-qubit ops, {} swaps, cost {}",
            style(&file.output).green(),
            file.report.metrics.two_qubit_ops,
            file.report.metrics.swaps,
            file.report.cost
        );
    }
    println!(
        "{} Inserted {} swaps in total (cost {})",
        style("✓").green().bold(),
        style(total.metrics.swaps).yellow(),
        total.cost
    );

    Ok(())
}
