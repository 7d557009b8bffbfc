//! qmap Command-Line Interface
//!
//! Remaps `OpenQASM` 2 circuits onto a fixed device topology.
//!
//! ```text
//! qmap map -i circuits/ -o mapped/ -t device.yaml --meeting edge-score
//! qmap topology -t device.yaml
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use qmap_core::{MeetingStrategy, MoverStrategy};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{map, topology, version};

/// qmap - qubit placement and SWAP routing for `OpenQASM` 2 circuits
#[derive(Parser)]
#[command(name = "qmap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Place and route a circuit file or every .qasm file in a directory
    Map {
        /// Input file or directory
        #[arg(short, long)]
        input: String,

        /// Output directory
        #[arg(short, long)]
        output: String,

        /// Mapper configuration or topology file (YAML or JSON)
        #[arg(short, long, env = "QMAP_TOPOLOGY")]
        topology: Option<String>,

        /// Which operand moves (center, connectivity)
        #[arg(long)]
        mover: Option<MoverStrategy>,

        /// Where the operands meet (truncate, edge-score)
        #[arg(long)]
        meeting: Option<MeetingStrategy>,

        /// Report format (table, json)
        #[arg(short, long, default_value = "table")]
        report: String,
    },

    /// Describe a topology
    Topology {
        /// Mapper configuration or topology file (YAML or JSON)
        #[arg(short, long, env = "QMAP_TOPOLOGY")]
        topology: Option<String>,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

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

    let result = match cli.command {
        Commands::Map {
            input,
            output,
            topology,
            mover,
            meeting,
            report,
        } => map::execute(
            &input,
            &output,
            topology.as_deref(),
            mover,
            meeting,
            &report,
        ),

        Commands::Topology { topology } => topology::execute(topology.as_deref()),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
