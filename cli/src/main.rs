//! Packetscope CLI - renders the kernel packet-path contract as JSON.
//!
//! # Example
//!
//! ```bash
//! # Print the full contract to stdout
//! packetscope
//!
//! # Write a compact contract without pre-computed simulations
//! packetscope -o contract.json --compact --no-sim
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use packetscope_contract::{Contract, ExportOptions};
use packetscope_core::{DEFAULT_BUFFER_SIZE, DEFAULT_PAYLOAD_SIZE};
use tracing_subscriber::EnvFilter;

/// Packetscope contract generator
///
/// Builds the built-in packet-path catalogs, walks each one through the
/// sk_buff simulator, and emits the versioned JSON contract the frontend
/// consumes. Output is deterministic apart from the embedded timestamp.
#[derive(Parser, Debug)]
#[command(name = "packetscope")]
#[command(version, about, long_about = None)]
struct Args {
    /// Output file path (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit compact JSON without indentation
    #[arg(long)]
    compact: bool,

    /// Exclude the pre-computed simulation steps
    #[arg(long = "no-sim")]
    no_sim: bool,

    /// sk_buff capacity in bytes for the simulations
    #[arg(long, default_value_t = DEFAULT_BUFFER_SIZE)]
    buffer: usize,

    /// Initial payload size in bytes for the simulations
    #[arg(long, default_value_t = DEFAULT_PAYLOAD_SIZE)]
    payload: usize,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays pure JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let options = ExportOptions {
        pretty: !args.compact,
        include_simulation: !args.no_sim,
        buffer_size: args.buffer,
        payload_size: args.payload,
    };

    let contract = Contract::build(&options, Utc::now());
    let json = contract.to_json(options.pretty)?;

    match args.output {
        Some(path) => {
            fs::write(&path, &json)
                .with_context(|| format!("failed to write contract to {}", path.display()))?;
            eprintln!("Contract written to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
