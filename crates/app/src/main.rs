//! huffman: encode and decode files with fixed-width Huffman entity coding
//!
//! # Example
//!
//! ```bash
//! huffman -e notes.txt -o notes.huf
//! huffman -e samples.raw -s 2 -o samples.huf
//! huffman -d notes.huf -o notes.restored.txt
//! ```
//!
//! Log output goes to stderr and is controlled with `RUST_LOG`
//! (default `huffman=info`).

mod commands;
mod config;
mod summary;

use clap::Parser;
use config::{Args, Config, Mode};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("huffman=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("huffman: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = Config::from_args(args)?;
    info!(mode = ?config.mode, output = %config.output_file.display(), "starting");

    let summary = match &config.mode {
        Mode::Encode { input, width } => commands::encode_file(input, &config.output_file, *width)?,
        Mode::Decode { input } => commands::decode_file(input, &config.output_file)?,
    };

    if config.print_summary {
        summary.print();
    }
    Ok(())
}
