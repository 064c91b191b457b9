//! Configuration for the huffman command-line tool.
//!
//! Arguments are parsed with clap and then resolved into a [`Config`].
//! Resolution checks what the parser cannot:
//! - the entity size must be one the codec supports
//! - the output file must not exist yet
//!
//! # Usage
//!
//! ```text
//! huffman -e <input> -o <output> [-s 1|2|4|8]
//! huffman -d <input> -o <output>
//! ```

use clap::{ArgGroup, Parser};
use huffman_core::EntityWidth;
use std::path::PathBuf;
use thiserror::Error;

/// Command-line arguments as parsed.
#[derive(Parser, Debug)]
#[command(name = "huffman", version)]
#[command(about = "Encode and decode files with fixed-width Huffman entity coding")]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .args(["encode_file", "decode_file"])
))]
pub struct Args {
    /// File to encode
    #[arg(short = 'e', long, value_name = "PATH")]
    pub encode_file: Option<PathBuf>,

    /// Archive to decode
    #[arg(short = 'd', long, value_name = "PATH")]
    pub decode_file: Option<PathBuf>,

    /// Entity size in bytes: 1, 2, 4 or 8 (encode only, default 1)
    #[arg(short = 's', long, value_name = "BYTES", conflicts_with = "decode_file")]
    pub entity_size: Option<u8>,

    /// Output file; must not exist
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output_file: PathBuf,

    /// Don't print the run summary
    #[arg(short, long)]
    pub quiet: bool,
}

/// What to do with the input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Encode { input: PathBuf, width: EntityWidth },
    Decode { input: PathBuf },
}

/// Errors found while resolving arguments.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unsupported entity size {0} (expected 1, 2, 4 or 8)")]
    EntitySize(u8),

    #[error("entity size is only accepted when encoding")]
    EntitySizeWithDecode,

    #[error("exactly one of --encode-file and --decode-file is required")]
    Mode,

    #[error("output file {} already exists", .0.display())]
    OutputExists(PathBuf),
}

/// Complete configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,

    /// Output file path
    pub output_file: PathBuf,

    /// Whether to print the run summary
    pub print_summary: bool,
}

impl Config {
    /// Resolve parsed arguments into a runnable configuration.
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let mode = match (args.encode_file, args.decode_file) {
            (Some(input), None) => {
                let size = args.entity_size.unwrap_or(EntityWidth::default().bytes());
                let width = EntityWidth::try_from(size).map_err(|_| ConfigError::EntitySize(size))?;
                Mode::Encode { input, width }
            }
            (None, Some(input)) => {
                if args.entity_size.is_some() {
                    return Err(ConfigError::EntitySizeWithDecode);
                }
                Mode::Decode { input }
            }
            _ => return Err(ConfigError::Mode),
        };

        if args.output_file.exists() {
            return Err(ConfigError::OutputExists(args.output_file));
        }

        Ok(Config {
            mode,
            output_file: args.output_file,
            print_summary: !args.quiet,
        })
    }
}
