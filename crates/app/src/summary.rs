//! Run summary for the command-line tool.
//!
//! Collects sizes, entity counts and timing for one encode or decode run
//! and renders them for the terminal.

use huffman_core::Meta;
use std::fmt;
use std::time::{Duration, Instant};

/// Which way the run went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encode,
    Decode,
}

/// Sizes and timing of a single run.
#[derive(Debug, Clone)]
pub struct Summary {
    pub direction: Direction,

    // === Timing ===
    /// When the run started
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,

    // === Input/Output ===
    /// Bytes read from the input file
    pub input_bytes: u64,

    /// Bytes written to the output file
    pub output_bytes: u64,

    // === Archive ===
    /// Entity width in bytes
    pub entity_size: u8,

    /// Distinct entities in the code tree
    pub entities: u32,
}

impl Summary {
    /// Create a summary with start time set to now.
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            start_time: Instant::now(),
            end_time: None,
            input_bytes: 0,
            output_bytes: 0,
            entity_size: 0,
            entities: 0,
        }
    }

    /// Take entity size and count from an archive header.
    pub fn record_meta(&mut self, meta: &Meta) {
        self.entity_size = meta.entity_size;
        self.entities = meta.entity_count;
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Archive size over original size, whichever side each one is on.
    ///
    /// Returns 0.0 if the original is empty.
    pub fn compression_ratio(&self) -> f64 {
        let (raw, archive) = match self.direction {
            Direction::Encode => (self.input_bytes, self.output_bytes),
            Direction::Decode => (self.output_bytes, self.input_bytes),
        };
        if raw == 0 {
            0.0
        } else {
            archive as f64 / raw as f64
        }
    }

    /// Print the summary to stdout.
    pub fn print(&self) {
        print!("{self}");
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = match self.direction {
            Direction::Encode => "Encode",
            Direction::Decode => "Decode",
        };

        writeln!(f, "=== {title} Summary ===")?;
        writeln!(f, "Duration: {} ms", self.duration().as_millis())?;
        writeln!(f, "Input:  {} bytes ({:.2} MiB)", self.input_bytes, mib(self.input_bytes))?;
        writeln!(f, "Output: {} bytes ({:.2} MiB)", self.output_bytes, mib(self.output_bytes))?;
        writeln!(f, "Ratio: {:.1}%", self.compression_ratio() * 100.0)?;
        writeln!(f, "Entity size: {} bytes", self.entity_size)?;
        writeln!(f, "Distinct entities: {}", self.entities)
    }
}

fn mib(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0
}
