//! File-level encode and decode.
//!
//! # Design
//!
//! Encoding reads the whole input into memory because the codec makes two
//! passes over it (frequency count, then payload). The archive is written
//! in one forward pass: a placeholder header first, then the sections, then
//! a seek back to the start to write the real header.
//!
//! Decoding consumes the archive strictly forward. Output is not atomic; if
//! a section turns out to be malformed, whatever was already decoded stays
//! in the output file.

use crate::summary::{Direction, Summary};
use anyhow::{Context, Result};
use huffman_core::{decode, decode_header, encode, encode_header, EntityWidth, Meta};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::{debug, info, warn};

/// Create `path` for writing, refusing to replace an existing file.
fn create_output(path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .with_context(|| format!("cannot create output file {}", path.display()))
}

/// Encode `input` into a new archive at `output`.
pub fn encode_file(input: &Path, output: &Path, width: EntityWidth) -> Result<Summary> {
    let mut summary = Summary::new(Direction::Encode);
    let data = fs::read(input).with_context(|| format!("cannot read {}", input.display()))?;
    summary.input_bytes = data.len() as u64;

    let mut sink = BufWriter::new(create_output(output)?);
    sink.write_all(&encode_header(&Meta::default()))?;

    let meta = encode(width, data.iter().copied(), &mut sink)
        .with_context(|| format!("cannot encode {} with {width}-byte entities", input.display()))?;

    let mut file = sink.into_inner().map_err(|err| err.into_error())?;
    file.seek(SeekFrom::Start(0))?;
    file.write_all(&encode_header(&meta))?;
    file.flush()?;
    debug!(?meta, "header written");

    summary.output_bytes = meta.archive_len();
    summary.record_meta(&meta);
    summary.complete();

    info!(
        input = %input.display(),
        output = %output.display(),
        entity_size = meta.entity_size,
        entities = meta.entity_count,
        bytes_in = summary.input_bytes,
        bytes_out = summary.output_bytes,
        "encoded"
    );
    Ok(summary)
}

/// Decode the archive at `input` into a new file at `output`.
pub fn decode_file(input: &Path, output: &Path) -> Result<Summary> {
    let mut summary = Summary::new(Direction::Decode);
    let archive = fs::read(input).with_context(|| format!("cannot read {}", input.display()))?;
    summary.input_bytes = archive.len() as u64;

    let mut src = archive.iter().copied();
    let meta = decode_header(&mut src)
        .with_context(|| format!("{} is too short for an archive header", input.display()))?;
    meta.validate()
        .with_context(|| format!("{} is not a valid archive", input.display()))?;
    debug!(?meta, "header read");

    let mut sink = BufWriter::new(create_output(output)?);
    decode(&meta, &mut src, &mut sink)
        .with_context(|| format!("cannot decode {}", input.display()))?;
    sink.flush()?;

    let trailing = src.len();
    if trailing > 0 {
        warn!(trailing, "ignoring bytes after the data section");
    }

    summary.output_bytes = sink.get_ref().metadata()?.len();
    summary.record_meta(&meta);
    summary.complete();

    info!(
        input = %input.display(),
        output = %output.display(),
        entity_size = meta.entity_size,
        entities = meta.entity_count,
        bytes_in = summary.input_bytes,
        bytes_out = summary.output_bytes,
        "decoded"
    );
    Ok(summary)
}
