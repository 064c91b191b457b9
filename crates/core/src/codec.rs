//! Whole-archive encode and decode.
//!
//! # Archive Format
//!
//! ```text
//! +------------------+
//! | header (20)      |  see `meta`
//! +------------------+
//! | entities         |  entity_count * entity_size raw bytes
//! +------------------+
//! | tree             |  tree_byte_count bytes, shape bits
//! +------------------+
//! | data             |  data_byte_count bytes, code bits
//! +------------------+
//! ```
//!
//! [`encode`] and [`decode`] deal with the three sections only; the header
//! is written and read by the caller, who may need to patch it in place
//! after the sections are out. [`compress`] and [`decompress`] handle a
//! complete in-memory archive.

use crate::bitio::FixedWidth;
use crate::entity_codec::{decode_entities, encode_entities};
use crate::error::{Error, LayoutError, Result};
use crate::frequency::frequency_table;
use crate::meta::{decode_header, encode_header, Meta, HEADER_LEN};
use crate::payload::{decode_data, encode_data};
use crate::tree::build_tree;
use crate::tree_codec::{decode_tree, encode_tree};
use std::fmt;
use std::io::Write;
use tracing::debug;

/// Number of bytes that make up one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntityWidth {
    #[default]
    One = 1,
    Two = 2,
    Four = 4,
    Eight = 8,
}

impl EntityWidth {
    pub const ALL: [EntityWidth; 4] = [
        EntityWidth::One,
        EntityWidth::Two,
        EntityWidth::Four,
        EntityWidth::Eight,
    ];

    pub const fn bytes(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for EntityWidth {
    type Error = Error;

    fn try_from(bytes: u8) -> Result<Self> {
        match bytes {
            1 => Ok(EntityWidth::One),
            2 => Ok(EntityWidth::Two),
            4 => Ok(EntityWidth::Four),
            8 => Ok(EntityWidth::Eight),
            other => Err(Error::UnsupportedWidth(other)),
        }
    }
}

impl fmt::Display for EntityWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bytes())
    }
}

/// Encode `input` as `width`-byte entities, writing the entity, tree and
/// data sections to `sink`.
///
/// The input is read twice: a clone of the iterator feeds the frequency
/// count, the original feeds the payload. Returns the header describing
/// what was written; empty input writes nothing and returns zero counts.
///
/// # Errors
/// - `LayoutError::UnexpectedEnd` if the input length is not a multiple of
///   the entity width
/// - `Error::Io` if the sink fails
pub fn encode<I, W>(width: EntityWidth, input: I, sink: &mut W) -> Result<Meta>
where
    I: Iterator<Item = u8> + Clone,
    W: Write + ?Sized,
{
    match width {
        EntityWidth::One => encode_as::<u8, _, _>(input, sink),
        EntityWidth::Two => encode_as::<u16, _, _>(input, sink),
        EntityWidth::Four => encode_as::<u32, _, _>(input, sink),
        EntityWidth::Eight => encode_as::<u64, _, _>(input, sink),
    }
}

fn encode_as<T, I, W>(mut input: I, sink: &mut W) -> Result<Meta>
where
    T: FixedWidth,
    I: Iterator<Item = u8> + Clone,
    W: Write + ?Sized,
{
    let mut meta = Meta::new(T::WIDTH as u8);

    let freqs = frequency_table::<T, _>(&mut input.clone())?;
    let Some(tree) = build_tree(&freqs) else {
        debug!(width = T::WIDTH, "empty input, no sections written");
        return Ok(meta);
    };
    debug!(distinct = freqs.len(), width = T::WIDTH, "built huffman tree");

    encode_entities(&tree, sink, &mut meta)?;
    encode_tree(&tree, sink, &mut meta)?;
    encode_data(&tree, &mut input, sink, &mut meta)?;

    Ok(meta)
}

/// Decode the sections described by `meta` from `src`, writing the original
/// bytes to `sink`.
///
/// `src` is consumed strictly forward: each section takes exactly the number
/// of bytes the header declares, and anything after the data section is
/// left in the iterator.
///
/// # Errors
/// A [`LayoutError`] for any malformed or truncated section, or
/// `Error::Io` if the sink fails. Output already written stays written.
pub fn decode<I, W>(meta: &Meta, src: &mut I, sink: &mut W) -> Result<()>
where
    I: Iterator<Item = u8>,
    W: Write + ?Sized,
{
    meta.validate()?;
    if meta.entity_count == 0 {
        debug!("empty archive");
        return Ok(());
    }

    let entities = decode_entities(src, meta)?;
    let tree = decode_tree(src, entities, meta)?;
    let emitted = decode_data(&tree, src, meta, sink)?;

    debug!(entities = emitted, "decoded archive");
    Ok(())
}

/// Compress `data` into a complete archive (header plus sections).
pub fn compress(width: EntityWidth, data: &[u8]) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    let meta = encode(width, data.iter().copied(), &mut body)?;

    let mut archive = Vec::with_capacity(HEADER_LEN + body.len());
    archive.extend_from_slice(&encode_header(&meta));
    archive.append(&mut body);
    Ok(archive)
}

/// Restore the original bytes from a complete archive.
///
/// # Errors
/// Everything [`decode`] reports, plus `LayoutError::TrailingBytes` when
/// the archive is longer than its header says.
pub fn decompress(archive: &[u8]) -> Result<Vec<u8>> {
    let mut src = archive.iter().copied();
    let meta = decode_header(&mut src)?;

    let mut out = Vec::new();
    decode(&meta, &mut src, &mut out)?;

    match src.len() {
        0 => Ok(out),
        trailing => Err(LayoutError::TrailingBytes(trailing).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_conversion() {
        for width in EntityWidth::ALL {
            assert_eq!(EntityWidth::try_from(width.bytes()).unwrap(), width);
        }
        assert!(matches!(
            EntityWidth::try_from(3),
            Err(Error::UnsupportedWidth(3))
        ));
        assert_eq!(EntityWidth::default(), EntityWidth::One);
        assert_eq!(EntityWidth::Four.to_string(), "4");
    }

    #[test]
    fn test_empty_input() {
        let mut out = Vec::new();
        let meta = encode(EntityWidth::Two, std::iter::empty(), &mut out).unwrap();

        assert!(out.is_empty());
        assert_eq!(meta, Meta::new(2));

        let mut decoded = Vec::new();
        decode(&meta, &mut std::iter::empty(), &mut decoded).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_sections_follow_header_counts() {
        let data = b"AAABBBCCC";
        let mut out = Vec::new();
        let meta = encode(EntityWidth::One, data.iter().copied(), &mut out).unwrap();

        assert_eq!(meta.entity_count, 3);
        assert_eq!(meta.entity_size, 1);
        assert_eq!(out.len() as u64, meta.archive_len() - HEADER_LEN as u64);
    }

    #[test]
    fn test_single_byte() {
        let archive = compress(EntityWidth::One, &[7]).unwrap();
        let meta = decode_header(&mut archive.iter().copied()).unwrap();

        assert_eq!(meta.entity_count, 1);
        assert_eq!(meta.tree_byte_count, 1);
        assert_eq!(meta.data_byte_count, 1);
        assert_eq!(decompress(&archive).unwrap(), vec![7]);
    }

    #[test]
    fn test_misaligned_input() {
        let result = compress(EntityWidth::Four, b"abcdef");
        assert!(matches!(
            result,
            Err(Error::Layout(LayoutError::UnexpectedEnd { wanted: 4, got: 2 }))
        ));
    }

    #[test]
    fn test_decode_leaves_trailing_bytes_in_stream() {
        let mut archive = compress(EntityWidth::One, b"hello").unwrap();
        archive.extend_from_slice(b"tail");

        let mut src = archive.iter().copied();
        let meta = decode_header(&mut src).unwrap();
        let mut out = Vec::new();
        decode(&meta, &mut src, &mut out).unwrap();

        assert_eq!(out, b"hello");
        assert_eq!(src.collect::<Vec<u8>>(), b"tail");
    }

    #[test]
    fn test_decompress_rejects_trailing_bytes() {
        let mut archive = compress(EntityWidth::One, b"hello").unwrap();
        archive.push(0);
        assert!(matches!(
            decompress(&archive),
            Err(Error::Layout(LayoutError::TrailingBytes(1)))
        ));
    }

    #[test]
    fn test_decode_rejects_bad_header() {
        let mut archive = compress(EntityWidth::One, b"hello").unwrap();
        archive[0] = 3;
        assert!(matches!(
            decompress(&archive),
            Err(Error::Layout(LayoutError::UnsupportedVersion(3)))
        ));
    }
}
