//! Layout header.
//!
//! # Header Format
//!
//! ```text
//! +----------------------+
//! | version (1)          |  layout version, currently 10
//! +----------------------+
//! | tree_last_bits (1)   |  valid bits in last tree byte (0 or >7 = full)
//! +----------------------+
//! | data_last_bits (1)   |  valid bits in last data byte (0 or >7 = full)
//! +----------------------+
//! | entity_size (1)      |  bytes per entity: 1, 2, 4 or 8
//! +----------------------+
//! | entity_count (4)     |  number of leaves / distinct entities
//! +----------------------+
//! | tree_byte_count (4)  |  length of the tree section
//! +----------------------+
//! | data_byte_count (8)  |  length of the data section
//! +----------------------+
//! ```
//!
//! Multi-byte fields are written in the host's native byte order. The header
//! carries no byte-order marker, so archives only move between hosts of the
//! same endianness.
//!
//! Fields are read and written one by one; the struct's in-memory layout is
//! never serialized directly.

use crate::bitio::{read_fixed, FixedWidth};
use crate::error::{LayoutError, Result};

/// Layout version written by this implementation.
pub const FORMAT_VERSION: u8 = 10;

/// Size of the encoded header in bytes.
pub const HEADER_LEN: usize = 20;

const _: () = assert!(HEADER_LEN == 4 * u8::WIDTH + 2 * u32::WIDTH + u64::WIDTH);

/// Description of an archive's binary layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Meta {
    pub version: u8,
    pub tree_last_bits: u8,
    pub data_last_bits: u8,
    pub entity_size: u8,
    pub entity_count: u32,
    pub tree_byte_count: u32,
    pub data_byte_count: u64,
}

impl Meta {
    /// Fresh header for an archive of `entity_size`-byte entities.
    ///
    /// All counts start at zero and grow as sections are written.
    pub fn new(entity_size: u8) -> Self {
        Self {
            version: FORMAT_VERSION,
            entity_size,
            ..Self::default()
        }
    }

    /// Number of bytes in the entity section.
    pub fn entity_section_len(&self) -> u64 {
        u64::from(self.entity_count) * u64::from(self.entity_size)
    }

    /// Total archive length including this header.
    pub fn archive_len(&self) -> u64 {
        HEADER_LEN as u64
            + self.entity_section_len()
            + u64::from(self.tree_byte_count)
            + self.data_byte_count
    }

    /// Check the fields a decoder depends on before any section is read.
    pub fn validate(&self) -> std::result::Result<(), LayoutError> {
        if self.version != FORMAT_VERSION {
            return Err(LayoutError::UnsupportedVersion(self.version));
        }
        if !matches!(self.entity_size, 1 | 2 | 4 | 8) {
            return Err(LayoutError::UnsupportedEntitySize(self.entity_size));
        }
        if self.entity_count == 0 && (self.tree_byte_count != 0 || self.data_byte_count != 0) {
            return Err(LayoutError::NonEmptySections {
                tree: self.tree_byte_count,
                data: self.data_byte_count,
            });
        }
        Ok(())
    }
}

/// Encode a header into its 20-byte form.
pub fn encode_header(meta: &Meta) -> [u8; HEADER_LEN] {
    let mut bytes = [0u8; HEADER_LEN];
    let mut at = 0;
    let mut put = |field: &[u8]| {
        bytes[at..at + field.len()].copy_from_slice(field);
        at += field.len();
    };

    put(meta.version.to_ne().as_ref());
    put(meta.tree_last_bits.to_ne().as_ref());
    put(meta.data_last_bits.to_ne().as_ref());
    put(meta.entity_size.to_ne().as_ref());
    put(meta.entity_count.to_ne().as_ref());
    put(meta.tree_byte_count.to_ne().as_ref());
    put(meta.data_byte_count.to_ne().as_ref());

    bytes
}

/// Read a header from the front of `src`.
///
/// Exactly [`HEADER_LEN`] bytes are consumed on success. Field values are
/// taken verbatim; call [`Meta::validate`] (or let [`crate::decode`] do it)
/// before trusting them.
///
/// # Errors
/// `LayoutError::UnexpectedEnd` if the stream is shorter than a header.
pub fn decode_header<I: Iterator<Item = u8>>(src: &mut I) -> Result<Meta> {
    Ok(Meta {
        version: read_fixed(src)?,
        tree_last_bits: read_fixed(src)?,
        data_last_bits: read_fixed(src)?,
        entity_size: read_fixed(src)?,
        entity_count: read_fixed(src)?,
        tree_byte_count: read_fixed(src)?,
        data_byte_count: read_fixed(src)?,
    })
}
