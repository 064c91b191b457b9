//! Bit-level and fixed-width I/O primitives.
//!
//! Everything here operates MSB-first: bit position 0 is the most significant
//! bit of a byte. Sections of an archive are bit-packed back to back across
//! byte boundaries, and the header records how many bits of each section's
//! final byte are valid.
//!
//! # Last-bits convention
//! A `last_bits` value of 0, or anything above 7, means the final byte is
//! completely full. Values 1..=7 mean only that many leading bits are valid;
//! the rest is zero padding.
//!
//! # Example
//! ```
//! use huffman_core::bitio::{BitReader, BitWriter};
//! use huffman_core::error::Section;
//!
//! let mut bytes = Vec::new();
//! let mut writer = BitWriter::new(&mut bytes);
//! writer.write_code(&[true, false, true]).unwrap();
//! let packed = writer.finish().unwrap();
//! assert_eq!(bytes, vec![0b1010_0000]);
//! assert_eq!((packed.byte_count, packed.last_bits), (1, 3));
//!
//! let mut src = bytes.into_iter();
//! let mut reader = BitReader::new(&mut src, Section::Data, 1, 3);
//! assert_eq!(reader.read_bit().unwrap(), Some(true));
//! assert_eq!(reader.read_bit().unwrap(), Some(false));
//! assert_eq!(reader.read_bit().unwrap(), Some(true));
//! assert_eq!(reader.read_bit().unwrap(), None);
//! ```

use crate::error::{LayoutError, Section};
use std::fmt;
use std::hash::Hash;
use std::io::{self, Write};

/// Highest valid bit position inside a byte.
pub const MAX_BIT_POS: u8 = 7;

/// Test the bit at `pos` (offset from the MSB).
#[inline]
pub fn get_bit(byte: u8, pos: u8) -> bool {
    debug_assert!(pos <= MAX_BIT_POS, "bit position {pos} out of range");
    byte & (0x80 >> pos) != 0
}

/// Return `byte` with the bit at `pos` (offset from the MSB) set to 1.
#[inline]
pub fn set_bit(byte: u8, pos: u8) -> u8 {
    debug_assert!(pos <= MAX_BIT_POS, "bit position {pos} out of range");
    byte | (0x80 >> pos)
}

/// Number of valid bits in a section's final byte.
#[inline]
pub fn valid_bits(last_bits: u8) -> u8 {
    if last_bits == 0 || last_bits > MAX_BIT_POS {
        8
    } else {
        last_bits
    }
}

/// Unsigned integers that travel as raw native-order bytes.
///
/// Entities and header fields both use this representation, so archives
/// are only portable between hosts with the same byte order.
pub trait FixedWidth: Copy + Eq + Ord + Hash + fmt::Debug {
    /// Encoded size in bytes
    const WIDTH: usize;

    /// Byte buffer of exactly `WIDTH` bytes
    type Bytes: AsRef<[u8]> + AsMut<[u8]> + Default;

    fn from_ne(bytes: Self::Bytes) -> Self;

    fn to_ne(self) -> Self::Bytes;
}

macro_rules! impl_fixed_width {
    ($($ty:ty),*) => {
        $(
            impl FixedWidth for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();
                type Bytes = [u8; std::mem::size_of::<$ty>()];

                #[inline]
                fn from_ne(bytes: Self::Bytes) -> Self {
                    <$ty>::from_ne_bytes(bytes)
                }

                #[inline]
                fn to_ne(self) -> Self::Bytes {
                    self.to_ne_bytes()
                }
            }
        )*
    };
}

impl_fixed_width!(u8, u16, u32, u64);

/// Read one `T` from a byte stream.
///
/// Consumes exactly `T::WIDTH` bytes. If the stream runs dry first the
/// partial value is discarded, the iterator is left exhausted and
/// `LayoutError::UnexpectedEnd` is returned.
pub fn read_fixed<T, I>(src: &mut I) -> Result<T, LayoutError>
where
    T: FixedWidth,
    I: Iterator<Item = u8>,
{
    let mut bytes = T::Bytes::default();
    for (got, slot) in bytes.as_mut().iter_mut().enumerate() {
        *slot = src.next().ok_or(LayoutError::UnexpectedEnd {
            wanted: T::WIDTH,
            got,
        })?;
    }
    Ok(T::from_ne(bytes))
}

/// Write `value` as `T::WIDTH` native-order bytes.
pub fn write_fixed<T, W>(value: T, sink: &mut W) -> io::Result<()>
where
    T: FixedWidth,
    W: Write + ?Sized,
{
    sink.write_all(value.to_ne().as_ref())
}

/// Size of a finished bit-packed section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Packed {
    /// Bytes emitted, including a final partial byte
    pub byte_count: u64,
    /// Valid bits in the final byte (0 = full)
    pub last_bits: u8,
}

/// Writes bits MSB-first into a byte sink.
///
/// Accumulates bits in a single byte and forwards each completed byte to
/// the sink. When finished, pads the final partial byte with zeros.
///
/// # Invariants
/// - `bit_count` is always < 8
#[derive(Debug)]
pub struct BitWriter<W> {
    sink: W,
    /// Accumulator for the current partial byte (MSB-aligned)
    byte: u8,
    /// Number of bits in `byte` (0-7)
    bit_count: u8,
    /// Completed bytes forwarded to the sink
    bytes_written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            byte: 0,
            bit_count: 0,
            bytes_written: 0,
        }
    }

    /// Append one bit.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        if bit {
            self.byte = set_bit(self.byte, self.bit_count);
        }
        self.bit_count += 1;

        if self.bit_count == 8 {
            self.sink.write_all(&[self.byte])?;
            self.bytes_written += 1;
            self.byte = 0;
            self.bit_count = 0;
        }
        Ok(())
    }

    /// Append a sequence of bits in order.
    pub fn write_code(&mut self, bits: &[bool]) -> io::Result<()> {
        bits.iter().try_for_each(|&bit| self.write_bit(bit))
    }

    /// Total number of bits written so far (including the partial byte).
    pub fn bit_len(&self) -> u64 {
        self.bytes_written * 8 + u64::from(self.bit_count)
    }

    /// Flush the partial byte, if any, and report the section size.
    pub fn finish(mut self) -> io::Result<Packed> {
        if self.bit_count > 0 {
            self.sink.write_all(&[self.byte])?;
            self.bytes_written += 1;
        }
        Ok(Packed {
            byte_count: self.bytes_written,
            last_bits: self.bit_count,
        })
    }
}

/// Reads the bits of one archive section, MSB-first.
///
/// The reader pulls bytes lazily from a shared forward-only stream and never
/// takes more than `declared` bytes from it; the final byte is further
/// limited by `last_bits`. A zero-byte section yields no bits and reads
/// nothing.
#[derive(Debug)]
pub struct BitReader<'a, I> {
    src: &'a mut I,
    section: Section,
    declared: u64,
    last_bits: u8,
    /// Bytes pulled from `src` so far
    read: u64,
    byte: u8,
    /// Next bit position in `byte`
    pos: u8,
    /// Valid bits in `byte`
    end: u8,
    bits_read: u64,
}

impl<'a, I: Iterator<Item = u8>> BitReader<'a, I> {
    pub fn new(src: &'a mut I, section: Section, declared: u64, last_bits: u8) -> Self {
        Self {
            src,
            section,
            declared,
            last_bits,
            read: 0,
            byte: 0,
            pos: 0,
            end: 0,
            bits_read: 0,
        }
    }

    /// Read the next bit, or `None` once the section is used up.
    ///
    /// # Errors
    /// `LayoutError::Truncated` if the stream ends before the declared
    /// byte count.
    pub fn read_bit(&mut self) -> Result<Option<bool>, LayoutError> {
        if self.pos == self.end {
            if self.read == self.declared {
                return Ok(None);
            }
            self.byte = self.src.next().ok_or(LayoutError::Truncated {
                section: self.section,
                declared: self.declared,
                read: self.read,
            })?;
            self.read += 1;
            self.pos = 0;
            self.end = if self.read == self.declared {
                valid_bits(self.last_bits)
            } else {
                8
            };
        }

        let bit = get_bit(self.byte, self.pos);
        self.pos += 1;
        self.bits_read += 1;
        Ok(Some(bit))
    }

    /// Number of bits handed out so far.
    pub fn bit_position(&self) -> u64 {
        self.bits_read
    }

    /// Number of bytes taken from the underlying stream.
    pub fn bytes_read(&self) -> u64 {
        self.read
    }
}
