//! Data section serialization.
//!
//! The original entity stream is stored as the concatenation of each
//! entity's code, packed MSB-first. Decoding walks the rebuilt tree one bit
//! at a time and emits an entity every time the walk lands on a leaf.

use crate::bitio::{read_fixed, BitReader, BitWriter, FixedWidth};
use crate::code_table::build_code_table;
use crate::error::{Error, LayoutError, Result, Section};
use crate::meta::Meta;
use crate::tree::{DecodeNode, EncodeNode, Node};
use std::io::Write;
use tracing::debug;

/// Encode every entity of `src` with the codes of `root`.
///
/// `src` must be the same entity stream the tree was built from, read from
/// its start. Sets `data_byte_count` and `data_last_bits`.
pub fn encode_data<T, I, S>(
    root: &EncodeNode<T>,
    src: &mut I,
    sink: &mut S,
    meta: &mut Meta,
) -> Result<()>
where
    T: FixedWidth,
    I: Iterator<Item = u8>,
    S: Write + ?Sized,
{
    let table = build_code_table(Some(root));
    let mut writer = BitWriter::new(&mut *sink);
    let mut src = src.peekable();

    while src.peek().is_some() {
        let entity: T = read_fixed(&mut src)?;
        let code = table
            .get(&entity)
            .ok_or_else(|| Error::UnknownEntity(format!("{entity:?}")))?;
        writer.write_code(code)?;
    }

    let packed = writer.finish()?;
    meta.data_byte_count = packed.byte_count;
    meta.data_last_bits = packed.last_bits;

    debug!(
        bytes = meta.data_byte_count,
        last_bits = meta.data_last_bits,
        "encoded data section"
    );
    Ok(())
}

/// Decode the data section by walking `root`, writing entity bytes to `sink`.
///
/// Reads exactly `meta.data_byte_count` bytes from `src`. Returns the number
/// of entities written.
///
/// # Errors
/// A [`LayoutError`] if the section is truncated, a bit leads off the tree,
/// or the last valid bit stops partway down a code.
pub fn decode_data<I, S>(root: &DecodeNode, src: &mut I, meta: &Meta, sink: &mut S) -> Result<u64>
where
    I: Iterator<Item = u8>,
    S: Write + ?Sized,
{
    let mut reader = BitReader::new(
        src,
        Section::Data,
        meta.data_byte_count,
        meta.data_last_bits,
    );
    let mut walker = root;
    let mut emitted = 0u64;

    while let Some(go_right) = reader.read_bit()? {
        let next = walker
            .as_branch()
            .and_then(|branch| branch.child(go_right))
            .ok_or(LayoutError::InvalidCode {
                bit: reader.bit_position() - 1,
            })?;

        match next {
            Node::Leaf { value, .. } => {
                sink.write_all(value)?;
                emitted += 1;
                walker = root;
            }
            Node::Branch(_) => walker = next,
        }
    }

    if !std::ptr::eq(walker, root) {
        return Err(LayoutError::TruncatedCode.into());
    }

    debug!(entities = emitted, "decoded data section");
    Ok(emitted)
}
