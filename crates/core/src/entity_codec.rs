//! Entity section serialization.
//!
//! The distinct entities (the tree's leaves) are stored as raw fixed-width
//! records in left-first leaf order, which is the order the tree decoder
//! consumes them in.

use crate::bitio::{write_fixed, FixedWidth};
use crate::error::{Error, LayoutError, Result, Section};
use crate::meta::Meta;
use crate::tree::EncodeNode;
use std::io::Write;
use tracing::debug;

/// Upper bound on records reserved up front; the header is untrusted.
const MAX_PREALLOC: usize = 1 << 16;

/// Write every leaf value of `root`, counting them into `meta.entity_count`.
pub fn encode_entities<T, S>(root: &EncodeNode<T>, sink: &mut S, meta: &mut Meta) -> Result<()>
where
    T: FixedWidth,
    S: Write + ?Sized,
{
    debug_assert_eq!(usize::from(meta.entity_size), T::WIDTH);

    for &value in root.leaves() {
        write_fixed(value, sink)?;
        meta.entity_count = meta.entity_count.checked_add(1).ok_or(Error::Capacity {
            field: "entity_count",
        })?;
    }

    debug!(entities = meta.entity_count, "encoded entity section");
    Ok(())
}

/// Read `meta.entity_count` records of `meta.entity_size` bytes each.
///
/// # Errors
/// `LayoutError::Truncated` if `src` ends before the section does.
pub fn decode_entities<I>(src: &mut I, meta: &Meta) -> Result<Vec<Box<[u8]>>>
where
    I: Iterator<Item = u8>,
{
    let size = usize::from(meta.entity_size);
    let count = meta.entity_count as usize;
    let mut entities = Vec::with_capacity(count.min(MAX_PREALLOC));
    let mut read = 0u64;

    for _ in 0..count {
        let record: Box<[u8]> = src.by_ref().take(size).collect();
        read += record.len() as u64;
        if record.len() != size {
            return Err(LayoutError::Truncated {
                section: Section::Entities,
                declared: meta.entity_section_len(),
                read,
            }
            .into());
        }
        entities.push(record);
    }

    debug!(entities = entities.len(), "decoded entity section");
    Ok(entities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::frequency_table;
    use crate::tree::build_tree;

    fn encoded<T: FixedWidth>(data: &[u8]) -> (EncodeNode<T>, Vec<u8>, Meta) {
        let freqs = frequency_table::<T, _>(&mut data.iter().copied()).unwrap();
        let tree = build_tree(&freqs).unwrap();
        let mut out = Vec::new();
        let mut meta = Meta::new(T::WIDTH as u8);
        encode_entities(&tree, &mut out, &mut meta).unwrap();
        (tree, out, meta)
    }

    #[test]
    fn test_leaf_order_layout() {
        // root[branch[a, b], c]
        let (_, out, meta) = encoded::<u8>(b"abbcccc");
        assert_eq!(out, b"abc");
        assert_eq!(meta.entity_count, 3);
    }

    #[test]
    fn test_wide_entities_native_order() {
        let mut data = Vec::new();
        for value in [0x0102u16, 0x0304, 0x0304] {
            data.extend_from_slice(&value.to_ne_bytes());
        }
        let (tree, out, meta) = encoded::<u16>(&data);

        assert_eq!(meta.entity_count, 2);
        assert_eq!(out.len(), 4);
        let expected: Vec<u8> = tree.leaves().flat_map(|v| v.to_ne_bytes()).collect();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_decode_records() {
        let (tree, out, meta) = encoded::<u32>(&[1, 0, 0, 0, 2, 0, 0, 0, 1, 0, 0, 0]);
        let entities = decode_entities(&mut out.into_iter(), &meta).unwrap();

        assert_eq!(entities.len(), 2);
        for (record, value) in entities.iter().zip(tree.leaves()) {
            assert_eq!(&record[..], &value.to_ne_bytes());
        }
    }

    #[test]
    fn test_decode_leaves_rest_of_stream() {
        let (_, mut out, meta) = encoded::<u8>(b"xy");
        out.push(0xAB);
        let mut src = out.into_iter();
        decode_entities(&mut src, &meta).unwrap();
        assert_eq!(src.next(), Some(0xAB));
    }

    #[test]
    fn test_truncated_section() {
        let (_, mut out, meta) = encoded::<u16>(&[1, 0, 2, 0, 3, 0]);
        out.pop();

        let result = decode_entities(&mut out.into_iter(), &meta);
        assert!(matches!(
            result,
            Err(Error::Layout(LayoutError::Truncated {
                section: Section::Entities,
                declared: 6,
                read: 5
            }))
        ));
    }
}
