//! Tree section serialization.
//!
//! The tree's shape is written as a pre-order bitstream, left child first:
//! `0` for a branch (its children follow), `1` for a leaf. Empty slots emit
//! nothing. Leaf values are not part of this section; they travel in the
//! entity section in the same left-first order and are paired up again on
//! decode.
//!
//! ```text
//!          *            bits: 0 0 1 1 1
//!         / \
//!        *   c          leaves in order: a, b, c
//!       / \
//!      a   b
//! ```

use crate::bitio::{BitReader, BitWriter};
use crate::error::{Error, LayoutError, Result, Section};
use crate::meta::Meta;
use crate::tree::{Branch, DecodeNode, Node};
use std::io::Write;
use tracing::debug;

/// Write the shape of `root` and record its size in `meta`.
///
/// Sets `tree_byte_count` and `tree_last_bits`.
pub fn encode_tree<V, W, S>(root: &Node<V, W>, sink: &mut S, meta: &mut Meta) -> Result<()>
where
    S: Write + ?Sized,
{
    let mut writer = BitWriter::new(&mut *sink);
    for node in root.pre_order() {
        writer.write_bit(node.is_leaf())?;
    }
    let packed = writer.finish()?;

    meta.tree_byte_count = u32::try_from(packed.byte_count).map_err(|_| Error::Capacity {
        field: "tree_byte_count",
    })?;
    meta.tree_last_bits = packed.last_bits;

    debug!(
        bytes = meta.tree_byte_count,
        last_bits = meta.tree_last_bits,
        "encoded tree section"
    );
    Ok(())
}

/// Rebuild a tree from its shape bits and its leaf values.
///
/// Reads exactly `meta.tree_byte_count` bytes from `src`. Open branches sit
/// on a stack; each leaf goes into the first free slot of the top branch,
/// and every branch that fills up is popped and attached to the one below
/// it.
///
/// # Errors
/// A [`LayoutError`] if the section is truncated, a leaf appears with no
/// open branch, a branch overflows, the leaf list runs out or is not used
/// up exactly, or the bits do not close into a single complete tree.
pub fn decode_tree<I>(src: &mut I, entities: Vec<Box<[u8]>>, meta: &Meta) -> Result<DecodeNode>
where
    I: Iterator<Item = u8>,
{
    let supplied = entities.len();
    let mut leaves = entities.into_iter();
    let mut placed = 0u64;
    let mut stack: Vec<Branch<Box<[u8]>, ()>> = Vec::new();

    let mut reader = BitReader::new(
        src,
        Section::Tree,
        u64::from(meta.tree_byte_count),
        meta.tree_last_bits,
    );

    while let Some(is_leaf) = reader.read_bit()? {
        let bit = reader.bit_position() - 1;

        if !is_leaf {
            stack.push(Branch::empty(()));
            continue;
        }

        let top = stack.last_mut().ok_or(LayoutError::UnexpectedLeaf { bit })?;
        let value = leaves.next().ok_or(LayoutError::MissingLeaf {
            available: supplied,
        })?;
        top.attach(Node::leaf(value, ()))
            .map_err(|_| LayoutError::BranchFull { bit })?;
        placed += 1;

        // fold finished branches into their parents
        while stack.len() > 1 && stack.last().is_some_and(Branch::is_full) {
            let Some(done) = stack.pop() else { break };
            let Some(parent) = stack.last_mut() else { break };
            parent
                .attach(Node::Branch(done))
                .map_err(|_| LayoutError::BranchFull { bit })?;
        }
    }

    if placed != u64::from(meta.entity_count) || placed != supplied as u64 {
        return Err(LayoutError::EntityCountMismatch {
            declared: meta.entity_count,
            placed,
            supplied,
        }
        .into());
    }

    match (stack.pop(), stack.is_empty()) {
        (Some(root), true) if is_complete(&root) => {
            debug!(entities = placed, "decoded tree section");
            Ok(Node::Branch(root))
        }
        (root, _) => Err(LayoutError::IncompleteTree {
            open: stack.len() + usize::from(root.is_some()),
        }
        .into()),
    }
}

/// A root is complete when both slots are filled, or when it is the
/// single-entity shape: one leaf on the left, nothing on the right.
fn is_complete<V, W>(root: &Branch<V, W>) -> bool {
    root.is_full() || (root.right().is_none() && root.left().is_some_and(Node::is_leaf))
}
