//! Code table derivation.
//!
//! A code is the path from the root to an entity's leaf: `false` for every
//! step into a left child, `true` for every step into a right child.

use crate::tree::Node;
use std::collections::HashMap;
use std::hash::Hash;

/// Root-to-leaf bit path.
pub type Code = Vec<bool>;

/// Entity → code.
pub type CodeTable<V> = HashMap<V, Code>;

/// Derive the code of every leaf in `root`.
///
/// A missing tree gives an empty table.
pub fn build_code_table<V, W>(root: Option<&Node<V, W>>) -> CodeTable<V>
where
    V: Copy + Eq + Hash,
{
    let mut table = CodeTable::new();
    let mut stack: Vec<(&Node<V, W>, Code)> = root.into_iter().map(|node| (node, Code::new())).collect();

    while let Some((node, path)) = stack.pop() {
        match node {
            Node::Leaf { value, .. } => {
                table.insert(*value, path);
            }
            Node::Branch(branch) => {
                if let Some(right) = branch.right() {
                    let mut right_path = path.clone();
                    right_path.push(true);
                    stack.push((right, right_path));
                }
                if let Some(left) = branch.left() {
                    let mut left_path = path;
                    left_path.push(false);
                    stack.push((left, left_path));
                }
            }
        }
    }

    table
}
