//! Prefix-code trees and the greedy Huffman builder.
//!
//! One node type serves both directions: `Node<V, W>` carries a leaf value
//! `V` and a weight annotation `W`. The encoder works on
//! [`EncodeNode<T>`] (entity value plus frequency); the decoder rebuilds a
//! [`DecodeNode`] (raw entity bytes, no weight).
//!
//! # Shape
//! - A branch has a left and a right slot; either may be empty while a tree
//!   is under construction.
//! - The only finished tree with an empty slot is the single-entity tree: a
//!   branch whose left child is the one leaf. This keeps every code at least
//!   one bit long.
//!
//! Children are exclusively owned through `Box`, so dropping the root
//! releases the whole structure.

use crate::bitio::FixedWidth;
use crate::frequency::FrequencyTable;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A node of a prefix-code tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<V, W> {
    Leaf { value: V, weight: W },
    Branch(Branch<V, W>),
}

/// An internal node with two optional children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch<V, W> {
    weight: W,
    left: Option<Box<Node<V, W>>>,
    right: Option<Box<Node<V, W>>>,
}

/// Encode-side tree: entity values weighted by frequency.
pub type EncodeNode<T> = Node<T, u64>;

/// Decode-side tree: raw entity bytes, no weights.
pub type DecodeNode = Node<Box<[u8]>, ()>;

impl<V, W> Node<V, W> {
    pub fn leaf(value: V, weight: W) -> Self {
        Node::Leaf { value, weight }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    pub fn as_branch(&self) -> Option<&Branch<V, W>> {
        match self {
            Node::Branch(branch) => Some(branch),
            Node::Leaf { .. } => None,
        }
    }

    /// Left-first pre-order traversal. Empty slots are skipped.
    pub fn pre_order(&self) -> PreOrder<'_, V, W> {
        PreOrder { stack: vec![self] }
    }

    /// Leaf values in left-first order.
    pub fn leaves(&self) -> impl Iterator<Item = &V> + '_ {
        self.pre_order().filter_map(|node| match node {
            Node::Leaf { value, .. } => Some(value),
            Node::Branch(_) => None,
        })
    }

    /// Every leaf value with its depth (root = 0), left-first.
    pub fn leaf_depths(&self) -> Vec<(&V, usize)> {
        let mut depths = Vec::new();
        let mut stack = vec![(self, 0usize)];

        while let Some((node, depth)) = stack.pop() {
            match node {
                Node::Leaf { value, .. } => depths.push((value, depth)),
                Node::Branch(branch) => {
                    if let Some(right) = branch.right() {
                        stack.push((right, depth + 1));
                    }
                    if let Some(left) = branch.left() {
                        stack.push((left, depth + 1));
                    }
                }
            }
        }

        depths
    }
}

impl<V> Node<V, u64> {
    /// Frequency this node stands for.
    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } => *weight,
            Node::Branch(branch) => branch.weight,
        }
    }
}

impl<V, W> Branch<V, W> {
    /// A branch with both slots empty.
    pub fn empty(weight: W) -> Self {
        Self {
            weight,
            left: None,
            right: None,
        }
    }

    pub fn left(&self) -> Option<&Node<V, W>> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&Node<V, W>> {
        self.right.as_deref()
    }

    /// Child selected by a code bit: `false` = left, `true` = right.
    #[inline]
    pub fn child(&self, bit: bool) -> Option<&Node<V, W>> {
        if bit {
            self.right()
        } else {
            self.left()
        }
    }

    pub fn weight(&self) -> &W {
        &self.weight
    }

    pub fn is_full(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }

    /// Place `child` in the first free slot, left before right.
    ///
    /// Hands the child back if both slots are taken.
    pub fn attach(&mut self, child: Node<V, W>) -> Result<(), Node<V, W>> {
        if self.left.is_none() {
            self.left = Some(Box::new(child));
        } else if self.right.is_none() {
            self.right = Some(Box::new(child));
        } else {
            return Err(child);
        }
        Ok(())
    }
}

impl<V, W> Drop for Branch<V, W> {
    // Iterative: a decoded tree can be as deep as its entity count.
    fn drop(&mut self) {
        if self.left.is_none() && self.right.is_none() {
            return;
        }
        let mut pending: Vec<Box<Node<V, W>>> = Vec::new();
        pending.extend(self.left.take());
        pending.extend(self.right.take());

        while let Some(mut node) = pending.pop() {
            if let Node::Branch(branch) = node.as_mut() {
                pending.extend(branch.left.take());
                pending.extend(branch.right.take());
            }
        }
    }
}

impl<V> Branch<V, u64> {
    /// Join two subtrees; the weight is the sum of both.
    pub fn join(left: Node<V, u64>, right: Node<V, u64>) -> Self {
        Self {
            weight: left.weight() + right.weight(),
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
        }
    }

    /// Wrap a lone subtree in the left slot (right stays empty).
    pub fn single(child: Node<V, u64>) -> Self {
        Self {
            weight: child.weight(),
            left: Some(Box::new(child)),
            right: None,
        }
    }
}

/// Iterator returned by [`Node::pre_order`].
#[derive(Debug)]
pub struct PreOrder<'a, V, W> {
    stack: Vec<&'a Node<V, W>>,
}

impl<'a, V, W> Iterator for PreOrder<'a, V, W> {
    type Item = &'a Node<V, W>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Node::Branch(branch) = node {
            if let Some(right) = branch.right() {
                self.stack.push(right);
            }
            if let Some(left) = branch.left() {
                self.stack.push(left);
            }
        }
        Some(node)
    }
}

/// Queue entry for the greedy merge.
///
/// Ordered so that `BinaryHeap` pops the lightest node first; equal weights
/// pop in insertion order.
#[derive(Debug)]
struct Pending<T> {
    weight: u64,
    seq: u64,
    node: EncodeNode<T>,
}

impl<T> PartialEq for Pending<T> {
    fn eq(&self, other: &Self) -> bool {
        (self.weight, self.seq) == (other.weight, other.seq)
    }
}

impl<T> Eq for Pending<T> {}

impl<T> PartialOrd for Pending<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Pending<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (lighter = higher priority)
        (other.weight, other.seq).cmp(&(self.weight, self.seq))
    }
}

/// Build an optimal prefix-code tree from entity frequencies.
///
/// Returns `None` when there are no entities. A single distinct entity
/// becomes a branch with that leaf on the left. Otherwise the two lightest
/// nodes are merged until one remains, the first one popped going left.
///
/// Entities enter the queue in ascending order, so the same frequencies
/// always give the same tree.
pub fn build_tree<T: FixedWidth>(freqs: &FrequencyTable<T>) -> Option<EncodeNode<T>> {
    let mut entries: Vec<(T, u64)> = freqs.iter().map(|(&entity, &count)| (entity, count)).collect();
    entries.sort_unstable_by_key(|&(entity, _)| entity);

    if let [(entity, count)] = entries[..] {
        return Some(Node::Branch(Branch::single(Node::leaf(entity, count))));
    }

    let mut heap = BinaryHeap::with_capacity(entries.len());
    let mut seq = 0u64;
    for (entity, count) in entries {
        heap.push(Pending {
            weight: count,
            seq,
            node: Node::leaf(entity, count),
        });
        seq += 1;
    }

    loop {
        let left = heap.pop()?;
        let Some(right) = heap.pop() else {
            return Some(left.node);
        };

        let branch = Branch::join(left.node, right.node);
        heap.push(Pending {
            weight: branch.weight,
            seq,
            node: Node::Branch(branch),
        });
        seq += 1;
    }
}
