//! Property-based tests for the codec.
//!
//! These tests verify that the following hold across arbitrary inputs:
//! - compress/decompress returns the input for every entity width
//! - branch weights equal the sum of their children
//! - heavier entities never sit deeper than lighter ones
//! - codes are prefix-free and use the whole code space
//! - damaged archives are rejected without panicking

use proptest::prelude::*;

use huffman_core::code_table::build_code_table;
use huffman_core::frequency::frequency_table;
use huffman_core::tree::{build_tree, EncodeNode, Node};
use huffman_core::{compress, decompress, EntityWidth};

/// Strategy for entity widths.
fn width_strategy() -> impl Strategy<Value = EntityWidth> {
    prop_oneof![
        Just(EntityWidth::One),
        Just(EntityWidth::Two),
        Just(EntityWidth::Four),
        Just(EntityWidth::Eight),
    ]
}

/// Strategy for byte input with a skewed distribution, so both short and
/// long codes show up.
fn skewed_bytes_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        prop_oneof![
            8 => 0u8..4,
            3 => 0u8..32,
            1 => any::<u8>(),
        ],
        0..2048,
    )
}

fn build(data: &[u8]) -> Option<EncodeNode<u8>> {
    let freqs = frequency_table::<u8, _>(&mut data.iter().copied()).ok()?;
    build_tree(&freqs)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        max_shrink_iters: 200,
        ..ProptestConfig::default()
    })]

    /// Property: decompressing a compressed input gives the input back.
    #[test]
    fn prop_round_trip(
        width in width_strategy(),
        mut data in skewed_bytes_strategy(),
    ) {
        let width_bytes = usize::from(width.bytes());
        data.truncate(data.len() - data.len() % width_bytes);

        let archive = compress(width, &data).unwrap();
        let decoded = decompress(&archive).unwrap();
        prop_assert_eq!(decoded, data);
    }

    /// Property: every branch weighs exactly what its children weigh.
    #[test]
    fn prop_branch_weight_is_sum_of_children(data in skewed_bytes_strategy()) {
        if let Some(tree) = build(&data) {
            prop_assert_eq!(tree.weight(), data.len() as u64);

            for node in tree.pre_order() {
                if let Node::Branch(branch) = node {
                    let left = branch.left().map_or(0, Node::weight);
                    let right = branch.right().map_or(0, Node::weight);
                    prop_assert_eq!(*branch.weight(), left + right);
                }
            }
        }
    }

    /// Property: a more frequent entity is never deeper than a less frequent one.
    #[test]
    fn prop_heavier_is_not_deeper(data in skewed_bytes_strategy()) {
        if let Some(tree) = build(&data) {
            let leaves: Vec<(u64, usize)> = tree
                .pre_order()
                .filter(|node| node.is_leaf())
                .map(Node::weight)
                .zip(tree.leaf_depths().into_iter().map(|(_, depth)| depth))
                .collect();

            for &(heavy, heavy_depth) in &leaves {
                for &(light, light_depth) in &leaves {
                    if heavy > light {
                        prop_assert!(
                            heavy_depth <= light_depth,
                            "weight {} at depth {}, weight {} at depth {}",
                            heavy, heavy_depth, light, light_depth
                        );
                    }
                }
            }
        }
    }

    /// Property: no code is a prefix of another, and with two or more
    /// entities the code lengths satisfy Kraft's equality.
    #[test]
    fn prop_codes_prefix_free_and_complete(data in skewed_bytes_strategy()) {
        let tree = build(&data);
        let table = build_code_table(tree.as_ref());
        let distinct = data.iter().collect::<std::collections::HashSet<_>>().len();
        prop_assert_eq!(table.len(), distinct);

        let codes: Vec<&Vec<bool>> = table.values().collect();
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                prop_assert!(!a.starts_with(b) && !b.starts_with(a));
            }
        }

        if distinct >= 2 {
            let max_len = codes.iter().map(|code| code.len()).max().unwrap_or(0);
            prop_assume!(max_len < 64);
            let space: u64 = codes.iter().map(|code| 1u64 << (max_len - code.len())).sum();
            prop_assert_eq!(space, 1u64 << max_len);
        }
    }

    /// Property: an archive missing its last byte never decodes.
    #[test]
    fn prop_truncated_archive_is_rejected(
        data in prop::collection::vec(any::<u8>(), 1..512),
    ) {
        let mut archive = compress(EntityWidth::One, &data).unwrap();
        archive.pop();
        prop_assert!(decompress(&archive).is_err());
    }

    /// Property: flipping any byte never panics, and if decoding still
    /// succeeds the output has whole entities only.
    #[test]
    fn prop_corrupted_archive_does_not_panic(
        data in prop::collection::vec(any::<u8>(), 1..512),
        index in any::<prop::sample::Index>(),
        flip in 1u8..=255,
    ) {
        let mut archive = compress(EntityWidth::Two, &data[..data.len() & !1]).unwrap();
        let at = index.index(archive.len());
        archive[at] ^= flip;

        if let Ok(decoded) = decompress(&archive) {
            let width = usize::from(archive[3]);
            prop_assert_eq!(decoded.len() % width, 0);
        }
    }
}
