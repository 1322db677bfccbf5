use std::ops::Range;

use proptest::prelude::*;

use crate::model;

use super::*;

fn insert_find_all(keys: &[u32]) {
    let mut tree: AvlTree<u32> = AvlTree::new();

    for &key in keys {
        tree.insert(key);
        tree.assert_invariants();
    }

    for key in keys {
        let node = tree.search(key).expect("item not found");
        assert_eq!(tree.nodes[node].key(), key);
        assert_eq!(tree.nodes[node].count(), 1);
    }
}

#[test]
fn zero_elems_find() {
    insert_find_all(&[]);
}

#[test]
fn single_elem_find() {
    insert_find_all(&[0]);
}

#[test]
fn two_elems_find() {
    insert_find_all(&[0, 1]);
    insert_find_all(&[1, 0]);
}

#[test]
fn three_elems_find() {
    insert_find_all(&[0, 1, 2]);
    insert_find_all(&[0, 2, 1]);
    insert_find_all(&[1, 0, 2]);
    insert_find_all(&[1, 2, 0]);
    insert_find_all(&[2, 0, 1]);
    insert_find_all(&[2, 1, 0]);
}

#[test]
fn four_elems_find() {
    insert_find_all(&[0, 1, 2, 3]);
    insert_find_all(&[0, 1, 3, 2]);
    insert_find_all(&[0, 2, 1, 3]);
    insert_find_all(&[0, 2, 3, 1]);
    insert_find_all(&[0, 3, 1, 2]);
    insert_find_all(&[0, 3, 2, 1]);

    insert_find_all(&[1, 0, 2, 3]);
    insert_find_all(&[1, 0, 3, 2]);
    insert_find_all(&[1, 2, 0, 3]);
    insert_find_all(&[1, 2, 3, 0]);
    insert_find_all(&[1, 3, 0, 2]);
    insert_find_all(&[1, 3, 2, 0]);

    insert_find_all(&[2, 0, 1, 3]);
    insert_find_all(&[2, 0, 3, 1]);
    insert_find_all(&[2, 1, 0, 3]);
    insert_find_all(&[2, 1, 3, 0]);
    insert_find_all(&[2, 3, 0, 1]);
    insert_find_all(&[2, 3, 1, 0]);

    insert_find_all(&[3, 0, 1, 2]);
    insert_find_all(&[3, 0, 2, 1]);
    insert_find_all(&[3, 1, 0, 2]);
    insert_find_all(&[3, 1, 2, 0]);
    insert_find_all(&[3, 2, 0, 1]);
    insert_find_all(&[3, 2, 1, 0]);
}

fn insert_remove_all(keys: &[u32]) {
    let mut tree: AvlTree<u32> = AvlTree::new();

    for &key in keys {
        tree.insert(key);
        tree.assert_invariants();
    }

    for key in keys {
        assert_eq!(tree.remove(key), Some((*key, 1)));
        tree.assert_invariants();
    }
    assert!(tree.is_empty());

    for &key in keys {
        tree.insert(key);
        tree.assert_invariants();
    }

    for key in keys.iter().rev() {
        assert_eq!(tree.remove(key), Some((*key, 1)));
        tree.assert_invariants();
    }
    assert!(tree.is_empty());
}

#[test]
fn remove_one() {
    insert_remove_all(&[0]);
}

#[test]
fn remove_two() {
    insert_remove_all(&[0, 1]);
    insert_remove_all(&[1, 0]);
}

#[test]
fn remove_three() {
    insert_remove_all(&[0, 1, 2]);
    insert_remove_all(&[0, 2, 1]);
    insert_remove_all(&[1, 0, 2]);
    insert_remove_all(&[1, 2, 0]);
    insert_remove_all(&[2, 0, 1]);
    insert_remove_all(&[2, 1, 0]);
}

#[test]
fn remove_four() {
    insert_remove_all(&[0, 1, 2, 3]);
    insert_remove_all(&[0, 1, 3, 2]);
    insert_remove_all(&[0, 2, 1, 3]);
    insert_remove_all(&[0, 2, 3, 1]);
    insert_remove_all(&[0, 3, 1, 2]);
    insert_remove_all(&[0, 3, 2, 1]);

    insert_remove_all(&[1, 0, 2, 3]);
    insert_remove_all(&[1, 0, 3, 2]);
    insert_remove_all(&[1, 2, 0, 3]);
    insert_remove_all(&[1, 2, 3, 0]);
    insert_remove_all(&[1, 3, 0, 2]);
    insert_remove_all(&[1, 3, 2, 0]);

    insert_remove_all(&[2, 0, 1, 3]);
    insert_remove_all(&[2, 0, 3, 1]);
    insert_remove_all(&[2, 1, 0, 3]);
    insert_remove_all(&[2, 1, 3, 0]);
    insert_remove_all(&[2, 3, 0, 1]);
    insert_remove_all(&[2, 3, 1, 0]);

    insert_remove_all(&[3, 0, 1, 2]);
    insert_remove_all(&[3, 0, 2, 1]);
    insert_remove_all(&[3, 1, 0, 2]);
    insert_remove_all(&[3, 1, 2, 0]);
    insert_remove_all(&[3, 2, 0, 1]);
    insert_remove_all(&[3, 2, 1, 0]);
}

#[test]
fn stays_sorted_and_balanced() {
    let keys = [
        30, 10, 20, 40, 480, 5, 4, 2, 1, 6, 2137, 35, 3000, 321, 29, 3,
    ];
    let mut tree: AvlTree<u32> = AvlTree::new();

    for key in keys {
        tree.insert(key);
        assert!(tree.is_balanced(), "unbalanced after inserting {key}");
        assert!(tree.is_fully_balanced(), "unbalanced after inserting {key}");
    }

    let mut sorted = keys.to_vec();
    sorted.sort_unstable();

    assert_eq!(
        tree.in_order().into_iter().copied().collect::<Vec<_>>(),
        sorted
    );
    assert_eq!(tree.in_order(), tree.in_order_iterative());
    assert_eq!(tree.len(), keys.len());
    tree.assert_invariants();
}

#[test]
fn balanced_insertion_needs_no_rotation() {
    let mut tree: AvlTree<u32> = AvlTree::new();
    tree.extend([2, 1, 3]);

    let root = tree.root().unwrap();
    let root_node = tree.get(root).unwrap();
    assert_eq!(*root_node.key(), 2);
    assert_eq!(root_node.height(), 1);

    let left = tree.get(root_node.left().unwrap()).unwrap();
    let right = tree.get(root_node.right().unwrap()).unwrap();
    assert_eq!((*left.key(), left.height()), (1, 0));
    assert_eq!((*right.key(), right.height()), (3, 0));
    assert_eq!(tree.height(Some(root)), 1);
}

#[test]
fn ascending_insertion_rotates_left() {
    let mut tree: AvlTree<u32> = AvlTree::new();
    tree.extend([1, 2]);
    assert_eq!(tree.get(tree.root().unwrap()).map(|n| *n.key()), Some(1));

    tree.insert(3);

    let root = tree.root().unwrap();
    assert_eq!(tree.get(root).map(|n| *n.key()), Some(2));
    assert_eq!(tree.pre_order(), [&2, &1, &3]);
    tree.assert_invariants();
}

#[test]
fn descending_insertion_rotates_right() {
    let tree: AvlTree<u32> = [3, 2, 1].into_iter().collect();

    assert_eq!(tree.pre_order(), [&2, &1, &3]);
    tree.assert_invariants();
}

#[test]
fn duplicates_bump_the_count() {
    let mut tree: AvlTree<u32> = AvlTree::new();

    assert_eq!(tree.insert(7), 1);
    assert_eq!(tree.insert(7), 2);
    assert_eq!(tree.insert(3), 1);
    assert_eq!(tree.insert(7), 3);

    assert_eq!(tree.len(), 2);
    assert_eq!(tree.count(&7), 3);
    assert_eq!(tree.count(&3), 1);
    assert_eq!(tree.count(&5), 0);
    assert_eq!(tree.in_order(), [&3, &7]);
    tree.assert_invariants();
}

#[test]
fn remove_drops_every_copy() {
    let mut tree: AvlTree<u32> = [5, 5, 5, 1, 9].into_iter().collect();

    assert_eq!(tree.remove(&5), Some((5, 3)));
    assert!(!tree.contains(&5));
    assert_eq!(tree.remove(&5), None);
    assert_eq!(tree.len(), 2);
    tree.assert_invariants();
}

#[test]
fn removing_only_key_empties_tree() {
    let mut tree: AvlTree<u32> = AvlTree::new();
    assert_eq!(tree.remove(&1), None);

    tree.insert(1);
    tree.insert(1);
    assert_eq!(tree.remove(&1), Some((1, 2)));

    assert!(tree.is_empty());
    assert_eq!(tree.root(), None);
    assert_eq!(tree.in_order(), Vec::<&u32>::new());
    tree.assert_invariants();
}

#[test]
fn removing_inner_nodes_keeps_balance() {
    let mut tree: AvlTree<u32> = (1..=15).collect();

    // The root first, then inner nodes whose successors sit further down.
    for key in [8, 4, 12, 10, 9] {
        assert_eq!(tree.remove(&key), Some((key, 1)));
        tree.assert_invariants();
        assert!(tree.is_fully_balanced());
    }

    assert_eq!(
        tree.in_order(),
        [&1, &2, &3, &5, &6, &7, &11, &13, &14, &15]
    );
}

#[test]
fn unary_removal_moves_count() {
    let mut tree: AvlTree<u32> = [2, 1, 3, 4, 4].into_iter().collect();

    // 3 has a single right child holding a count of two.
    assert_eq!(tree.remove(&3), Some((3, 1)));
    assert_eq!(tree.count(&4), 2);
    tree.assert_invariants();
}

#[test]
fn pop_from_both_ends() {
    let mut tree: AvlTree<u32> = [4, 1, 1, 9, 6].into_iter().collect();

    assert_eq!(tree.pop_first(), Some((1, 2)));
    assert_eq!(tree.pop_last(), Some((9, 1)));
    assert_eq!(tree.pop_first(), Some((4, 1)));
    assert_eq!(tree.pop_last(), Some((6, 1)));
    assert_eq!(tree.pop_first(), None);
    assert_eq!(tree.pop_last(), None);
}

#[test]
fn clear_and_reuse() {
    let mut tree: AvlTree<u32> = (0..32).collect();
    tree.clear();

    assert!(tree.is_empty());
    tree.assert_invariants();

    tree.extend([3, 1, 2]);
    assert_eq!(tree.in_order(), [&1, &2, &3]);
    tree.assert_invariants();
}

#[test]
fn debug_lists_counts() {
    let tree: AvlTree<u32> = [2, 1, 2].into_iter().collect();
    assert_eq!(format!("{tree:?}"), "{1: 1, 2: 2}");
}

#[cfg(miri)]
const FUZZ_RANGE: Range<usize> = 0..10;

#[cfg(not(miri))]
const FUZZ_RANGE: Range<usize> = 0..1000;

proptest::proptest! {
    #![proptest_config(ProptestConfig {
        max_shrink_iters: 65536,
        .. ProptestConfig::default()
    })]

    #[test]
    fn btree_equivalence(ops in proptest::collection::vec(model::op_strategy(), FUZZ_RANGE)) {
        model::run_btree_equivalence(ops);
    }

    #[test]
    fn cursor_equivalence(
        values in proptest::collection::vec(0u32..64, 0..100),
        ops in proptest::collection::vec(model::cursor_op_strategy(), FUZZ_RANGE),
    ) {
        model::run_cursor_equivalence(values, ops);
    }

    #[test]
    fn in_order_is_sorted_and_deduplicated(keys in proptest::collection::vec(0u32..500, 0..300)) {
        let tree: AvlTree<u32> = keys.iter().copied().collect();

        let mut expected = keys.clone();
        expected.sort_unstable();
        expected.dedup();

        let got = tree.in_order().into_iter().copied().collect::<Vec<_>>();
        prop_assert_eq!(got, expected);

        let total: usize = tree.iter().map(|n| n.count()).sum();
        prop_assert_eq!(total, keys.len());
    }

    #[test]
    fn height_stays_logarithmic(keys in proptest::collection::vec(any::<u32>(), 0..500)) {
        let tree: AvlTree<u32> = keys.into_iter().collect();

        // Levels of an AVL tree with n nodes are bounded by 1.4405 * log2(n + 2) - 0.3277.
        let levels = (tree.height(tree.root()) + 1) as f64;
        let bound = 1.4405 * ((tree.len() + 2) as f64).log2() - 0.3277;
        prop_assert!(levels <= bound, "{} levels for {} keys", levels, tree.len());
    }
}
