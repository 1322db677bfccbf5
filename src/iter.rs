use core::iter::FusedIterator;

use crate::{arena::Link, AvlTree, Node};

/// An iterator over the nodes of an [`AvlTree`] in ascending key order.
///
/// Created by [`AvlTree::iter`]. Each step follows parent and child links from the previous
/// position, so no stack is kept.
pub struct Iter<'tree, T> {
    tree: &'tree AvlTree<T>,

    front: Link,
    back: Link,

    len: usize,
}

impl<'tree, T> Iter<'tree, T> {
    pub(crate) fn new(tree: &'tree AvlTree<T>) -> Self {
        Iter {
            tree,

            front: tree.first(),
            back: tree.last(),
            len: tree.len(),
        }
    }
}

impl<T> AvlTree<T> {
    /// Returns an iterator over the nodes of the tree, in ascending key order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }
}

impl<'tree, T> Iterator for Iter<'tree, T> {
    type Item = &'tree Node<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }

        let cur = self.front?;
        self.front = self.tree.successor(cur);
        self.len -= 1;

        Some(&self.tree.nodes[cur])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'tree, T> DoubleEndedIterator for Iter<'tree, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }

        let cur = self.back?;
        self.back = self.tree.predecessor(cur);
        self.len -= 1;

        Some(&self.tree.nodes[cur])
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter { ..*self }
    }
}
