//! A height-balanced binary search tree (AVL tree) that counts duplicate insertions.
//!
//! Every distinct key occupies one node; inserting an equal key again bumps that node's count
//! instead of growing the tree. Nodes live in an arena and refer to each other by [`NodeId`], so
//! the parent back-links used for successor/predecessor navigation never own anything.

// Conventions used in comments:
// - The height of a node `x` is denoted `h(x)`. A leaf has height 0 and a missing child has
//   height -1.
// - The balance factor of `x` is `h(left(x)) - h(right(x))`.
// - A node is left-heavy if its balance factor is positive, and right-heavy if negative.
//
// The invariants of the tree, holding between public calls:
// 1. For every node, all keys in its left subtree are less than its key and all keys in its right
//    subtree are greater.
// 2. No two nodes hold equal keys, and every count is at least 1.
// 3. Every child's parent link points at the node holding it; the root has no parent.
// 4. Every balance factor is -1, 0 or 1.
// 5. Every cached height equals `1 + max(h(left), h(right))`.
//
// Corollary of (4): a node with exactly one child has a leaf as that child.

use core::{borrow::Borrow, cmp::Ordering, fmt};

use tracing::trace;

mod arena;
mod balance;
mod check;
mod cursor;
mod debug;
mod iter;
mod nav;
mod traverse;

#[cfg(any(test, feature = "model"))]
pub mod model;

#[cfg(test)]
mod tests;

use arena::{Arena, Dir, Link};

pub use arena::{Node, NodeId};
pub use check::IntegrityError;
pub use cursor::{Cursor, CursorMut};
pub use debug::Shape;
pub use iter::Iter;

/// An ordered multiset backed by an AVL tree.
#[derive(Clone)]
pub struct AvlTree<T> {
    nodes: Arena<T>,
    root: Link,
    len: usize,
}

impl<T> AvlTree<T> {
    /// Returns a new empty tree.
    pub const fn new() -> AvlTree<T> {
        AvlTree {
            nodes: Arena::new(),
            root: None,
            len: 0,
        }
    }

    /// Returns `true` if the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        let empty = self.len() == 0;
        debug_assert_eq!(empty, self.root.is_none());
        empty
    }

    /// Returns the number of distinct keys in the tree.
    ///
    /// Duplicate insertions are not counted; see [`Node::count`].
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the root node, if any.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Returns the node behind `id`, or `None` if it has been removed.
    pub fn get(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(id)
    }

    /// Removes every key from the tree.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    /// Removes the minimum key, returning it with its count.
    pub fn pop_first(&mut self) -> Option<(T, usize)> {
        let first = self.first()?;
        Some(self.remove_at(first))
    }

    /// Removes the maximum key, returning it with its count.
    pub fn pop_last(&mut self) -> Option<(T, usize)> {
        let last = self.last()?;
        Some(self.remove_at(last))
    }

    /// Removes the node `node` from the tree, returning the key and count it held.
    ///
    /// Nodes with children are not unlinked themselves: they take over the content of a
    /// descendant, and that descendant is unlinked in their place. The handles of the removed key
    /// and of the donating descendant are therefore both invalidated, while `node` may now refer
    /// to a different key.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not an element of this tree.
    pub(crate) fn remove_at(&mut self, node: NodeId) -> (T, usize) {
        let parent = self.nodes[node].parent();
        let left = self.nodes[node].left();
        let right = self.nodes[node].right();

        // There are three possible cases:
        //
        // 1. `node` is a leaf. It is unlinked from its parent, or the tree becomes empty if it is
        //    the root. Rebalancing starts at the former parent.
        //
        // 2. `node` has one child. By the balance invariant that child is a leaf; its content is
        //    moved into `node` and the child is unlinked. Rebalancing starts at `node`.
        //
        // 3. `node` has two children. Its successor (the minimum of the right subtree, which has
        //    no left child) donates its content to `node` and is replaced by its own right child.
        //    Rebalancing starts at the successor's former parent, which is `node` itself or one of
        //    its descendants, so the walk passes through `node` as well.
        let (removed, edited) = match (left, right) {
            (None, None) => {
                trace!(%node, "removing leaf");
                self.replace_child_or_set_root(parent, node, None);

                (self.nodes.free(node).into_content(), parent)
            }

            (Some(child), None) | (None, Some(child)) => {
                trace!(%node, %child, "removing unary node");
                debug_assert!(self.nodes[child].is_leaf());

                let dir = self.which_child(node, child);
                self.nodes[node].set_child(dir, None);

                // Adopt any grandchildren so nothing is lost should the child not be a leaf.
                let absorbed = self.nodes.free(child);
                for dir in [Dir::Left, Dir::Right] {
                    let grandchild = absorbed.child(dir);
                    self.nodes[node].set_child(dir, grandchild);
                    self.maybe_set_parent(grandchild, Some(node));
                }

                let (key, count) = absorbed.into_content();
                (self.nodes[node].replace_content(key, count), Some(node))
            }

            (Some(_), Some(right)) => {
                let successor = self
                    .find_min(Some(right))
                    .expect("right subtree must have a minimum");
                let successor_parent = self.nodes[successor]
                    .parent()
                    .expect("successor must have a parent");
                let successor_right = self.nodes[successor].right();
                debug_assert!(self.nodes[successor].left().is_none());

                trace!(%node, %successor, "removing binary node");

                // Elevate the successor's right child to replace it.
                self.replace_child(successor_parent, successor, successor_right);
                self.maybe_set_parent(successor_right, Some(successor_parent));

                let (key, count) = self.nodes.free(successor).into_content();
                (
                    self.nodes[node].replace_content(key, count),
                    Some(successor_parent),
                )
            }
        };

        self.len -= 1;

        self.refresh_heights(edited);
        self.rebalance(edited);

        removed
    }

    // Support methods ========================================================

    #[inline]
    fn maybe_set_parent(&mut self, opt_node: Link, parent: Link) {
        let Some(node) = opt_node else {
            return;
        };

        self.nodes[node].set_parent(parent);
    }

    #[inline]
    fn replace_child_or_set_root(&mut self, parent: Link, old_child: NodeId, new_child: Link) {
        match parent {
            Some(parent) => self.replace_child(parent, old_child, new_child),
            None => self.root = new_child,
        }
    }

    // Replaces the child link of `parent` pointing at `old_child` with `new_child`.
    //
    // `new_child`'s parent link is not updated.
    fn replace_child(&mut self, parent: NodeId, old_child: NodeId, new_child: Link) {
        let dir = self.which_child(parent, old_child);

        if let Some(new_child) = new_child {
            debug_assert_ne!(
                self.nodes[parent].child(!dir),
                Some(new_child),
                "`new_child` must not be a child of `parent`"
            );
        }

        self.nodes[parent].set_child(dir, new_child);
    }

    fn which_child(&self, parent: NodeId, child: NodeId) -> Dir {
        if self.nodes[parent].left() == Some(child) {
            Dir::Left
        } else {
            debug_assert_eq!(
                self.nodes[parent].right(),
                Some(child),
                "`child` must be a child of `parent`"
            );
            Dir::Right
        }
    }
}

impl<T: Ord> AvlTree<T> {
    /// Inserts `key` into the tree, returning its multiplicity after the insertion.
    ///
    /// If an equal key is already present its count is incremented and the tree structure is left
    /// untouched. Otherwise a new leaf is attached and the tree is rebalanced.
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn insert(&mut self, key: T) -> usize {
        let Some(root) = self.root else {
            // Tree is empty. Set `key` as the root and return.
            let node = self.nodes.alloc(Node::new(key, None));
            trace!(%node, "inserted root");

            self.root = Some(node);
            self.len += 1;
            return 1;
        };

        let mut parent = root;

        // Descend the tree, looking for either an equal key or a free slot.
        let dir = loop {
            let dir = match key.cmp(self.nodes[parent].key()) {
                Ordering::Less => Dir::Left,
                Ordering::Equal => {
                    let count = self.nodes[parent].increment();
                    trace!(node = %parent, count, "incremented count");
                    return count;
                }
                Ordering::Greater => Dir::Right,
            };

            match self.nodes[parent].child(dir) {
                Some(child) => parent = child,
                None => break dir,
            }
        };

        let node = self.nodes.alloc(Node::new(key, Some(parent)));
        self.nodes[parent].set_child(dir, Some(node));
        self.len += 1;

        trace!(%node, %parent, ?dir, "attached leaf");

        self.refresh_heights(Some(node));
        self.rebalance(Some(node));

        1
    }

    /// Removes `key` from the tree, returning the stored key and its count.
    ///
    /// The node is removed outright whatever its count; a key inserted `n` times disappears after
    /// a single removal. Returns `None` if the key is absent.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<(T, usize)>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.search(key)?;
        Some(self.remove_at(node))
    }
}

impl<T> Default for AvlTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for AvlTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|node| (node.key(), node.count())))
            .finish()
    }
}

impl<T: Ord> FromIterator<T> for AvlTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = AvlTree::new();
        tree.extend(iter);
        tree
    }
}

impl<T: Ord> Extend<T> for AvlTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'tree, T> IntoIterator for &'tree AvlTree<T> {
    type Item = &'tree Node<T>;
    type IntoIter = Iter<'tree, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
