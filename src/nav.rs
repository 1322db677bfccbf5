use core::{borrow::Borrow, cmp::Ordering};

use crate::{arena::Dir, AvlTree, NodeId};

impl<T> AvlTree<T> {
    /// Returns the node holding `key`, if any.
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn search<Q>(&self, key: &Q) -> Option<NodeId>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut opt_cur = self.root;

        loop {
            let cur = opt_cur?;

            match key.cmp(self.nodes[cur].key().borrow()) {
                Ordering::Less => opt_cur = self.nodes[cur].left(),
                Ordering::Equal => return Some(cur),
                Ordering::Greater => opt_cur = self.nodes[cur].right(),
            }
        }
    }

    /// Returns `true` if the tree contains `key`.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search(key).is_some()
    }

    /// Returns how many times `key` was inserted, or 0 if it is absent.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search(key)
            .map(|n| self.nodes[n].count())
            .unwrap_or_default()
    }

    /// Returns the node holding the minimum key.
    pub fn first(&self) -> Option<NodeId> {
        self.find_min(self.root)
    }

    /// Returns the node holding the maximum key.
    pub fn last(&self) -> Option<NodeId> {
        self.find_max(self.root)
    }

    /// Returns the minimum node of the subtree rooted at `node`.
    pub fn find_min(&self, node: Option<NodeId>) -> Option<NodeId> {
        self.extreme(node, Dir::Left)
    }

    /// Returns the maximum node of the subtree rooted at `node`.
    pub fn find_max(&self, node: Option<NodeId>) -> Option<NodeId> {
        self.extreme(node, Dir::Right)
    }

    fn extreme(&self, node: Option<NodeId>, dir: Dir) -> Option<NodeId> {
        let mut cur = node?;

        while let Some(child) = self.nodes[cur].child(dir) {
            cur = child;
        }

        Some(cur)
    }

    /// Returns the node holding the next greater key after `node`'s.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not an element of this tree.
    pub fn successor(&self, node: NodeId) -> Option<NodeId> {
        self.neighbour(node, Dir::Right)
    }

    /// Returns the node holding the next smaller key before `node`'s.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not an element of this tree.
    pub fn predecessor(&self, node: NodeId) -> Option<NodeId> {
        self.neighbour(node, Dir::Left)
    }

    // The in-order neighbour of `node` in direction `dir`: the extreme `!dir` node of the `dir`
    // subtree if there is one, otherwise the first ancestor reached by climbing out of a `!dir`
    // child.
    fn neighbour(&self, node: NodeId, dir: Dir) -> Option<NodeId> {
        if let Some(child) = self.nodes[node].child(dir) {
            return self.extreme(Some(child), !dir);
        }

        let mut cur = node;
        while let Some(parent) = self.nodes[cur].parent() {
            if self.nodes[parent].child(!dir) == Some(cur) {
                return Some(parent);
            }
            cur = parent;
        }

        None
    }

    /// Returns the node holding the smallest key strictly greater than `key`.
    pub fn next_above<Q>(&self, key: &Q) -> Option<NodeId>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.bound(key, Ordering::Greater)
    }

    /// Returns the node holding the greatest key strictly less than `key`.
    pub fn next_below<Q>(&self, key: &Q) -> Option<NodeId>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.bound(key, Ordering::Less)
    }

    // Descends towards `key`, remembering the last node whose key compared as `side` to it.
    fn bound<Q>(&self, key: &Q, side: Ordering) -> Option<NodeId>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut best = None;
        let mut opt_cur = self.root;

        while let Some(cur) = opt_cur {
            let ordering = key.cmp(self.nodes[cur].key().borrow()).reverse();

            opt_cur = if ordering == side {
                best = Some(cur);
                // Look for a closer candidate on the side facing `key`.
                match side {
                    Ordering::Greater => self.nodes[cur].left(),
                    _ => self.nodes[cur].right(),
                }
            } else {
                match side {
                    Ordering::Greater => self.nodes[cur].right(),
                    _ => self.nodes[cur].left(),
                }
            };
        }

        best
    }

    /// Returns the height of the subtree rooted at `node`, recomputed from scratch.
    ///
    /// An absent node has height -1 and a leaf has height 0. Unlike [`Node::height`](crate::Node::height)
    /// this does not trust the cached value.
    pub fn height(&self, node: Option<NodeId>) -> i32 {
        match node {
            None => -1,
            Some(n) => {
                let n = &self.nodes[n];
                1 + self.height(n.left()).max(self.height(n.right()))
            }
        }
    }

    /// Returns `true` if the root's two subtrees differ in height by at most one.
    ///
    /// Only the root is examined; see [`is_fully_balanced`](Self::is_fully_balanced) for a check
    /// of every node.
    pub fn is_balanced(&self) -> bool {
        let Some(root) = self.root else {
            return true;
        };

        let root = &self.nodes[root];
        (self.height(root.left()) - self.height(root.right())).abs() <= 1
    }

    /// Returns `true` if every node's subtrees differ in recomputed height by at most one.
    pub fn is_fully_balanced(&self) -> bool {
        self.balanced_height(self.root).is_some()
    }

    // Returns the recomputed height of `node`, or `None` if any node below is unbalanced.
    fn balanced_height(&self, node: Option<NodeId>) -> Option<i32> {
        let Some(n) = node else {
            return Some(-1);
        };

        let left = self.balanced_height(self.nodes[n].left())?;
        let right = self.balanced_height(self.nodes[n].right())?;

        ((left - right).abs() <= 1).then_some(1 + left.max(right))
    }
}
