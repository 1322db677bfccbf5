use tracing::trace;

use crate::{
    arena::{Dir, Link},
    AvlTree, NodeId,
};

impl<T> AvlTree<T> {
    /// Returns the cached height of `node`, or -1 if there is no node.
    #[inline]
    pub(crate) fn cached_height(&self, node: Link) -> i8 {
        node.map(|n| self.nodes[n].raw_height()).unwrap_or(-1)
    }

    /// Returns `h(left(node)) - h(right(node))` computed from cached heights.
    #[inline]
    pub(crate) fn balance_factor(&self, node: NodeId) -> i8 {
        let node = &self.nodes[node];
        self.cached_height(node.left()) - self.cached_height(node.right())
    }

    /// Recomputes the cached height of `node` from its children's cached heights.
    #[inline]
    fn update_height(&mut self, node: NodeId) {
        let height = {
            let n = &self.nodes[node];
            1 + self
                .cached_height(n.left())
                .max(self.cached_height(n.right()))
        };

        self.nodes[node].set_height(height);
    }

    /// Recomputes cached heights from `from` up to and including the root.
    pub(crate) fn refresh_heights(&mut self, from: Link) {
        let mut opt_cur = from;

        while let Some(cur) = opt_cur {
            self.update_height(cur);
            opt_cur = self.nodes[cur].parent();
        }
    }

    // Rotates the subtree rooted at `pivot` in direction `dir`, moving `pivot` down and its
    // `!dir` child up. Returns the new subtree root, or `None` (leaving the tree untouched) if
    // `pivot` has no `!dir` child.
    //
    // ```text
    //
    //      p                                   u
    //     / \          rotate(p, Left)        / \
    //    1   u       ------------------->    p   3
    //       / \                             / \
    //      2   3                           1   2
    // ```
    //
    // Heights of affected nodes are not updated.
    pub(crate) fn rotate_links(&mut self, pivot: NodeId, dir: Dir) -> Option<NodeId> {
        let up = self.nodes[pivot].child(!dir)?;

        // - `pivot` becomes the `dir` child of `up`.
        // - `across` goes from the `dir` child of `up` to the `!dir` child of `pivot`.
        let across = self.nodes[up].child(dir);
        self.nodes[pivot].set_child(!dir, across);
        self.maybe_set_parent(across, Some(pivot));

        self.nodes[up].set_child(dir, Some(pivot));
        let parent = self.nodes[pivot].set_parent(Some(up));
        self.nodes[up].set_parent(parent);

        self.replace_child_or_set_root(parent, pivot, Some(up));

        Some(up)
    }

    /// Rotates at `pivot` and refreshes the heights of the two nodes that moved, bottom-up.
    pub(crate) fn rotate(&mut self, pivot: NodeId, dir: Dir) -> Option<NodeId> {
        let up = self.rotate_links(pivot, dir)?;
        trace!(%pivot, %up, ?dir, "rotated");

        self.update_height(pivot);
        self.update_height(up);

        Some(up)
    }

    /// Restores the balance invariant on the path from `from` up to the root.
    ///
    /// Each visited node is rotated if its balance factor left [-1, 1], then has its height
    /// refreshed before the walk moves on to its (possibly new) parent. The walk always runs to
    /// the root, as a rotation changes the subtree height seen by every ancestor.
    pub(crate) fn rebalance(&mut self, from: Link) {
        let mut opt_cur = from;

        while let Some(cur) = opt_cur {
            let factor = self.balance_factor(cur);

            if factor > 1 {
                let left = self.nodes[cur]
                    .left()
                    .expect("left-heavy node must have a left child");

                // Left-right case: straighten the left subtree first.
                if self.balance_factor(left) < 0 {
                    self.rotate(left, Dir::Left);
                }

                self.rotate(cur, Dir::Right);
            } else if factor < -1 {
                let right = self.nodes[cur]
                    .right()
                    .expect("right-heavy node must have a right child");

                // Right-left case.
                if self.balance_factor(right) > 0 {
                    self.rotate(right, Dir::Right);
                }

                self.rotate(cur, Dir::Left);
            }

            self.update_height(cur);
            debug_assert!(self.balance_factor(cur).abs() <= 1);

            opt_cur = self.nodes[cur].parent();
        }
    }
}
