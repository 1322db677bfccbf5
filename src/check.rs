use thiserror::Error;
use tracing::warn;

use crate::{arena::Link, AvlTree, NodeId};

/// A broken structural invariant, as reported by [`AvlTree::integrity_check`] and
/// [`AvlTree::check_invariants`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    #[error("root {root} links to parent {parent}")]
    RootHasParent { root: NodeId, parent: NodeId },

    #[error("child {child} of {node} links to parent {found:?}")]
    ParentMismatch {
        node: NodeId,
        child: NodeId,
        found: Option<NodeId>,
    },

    #[error("node {node} is out of order with its in-order predecessor {prev}")]
    OutOfOrder { prev: NodeId, node: NodeId },

    #[error("node {node} has a count of zero")]
    ZeroCount { node: NodeId },

    #[error("node {node} caches height {cached} but its subtree has height {computed}")]
    HeightMismatch {
        node: NodeId,
        cached: i32,
        computed: i32,
    },

    #[error("node {node} has balance factor {factor}")]
    Unbalanced { node: NodeId, factor: i32 },

    #[error("tree records {recorded} keys but {reachable} nodes are reachable")]
    LenMismatch { recorded: usize, reachable: usize },
}

impl<T> AvlTree<T> {
    /// Verifies that every child links back to the node holding it, and that the root has no
    /// parent.
    ///
    /// Violations are logged and returned, never raised.
    pub fn integrity_check(&self) -> Result<(), IntegrityError> {
        self.check_parent_links().inspect_err(|error| {
            warn!(%error, "integrity check failed");
        })
    }

    fn check_parent_links(&self) -> Result<(), IntegrityError> {
        let Some(root) = self.root else {
            return Ok(());
        };

        if let Some(parent) = self.nodes[root].parent() {
            return Err(IntegrityError::RootHasParent { root, parent });
        }

        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            for child in [self.nodes[node].left(), self.nodes[node].right()]
                .into_iter()
                .flatten()
            {
                let found = self.nodes[child].parent();
                if found != Some(node) {
                    return Err(IntegrityError::ParentMismatch { node, child, found });
                }

                stack.push(child);
            }
        }

        Ok(())
    }

    // Returns the recomputed height of the subtree rooted at `node`, checking cached heights,
    // balance factors and counts on the way up.
    fn check_subtree(&self, node: Link) -> Result<i32, IntegrityError> {
        let Some(node) = node else {
            return Ok(-1);
        };

        let n = &self.nodes[node];
        let left = self.check_subtree(n.left())?;
        let right = self.check_subtree(n.right())?;

        if n.count() == 0 {
            return Err(IntegrityError::ZeroCount { node });
        }

        let computed = 1 + left.max(right);
        if n.height() != computed {
            return Err(IntegrityError::HeightMismatch {
                node,
                cached: n.height(),
                computed,
            });
        }

        let factor = left - right;
        if factor.abs() > 1 {
            return Err(IntegrityError::Unbalanced { node, factor });
        }

        Ok(computed)
    }
}

impl<T: Ord> AvlTree<T> {
    /// Verifies every structural invariant over the whole tree: key order, parent links, cached
    /// heights, balance factors, counts and the recorded length.
    ///
    /// Violations are logged and returned, never raised.
    pub fn check_invariants(&self) -> Result<(), IntegrityError> {
        self.check_all().inspect_err(|error| {
            warn!(%error, "invariant check failed");
        })
    }

    fn check_all(&self) -> Result<(), IntegrityError> {
        self.check_parent_links()?;
        self.check_subtree(self.root)?;

        // In-order walk over child links only, so that broken parent links cannot mask an
        // ordering problem. Strictly ascending keys imply both ordering and uniqueness.
        let mut reachable = 0;
        let mut prev: Link = None;
        let mut stack = vec![];
        let mut opt_cur = self.root;

        loop {
            while let Some(cur) = opt_cur {
                stack.push(cur);
                opt_cur = self.nodes[cur].left();
            }

            let Some(node) = stack.pop() else {
                break;
            };

            if let Some(prev) = prev {
                if self.nodes[prev].key() >= self.nodes[node].key() {
                    return Err(IntegrityError::OutOfOrder { prev, node });
                }
            }

            reachable += 1;
            prev = Some(node);
            opt_cur = self.nodes[node].right();
        }

        if reachable != self.len {
            return Err(IntegrityError::LenMismatch {
                recorded: self.len,
                reachable,
            });
        }

        Ok(())
    }

    /// Panics if any invariant checked by [`check_invariants`](Self::check_invariants) is
    /// broken.
    #[doc(hidden)]
    pub fn assert_invariants(&self) {
        if let Err(error) = self.check_invariants() {
            panic!("{error}");
        }
    }
}
