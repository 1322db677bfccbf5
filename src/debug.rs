use core::fmt;
use std::collections::VecDeque;

use crate::{arena::Link, AvlTree, NodeId};

impl<T: fmt::Display> AvlTree<T> {
    /// Writes the tree as a Graphviz digraph, one rank per tree level.
    ///
    /// Nodes are labelled `key:height`, with a `xN` suffix when the count is above one. Missing
    /// children are drawn as points so that left and right stay distinguishable.
    pub fn dotgraph<W>(&self, name: &str, mut w: W) -> fmt::Result
    where
        W: fmt::Write,
    {
        let root = match self.root {
            Some(r) => r,
            None => return write!(w, "digraph \"graph-{name}\" {{}}"),
        };

        enum Item {
            Node(NodeId),
            Missing(u32),
        }

        let mut queue = VecDeque::new();
        queue.push_back(Item::Node(root));

        write!(
            w,
            "digraph \"graph-{name}\" {{\n subgraph \"subgraph-{name}\" {{"
        )?;

        let mut missing = 0;
        let mut links = String::new();

        while !queue.is_empty() {
            use fmt::Write;

            write!(w, "{{rank=same; ")?;

            for _rank_node in 0..queue.len() {
                let node = match queue.pop_front() {
                    Some(Item::Node(node)) => node,
                    Some(Item::Missing(id)) => {
                        write!(w, "\"graph{name}-missing{id}\" [shape=point]; ")?;
                        continue;
                    }
                    None => break,
                };

                let n = &self.nodes[node];
                let key = n.key();
                write!(w, "\"graph{name}-{key}\" [label=\"{key}:{}", n.height())?;
                if n.count() > 1 {
                    write!(w, " x{}", n.count())?;
                }
                write!(w, "\"]; ")?;

                for child in [n.left(), n.right()] {
                    match child {
                        Some(child) => {
                            let child_key = self.nodes[child].key();

                            queue.push_back(Item::Node(child));
                            writeln!(
                                links,
                                "\"graph{name}-{key}\" -> \"graph{name}-{child_key}\";"
                            )?;
                        }
                        None => {
                            queue.push_back(Item::Missing(missing));
                            writeln!(
                                links,
                                "\"graph{name}-{key}\" -> \"graph{name}-missing{missing}\";"
                            )?;
                            missing += 1;
                        }
                    }
                }
            }

            writeln!(w, "}}")?;
        }

        w.write_str(&links)?;

        w.write_str(" }\n}")
    }

    /// Returns a sideways rendering of the tree for debugging.
    ///
    /// The tree is rotated 90° counter-clockwise: the root sits at the left margin, right subtrees
    /// are printed above their parent and left subtrees below. Each line shows `key:height`.
    ///
    /// ```text
    ///     ┌── 3:0
    /// ┌── 2:1
    /// │   └── 1:0
    /// ```
    ///
    /// The format is meant for humans and may change.
    pub fn shape(&self) -> Shape<'_, T> {
        Shape { tree: self }
    }
}

/// A sideways text rendering of an [`AvlTree`], created by [`AvlTree::shape`].
pub struct Shape<'tree, T> {
    tree: &'tree AvlTree<T>,
}

impl<T: fmt::Display> Shape<'_, T> {
    fn write_subtree(
        &self,
        f: &mut fmt::Formatter<'_>,
        node: Link,
        prefix: &str,
        is_right: bool,
    ) -> fmt::Result {
        let Some(node) = node else {
            return Ok(());
        };
        let n = &self.tree.nodes[node];

        let above = format!("{prefix}{}", if is_right { "    " } else { "│   " });
        self.write_subtree(f, n.right(), &above, true)?;

        let branch = if is_right { "┌── " } else { "└── " };
        writeln!(f, "{prefix}{branch}{}:{}", n.key(), n.height())?;

        let below = format!("{prefix}{}", if is_right { "│   " } else { "    " });
        self.write_subtree(f, n.left(), &below, false)
    }
}

impl<T: fmt::Display> fmt::Display for Shape<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_subtree(f, self.tree.root, "", true)
    }
}
