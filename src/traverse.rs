use crate::{AvlTree, NodeId};

impl<T> AvlTree<T> {
    /// Returns every key in ascending order.
    ///
    /// Each key appears once regardless of its count.
    pub fn in_order(&self) -> Vec<&T> {
        let mut out = Vec::with_capacity(self.len);
        self.in_order_into(self.root, &mut out);
        out
    }

    /// Returns every key with each node visited before its subtrees.
    pub fn pre_order(&self) -> Vec<&T> {
        let mut out = Vec::with_capacity(self.len);
        self.pre_order_into(self.root, &mut out);
        out
    }

    /// Returns every key with each node visited after its subtrees.
    pub fn post_order(&self) -> Vec<&T> {
        let mut out = Vec::with_capacity(self.len);
        self.post_order_into(self.root, &mut out);
        out
    }

    /// Appends the keys of the subtree rooted at `node` to `out`, left subtree first, then the
    /// node, then the right subtree.
    pub fn in_order_into<'a>(&'a self, node: Option<NodeId>, out: &mut Vec<&'a T>) {
        let Some(node) = node else {
            return;
        };

        let node = &self.nodes[node];
        self.in_order_into(node.left(), out);
        out.push(node.key());
        self.in_order_into(node.right(), out);
    }

    /// Appends the keys of the subtree rooted at `node` to `out`, the node first.
    pub fn pre_order_into<'a>(&'a self, node: Option<NodeId>, out: &mut Vec<&'a T>) {
        let Some(node) = node else {
            return;
        };

        let node = &self.nodes[node];
        out.push(node.key());
        self.pre_order_into(node.left(), out);
        self.pre_order_into(node.right(), out);
    }

    /// Appends the keys of the subtree rooted at `node` to `out`, the node last.
    pub fn post_order_into<'a>(&'a self, node: Option<NodeId>, out: &mut Vec<&'a T>) {
        let Some(node) = node else {
            return;
        };

        let node = &self.nodes[node];
        self.post_order_into(node.left(), out);
        self.post_order_into(node.right(), out);
        out.push(node.key());
    }

    /// Returns every key in ascending order without recursing.
    ///
    /// Starts at the minimum and follows successor links, so only constant state is kept between
    /// steps. The output is identical to [`in_order`](Self::in_order).
    pub fn in_order_iterative(&self) -> Vec<&T> {
        self.iter().map(|node| node.key()).collect()
    }
}
