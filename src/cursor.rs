use crate::{arena::Link, AvlTree, Node};

/// A cursor over an [`AvlTree`].
///
/// A cursor points either to a node of the tree or to a "ghost" non-element that connects the
/// last node to the first.
pub struct Cursor<'tree, T> {
    tree: &'tree AvlTree<T>,
    ptr: Link,
}

impl<'tree, T> Cursor<'tree, T> {
    /// Moves the cursor to the next node of the `AvlTree`.
    ///
    /// If the cursor is pointing to the "ghost" non-element, this method moves it to the first
    /// node. If it is pointing to the last node, this method moves it to the "ghost"
    /// non-element.
    pub fn move_next(&mut self) {
        self.ptr = next(self.tree, self.ptr);
    }

    /// Moves the cursor to the previous node of the `AvlTree`.
    ///
    /// If the cursor is pointing to the "ghost" non-element, this method moves it to the last
    /// node. If it is pointing to the first node, this method moves it to the "ghost"
    /// non-element.
    pub fn move_prev(&mut self) {
        self.ptr = prev(self.tree, self.ptr);
    }

    /// Returns a reference to the node pointed to by the cursor.
    ///
    /// This returns `None` if the cursor is currently pointing to the "ghost" non-element.
    pub fn get(&self) -> Option<&'tree Node<T>> {
        let tree = self.tree;
        self.ptr.map(|p| &tree.nodes[p])
    }

    /// Returns a reference to the next node.
    ///
    /// If the cursor is pointing to the "ghost" non-element, this method returns the first node.
    /// If it is pointing to the last node, this method returns `None`.
    pub fn peek_next(&self) -> Option<&'tree Node<T>> {
        let tree = self.tree;
        next(tree, self.ptr).map(|p| &tree.nodes[p])
    }

    /// Returns a reference to the previous node.
    ///
    /// If the cursor is pointing to the "ghost" non-element, this method returns the last node.
    /// If it is pointing to the first node, this method returns `None`.
    pub fn peek_prev(&self) -> Option<&'tree Node<T>> {
        let tree = self.tree;
        prev(tree, self.ptr).map(|p| &tree.nodes[p])
    }
}

/// A cursor over an [`AvlTree`] which supports removal.
///
/// A cursor points either to a node of the tree or to a "ghost" non-element that connects the
/// last node to the first.
pub struct CursorMut<'tree, T> {
    tree: &'tree mut AvlTree<T>,
    ptr: Link,
}

impl<'tree, T> CursorMut<'tree, T> {
    /// Returns a read-only cursor pointing to the current node.
    ///
    /// The `CursorMut` remains immutably borrowed for the lifetime of the returned `Cursor`.
    pub fn as_cursor(&self) -> Cursor<'_, T> {
        Cursor {
            tree: &*self.tree,
            ptr: self.ptr,
        }
    }

    /// Moves the cursor to the next node of the `AvlTree`.
    ///
    /// If the cursor is pointing to the "ghost" non-element, this method will move it to the
    /// first node. If it is pointing to the last node, this method will move it to the "ghost"
    /// non-element.
    pub fn move_next(&mut self) {
        self.ptr = next(self.tree, self.ptr);
    }

    /// Moves the cursor to the previous node of the `AvlTree`.
    ///
    /// If the cursor is pointing to the "ghost" non-element, this method will move it to the last
    /// node. If it is pointing to the first node, this method will move it to the "ghost"
    /// non-element.
    pub fn move_prev(&mut self) {
        self.ptr = prev(self.tree, self.ptr);
    }

    /// Returns a reference to the node pointed to by the cursor.
    ///
    /// This returns `None` if the cursor is currently pointing to the "ghost" non-element.
    pub fn get(&self) -> Option<&Node<T>> {
        self.ptr.map(|p| &self.tree.nodes[p])
    }

    /// Returns a reference to the next node.
    ///
    /// If the cursor is pointing to the "ghost" non-element, this method returns the first node.
    /// If it is pointing to the last node, this method returns `None`.
    pub fn peek_next(&self) -> Option<&Node<T>> {
        next(self.tree, self.ptr).map(|p| &self.tree.nodes[p])
    }

    /// Returns a reference to the previous node.
    ///
    /// If the cursor is pointing to the "ghost" non-element, this method returns the last node.
    /// If it is pointing to the first node, this method returns `None`.
    pub fn peek_prev(&self) -> Option<&Node<T>> {
        prev(self.tree, self.ptr).map(|p| &self.tree.nodes[p])
    }
}

impl<'tree, T: Ord> CursorMut<'tree, T> {
    /// Removes the current key from the tree, whatever its count.
    ///
    /// This returns the removed key with its count and moves the cursor to the next greater key.
    /// If the cursor is pointing to the "ghost" non-element, this method returns `None`, and
    /// neither the tree nor the cursor is modified.
    pub fn remove_current(&mut self) -> Option<(T, usize)> {
        let (key, count) = self.tree.remove_at(self.ptr?);

        // Removal moves content between nodes, so the neighbour is found again by key.
        self.ptr = self.tree.next_above(&key);

        Some((key, count))
    }

    /// Removes the current key from the tree, whatever its count.
    ///
    /// This returns the removed key with its count and moves the cursor to the next smaller key.
    /// If the cursor is pointing to the "ghost" non-element, this method returns `None`, and
    /// neither the tree nor the cursor is modified.
    pub fn remove_current_and_move_prev(&mut self) -> Option<(T, usize)> {
        let (key, count) = self.tree.remove_at(self.ptr?);
        self.ptr = self.tree.next_below(&key);

        Some((key, count))
    }
}

fn next<T>(tree: &AvlTree<T>, ptr: Link) -> Link {
    match ptr {
        Some(p) => tree.successor(p),
        None => tree.first(),
    }
}

fn prev<T>(tree: &AvlTree<T>, ptr: Link) -> Link {
    match ptr {
        Some(p) => tree.predecessor(p),
        None => tree.last(),
    }
}

impl<T> AvlTree<T> {
    /// Returns a cursor pointing at the minimum key, or at the "ghost" non-element if the tree is
    /// empty.
    pub fn cursor_first(&self) -> Cursor<'_, T> {
        Cursor {
            tree: self,
            ptr: self.first(),
        }
    }

    /// Returns a cursor pointing at the maximum key, or at the "ghost" non-element if the tree is
    /// empty.
    pub fn cursor_last(&self) -> Cursor<'_, T> {
        Cursor {
            tree: self,
            ptr: self.last(),
        }
    }

    /// Returns a mutable cursor pointing at the minimum key.
    pub fn cursor_first_mut(&mut self) -> CursorMut<'_, T> {
        let ptr = self.first();
        CursorMut { tree: self, ptr }
    }

    /// Returns a mutable cursor pointing at the maximum key.
    pub fn cursor_last_mut(&mut self) -> CursorMut<'_, T> {
        let ptr = self.last();
        CursorMut { tree: self, ptr }
    }
}
