use core::{
    fmt, mem,
    ops::{Index, IndexMut, Not},
};

/// A stable handle to a node stored in an [`AvlTree`](crate::AvlTree).
///
/// A handle stays valid for as long as its node is in the tree. Once the node is removed the slot
/// may be handed out again to a later insertion, so a stale handle can silently refer to a
/// different node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub(crate) type Link = Option<NodeId>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Dir {
    Left = 0,
    Right = 1,
}

impl Not for Dir {
    type Output = Dir;

    fn not(self) -> Self::Output {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

/// A single key of the tree, together with the number of times it was inserted.
#[derive(Debug, Clone)]
pub struct Node<T> {
    key: T,
    count: usize,

    /// Length of the longest path to a descendant leaf, counting edges.
    ///
    /// A node without children has height 0; a missing child is treated as height -1.
    height: i8,

    parent: Link,
    children: [Link; 2],
}

impl<T> Node<T> {
    pub(crate) fn new(key: T, parent: Link) -> Self {
        Self {
            key,
            count: 1,
            height: 0,
            parent,
            children: [None; 2],
        }
    }

    /// Returns the key held by this node.
    pub fn key(&self) -> &T {
        &self.key
    }

    /// Returns how many times the key was inserted.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the cached height of the subtree rooted at this node.
    pub fn height(&self) -> i32 {
        self.height.into()
    }

    /// Returns the parent of this node, or `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns the left child, holding the smaller keys.
    pub fn left(&self) -> Option<NodeId> {
        self.child(Dir::Left)
    }

    /// Returns the right child, holding the greater keys.
    pub fn right(&self) -> Option<NodeId> {
        self.child(Dir::Right)
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.children == [None; 2]
    }

    #[inline]
    pub(crate) fn child(&self, dir: Dir) -> Link {
        self.children[dir as usize]
    }

    #[inline]
    pub(crate) fn raw_height(&self) -> i8 {
        self.height
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, parent: Link) -> Link {
        mem::replace(&mut self.parent, parent)
    }

    #[inline]
    pub(crate) fn set_child(&mut self, dir: Dir, child: Link) -> Link {
        mem::replace(&mut self.children[dir as usize], child)
    }

    #[inline]
    pub(crate) fn set_height(&mut self, height: i8) {
        self.height = height;
    }

    /// Bumps the multiplicity, returning the new count.
    #[inline]
    pub(crate) fn increment(&mut self) -> usize {
        self.count = self.count.checked_add(1).expect("count overflow");
        self.count
    }

    /// Overwrites the key and count, returning the previous pair.
    ///
    /// Links and height are untouched.
    pub(crate) fn replace_content(&mut self, key: T, count: usize) -> (T, usize) {
        (
            mem::replace(&mut self.key, key),
            mem::replace(&mut self.count, count),
        )
    }

    pub(crate) fn into_content(self) -> (T, usize) {
        (self.key, self.count)
    }
}

#[derive(Clone)]
enum Slot<T> {
    Occupied(Node<T>),
    Vacant { next_free: Link },
}

/// Owner of every node in a tree.
///
/// Vacated slots are chained into a free list and reused before the backing vector grows.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Link,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: None,
        }
    }

    pub(crate) fn alloc(&mut self, node: Node<T>) -> NodeId {
        match self.free {
            Some(id) => {
                let slot = mem::replace(&mut self.slots[id.index()], Slot::Occupied(node));
                self.free = match slot {
                    Slot::Vacant { next_free } => next_free,
                    Slot::Occupied(_) => unreachable!("free list points at an occupied slot"),
                };
                id
            }
            None => {
                let id = NodeId(u32::try_from(self.slots.len()).expect("arena is full"));
                self.slots.push(Slot::Occupied(node));
                id
            }
        }
    }

    /// Releases the slot of `id`, returning the node it held.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not refer to a live node.
    pub(crate) fn free(&mut self, id: NodeId) -> Node<T> {
        let vacant = Slot::Vacant {
            next_free: self.free,
        };

        match mem::replace(&mut self.slots[id.index()], vacant) {
            Slot::Occupied(node) => {
                self.free = Some(id);
                node
            }
            Slot::Vacant { next_free } => {
                // Undo the write so the free list stays intact before panicking.
                self.slots[id.index()] = Slot::Vacant { next_free };
                panic!("double free of node {id}");
            }
        }
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node<T>> {
        match self.slots.get(id.index())? {
            Slot::Occupied(node) => Some(node),
            Slot::Vacant { .. } => None,
        }
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        match self.slots.get_mut(id.index())? {
            Slot::Occupied(node) => Some(node),
            Slot::Vacant { .. } => None,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free = None;
    }
}

impl<T> Index<NodeId> for Arena<T> {
    type Output = Node<T>;

    fn index(&self, id: NodeId) -> &Node<T> {
        self.get(id)
            .unwrap_or_else(|| panic!("node {id} is not in the tree"))
    }
}

impl<T> IndexMut<NodeId> for Arena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<T> {
        self.get_mut(id)
            .unwrap_or_else(|| panic!("node {id} is not in the tree"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reuses_freed_slots() {
        let mut arena = Arena::new();

        let a = arena.alloc(Node::new('a', None));
        let b = arena.alloc(Node::new('b', Some(a)));
        let c = arena.alloc(Node::new('c', Some(a)));

        assert_eq!(arena.free(b).into_content(), ('b', 1));
        assert!(arena.get(b).is_none());

        assert_eq!(arena.free(a).into_content(), ('a', 1));

        // Most recently freed first.
        assert_eq!(arena.alloc(Node::new('d', None)), a);
        assert_eq!(arena.alloc(Node::new('e', None)), b);
        assert_eq!(*arena[c].key(), 'c');
        assert_eq!(*arena[b].key(), 'e');

        let f = arena.alloc(Node::new('f', None));
        assert_ne!(f, a);
        assert_ne!(f, b);
        assert_ne!(f, c);
    }

    #[test]
    #[should_panic(expected = "double free")]
    fn double_free_panics() {
        let mut arena = Arena::new();
        let a = arena.alloc(Node::new(1, None));
        arena.free(a);
        arena.free(a);
    }

    #[test]
    fn replace_content_keeps_links() {
        let mut node = Node::new(5, Some(NodeId(3)));
        node.set_child(Dir::Right, Some(NodeId(7)));
        node.set_height(1);
        node.increment();

        assert_eq!(node.replace_content(9, 4), (5, 2));
        assert_eq!(*node.key(), 9);
        assert_eq!(node.count(), 4);
        assert_eq!(node.parent(), Some(NodeId(3)));
        assert_eq!(node.right(), Some(NodeId(7)));
        assert_eq!(node.height(), 1);
    }
}
