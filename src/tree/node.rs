//! # Tree Nodes and Arenas
//!
//! Node storage for the AVL tree. The tree never owns its nodes: the caller
//! hands over an arena (usually a fixed array) and the tree only rewires the
//! links between the nodes in it.

/// Key type of the tree.
pub type AvlKey = i32;

/// Position of a node inside its arena.
///
/// Links between nodes are stored as `Option<NodeId>`; `None` plays the role
/// of a null link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Wraps an arena index.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the arena index.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for NodeId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// The `(key, value)` pair a node carries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AvlContent<V> {
    /// Ordering key
    pub key: AvlKey,
    /// Associated value
    pub value: V,
}

/// One node of the tree.
///
/// ## Plain English
///
/// A node is a labelled box with three strings attached: one to its parent
/// and one to each child. Inserting and rotating only re-ties strings; the
/// boxes themselves never move in memory.
#[derive(Clone, Debug)]
pub struct AvlNode<V> {
    pub(crate) height: i32,
    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) content: AvlContent<V>,
}

impl<V> AvlNode<V> {
    /// Creates an unlinked node of height 1.
    pub const fn new(key: AvlKey, value: V) -> Self {
        Self {
            height: 1,
            parent: None,
            left: None,
            right: None,
            content: AvlContent { key, value },
        }
    }

    /// Re-initializes this node in place as an unlinked node of height 1.
    pub fn init(&mut self, key: AvlKey, value: V) {
        *self = Self::new(key, value);
    }

    /// Returns the key.
    pub fn key(&self) -> AvlKey {
        self.content.key
    }

    /// Returns the value.
    pub fn value(&self) -> &V {
        &self.content.value
    }

    /// Returns the value mutably. The key stays fixed.
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.content.value
    }

    /// Returns the key and value.
    pub fn content(&self) -> &AvlContent<V> {
        &self.content
    }

    /// Stored subtree height (1 for a leaf).
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Parent link.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Left child link.
    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    /// Right child link.
    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    /// True if the node has any parent or child link.
    pub fn is_linked(&self) -> bool {
        self.parent.is_some() || self.left.is_some() || self.right.is_some()
    }

    /// Cuts every link and resets the height, leaving the content alone.
    pub(crate) fn detach(&mut self) {
        self.height = 1;
        self.parent = None;
        self.left = None;
        self.right = None;
    }
}

impl<V: Default> Default for AvlNode<V> {
    fn default() -> Self {
        Self::new(0, V::default())
    }
}

// ============================================
// NODE ARENA
// Anything that can hand out nodes by id
// ============================================

/// Caller-owned storage the tree links nodes inside.
///
/// An id that is out of range behaves like a null link: reads return `None`
/// and the tree operations treat it as absent.
pub trait NodeArena<V> {
    /// Returns the node at `id`.
    fn node(&self, id: NodeId) -> Option<&AvlNode<V>>;

    /// Returns the node at `id` mutably.
    fn node_mut(&mut self, id: NodeId) -> Option<&mut AvlNode<V>>;
}

impl<V> NodeArena<V> for [AvlNode<V>] {
    fn node(&self, id: NodeId) -> Option<&AvlNode<V>> {
        self.get(id.index())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut AvlNode<V>> {
        self.get_mut(id.index())
    }
}

impl<V, const N: usize> NodeArena<V> for [AvlNode<V>; N] {
    fn node(&self, id: NodeId) -> Option<&AvlNode<V>> {
        self.get(id.index())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut AvlNode<V>> {
        self.get_mut(id.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_is_unlinked() {
        let node = AvlNode::new(42, "answer");
        assert_eq!(node.key(), 42);
        assert_eq!(*node.value(), "answer");
        assert_eq!(node.height(), 1);
        assert!(!node.is_linked());
    }

    #[test]
    fn test_init_clears_links() {
        let mut node = AvlNode::new(1, 10u8);
        node.parent = Some(NodeId::new(3));
        node.left = Some(NodeId::new(4));
        node.height = 3;

        node.init(2, 20);
        assert_eq!(node.key(), 2);
        assert_eq!(*node.value(), 20);
        assert_eq!(node.height(), 1);
        assert!(!node.is_linked());
    }

    #[test]
    fn test_arena_out_of_range_is_absent() {
        let mut nodes = [AvlNode::new(1, ()), AvlNode::new(2, ())];
        assert!(nodes.node(NodeId::new(1)).is_some());
        assert!(nodes.node(NodeId::new(2)).is_none());
        assert!(nodes[..].node_mut(NodeId::new(9)).is_none());
    }
}
