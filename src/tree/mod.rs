//! # AVL Tree Module
//!
//! A self-balancing binary search tree over `i32` keys whose nodes live in a
//! caller-owned arena.
//!
//! ## Plain English Explanation
//!
//! Think of a family tree drawn on index cards pinned to a board. The cards
//! (nodes) are pinned once and never move. Adding someone means writing a
//! new card, pinning it in a free spot, and re-drawing a few strings between
//! cards so the tree stays "bushy" instead of turning into a long chain.
//!
//! - Searching is O(log n)
//! - Inserting is O(log n), plus at most one single or double rotation
//! - Inserting a key that is already present swaps the new card into the
//!   old card's place (a *relink*); the old card is unpinned and handed back
//! - There is no delete
//!
//! Every operation takes the arena and the current root explicitly, the same
//! way the map stores them, so the tree itself carries no state.

mod node;

pub use node::{AvlContent, AvlKey, AvlNode, NodeArena, NodeId};

use std::cmp::Ordering;

use thiserror::Error;

// ============================================
// INSERT RESULT
// ============================================

/// What an [`insert`] did with the node it was given.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The node was linked at a fresh position (one more reachable node)
    Inserted(NodeId),

    /// The node took over the position of `displaced`, which had the same key
    ///
    /// `displaced` is now fully unlinked and can be reused by the caller.
    Overwritten {
        /// The node that is now reachable
        node: NodeId,
        /// The node that was relinked away
        displaced: NodeId,
    },

    /// Nothing changed: the node id is not in the arena, the tree links were
    /// broken, or the node already holds its key's position
    Ignored,
}

/// Result of an [`insert`]: the new root plus what happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Insertion {
    /// Root of the tree after the insert
    pub root: Option<NodeId>,
    /// How the node was placed
    pub outcome: InsertOutcome,
}

// ============================================
// LINK HELPERS
// Every helper treats `None` (or an id outside the arena) as a null node
// ============================================

fn parent_of<V, A: NodeArena<V> + ?Sized>(arena: &A, node: Option<NodeId>) -> Option<NodeId> {
    node.and_then(|id| arena.node(id)).and_then(|n| n.parent)
}

fn left_of<V, A: NodeArena<V> + ?Sized>(arena: &A, node: Option<NodeId>) -> Option<NodeId> {
    node.and_then(|id| arena.node(id)).and_then(|n| n.left)
}

fn right_of<V, A: NodeArena<V> + ?Sized>(arena: &A, node: Option<NodeId>) -> Option<NodeId> {
    node.and_then(|id| arena.node(id)).and_then(|n| n.right)
}

fn height_of<V, A: NodeArena<V> + ?Sized>(arena: &A, node: Option<NodeId>) -> i32 {
    node.and_then(|id| arena.node(id)).map_or(0, |n| n.height)
}

/// Left height minus right height.
fn balance_of<V, A: NodeArena<V> + ?Sized>(arena: &A, node: Option<NodeId>) -> i32 {
    match node.and_then(|id| arena.node(id)) {
        Some(n) => height_of(arena, n.left) - height_of(arena, n.right),
        None => 0,
    }
}

fn update_height<V, A: NodeArena<V> + ?Sized>(arena: &mut A, node: Option<NodeId>) {
    let Some(id) = node else { return };
    let Some((left, right)) = arena.node(id).map(|n| (n.left, n.right)) else {
        return;
    };
    let height = height_of(arena, left).max(height_of(arena, right)) + 1;
    if let Some(n) = arena.node_mut(id) {
        n.height = height;
    }
}

fn set_parent<V, A: NodeArena<V> + ?Sized>(
    arena: &mut A,
    node: Option<NodeId>,
    parent: Option<NodeId>,
) {
    if let Some(n) = node.and_then(|id| arena.node_mut(id)) {
        n.parent = parent;
    }
}

fn adopt_as_left<V, A: NodeArena<V> + ?Sized>(
    arena: &mut A,
    child: Option<NodeId>,
    parent: Option<NodeId>,
) {
    if let Some(p) = parent.and_then(|id| arena.node_mut(id)) {
        p.left = child;
    }
    set_parent(arena, child, parent);
}

fn adopt_as_right<V, A: NodeArena<V> + ?Sized>(
    arena: &mut A,
    child: Option<NodeId>,
    parent: Option<NodeId>,
) {
    if let Some(p) = parent.and_then(|id| arena.node_mut(id)) {
        p.right = child;
    }
    set_parent(arena, child, parent);
}

/// Hangs `subtree` where `old` used to hang under `parent`.
fn reattach<V, A: NodeArena<V> + ?Sized>(
    arena: &mut A,
    subtree: NodeId,
    parent: Option<NodeId>,
    old: NodeId,
) {
    match parent {
        Some(p) if left_of(arena, Some(p)) == Some(old) => adopt_as_left(arena, Some(subtree), Some(p)),
        Some(p) => adopt_as_right(arena, Some(subtree), Some(p)),
        None => set_parent(arena, Some(subtree), None),
    }
}

/// Moves `to` into the exact position of `from` and unlinks `from`.
fn relink<V, A: NodeArena<V> + ?Sized>(arena: &mut A, from: NodeId, to: NodeId) {
    let Some((parent, left, right, height)) =
        arena.node(from).map(|n| (n.parent, n.left, n.right, n.height))
    else {
        return;
    };

    reattach(arena, to, parent, from);
    adopt_as_left(arena, left, Some(to));
    adopt_as_right(arena, right, Some(to));
    if let Some(n) = arena.node_mut(to) {
        n.height = height;
    }
    if let Some(n) = arena.node_mut(from) {
        n.detach();
    }
}

// ============================================
// ROTATIONS
// ============================================

fn rotate_right<V, A: NodeArena<V> + ?Sized>(arena: &mut A, node: NodeId) -> NodeId {
    // The pivot is the left child
    let Some(pivot) = left_of(arena, Some(node)) else {
        return node;
    };
    let grandparent = parent_of(arena, Some(node));

    let moved = right_of(arena, Some(pivot));
    adopt_as_left(arena, moved, Some(node));
    update_height(arena, Some(node));

    adopt_as_right(arena, Some(node), Some(pivot));
    update_height(arena, Some(pivot));

    reattach(arena, pivot, grandparent, node);
    pivot
}

fn rotate_left<V, A: NodeArena<V> + ?Sized>(arena: &mut A, node: NodeId) -> NodeId {
    // The pivot is the right child
    let Some(pivot) = right_of(arena, Some(node)) else {
        return node;
    };
    let grandparent = parent_of(arena, Some(node));

    let moved = left_of(arena, Some(pivot));
    adopt_as_right(arena, moved, Some(node));
    update_height(arena, Some(node));

    adopt_as_left(arena, Some(node), Some(pivot));
    update_height(arena, Some(pivot));

    reattach(arena, pivot, grandparent, node);
    pivot
}

fn rotate_left_right<V, A: NodeArena<V> + ?Sized>(arena: &mut A, node: NodeId) -> NodeId {
    if let Some(left) = left_of(arena, Some(node)) {
        rotate_left(arena, left);
    }
    rotate_right(arena, node)
}

fn rotate_right_left<V, A: NodeArena<V> + ?Sized>(arena: &mut A, node: NodeId) -> NodeId {
    if let Some(right) = right_of(arena, Some(node)) {
        rotate_right(arena, right);
    }
    rotate_left(arena, node)
}

// ============================================
// INSERTION
// ============================================

/// Structural part of an insert: find the spot and tie the node in.
fn link<V, A: NodeArena<V> + ?Sized>(
    arena: &mut A,
    root: Option<NodeId>,
    node: NodeId,
    key: AvlKey,
) -> InsertOutcome {
    let Some(mut cursor) = root.filter(|&id| arena.node(id).is_some()) else {
        // Empty tree: the node becomes a lone root
        if let Some(n) = arena.node_mut(node) {
            n.detach();
        }
        return InsertOutcome::Inserted(node);
    };

    loop {
        let Some((cursor_key, left, right)) =
            arena.node(cursor).map(|n| (n.content.key, n.left, n.right))
        else {
            return InsertOutcome::Ignored;
        };

        match key.cmp(&cursor_key) {
            Ordering::Less => match left {
                Some(next) => cursor = next,
                None => {
                    if let Some(n) = arena.node_mut(node) {
                        n.detach();
                    }
                    adopt_as_left(arena, Some(node), Some(cursor));
                    return InsertOutcome::Inserted(node);
                }
            },
            Ordering::Greater => match right {
                Some(next) => cursor = next,
                None => {
                    if let Some(n) = arena.node_mut(node) {
                        n.detach();
                    }
                    adopt_as_right(arena, Some(node), Some(cursor));
                    return InsertOutcome::Inserted(node);
                }
            },
            Ordering::Equal if cursor == node => return InsertOutcome::Ignored,
            Ordering::Equal => {
                // Same key: the new node takes over, the old one is disowned
                relink(arena, cursor, node);
                return InsertOutcome::Overwritten {
                    node,
                    displaced: cursor,
                };
            }
        }
    }
}

/// Walks from `node` toward the root restoring the AVL property, then
/// returns the root.
fn rebalance<V, A: NodeArena<V> + ?Sized>(arena: &mut A, node: NodeId) -> NodeId {
    let mut target = node;

    while let Some(parent) = parent_of(arena, Some(target)) {
        let height_before = height_of(arena, Some(parent));
        let from_left = left_of(arena, Some(parent)) == Some(target);
        let balance = balance_of(arena, Some(parent));

        let subtree = if from_left && balance >= 2 {
            if balance_of(arena, Some(target)) >= 0 {
                rotate_right(arena, parent)
            } else {
                rotate_left_right(arena, parent)
            }
        } else if !from_left && balance <= -2 {
            if balance_of(arena, Some(target)) <= 0 {
                rotate_left(arena, parent)
            } else {
                rotate_right_left(arena, parent)
            }
        } else {
            update_height(arena, Some(parent));
            parent
        };

        target = subtree;

        // Height settled, so nothing above can be out of balance
        if height_of(arena, Some(subtree)) == height_before {
            break;
        }
    }

    let mut root = target;
    while let Some(parent) = parent_of(arena, Some(root)) {
        root = parent;
    }
    root
}

/// Finds the node holding `key`.
///
/// ## Example
/// ```
/// use fixcap::tree::{self, AvlNode, NodeId};
///
/// let mut nodes = [AvlNode::new(20, 'b'), AvlNode::new(10, 'a')];
/// let mut root = None;
/// for id in 0..nodes.len() {
///     root = tree::insert(&mut nodes, root, NodeId::new(id)).root;
/// }
/// assert_eq!(tree::search(&nodes, root, 10), Some(NodeId::new(1)));
/// assert_eq!(tree::search(&nodes, root, 30), None);
/// ```
pub fn search<V, A: NodeArena<V> + ?Sized>(
    arena: &A,
    root: Option<NodeId>,
    key: AvlKey,
) -> Option<NodeId> {
    let mut cursor = root;
    while let Some(id) = cursor {
        let node = arena.node(id)?;
        cursor = match key.cmp(&node.content.key) {
            Ordering::Less => node.left,
            Ordering::Greater => node.right,
            Ordering::Equal => return Some(id),
        };
    }
    None
}

/// Inserts the node at `node` into the tree rooted at `root`.
///
/// The node should be freshly initialized with [`AvlNode::new`] or
/// [`AvlNode::init`]; its links are overwritten. A key collision relinks the
/// node into the existing node's position, see [`InsertOutcome::Overwritten`].
pub fn insert<V, A: NodeArena<V> + ?Sized>(
    arena: &mut A,
    root: Option<NodeId>,
    node: NodeId,
) -> Insertion {
    let Some(key) = arena.node(node).map(|n| n.content.key) else {
        return Insertion {
            root,
            outcome: InsertOutcome::Ignored,
        };
    };

    let outcome = link(arena, root, node, key);
    let root = match outcome {
        InsertOutcome::Ignored => root,
        InsertOutcome::Inserted(_) | InsertOutcome::Overwritten { .. } => {
            Some(rebalance(arena, node))
        }
    };

    log::trace!("avl insert key={} -> {:?}", key, outcome);
    Insertion { root, outcome }
}

// ============================================
// INSPECTION
// ============================================

/// Ways a tree can fail [`check_balance`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BalanceViolation {
    /// A link points outside the arena
    #[error("link to missing node {0:?}")]
    DanglingLink(NodeId),

    /// A child does not point back at the node that links to it
    #[error("node {child:?} does not point back to parent {parent:?}")]
    BrokenParentLink {
        /// The child in question
        child: NodeId,
        /// The node linking to it
        parent: Option<NodeId>,
    },

    /// A key sits on the wrong side of an ancestor
    #[error("node {node:?} with key {key} breaks the search order")]
    OutOfOrder {
        /// Offending node
        node: NodeId,
        /// Its key
        key: AvlKey,
    },

    /// The stored height disagrees with the subtrees
    #[error("node {node:?} stores height {stored} but its subtrees give {actual}")]
    HeightMismatch {
        /// Offending node
        node: NodeId,
        /// Height stored in the node
        stored: i32,
        /// Height recomputed from the children
        actual: i32,
    },

    /// Subtree heights differ by more than one
    #[error("node {node:?} is out of balance ({balance})")]
    Unbalanced {
        /// Offending node
        node: NodeId,
        /// Left height minus right height
        balance: i32,
    },
}

fn check_subtree<V, A: NodeArena<V> + ?Sized>(
    arena: &A,
    node: Option<NodeId>,
    parent: Option<NodeId>,
    lower: Option<AvlKey>,
    upper: Option<AvlKey>,
) -> Result<i32, BalanceViolation> {
    let Some(id) = node else { return Ok(0) };
    let n = arena.node(id).ok_or(BalanceViolation::DanglingLink(id))?;

    if n.parent != parent {
        return Err(BalanceViolation::BrokenParentLink { child: id, parent });
    }
    let key = n.content.key;
    if lower.is_some_and(|l| key <= l) || upper.is_some_and(|u| key >= u) {
        return Err(BalanceViolation::OutOfOrder { node: id, key });
    }

    let left = check_subtree(arena, n.left, Some(id), lower, Some(key))?;
    let right = check_subtree(arena, n.right, Some(id), Some(key), upper)?;

    let actual = left.max(right) + 1;
    if n.height != actual {
        return Err(BalanceViolation::HeightMismatch {
            node: id,
            stored: n.height,
            actual,
        });
    }
    if (left - right).abs() > 1 {
        return Err(BalanceViolation::Unbalanced {
            node: id,
            balance: left - right,
        });
    }
    Ok(actual)
}

/// Recomputes every height from scratch and checks the AVL and search-order
/// invariants. Returns the tree height on success.
pub fn check_balance<V, A: NodeArena<V> + ?Sized>(
    arena: &A,
    root: Option<NodeId>,
) -> Result<i32, BalanceViolation> {
    check_subtree(arena, root, None, None, None)
}

fn visit_subtree<V, A, F>(arena: &A, node: Option<NodeId>, visit: &mut F)
where
    A: NodeArena<V> + ?Sized,
    F: FnMut(NodeId, &AvlNode<V>),
{
    let Some(id) = node else { return };
    let Some(n) = arena.node(id) else { return };
    visit_subtree(arena, n.left, visit);
    visit(id, n);
    visit_subtree(arena, n.right, visit);
}

/// Calls `visit` for every reachable node in ascending key order.
pub fn in_order<V, A, F>(arena: &A, root: Option<NodeId>, mut visit: F)
where
    A: NodeArena<V> + ?Sized,
    F: FnMut(NodeId, &AvlNode<V>),
{
    visit_subtree(arena, root, &mut visit);
}

/// Height of the tree (0 when empty), as stored in the root.
pub fn height<V, A: NodeArena<V> + ?Sized>(arena: &A, root: Option<NodeId>) -> i32 {
    height_of(arena, root)
}

// ============================================
// TESTS
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::{BTreeMap, HashSet};

    fn build(keys: &[AvlKey]) -> (Vec<AvlNode<usize>>, Option<NodeId>) {
        let mut nodes: Vec<AvlNode<usize>> = keys
            .iter()
            .enumerate()
            .map(|(i, &k)| AvlNode::new(k, i))
            .collect();
        let mut root = None;
        for id in 0..nodes.len() {
            root = insert(nodes.as_mut_slice(), root, NodeId::new(id)).root;
        }
        (nodes, root)
    }

    fn keys_in_order(nodes: &[AvlNode<usize>], root: Option<NodeId>) -> Vec<AvlKey> {
        let mut keys = Vec::new();
        in_order(nodes, root, |_, n| keys.push(n.key()));
        keys
    }

    #[test]
    fn test_empty_tree() {
        let nodes: [AvlNode<u8>; 0] = [];
        assert_eq!(search(&nodes, None, 5), None);
        assert_eq!(check_balance(&nodes, None), Ok(0));
        assert_eq!(height(&nodes, None), 0);
    }

    #[test]
    fn test_first_insert_becomes_root() {
        let mut nodes = [AvlNode::new(7, 'x')];
        let insertion = insert(&mut nodes, None, NodeId::new(0));

        assert_eq!(insertion.root, Some(NodeId::new(0)));
        assert_eq!(insertion.outcome, InsertOutcome::Inserted(NodeId::new(0)));
        assert_eq!(search(&nodes, insertion.root, 7), Some(NodeId::new(0)));
    }

    #[test]
    fn test_ascending_inserts_rotate_left() {
        let (nodes, root) = build(&[1, 2, 3]);

        // 1 -> 2 -> 3 would be a chain; a left rotation puts 2 on top
        assert_eq!(root, Some(NodeId::new(1)));
        assert_eq!(nodes[1].left(), Some(NodeId::new(0)));
        assert_eq!(nodes[1].right(), Some(NodeId::new(2)));
        assert_eq!(nodes[1].parent(), None);
        assert_eq!(check_balance(nodes.as_slice(), root), Ok(2));
    }

    #[test]
    fn test_descending_inserts_rotate_right() {
        let (nodes, root) = build(&[3, 2, 1]);
        assert_eq!(root, Some(NodeId::new(1)));
        assert_eq!(check_balance(nodes.as_slice(), root), Ok(2));
    }

    #[test]
    fn test_double_rotations() {
        // left-right
        let (nodes, root) = build(&[30, 10, 20]);
        assert_eq!(root, Some(NodeId::new(2)));
        assert_eq!(check_balance(nodes.as_slice(), root), Ok(2));

        // right-left
        let (nodes, root) = build(&[10, 30, 20]);
        assert_eq!(root, Some(NodeId::new(2)));
        assert_eq!(check_balance(nodes.as_slice(), root), Ok(2));
    }

    #[test]
    fn test_rotation_below_root_keeps_parent_links() {
        // The rotation at 3 happens under the root 2
        let (nodes, root) = build(&[2, 1, 3, 4, 5]);
        assert_eq!(check_balance(nodes.as_slice(), root), Ok(3));
        assert_eq!(keys_in_order(&nodes, root), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_many_sequential_inserts_stay_balanced() {
        let keys: Vec<AvlKey> = (0..1000).collect();
        let (nodes, root) = build(&keys);

        let h = check_balance(nodes.as_slice(), root).unwrap();
        // An AVL tree of 1000 nodes is at most ~1.44 log2(n) high
        assert!(h <= 14, "height {} too large", h);
        for k in [0, 1, 499, 998, 999] {
            let id = search(nodes.as_slice(), root, k).unwrap();
            assert_eq!(nodes[id.index()].key(), k);
        }
        assert_eq!(search(nodes.as_slice(), root, 1000), None);
    }

    #[test]
    fn test_duplicate_key_relinks_new_node() {
        let mut nodes = vec![
            AvlNode::new(20, "old"),
            AvlNode::new(10, "a"),
            AvlNode::new(30, "c"),
            AvlNode::new(20, "new"),
        ];
        let mut root = None;
        for id in 0..3 {
            root = insert(nodes.as_mut_slice(), root, NodeId::new(id)).root;
        }

        let insertion = insert(nodes.as_mut_slice(), root, NodeId::new(3));
        assert_eq!(
            insertion.outcome,
            InsertOutcome::Overwritten {
                node: NodeId::new(3),
                displaced: NodeId::new(0),
            }
        );

        // The new node took over the root position
        assert_eq!(insertion.root, Some(NodeId::new(3)));
        assert_eq!(nodes[3].left(), Some(NodeId::new(1)));
        assert_eq!(nodes[3].right(), Some(NodeId::new(2)));
        assert_eq!(nodes[1].parent(), Some(NodeId::new(3)));
        assert_eq!(nodes[3].height(), 2);

        // The old node is fully detached
        assert!(!nodes[0].is_linked());

        let hit = search(nodes.as_slice(), insertion.root, 20).unwrap();
        assert_eq!(*nodes[hit.index()].value(), "new");
        assert_eq!(check_balance(nodes.as_slice(), insertion.root), Ok(2));
    }

    #[test]
    fn test_duplicate_key_below_root() {
        let (mut nodes, root) = build(&[20, 10, 30]);
        nodes.push(AvlNode::new(10, 99));

        let insertion = insert(nodes.as_mut_slice(), root, NodeId::new(3));
        assert_eq!(insertion.root, root);
        assert_eq!(nodes[0].left(), Some(NodeId::new(3)));
        assert!(!nodes[1].is_linked());
        assert_eq!(check_balance(nodes.as_slice(), insertion.root), Ok(2));
    }

    #[test]
    fn test_reinserting_same_node_is_ignored() {
        let (mut nodes, root) = build(&[5, 3, 8]);
        let insertion = insert(nodes.as_mut_slice(), root, NodeId::new(1));

        assert_eq!(insertion.outcome, InsertOutcome::Ignored);
        assert_eq!(insertion.root, root);
        assert_eq!(check_balance(nodes.as_slice(), root), Ok(2));
    }

    #[test]
    fn test_unknown_node_is_ignored() {
        let (mut nodes, root) = build(&[5, 3, 8]);
        let insertion = insert(nodes.as_mut_slice(), root, NodeId::new(42));

        assert_eq!(insertion.outcome, InsertOutcome::Ignored);
        assert_eq!(insertion.root, root);
    }

    #[test]
    fn test_extreme_keys() {
        let (nodes, root) = build(&[0, i32::MIN, i32::MAX, -1, 1]);
        assert_eq!(
            keys_in_order(&nodes, root),
            vec![i32::MIN, -1, 0, 1, i32::MAX]
        );
        assert!(check_balance(nodes.as_slice(), root).is_ok());
    }

    #[test]
    fn test_check_balance_detects_corruption() {
        let (mut nodes, root) = build(&[2, 1, 3]);
        nodes[1].height = 5;
        assert!(matches!(
            check_balance(nodes.as_slice(), root),
            Err(BalanceViolation::HeightMismatch { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_inserts_keep_avl_invariants(keys in prop::collection::vec(-200i32..200, 0..300)) {
            let (nodes, root) = build(&keys);

            prop_assert!(check_balance(nodes.as_slice(), root).is_ok());

            // Most recent insert wins for every key
            let mut expected = BTreeMap::new();
            for (i, &k) in keys.iter().enumerate() {
                expected.insert(k, i);
            }
            for (&k, &i) in &expected {
                let id = search(nodes.as_slice(), root, k);
                prop_assert_eq!(id, Some(NodeId::new(i)));
            }
            prop_assert_eq!(search(nodes.as_slice(), root, 500), None);

            // Only the winning nodes are reachable
            let mut reachable = HashSet::new();
            in_order(nodes.as_slice(), root, |id, _| { reachable.insert(id.index()); });
            let winners: HashSet<usize> = expected.values().copied().collect();
            prop_assert_eq!(reachable, winners);

            let sorted: Vec<AvlKey> = expected.keys().copied().collect();
            prop_assert_eq!(keys_in_order(&nodes, root), sorted);
        }
    }
}
