//! # Fixed-Capacity Map Module
//!
//! An `i32 -> V` map that lives entirely in caller-supplied slots.
//!
//! ## Plain English Explanation
//!
//! Imagine a guest book with a fixed number of lines. Each new guest (key)
//! signs the next free line, so you can read the book in arrival order. A
//! separate alphabetical index (the AVL tree) points at the lines, so looking
//! a guest up is fast too. When a guest who already signed comes back, we
//! just update their line. When the book is full, new guests are turned away.
//!
//! ```text
//!  slots:  [0] 12345 -> a   [1] 12345678 -> b   [2] -2147483648 -> c
//!                 ^                  ^                   ^
//!  tree:          +------------- balanced index ---------+
//! ```
//!
//! ## Why slots embed tree nodes
//!
//! Slot `i` *is* the tree node for the `i`-th key, so the map needs no
//! storage besides the slots. Values are never cloned; use `V = &T` when the
//! map should only refer to values owned elsewhere.

use log::{debug, trace, warn};

use crate::config::MapConfig;
use crate::error::{FixcapError, FixcapResult};
use crate::tree::{self, AvlKey, AvlNode, InsertOutcome, NodeArena, NodeId};

// ============================================
// SLOTS
// ============================================

/// One entry of a map's backing storage.
///
/// A vacant slot holds no value. Allocate them as an array:
///
/// ```
/// use fixcap::map::MapSlot;
///
/// let slots: [MapSlot<u32>; 8] = std::array::from_fn(|_| MapSlot::vacant());
/// assert!(slots[0].is_vacant());
/// ```
#[derive(Clone, Debug)]
pub struct MapSlot<V> {
    node: AvlNode<Option<V>>,
}

impl<V> MapSlot<V> {
    /// Creates an empty slot.
    pub const fn vacant() -> Self {
        Self {
            node: AvlNode::new(0, None),
        }
    }

    /// True if the slot has never been filled.
    pub fn is_vacant(&self) -> bool {
        self.node.value().is_none()
    }
}

impl<V> Default for MapSlot<V> {
    fn default() -> Self {
        Self::vacant()
    }
}

impl<V> NodeArena<Option<V>> for [MapSlot<V>] {
    fn node(&self, id: NodeId) -> Option<&AvlNode<Option<V>>> {
        self.get(id.index()).map(|slot| &slot.node)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut AvlNode<Option<V>>> {
        self.get_mut(id.index()).map(|slot| &mut slot.node)
    }
}

// ============================================
// FIXED MAP
// ============================================

/// Insertion-ordered map over borrowed slots.
///
/// ## Example
/// ```
/// use fixcap::map::{FixedMap, MapSlot};
///
/// let mut slots: [MapSlot<&str>; 2] = std::array::from_fn(|_| MapSlot::vacant());
/// let mut map = FixedMap::new(&mut slots);
///
/// assert_eq!(map.relate("one", 1), 1);
/// assert_eq!(map.relate("two", 2), 2);
/// assert_eq!(map.relate("three", 3), 0); // full
/// assert_eq!(map.value_for(2), Some(&"two"));
/// ```
#[derive(Debug)]
pub struct FixedMap<'a, V> {
    slots: &'a mut [MapSlot<V>],
    capacity: usize,
    count: usize,
    root: Option<NodeId>,
}

impl<'a, V> FixedMap<'a, V> {
    /// Creates an empty map using every slot given.
    pub fn new(slots: &'a mut [MapSlot<V>]) -> Self {
        let capacity = slots.len();
        debug!("FixedMap created with capacity {}", capacity);

        Self {
            slots,
            capacity,
            count: 0,
            root: None,
        }
    }

    /// Creates an empty map holding at most `capacity` keys.
    ///
    /// Fails if `capacity` is zero or `slots` is shorter than `capacity`.
    /// Extra slots beyond `capacity` are left untouched.
    pub fn with_capacity(capacity: usize, slots: &'a mut [MapSlot<V>]) -> FixcapResult<Self> {
        Self::from_config(&MapConfig::new(capacity), slots)
    }

    /// Creates an empty map shaped by `config`.
    pub fn from_config(config: &MapConfig, slots: &'a mut [MapSlot<V>]) -> FixcapResult<Self> {
        if let Some(error) = config.validate().into_iter().next() {
            return Err(error.into());
        }
        if slots.len() < config.capacity {
            return Err(FixcapError::StorageTooSmall {
                needed: config.capacity,
                got: slots.len(),
            });
        }

        Ok(Self::new(&mut slots[..config.capacity]))
    }

    /// Associates `value` with `key`.
    ///
    /// ## Returns
    /// - The entry count after the call when the key was stored or updated
    /// - `0` when the map is full and `key` is new (nothing changes)
    #[must_use = "a return of 0 means the map was full and nothing was stored"]
    pub fn relate(&mut self, value: V, key: AvlKey) -> usize {
        // Existing key: overwrite in place, keeping its insertion position
        if let Some(id) = tree::search(&*self.slots, self.root, key) {
            if let Some(node) = self.slots.node_mut(id) {
                *node.value_mut() = Some(value);
                trace!("map key {} updated in slot {}", key, id.index());
                return self.count;
            }
        }

        if self.count >= self.capacity {
            warn!(
                "map full ({} entries), key {} rejected",
                self.capacity, key
            );
            return 0;
        }

        let id = NodeId::new(self.count);
        self.slots[self.count].node.init(key, Some(value));

        let insertion = tree::insert(&mut *self.slots, self.root, id);
        match insertion.outcome {
            InsertOutcome::Inserted(_) => {
                self.root = insertion.root;
                self.count += 1;
                trace!("map key {} stored in slot {}", key, id.index());
                self.count
            }
            // The key was looked up first, so a fresh slot always inserts
            InsertOutcome::Overwritten { .. } | InsertOutcome::Ignored => 0,
        }
    }

    /// Looks up the value stored for `key`.
    pub fn value_for(&self, key: AvlKey) -> Option<&V> {
        let id = tree::search(&*self.slots, self.root, key)?;
        self.slots.get(id.index())?.node.value().as_ref()
    }

    /// The value of the `index`-th inserted key.
    pub fn value_at(&self, index: usize) -> Option<&V> {
        self.live_slots().get(index)?.node.value().as_ref()
    }

    /// The `index`-th inserted key, or `default` when `index` is past the end.
    pub fn key_at(&self, index: usize, default: AvlKey) -> AvlKey {
        self.live_slots()
            .get(index)
            .map_or(default, |slot| slot.node.key())
    }

    /// Forgets every entry. The slots are kept as-is and reused.
    pub fn clear(&mut self) {
        self.count = 0;
        self.root = None;
        debug!("FixedMap cleared");
    }

    /// Number of distinct keys stored.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Maximum number of distinct keys.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns true if no new key can be added.
    pub fn is_full(&self) -> bool {
        self.count >= self.capacity
    }

    /// Iterates `(key, &value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (AvlKey, &V)> {
        self.live_slots()
            .iter()
            .filter_map(|slot| slot.node.value().as_ref().map(|v| (slot.node.key(), v)))
    }

    /// Tree height, mostly useful for diagnostics.
    pub fn depth(&self) -> i32 {
        tree::height(&*self.slots, self.root)
    }

    fn live_slots(&self) -> &[MapSlot<V>] {
        &self.slots[..self.count]
    }
}

// ============================================
// CONTEXT TRAITS
// Uniform access, including through an absent map
// ============================================

/// Read access to a map-like context.
///
/// ## Plain English
///
/// Code that *might* have a map (an `Option<FixedMap>`) can call these
/// without checking first. An absent map looks empty: reads give 0, `None`
/// or the supplied default.
pub trait MapContext<V> {
    /// See [`FixedMap::count`].
    fn count(&self) -> usize;
    /// See [`FixedMap::capacity`].
    fn capacity(&self) -> usize;
    /// See [`FixedMap::value_for`].
    fn value_for(&self, key: AvlKey) -> Option<&V>;
    /// See [`FixedMap::value_at`].
    fn value_at(&self, index: usize) -> Option<&V>;
    /// See [`FixedMap::key_at`].
    fn key_at(&self, index: usize, default: AvlKey) -> AvlKey;
}

/// Write access to a map-like context. An absent map ignores writes and
/// `relate` returns 0.
pub trait MapContextMut<V>: MapContext<V> {
    /// See [`FixedMap::relate`].
    fn relate(&mut self, value: V, key: AvlKey) -> usize;
    /// See [`FixedMap::clear`].
    fn clear(&mut self);
}

impl<V> MapContext<V> for FixedMap<'_, V> {
    fn count(&self) -> usize {
        FixedMap::count(self)
    }

    fn capacity(&self) -> usize {
        FixedMap::capacity(self)
    }

    fn value_for(&self, key: AvlKey) -> Option<&V> {
        FixedMap::value_for(self, key)
    }

    fn value_at(&self, index: usize) -> Option<&V> {
        FixedMap::value_at(self, index)
    }

    fn key_at(&self, index: usize, default: AvlKey) -> AvlKey {
        FixedMap::key_at(self, index, default)
    }
}

impl<V> MapContextMut<V> for FixedMap<'_, V> {
    fn relate(&mut self, value: V, key: AvlKey) -> usize {
        FixedMap::relate(self, value, key)
    }

    fn clear(&mut self) {
        FixedMap::clear(self)
    }
}

impl<V, T: MapContext<V> + ?Sized> MapContext<V> for &T {
    fn count(&self) -> usize {
        (**self).count()
    }

    fn capacity(&self) -> usize {
        (**self).capacity()
    }

    fn value_for(&self, key: AvlKey) -> Option<&V> {
        (**self).value_for(key)
    }

    fn value_at(&self, index: usize) -> Option<&V> {
        (**self).value_at(index)
    }

    fn key_at(&self, index: usize, default: AvlKey) -> AvlKey {
        (**self).key_at(index, default)
    }
}

impl<V, T: MapContext<V> + ?Sized> MapContext<V> for &mut T {
    fn count(&self) -> usize {
        (**self).count()
    }

    fn capacity(&self) -> usize {
        (**self).capacity()
    }

    fn value_for(&self, key: AvlKey) -> Option<&V> {
        (**self).value_for(key)
    }

    fn value_at(&self, index: usize) -> Option<&V> {
        (**self).value_at(index)
    }

    fn key_at(&self, index: usize, default: AvlKey) -> AvlKey {
        (**self).key_at(index, default)
    }
}

impl<V, T: MapContextMut<V> + ?Sized> MapContextMut<V> for &mut T {
    fn relate(&mut self, value: V, key: AvlKey) -> usize {
        (**self).relate(value, key)
    }

    fn clear(&mut self) {
        (**self).clear()
    }
}

impl<V, T: MapContext<V>> MapContext<V> for Option<T> {
    fn count(&self) -> usize {
        self.as_ref().map_or(0, |map| map.count())
    }

    fn capacity(&self) -> usize {
        self.as_ref().map_or(0, |map| map.capacity())
    }

    fn value_for(&self, key: AvlKey) -> Option<&V> {
        self.as_ref()?.value_for(key)
    }

    fn value_at(&self, index: usize) -> Option<&V> {
        self.as_ref()?.value_at(index)
    }

    fn key_at(&self, index: usize, default: AvlKey) -> AvlKey {
        self.as_ref().map_or(default, |map| map.key_at(index, default))
    }
}

impl<V, T: MapContextMut<V>> MapContextMut<V> for Option<T> {
    fn relate(&mut self, value: V, key: AvlKey) -> usize {
        self.as_mut().map_or(0, |map| map.relate(value, key))
    }

    fn clear(&mut self) {
        if let Some(map) = self.as_mut() {
            map.clear();
        }
    }
}

// ============================================
// TESTS
// ============================================
