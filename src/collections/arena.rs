use bytemuck::Zeroable;
use std::fmt::Debug;

use super::avl_tree::{AVLTree, AVLTreeMut, Allocator, InOrder, Node};
use crate::error::{AvlError, Result};
use crate::pod::NodeIndex;

/// Capacity used by [`AvlArena::default`].
pub const DEFAULT_CAPACITY: usize = 200;

/// An AVL tree that owns its header and node slots.
///
/// This is the same layout [`AVLTreeMut::from_bytes_mut`] works on, kept in
/// typed storage for callers that do not manage a byte buffer.
pub struct AvlArena {
    allocator: Allocator,
    nodes: Box<[Node]>,
}

impl AvlArena {
    /// Creates an empty tree able to hold `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let capacity = u32::try_from(capacity).map_err(|_| AvlError::InvalidCapacity {
            requested: capacity,
            reason: "exceeds u32::MAX",
        })?;

        Ok(Self::allocate(capacity))
    }

    fn allocate(capacity: u32) -> Self {
        let mut allocator = Allocator::zeroed();
        allocator.initialize(capacity);

        Self {
            allocator,
            nodes: vec![Node::zeroed(); capacity as usize].into_boxed_slice(),
        }
    }

    pub fn tree(&self) -> AVLTree<'_> {
        AVLTree::new(&self.allocator, &self.nodes)
    }

    pub fn tree_mut(&mut self) -> AVLTreeMut<'_> {
        AVLTreeMut::new(&mut self.allocator, &mut self.nodes)
    }

    pub fn capacity(&self) -> usize {
        self.tree().capacity()
    }

    pub fn len(&self) -> usize {
        self.tree().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree().is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.tree().is_full()
    }

    /// See [`AVLTreeMut::insert`].
    pub fn insert(&mut self, key: u64) -> Result<NodeIndex> {
        self.tree_mut().insert(key)
    }

    /// See [`AVLTreeMut::remove`].
    pub fn remove(&mut self, key: u64) -> bool {
        self.tree_mut().remove(key)
    }

    pub fn clear(&mut self) {
        self.tree_mut().clear()
    }

    pub fn contains(&self, key: u64) -> bool {
        self.tree().contains(key)
    }

    pub fn find_index(&self, key: u64) -> NodeIndex {
        self.tree().find_index(key)
    }

    pub fn search_path(&self, key: u64) -> Vec<NodeIndex> {
        self.tree().search_path(key)
    }

    pub fn lowest(&self) -> Option<u64> {
        self.tree().lowest()
    }

    pub fn highest(&self) -> Option<u64> {
        self.tree().highest()
    }

    pub fn height(&self) -> u32 {
        self.tree().height()
    }

    pub fn iter(&self) -> InOrder<'_> {
        self.tree().iter()
    }

    pub fn validate(&self) -> Result<()> {
        self.tree().validate()
    }
}

impl Default for AvlArena {
    fn default() -> Self {
        Self::allocate(DEFAULT_CAPACITY as u32)
    }
}

impl Debug for AvlArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity() {
        let mut arena = AvlArena::default();
        assert_eq!(arena.capacity(), DEFAULT_CAPACITY);
        assert!(arena.is_empty());

        for key in 0..DEFAULT_CAPACITY as u64 {
            arena.insert(key * 3).unwrap();
        }

        assert!(arena.is_full());
        assert_eq!(
            arena.insert(1),
            Err(AvlError::CapacityExhausted {
                capacity: DEFAULT_CAPACITY as u32
            })
        );
        assert_eq!(arena.len(), DEFAULT_CAPACITY);
        assert_eq!(arena.lowest(), Some(0));
        assert_eq!(arena.highest(), Some((DEFAULT_CAPACITY as u64 - 1) * 3));
        arena.validate().unwrap();
    }

    #[test]
    fn test_with_capacity() {
        let mut arena = AvlArena::with_capacity(3).unwrap();
        assert_eq!(arena.capacity(), 3);

        for key in [30, 10, 20] {
            arena.insert(key).unwrap();
        }
        assert!(arena.insert(40).is_err());

        assert!(arena.remove(10));
        arena.insert(40).unwrap();
        assert_eq!(arena.iter().collect::<Vec<_>>(), vec![20, 30, 40]);
        assert_eq!(format!("{:?}", arena), "{20, 30, 40}");

        let empty = AvlArena::with_capacity(0).unwrap();
        assert!(empty.is_full());
        assert!(empty.iter().next().is_none());
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_capacity_above_u32() {
        assert!(matches!(
            AvlArena::with_capacity(u32::MAX as usize + 1),
            Err(AvlError::InvalidCapacity { .. })
        ));
    }

    #[test]
    fn test_search_path_ends_at_match() {
        let mut arena = AvlArena::with_capacity(16).unwrap();

        for key in 1..=15 {
            arena.insert(key).unwrap();
        }

        let path = arena.search_path(1);
        assert_eq!(path.len() as u32, arena.height());
        assert_eq!(path.last().copied(), Some(arena.find_index(1)));
        assert!(arena.search_path(100).iter().all(|index| index.is_some()));
        assert!(arena.find_index(100).is_none());
    }

    #[test]
    fn test_clear() {
        let mut arena = AvlArena::with_capacity(2).unwrap();
        arena.insert(1).unwrap();
        arena.insert(2).unwrap();

        arena.clear();

        assert!(arena.is_empty());
        assert!(!arena.contains(1));
        arena.insert(3).unwrap();
        arena.validate().unwrap();
    }
}
