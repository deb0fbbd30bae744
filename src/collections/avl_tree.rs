use bytemuck::{Pod, Zeroable};
use std::cmp::max;
use std::iter::FusedIterator;
use tracing::{debug, trace, warn};

use crate::error::{AvlError, Result};
use crate::pod::NodeIndex;

// Enum representing the fields of a node.
#[derive(Copy, Clone)]
enum Register {
    Left,
    Right,
    Height,
}

// Enum representing the fields of the allocator.
#[derive(Copy, Clone)]
enum Field {
    Root,
    Size,
    Capacity,
    FreeListHead,
    Sequence,
}

/// Macro to access a node.
macro_rules! node {
    ( $array:expr, $index:expr ) => {
        $array[$index.position()]
    };
}

/// Returns the height of the subtree rooted at `index`; a missing node has height 0.
#[inline]
fn height_of(nodes: &[Node], index: NodeIndex) -> u32 {
    if index.is_none() {
        0
    } else {
        node!(nodes, index).get_register(Register::Height)
    }
}

/// Splits a byte buffer into the header and the node slots.
///
/// Trailing bytes that do not form a whole node are ignored.
fn split_layout(bytes: &[u8]) -> Result<(&Allocator, &[Node])> {
    if bytes.len() < std::mem::size_of::<Allocator>() {
        return Err(AvlError::Layout {
            reason: format!(
                "buffer of {} bytes is shorter than the {}-byte header",
                bytes.len(),
                std::mem::size_of::<Allocator>()
            ),
        });
    }

    let (allocator, nodes) = bytes.split_at(std::mem::size_of::<Allocator>());
    let usable = nodes.len() - (nodes.len() % std::mem::size_of::<Node>());

    let allocator = bytemuck::try_from_bytes::<Allocator>(allocator).map_err(AvlError::layout)?;
    let nodes = bytemuck::try_cast_slice(&nodes[..usable]).map_err(AvlError::layout)?;

    Ok((allocator, nodes))
}

fn split_layout_mut(bytes: &mut [u8]) -> Result<(&mut Allocator, &mut [Node])> {
    if bytes.len() < std::mem::size_of::<Allocator>() {
        return Err(AvlError::Layout {
            reason: format!(
                "buffer of {} bytes is shorter than the {}-byte header",
                bytes.len(),
                std::mem::size_of::<Allocator>()
            ),
        });
    }

    let (allocator, nodes) = bytes.split_at_mut(std::mem::size_of::<Allocator>());
    let usable = nodes.len() - (nodes.len() % std::mem::size_of::<Node>());

    let allocator =
        bytemuck::try_from_bytes_mut::<Allocator>(allocator).map_err(AvlError::layout)?;
    let nodes = bytemuck::try_cast_slice_mut(&mut nodes[..usable]).map_err(AvlError::layout)?;

    Ok((allocator, nodes))
}

fn check_capacity(allocator: &Allocator, nodes: &[Node]) -> Result<()> {
    let capacity = allocator.get_field(Field::Capacity) as usize;

    if capacity > nodes.len() {
        return Err(AvlError::Layout {
            reason: format!(
                "capacity {} exceeds the {} node slots of the buffer",
                capacity,
                nodes.len()
            ),
        });
    }

    Ok(())
}

/// AVL tree over `u64` keys, stored in a fixed-capacity array of nodes. Keys
/// are kept in order and the heights of two sibling subtrees differ by one at
/// most.
///
/// The tree is an ordered multiset: inserting a key that is already present
/// adds a second node with the same key.
///
/// This type can be used to reference a read-only tree.
#[derive(Clone, Copy)]
pub struct AVLTree<'a> {
    /// Node allocator.
    allocator: &'a Allocator,

    /// Array of nodes to store the tree.
    nodes: &'a [Node],
}

impl<'a> AVLTree<'a> {
    pub(crate) fn new(allocator: &'a Allocator, nodes: &'a [Node]) -> Self {
        Self { allocator, nodes }
    }

    /// Returns the required data length (in bytes) to store a tree with the specified capacity.
    pub const fn data_len(capacity: usize) -> usize {
        std::mem::size_of::<Allocator>() + (capacity * std::mem::size_of::<Node>())
    }

    /// Loads a tree from a byte array.
    ///
    /// The buffer must be aligned for `u64` and hold at least as many node
    /// slots as the stored capacity.
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self> {
        let (allocator, nodes) = split_layout(bytes)?;
        check_capacity(allocator, nodes)?;

        Ok(Self { allocator, nodes })
    }

    /// Returns the capacity of the tree.
    pub fn capacity(&self) -> usize {
        self.allocator.get_field(Field::Capacity) as usize
    }

    /// Returns the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.allocator.get_field(Field::Size) as usize
    }

    /// Indicates whether the tree is full or not.
    pub fn is_full(&self) -> bool {
        self.allocator.get_field(Field::Size) >= self.allocator.get_field(Field::Capacity)
    }

    /// Indicates whether the tree is empty or not.
    pub fn is_empty(&self) -> bool {
        self.allocator.get_field(Field::Size) == 0
    }

    /// Index of the root node, or [`NodeIndex::NONE`] for an empty tree.
    pub fn root(&self) -> NodeIndex {
        self.allocator.get_index(Field::Root)
    }

    /// Height of the whole tree.
    pub fn height(&self) -> u32 {
        height_of(self.nodes, self.root())
    }

    /// Height of the subtree rooted at `index`.
    pub fn height_of(&self, index: NodeIndex) -> u32 {
        height_of(self.nodes, index)
    }

    /// Key stored in the slot referenced by `index`.
    pub fn key_at(&self, index: NodeIndex) -> Option<u64> {
        if index.is_none() {
            return None;
        }
        self.nodes.get(index.position()).map(|node| node.key)
    }

    /// Checks whether a key is present in the tree or not.
    ///
    /// # Arguments
    ///
    /// * `key` - the key of the node.
    pub fn contains(&self, key: u64) -> bool {
        self.find_index(key).is_some()
    }

    /// Returns the index of the first node holding `key` met while descending
    /// from the root, or [`NodeIndex::NONE`] if the key is absent.
    ///
    /// Every visited index is emitted as a `trace` event.
    pub fn find_index(&self, key: u64) -> NodeIndex {
        self.descend(key, |index| trace!(index = %index, key, "visiting node"))
    }

    /// Returns the indices visited by a lookup of `key`, in order.
    pub fn search_path(&self, key: u64) -> Vec<NodeIndex> {
        let mut path = Vec::with_capacity(self.height() as usize);
        self.descend(key, |index| path.push(index));
        path
    }

    fn descend(&self, key: u64, mut visit: impl FnMut(NodeIndex)) -> NodeIndex {
        let mut reference_node = self.root();

        while reference_node.is_some() {
            visit(reference_node);
            let current = node!(self.nodes, reference_node).key;

            reference_node = if key < current {
                node!(self.nodes, reference_node).get_child(Register::Left)
            } else if key > current {
                node!(self.nodes, reference_node).get_child(Register::Right)
            } else {
                return reference_node;
            };
        }

        NodeIndex::NONE
    }

    // Find the lowest entry.
    pub fn lowest(&self) -> Option<u64> {
        self.edge(Register::Left)
    }

    // Find the highest entry.
    pub fn highest(&self) -> Option<u64> {
        self.edge(Register::Right)
    }

    fn edge(&self, branch: Register) -> Option<u64> {
        let mut node = self.root();

        if node.is_none() {
            return None;
        }

        while node!(self.nodes, node).get_child(branch).is_some() {
            node = node!(self.nodes, node).get_child(branch);
        }

        Some(node!(self.nodes, node).key)
    }

    /// An iterator visiting all keys in ascending order.
    pub fn iter(&self) -> InOrder<'a> {
        self.iter_from(self.root())
    }

    /// An iterator visiting the keys of the subtree rooted at `root` in
    /// ascending order.
    pub fn iter_from(&self, root: NodeIndex) -> InOrder<'a> {
        InOrder {
            nodes: self.nodes,
            stack: Vec::with_capacity(height_of(self.nodes, root) as usize),
            cursor: root,
        }
    }

    /// Checks the structure of the tree.
    ///
    /// Verifies key order, stored heights, the AVL balance of every node, that
    /// no slot is linked twice and that every handed-out slot is either
    /// reachable from the root or on the free list.
    pub fn validate(&self) -> Result<()> {
        let capacity = self.capacity();
        let sequence = self.allocator.get_field(Field::Sequence) as usize;

        if capacity > self.nodes.len() || sequence > capacity {
            return Err(AvlError::violation(
                NodeIndex::NONE,
                format!(
                    "sequence {} and capacity {} do not fit {} node slots",
                    sequence,
                    capacity,
                    self.nodes.len()
                ),
            ));
        }

        let mut visited = vec![false; sequence];
        let (_, reachable) = self.validate_subtree(self.root(), None, None, &mut visited)?;

        if reachable != self.len() {
            return Err(AvlError::violation(
                self.root(),
                format!("{} reachable nodes but size is {}", reachable, self.len()),
            ));
        }

        let mut free = 0;
        let mut current = self.allocator.get_index(Field::FreeListHead);

        while current.is_some() {
            Self::visit(current, &mut visited)?;
            free += 1;
            current = node!(self.nodes, current).get_child(Register::Left);
        }

        if reachable + free != sequence {
            return Err(AvlError::violation(
                NodeIndex::NONE,
                format!(
                    "{} live and {} free nodes do not account for {} allocated slots",
                    reachable, free, sequence
                ),
            ));
        }

        Ok(())
    }

    fn visit(index: NodeIndex, visited: &mut [bool]) -> Result<()> {
        match visited.get_mut(index.position()) {
            None => Err(AvlError::violation(index, "slot was never allocated")),
            Some(true) => Err(AvlError::violation(index, "slot is linked more than once")),
            Some(seen) => {
                *seen = true;
                Ok(())
            }
        }
    }

    /// Returns the height and the number of nodes of a valid subtree.
    ///
    /// Equal keys may sit on either side of each other after a rotation, so
    /// the key bounds are inclusive.
    fn validate_subtree(
        &self,
        index: NodeIndex,
        lower: Option<u64>,
        upper: Option<u64>,
        visited: &mut [bool],
    ) -> Result<(u32, usize)> {
        if index.is_none() {
            return Ok((0, 0));
        }

        Self::visit(index, visited)?;
        let node = &node!(self.nodes, index);

        let below = lower.is_some_and(|lower| node.key < lower);
        let above = upper.is_some_and(|upper| node.key > upper);

        if below || above {
            return Err(AvlError::violation(
                index,
                format!("key {} is outside of {:?}..={:?}", node.key, lower, upper),
            ));
        }

        let (left_height, left_count) = self.validate_subtree(
            node.get_child(Register::Left),
            lower,
            Some(node.key),
            visited,
        )?;
        let (right_height, right_count) = self.validate_subtree(
            node.get_child(Register::Right),
            Some(node.key),
            upper,
            visited,
        )?;

        let height = 1 + max(left_height, right_height);

        if node.get_register(Register::Height) != height {
            return Err(AvlError::violation(
                index,
                format!(
                    "stored height {} but subtree height is {}",
                    node.get_register(Register::Height),
                    height
                ),
            ));
        }

        if left_height.abs_diff(right_height) > 1 {
            return Err(AvlError::violation(
                index,
                format!(
                    "unbalanced: left height {}, right height {}",
                    left_height, right_height
                ),
            ));
        }

        Ok((height, 1 + left_count + right_count))
    }
}

/// AVL tree over `u64` keys, stored in a fixed-capacity array of nodes.
///
/// This type can be used to reference a writable tree. Removed nodes are
/// pushed on a free list and their slots are handed out again by later
/// inserts before any never-used slot.
pub struct AVLTreeMut<'a> {
    /// Node allocator.
    allocator: &'a mut Allocator,

    /// Array of nodes to store the tree.
    nodes: &'a mut [Node],
}

impl<'a> AVLTreeMut<'a> {
    pub(crate) fn new(allocator: &'a mut Allocator, nodes: &'a mut [Node]) -> Self {
        Self { allocator, nodes }
    }

    /// Returns the required data length (in bytes) to store a tree with the specified capacity.
    pub const fn data_len(capacity: usize) -> usize {
        AVLTree::data_len(capacity)
    }

    /// Loads a tree from a byte array.
    ///
    /// An all-zero buffer is an empty tree with no capacity; call
    /// [`AVLTreeMut::initialize`] to set one.
    pub fn from_bytes_mut(bytes: &'a mut [u8]) -> Result<Self> {
        let (allocator, nodes) = split_layout_mut(bytes)?;
        check_capacity(allocator, nodes)?;

        Ok(Self { allocator, nodes })
    }

    /// Read-only view of the tree.
    pub fn view(&self) -> AVLTree<'_> {
        AVLTree::new(&*self.allocator, &*self.nodes)
    }

    /// Initializes the tree with the specified capacity.
    ///
    /// This resets the root, the free list and the allocation cursor; any
    /// previous content is discarded.
    pub fn initialize(&mut self, capacity: u32) -> Result<()> {
        if capacity as usize > self.nodes.len() {
            return Err(AvlError::InvalidCapacity {
                requested: capacity as usize,
                reason: "exceeds the node slots of the buffer",
            });
        }

        self.allocator.initialize(capacity);
        debug!(capacity, "initialized tree");

        Ok(())
    }

    /// Removes every node, keeping the capacity.
    pub fn clear(&mut self) {
        let capacity = self.allocator.get_field(Field::Capacity);
        self.allocator.initialize(capacity);
    }

    /// Returns the capacity of the tree.
    pub fn capacity(&self) -> usize {
        self.view().capacity()
    }

    /// Returns the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.view().len()
    }

    /// Indicates whether the tree is full or not.
    pub fn is_full(&self) -> bool {
        self.view().is_full()
    }

    /// Indicates whether the tree is empty or not.
    pub fn is_empty(&self) -> bool {
        self.view().is_empty()
    }

    pub fn root(&self) -> NodeIndex {
        self.allocator.get_index(Field::Root)
    }

    /// Replaces the stored root, typically with the result of
    /// [`AVLTreeMut::insert_at`] or [`AVLTreeMut::delete_at`].
    pub fn set_root(&mut self, root: NodeIndex) {
        self.allocator.set_index(Field::Root, root);
    }

    pub fn contains(&self, key: u64) -> bool {
        self.view().contains(key)
    }

    pub fn find_index(&self, key: u64) -> NodeIndex {
        self.view().find_index(key)
    }

    pub fn iter(&self) -> InOrder<'_> {
        self.view().iter()
    }

    pub fn validate(&self) -> Result<()> {
        self.view().validate()
    }

    /// Insert a key on the tree.
    ///
    /// The key is inserted maintaining the natural order; a key equal to an
    /// existing one is placed in its right subtree. Returns the index of the
    /// new node.
    ///
    /// # Errors
    ///
    /// [`AvlError::CapacityExhausted`] when no slot is free. The tree is left
    /// unchanged in that case.
    pub fn insert(&mut self, key: u64) -> Result<NodeIndex> {
        let mut inserted = NodeIndex::NONE;
        let root = self.insert_node(self.root(), key, &mut inserted)?;
        self.set_root(root);

        Ok(inserted)
    }

    /// Inserts `key` into the subtree rooted at `index` and returns the new
    /// root of that subtree.
    ///
    /// The stored root is not modified; the caller links the returned index
    /// where the subtree hangs (see [`AVLTreeMut::set_root`]).
    pub fn insert_at(&mut self, index: NodeIndex, key: u64) -> Result<NodeIndex> {
        let mut inserted = NodeIndex::NONE;
        self.insert_node(index, key, &mut inserted)
    }

    fn insert_node(
        &mut self,
        index: NodeIndex,
        key: u64,
        inserted: &mut NodeIndex,
    ) -> Result<NodeIndex> {
        if index.is_none() {
            *inserted = self.add(key)?;
            return Ok(*inserted);
        }

        // links are only rewritten once the recursive call succeeded, so a
        // failed allocation leaves the path untouched
        if key < node!(self.nodes, index).key {
            let left = node!(self.nodes, index).get_child(Register::Left);
            let left = self.insert_node(left, key, inserted)?;
            node!(self.nodes, index).set_child(Register::Left, left);
        } else {
            let right = node!(self.nodes, index).get_child(Register::Right);
            let right = self.insert_node(right, key, inserted)?;
            node!(self.nodes, index).set_child(Register::Right, right);
        }

        self.update_height(index);
        Ok(self.balance(index))
    }

    /// Removes one node holding `key`, returning whether a node was removed.
    pub fn remove(&mut self, key: u64) -> bool {
        let size = self.allocator.get_field(Field::Size);
        let root = self.delete_at(self.root(), key);
        self.set_root(root);

        self.allocator.get_field(Field::Size) < size
    }

    /// Removes one node holding `key` from the subtree rooted at `index` and
    /// returns the new root of that subtree.
    ///
    /// An absent key leaves the subtree unchanged. A node with two children
    /// takes the key of its in-order successor, which is then removed from
    /// the right subtree.
    pub fn delete_at(&mut self, index: NodeIndex, key: u64) -> NodeIndex {
        if index.is_none() {
            return index;
        }

        let current = node!(self.nodes, index).key;
        let left = node!(self.nodes, index).get_child(Register::Left);
        let right = node!(self.nodes, index).get_child(Register::Right);

        if key < current {
            let left = self.delete_at(left, key);
            node!(self.nodes, index).set_child(Register::Left, left);
        } else if key > current {
            let right = self.delete_at(right, key);
            node!(self.nodes, index).set_child(Register::Right, right);
        } else if left.is_none() || right.is_none() {
            let child = if left.is_some() { left } else { right };

            if child.is_none() {
                self.remove_node(index);
                return NodeIndex::NONE;
            }

            // the only child takes over this slot, so the parent link stays valid
            node!(self.nodes, index) = node!(self.nodes, child);
            self.remove_node(child);
        } else {
            let successor = self.leftmost(right);
            let successor_key = node!(self.nodes, successor).key;

            node!(self.nodes, index).key = successor_key;
            let right = self.delete_at(right, successor_key);
            node!(self.nodes, index).set_child(Register::Right, right);
        }

        self.update_height(index);
        self.balance(index)
    }

    fn leftmost(&self, mut index: NodeIndex) -> NodeIndex {
        while node!(self.nodes, index).get_child(Register::Left).is_some() {
            index = node!(self.nodes, index).get_child(Register::Left);
        }
        index
    }

    /// Height of the subtree rooted at `index`; 0 for [`NodeIndex::NONE`].
    pub fn height_of(&self, index: NodeIndex) -> u32 {
        height_of(self.nodes, index)
    }

    /// Updates the height of a node.
    ///
    /// The height of a node is determined by the height of the larger child's subtree plus one.
    ///
    /// # Arguments
    ///
    /// * `index` - index of the node.
    pub fn update_height(&mut self, index: NodeIndex) {
        let left = node!(self.nodes, index).get_child(Register::Left);
        let right = node!(self.nodes, index).get_child(Register::Right);

        let height = 1 + max(height_of(self.nodes, left), height_of(self.nodes, right));

        node!(self.nodes, index).set_register(Register::Height, height);
    }

    /// Perform a left AVL rotation, returning the new root of the subtree.
    ///
    /// # Arguments
    ///
    /// * `index` - index of the unbalanced node. It must have a right child.
    pub fn rotate_left(&mut self, index: NodeIndex) -> NodeIndex {
        let right = node!(self.nodes, index).get_child(Register::Right);
        let right_left = node!(self.nodes, right).get_child(Register::Left);

        node!(self.nodes, index).set_child(Register::Right, right_left);
        node!(self.nodes, right).set_child(Register::Left, index);

        self.update_height(index);
        self.update_height(right);
        trace!(pivot = %index, promoted = %right, "rotated left");

        right
    }

    /// Perform a right AVL rotation, returning the new root of the subtree.
    ///
    /// # Arguments
    ///
    /// * `index` - index of the unbalanced node. It must have a left child.
    pub fn rotate_right(&mut self, index: NodeIndex) -> NodeIndex {
        let left = node!(self.nodes, index).get_child(Register::Left);
        let left_right = node!(self.nodes, left).get_child(Register::Right);

        node!(self.nodes, index).set_child(Register::Left, left_right);
        node!(self.nodes, left).set_child(Register::Right, index);

        self.update_height(index);
        self.update_height(left);
        trace!(pivot = %index, promoted = %left, "rotated right");

        left
    }

    /// Rebalances the subtree rooted at `index` to maintain the AVL rule,
    /// returning its (possibly new) root.
    ///
    /// The children of `index` must already be balanced and carry correct
    /// heights, which holds when this is applied bottom-up along the path of
    /// an insert or delete.
    pub fn balance(&mut self, index: NodeIndex) -> NodeIndex {
        let left = node!(self.nodes, index).get_child(Register::Left);
        let right = node!(self.nodes, index).get_child(Register::Right);

        let left_height = height_of(self.nodes, left);
        let right_height = height_of(self.nodes, right);

        if left_height > right_height + 1 {
            let left_left = node!(self.nodes, left).get_child(Register::Left);
            let left_right = node!(self.nodes, left).get_child(Register::Right);

            if height_of(self.nodes, left_left) < height_of(self.nodes, left_right) {
                let pivot = self.rotate_left(left);
                node!(self.nodes, index).set_child(Register::Left, pivot);
            }
            self.rotate_right(index)
        } else if right_height > left_height + 1 {
            let right_left = node!(self.nodes, right).get_child(Register::Left);
            let right_right = node!(self.nodes, right).get_child(Register::Right);

            if height_of(self.nodes, right_right) < height_of(self.nodes, right_left) {
                let pivot = self.rotate_right(right);
                node!(self.nodes, index).set_child(Register::Right, pivot);
            }
            self.rotate_left(index)
        } else {
            index
        }
    }

    /// Takes a slot for a new leaf, preferring the free list over the
    /// never-used slots.
    fn add(&mut self, key: u64) -> Result<NodeIndex> {
        let free_node = self.allocator.get_index(Field::FreeListHead);

        let index = if free_node.is_some() {
            self.allocator.set_index(
                Field::FreeListHead,
                node!(self.nodes, free_node).get_child(Register::Left),
            );
            free_node
        } else {
            let sequence = self.allocator.get_field(Field::Sequence);
            let capacity = self.allocator.get_field(Field::Capacity);

            if sequence >= capacity {
                warn!(capacity, key, "tree is full, rejecting insert");
                return Err(AvlError::CapacityExhausted { capacity });
            }

            self.allocator.set_field(Field::Sequence, sequence + 1);
            NodeIndex::from_slot(sequence)
        };

        node!(self.nodes, index).initialize(key);
        self.allocator
            .set_field(Field::Size, self.allocator.get_field(Field::Size) + 1);
        trace!(index = %index, key, "allocated node");

        Ok(index)
    }

    /// Clears a node and pushes its slot on the free list.
    fn remove_node(&mut self, index: NodeIndex) {
        let free_list_head = self.allocator.get_index(Field::FreeListHead);

        // we use the left register to link free nodes
        node!(self.nodes, index).release(free_list_head);
        self.allocator.set_index(Field::FreeListHead, index);
        self.allocator
            .set_field(Field::Size, self.allocator.get_field(Field::Size) - 1);
        trace!(index = %index, "released node");
    }
}

/// Lazy in-order traversal of a subtree.
///
/// Dropping the iterator early is free; calling `iter` again restarts from
/// the smallest key.
pub struct InOrder<'a> {
    nodes: &'a [Node],
    stack: Vec<NodeIndex>,
    cursor: NodeIndex,
}

impl Iterator for InOrder<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        while self.cursor.is_some() {
            self.stack.push(self.cursor);
            self.cursor = node!(self.nodes, self.cursor).get_child(Register::Left);
        }

        let index = self.stack.pop()?;
        let node = &node!(self.nodes, index);
        self.cursor = node.get_child(Register::Right);

        Some(node.key)
    }
}

impl FusedIterator for InOrder<'_> {}

/// The allocator is responsible to keep track of the status of the tree.
///
/// `sequence` counts the slots handed out so far; slots at or past it have
/// never been used. Removed nodes are chained from `free_list_head` through
/// their left register and are reused first.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct Allocator {
    /// Allocator fields:
    ///   [0] - root
    ///   [1] - size
    ///   [2] - capacity
    ///   [3] - free_list_head
    ///   [4] - sequence
    ///   [5] - not in use (padding)
    fields: [u32; 6],
}

impl Allocator {
    pub fn initialize(&mut self, capacity: u32) {
        let none = NodeIndex::NONE.to_raw();
        self.fields = [none, 0, capacity, none, 0, 0];
    }

    #[inline(always)]
    fn get_field(&self, field: Field) -> u32 {
        self.fields[field as usize]
    }

    #[inline(always)]
    fn set_field(&mut self, field: Field, value: u32) {
        self.fields[field as usize] = value;
    }

    #[inline(always)]
    fn get_index(&self, field: Field) -> NodeIndex {
        NodeIndex::from_raw(self.get_field(field))
    }

    #[inline(always)]
    fn set_index(&mut self, field: Field, index: NodeIndex) {
        self.set_field(field, index.to_raw());
    }
}

#[repr(C)]
#[derive(Clone, Copy, Default, Pod, Zeroable)]
pub struct Node {
    /// Registers for a node. This is fixed to include:
    ///   [0] - left child (next free node while on the free list)
    ///   [1] - right child
    ///   [2] - height
    ///   [3] - not in use (padding)
    registers: [u32; 4],
    key: u64,
}

impl Node {
    fn initialize(&mut self, key: u64) {
        let none = NodeIndex::NONE.to_raw();
        self.registers = [none, none, 1, 0];
        self.key = key;
    }

    fn release(&mut self, next_free: NodeIndex) {
        let none = NodeIndex::NONE.to_raw();
        self.registers = [next_free.to_raw(), none, 0, 0];
        self.key = 0;
    }

    #[inline(always)]
    fn get_register(&self, register: Register) -> u32 {
        self.registers[register as usize]
    }

    #[inline(always)]
    fn set_register(&mut self, register: Register, value: u32) {
        self.registers[register as usize] = value;
    }

    #[inline(always)]
    fn get_child(&self, register: Register) -> NodeIndex {
        NodeIndex::from_raw(self.get_register(register))
    }

    #[inline(always)]
    fn set_child(&mut self, register: Register, child: NodeIndex) {
        self.set_register(register, child.to_raw());
    }
}
