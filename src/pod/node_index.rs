use bytemuck::{Pod, Zeroable};
use std::fmt::{Debug, Display};

/// Raw value reserved for "no node".
const NONE_VALUE: u32 = 0;

/// A "pod-enabled" reference to a node slot of the arena.
///
/// Slots are numbered from `1`, so the zero value doubles as the sentinel for
/// a missing child or an empty tree. This keeps a zero-initialized buffer a
/// valid (empty) tree and lets the index live inside `Pod` node records.
#[repr(transparent)]
#[derive(Copy, Clone, Default, Pod, Zeroable, PartialEq, Eq, Hash)]
pub struct NodeIndex(u32);

impl NodeIndex {
    /// Index representing the absence of a node.
    pub const NONE: NodeIndex = NodeIndex(NONE_VALUE);

    /// Creates the index for the zero-based `slot` of the arena.
    ///
    /// Slot `u32::MAX` is not addressable since its index would overflow.
    #[inline]
    pub fn from_slot(slot: u32) -> Self {
        assert_ne!(slot, u32::MAX, "slot {} is not addressable", slot);
        Self(slot + 1)
    }

    /// Returns the zero-based slot this index refers to, if any.
    #[inline]
    pub fn slot(&self) -> Option<u32> {
        if self.is_some() {
            Some(self.0 - 1)
        } else {
            None
        }
    }

    #[inline]
    pub fn is_some(&self) -> bool {
        self.0 != NONE_VALUE
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        self.0 == NONE_VALUE
    }

    /// Position of the slot in the node array.
    ///
    /// `NONE` maps to position `u32::MAX`, which is past the end of any node
    /// slice, so indexing with it trips the bounds check.
    #[inline(always)]
    pub(crate) fn position(&self) -> usize {
        self.0.wrapping_sub(1) as usize
    }

    #[inline(always)]
    pub(crate) const fn to_raw(self) -> u32 {
        self.0
    }

    #[inline(always)]
    pub(crate) const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<NodeIndex> for Option<u32> {
    fn from(index: NodeIndex) -> Self {
        index.slot()
    }
}

impl Debug for NodeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.slot() {
            Some(slot) => write!(f, "NodeIndex({})", slot),
            None => write!(f, "NodeIndex::NONE"),
        }
    }
}

impl Display for NodeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.slot() {
            Some(slot) => write!(f, "{}", slot),
            None => write!(f, "none"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none() {
        let none = NodeIndex::NONE;
        assert!(none.is_none());
        assert_eq!(none.slot(), None);
        assert_eq!(NodeIndex::default(), NodeIndex::NONE);
        assert_eq!(bytemuck::cast::<u32, NodeIndex>(0), NodeIndex::NONE);
    }

    #[test]
    fn test_slots() {
        let first = NodeIndex::from_slot(0);
        assert!(first.is_some());
        assert_eq!(first.slot(), Some(0));
        assert_eq!(first.position(), 0);

        let last = NodeIndex::from_slot(u32::MAX - 1);
        assert_eq!(last.slot(), Some(u32::MAX - 1));

        let slot: Option<u32> = NodeIndex::from_slot(7).into();
        assert_eq!(slot, Some(7));
    }

    #[test]
    #[should_panic(expected = "is not addressable")]
    fn test_unaddressable_slot() {
        NodeIndex::from_slot(u32::MAX);
    }

    #[test]
    fn test_debug_display() {
        assert_eq!(format!("{:?}", NodeIndex::from_slot(3)), "NodeIndex(3)");
        assert_eq!(format!("{}", NodeIndex::from_slot(3)), "3");
        assert_eq!(format!("{:?}", NodeIndex::NONE), "NodeIndex::NONE");
        assert_eq!(format!("{}", NodeIndex::NONE), "none");
    }

    #[test]
    fn test_pod_properties() {
        assert_eq!(std::mem::size_of::<NodeIndex>(), std::mem::size_of::<u32>());
    }
}
