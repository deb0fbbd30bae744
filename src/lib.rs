pub mod collections;
pub mod error;
pub mod pod;

pub use collections::{AVLTree, AVLTreeMut, AvlArena, InOrder, DEFAULT_CAPACITY};
pub use error::{AvlError, Result};
pub use pod::NodeIndex;
