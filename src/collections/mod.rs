pub mod arena;
pub mod avl_tree;

#[cfg(test)]
mod proptests;

pub use arena::AvlArena;
pub use arena::DEFAULT_CAPACITY;
pub use avl_tree::AVLTree;
pub use avl_tree::AVLTreeMut;
pub use avl_tree::InOrder;
