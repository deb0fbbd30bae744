use bytemuck::PodCastError;
use thiserror::Error;

use crate::pod::NodeIndex;

pub type Result<T> = std::result::Result<T, AvlError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AvlError {
    /// An insert needed a slot but every slot of the arena is in use.
    #[error("tree is full ({capacity} nodes)")]
    CapacityExhausted { capacity: u32 },
    #[error("invalid capacity {requested}: {reason}")]
    InvalidCapacity {
        requested: usize,
        reason: &'static str,
    },
    #[error("invalid tree layout: {reason}")]
    Layout { reason: String },
    /// Reported by `validate`; never raised by the mutating operations.
    #[error("invariant violated at node {index}: {reason}")]
    InvariantViolation { index: NodeIndex, reason: String },
}

impl AvlError {
    pub(crate) fn layout(error: PodCastError) -> Self {
        AvlError::Layout {
            reason: format!("{:?}", error),
        }
    }

    pub(crate) fn violation(index: NodeIndex, reason: impl Into<String>) -> Self {
        AvlError::InvariantViolation {
            index,
            reason: reason.into(),
        }
    }
}
