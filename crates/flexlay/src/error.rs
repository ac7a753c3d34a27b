//! Errors returned by the tree mutation API.
//!
//! The layout algorithm itself never fails; these only report callers
//! breaking the contract of [`crate::Tree`]. Every error is also sent to
//! the node's [`crate::Config`] logger at [`crate::LogLevel::Error`].

use thiserror::Error;

use crate::tree::NodeId;

/// A rejected tree mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The id does not name a live node.
    #[error("node {0:?} does not exist in this tree")]
    UnknownNode(NodeId),
    /// The node is sealed and must be unsealed before it can change.
    #[error("node {0:?} is sealed; unseal it before mutating")]
    Sealed(NodeId),
    /// Inserting would make a node its own descendant.
    #[error("inserting {child:?} under {parent:?} would create a cycle")]
    Cycle {
        /// The would-be owner.
        parent: NodeId,
        /// The node being inserted.
        child: NodeId,
    },
    /// The child already belongs to another node.
    #[error("node {child:?} already has owner {owner:?}; remove it first")]
    ChildHasOwner {
        /// The node being inserted.
        child: NodeId,
        /// Its current owner.
        owner: NodeId,
    },
    /// Nodes with a measure callback cannot have children.
    #[error("node {0:?} has a measure function and cannot have children")]
    HasMeasureFunc(NodeId),
    /// A node with children cannot take a measure callback.
    #[error("node {0:?} has children and cannot take a measure function")]
    HasChildren(NodeId),
    /// Insertion index past the end of the child list.
    #[error("index {index} is out of bounds for a node with {len} children")]
    ChildIndexOutOfBounds {
        /// Requested index.
        index: usize,
        /// Current child count.
        len: usize,
    },
    /// Only nodes with a measure callback may be dirtied by hand.
    #[error("node {0:?} has no measure function; only measured leaves can be marked dirty")]
    NotMeasured(NodeId),
}
