use std::result::Result as StdResult;

use thiserror::Error;

use crate::id::NodeId;

/// Result type for trellis operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    /// The handle does not refer to a live widget.
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Reparenting would make a widget its own ancestor.
    #[error("reparenting {child:?} under {parent:?} would create a cycle")]
    WouldCreateCycle {
        /// Requested parent.
        parent: NodeId,
        /// Widget being reparented.
        child: NodeId,
    },

    /// The widget is already borrowed by a running hook.
    #[error("widget for {0:?} is already borrowed")]
    ReentrantWidgetBorrow(NodeId),

    #[error("invalid operation: {0}")]
    /// Operation rejected for the given arguments.
    InvalidOperation(String),

    #[error("config: {0}")]
    /// Style or other configuration could not be loaded.
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}
