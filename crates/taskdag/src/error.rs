//! Error types for task DAG operations.
//!
//! All fallible operations return [`Result<T>`]. Lookups that miss are
//! reported with [`DagError::NodeNotFound`] or [`DagError::TaskIdNotFound`];
//! both are the "not found" kind (see [`DagError::is_not_found`]) and never
//! affect the rest of the graph.

use crate::graph::{Endpoint, TaskId};
use thiserror::Error;

/// Result type alias for task DAG operations.
pub type Result<T> = std::result::Result<T, DagError>;

/// Error type for building and querying a task DAG.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DagError {
    /// No node is declared under this name
    #[error("Node not found: {name}")]
    NodeNotFound {
        /// Name that was looked up
        name: String,
    },

    /// No node is registered under this task id
    #[error("Task id not found: {id}")]
    TaskIdNotFound {
        /// Composite id that was looked up
        id: TaskId,
    },

    /// A name was declared twice under [`DuplicatePolicy::Reject`](crate::DuplicatePolicy::Reject)
    #[error("Node '{name}' is already declared")]
    DuplicateName {
        /// The re-declared name
        name: String,
    },

    /// A task id was claimed by a second name under
    /// [`DuplicatePolicy::Reject`](crate::DuplicatePolicy::Reject)
    #[error("Task id {id} already belongs to '{existing}', cannot register '{incoming}'")]
    DuplicateTaskId {
        /// The contested id
        id: TaskId,
        /// Name currently holding the id
        existing: String,
        /// Name that tried to claim it
        incoming: String,
    },

    /// An edge names a task that was never declared
    #[error("Edge {source_name} -> {target_name} references undeclared {endpoint} node '{missing}'")]
    DanglingEdge {
        /// Source name of the offending edge
        source_name: String,
        /// Target name of the offending edge
        target_name: String,
        /// Which end is missing
        endpoint: Endpoint,
        /// The undeclared name
        missing: String,
    },
}

impl DagError {
    /// Create a [`DagError::NodeNotFound`] for the given name.
    pub fn node_not_found(name: impl Into<String>) -> Self {
        Self::NodeNotFound { name: name.into() }
    }

    /// True for lookups that missed, as opposed to policy or integrity failures.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NodeNotFound { .. } | Self::TaskIdNotFound { .. })
    }
}
