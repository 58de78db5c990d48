//! Insertion policies for redeclared names, reused task ids and parallel edges.

use serde::{Deserialize, Serialize};

/// What to do when a key that is already present is declared again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Last declaration wins (the grapher traces' native behaviour)
    #[default]
    Overwrite,
    /// Refuse the second declaration with an error
    Reject,
}

/// What to do with a second edge between the same ordered pair of names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    /// Append every edge, parallel edges included
    #[default]
    KeepAll,
    /// Keep one edge per pair; later attributes replace earlier ones in place
    MergeParallel,
}

/// The full set of insertion policies applied by a [`DagBuilder`](crate::DagBuilder).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildPolicy {
    /// Re-declaration of a node name
    pub duplicate_names: DuplicatePolicy,
    /// A new name claiming a task id already held by another name
    pub duplicate_task_ids: DuplicatePolicy,
    /// Parallel edges
    pub parallel_edges: EdgePolicy,
}

impl BuildPolicy {
    /// Permissive policy matching how the runtime's own tooling reads traces.
    pub fn permissive() -> Self {
        Self::default()
    }

    /// Reject any redeclared name or reused task id.
    pub fn strict() -> Self {
        Self {
            duplicate_names: DuplicatePolicy::Reject,
            duplicate_task_ids: DuplicatePolicy::Reject,
            parallel_edges: EdgePolicy::KeepAll,
        }
    }

    /// Set the parallel edge policy.
    pub fn with_parallel_edges(mut self, policy: EdgePolicy) -> Self {
        self.parallel_edges = policy;
        self
    }
}
