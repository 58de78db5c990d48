//! # taskdag
//!
//! An in-memory DAG of executed tasks, rebuilt from the graph traces a
//! task-based runtime writes when its grapher instrumentation is enabled.
//!
//! ## Core Principles
//!
//! - **Explicit Lifecycle**: a [`DagBuilder`] is mutated while loading, then
//!   frozen into a read-only [`TaskDag`]
//! - **Two Keys**: every task is reachable by display name and by its
//!   composite [`TaskId`]
//! - **Named Policies**: overwrite-on-redeclare is a [`BuildPolicy`] choice,
//!   never a hidden side effect
//! - **Permissive Edges**: edges may name tasks that are never declared;
//!   integrity checking is a separate, opt-in pass
//!
//! ## Architecture
//!
//! ```text
//! Trace readers (taskdag-grapher)
//!     ↓
//! DagBuilder (nodes, edges, identifier index)
//!     ↓  finish()
//! TaskDag (read-only queries, QueryBuilder, integrity check)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use taskdag::{DagBuilder, FlowEdge, TaskNode};
//!
//! # fn main() -> taskdag::Result<()> {
//! let mut builder = DagBuilder::new();
//! builder.add_node(TaskNode::new("A", "POTRF", 0, 1, 7))?;
//! builder.add_node(TaskNode::new("B", "TRSM", 0, 1, 8))?;
//! builder.add_edge(FlowEdge::new("A", "B", "T", "C"));
//!
//! let dag = builder.finish();
//! assert_eq!(dag.node_by_id(0, 1, 7)?.name, "A");
//! assert_eq!(dag.successors_by_id(0, 1, 7)?.count(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod graph;
pub mod query;

// Re-export main types
pub use error::{DagError, Result};
pub use graph::{
    BuildPolicy, DagBuilder, DanglingEdge, DuplicatePolicy, EdgeInsert, EdgePolicy, Endpoint,
    FlowEdge, IdentifierIndex, IntegrityReport, NodeInsert, Predecessors, Registration,
    Successors, TaskDag, TaskId, TaskNode,
};
pub use query::QueryBuilder;
