//! Core graph types and operations.
//!
//! This module defines the fundamental building blocks:
//! - [`TaskNode`]: one executed task instance and its scheduling metadata
//! - [`FlowEdge`]: a data-flow dependency between two tasks
//! - [`IdentifierIndex`]: the name <-> [`TaskId`] bijection
//! - [`DagBuilder`]: the mutable graph used while loading
//! - [`TaskDag`]: the frozen, read-only graph

mod builder;
mod dag;
mod index;
mod integrity;
mod policy;
mod types;

pub use builder::{DagBuilder, EdgeInsert, NodeInsert};
pub use dag::{Predecessors, Successors, TaskDag};
pub use index::{IdentifierIndex, Registration};
pub use integrity::{DanglingEdge, Endpoint, IntegrityReport};
pub use policy::{BuildPolicy, DuplicatePolicy, EdgePolicy};
pub use types::{FlowEdge, TaskId, TaskNode};
