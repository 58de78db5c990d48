//! # taskdag-grapher
//!
//! Reader for the DOT traces a task-based runtime writes when its grapher
//! instrumentation is enabled. One trace is written per process; this crate
//! loads any number of them, in order, into a single [`TaskDag`].
//!
//! ## Features
//!
//! - Strict line grammar: graph start, node, edge, graph end, nothing else
//! - Fail-fast loading with file and line context on every error
//! - Configurable duplicate handling through [`taskdag::BuildPolicy`]
//! - Load metrics for reporting
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use taskdag_grapher::load_all;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dag = load_all(&["dag.0.dot", "dag.1.dot"])?;
//! println!("DAG has {} nodes and {} edges", dag.node_count(), dag.edge_count());
//!
//! for (edge, target) in dag.successors_by_id(0, 1, 7)? {
//!     println!("{} -> {target} ({} => {})", edge.source, edge.flow_source, edge.flow_target);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod errors;
pub mod line;
pub mod loader;
pub mod metrics;

pub use config::GrapherConfig;
pub use errors::{LoadError, LoadResult};
pub use line::{match_line, NodeDecl, Shape, ShapeError, TraceLine};
pub use loader::{load_all, FileSummary, GrapherLoader};
pub use metrics::LoadMetrics;

// Re-export the graph types for convenience
pub use taskdag::{BuildPolicy, DagBuilder, TaskDag, TaskId};
