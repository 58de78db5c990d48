//! Opt-in referential integrity check over a loaded DAG.
//!
//! Loading never validates edge endpoints; traces from several processes
//! routinely reference tasks declared in another file, or in none.

use super::dag::TaskDag;
use super::types::FlowEdge;
use crate::error::{DagError, Result};
use serde::{Deserialize, Serialize};

/// Which end of an edge a dangling name sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endpoint {
    /// The producing side
    Source,
    /// The consuming side
    Target,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Source => write!(f, "source"),
            Endpoint::Target => write!(f, "target"),
        }
    }
}

/// One undeclared endpoint of one edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DanglingEdge {
    /// Position of the edge in file order
    pub edge_index: usize,
    /// Which end is undeclared
    pub endpoint: Endpoint,
    /// The undeclared name
    pub name: String,
}

/// Result of [`TaskDag::check_integrity`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    /// Every undeclared endpoint, in edge order (source before target)
    pub dangling: Vec<DanglingEdge>,
}

impl IntegrityReport {
    /// True if every edge endpoint is a declared node.
    pub fn is_consistent(&self) -> bool {
        self.dangling.is_empty()
    }
}

impl TaskDag {
    /// List every edge endpoint that names an undeclared node.
    pub fn check_integrity(&self) -> IntegrityReport {
        let mut dangling = Vec::new();
        for (edge_index, edge) in self.edges.iter().enumerate() {
            for (endpoint, name) in [
                (Endpoint::Source, &edge.source),
                (Endpoint::Target, &edge.target),
            ] {
                if !self.contains_node(name) {
                    dangling.push(DanglingEdge {
                        edge_index,
                        endpoint,
                        name: name.clone(),
                    });
                }
            }
        }
        IntegrityReport { dangling }
    }

    /// Fail on the first edge endpoint that names an undeclared node.
    ///
    /// # Errors
    ///
    /// Returns [`DagError::DanglingEdge`] describing the first offender.
    pub fn ensure_integrity(&self) -> Result<()> {
        match self.check_integrity().dangling.into_iter().next() {
            None => Ok(()),
            Some(dangling) => {
                let edge: &FlowEdge = &self.edges[dangling.edge_index];
                Err(DagError::DanglingEdge {
                    source_name: edge.source.clone(),
                    target_name: edge.target.clone(),
                    endpoint: dangling.endpoint,
                    missing: dangling.name,
                })
            }
        }
    }
}
