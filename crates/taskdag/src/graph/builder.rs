//! Mutable graph used while traces are being loaded.

use super::dag::TaskDag;
use super::index::IdentifierIndex;
use super::policy::{BuildPolicy, DuplicatePolicy, EdgePolicy};
use super::types::{FlowEdge, TaskNode};
use crate::error::{DagError, Result};
use log::{debug, trace};

/// Outcome of [`DagBuilder::add_node`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeInsert {
    /// The name was already declared and its attributes were replaced
    pub replaced: bool,
    /// Another node lost its task id to this one
    pub displaced: Option<String>,
}

/// Outcome of [`DagBuilder::add_edge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeInsert {
    /// The edge was appended to the adjacency list
    Appended,
    /// An edge with the same endpoints already existed and took these attributes
    Merged,
}

/// Owns the nodes, edges and identifier index while a trace is loaded.
///
/// Nodes and edges go in strictly in file order. Once loading is done,
/// [`DagBuilder::finish`] freezes everything into a [`TaskDag`]; there is no
/// way back to a mutable graph.
///
/// # Example
///
/// ```
/// use taskdag::{BuildPolicy, DagBuilder, DagError, TaskNode};
///
/// let mut builder = DagBuilder::with_policy(BuildPolicy::strict());
/// builder.add_node(TaskNode::new("A", "POTRF", 0, 1, 7)).unwrap();
///
/// let err = builder.add_node(TaskNode::new("A", "POTRF", 0, 1, 8)).unwrap_err();
/// assert!(matches!(err, DagError::DuplicateName { .. }));
/// ```
#[derive(Debug, Default)]
pub struct DagBuilder {
    dag: TaskDag,
    policy: BuildPolicy,
}

impl DagBuilder {
    /// Create an empty builder with the permissive default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty builder with explicit insertion policies.
    pub fn with_policy(policy: BuildPolicy) -> Self {
        Self {
            dag: TaskDag::default(),
            policy,
        }
    }

    /// Policies this builder applies.
    pub fn policy(&self) -> BuildPolicy {
        self.policy
    }

    /// Insert a node, or replace the one already declared under its name.
    ///
    /// The identifier index is updated in the same step. A replaced node keeps
    /// its position in enumeration order.
    ///
    /// # Errors
    ///
    /// - [`DagError::DuplicateName`] if the name exists and the name policy is
    ///   [`DuplicatePolicy::Reject`]
    /// - [`DagError::DuplicateTaskId`] if another name holds the task id and
    ///   the id policy is [`DuplicatePolicy::Reject`]
    ///
    /// Nothing is modified when an error is returned.
    pub fn add_node(&mut self, node: TaskNode) -> Result<NodeInsert> {
        let existing = self.dag.positions.get(&node.name).copied();
        if existing.is_some() && self.policy.duplicate_names == DuplicatePolicy::Reject {
            return Err(DagError::DuplicateName { name: node.name });
        }

        let id = node.id();
        let registration = self
            .dag
            .index
            .register(&node.name, id, self.policy.duplicate_task_ids)?;

        let replaced = match existing {
            Some(position) => {
                debug!("Redeclared node '{}' ({id})", node.name);
                self.dag.nodes[position] = node;
                true
            }
            None => {
                trace!("Adding node '{}' ({id})", node.name);
                self.dag
                    .positions
                    .insert(node.name.clone(), self.dag.nodes.len());
                self.dag.nodes.push(node);
                false
            }
        };

        Ok(NodeInsert {
            replaced,
            displaced: registration.displaced,
        })
    }

    /// Record a dependency edge.
    ///
    /// Neither endpoint has to be declared, now or ever. See
    /// [`TaskDag::check_integrity`] for an explicit check.
    pub fn add_edge(&mut self, edge: FlowEdge) -> EdgeInsert {
        if self.policy.parallel_edges == EdgePolicy::MergeParallel {
            if let Some(position) = self.find_parallel(&edge) {
                trace!("Merging parallel edge {} -> {}", edge.source, edge.target);
                self.dag.edges[position] = edge;
                return EdgeInsert::Merged;
            }
        }

        trace!("Adding edge {} -> {}", edge.source, edge.target);
        let position = self.dag.edges.len();
        self.dag
            .adjacency_out
            .entry(edge.source.clone())
            .or_default()
            .push(position);
        self.dag
            .adjacency_in
            .entry(edge.target.clone())
            .or_default()
            .push(position);
        self.dag.edges.push(edge);

        EdgeInsert::Appended
    }

    /// Number of distinct node names declared so far.
    pub fn node_count(&self) -> usize {
        self.dag.node_count()
    }

    /// Number of edges recorded so far.
    pub fn edge_count(&self) -> usize {
        self.dag.edge_count()
    }

    /// True if a node with this name has been declared.
    pub fn contains_node(&self, name: &str) -> bool {
        self.dag.positions.contains_key(name)
    }

    /// The identifier index as built so far.
    pub fn index(&self) -> &IdentifierIndex {
        &self.dag.index
    }

    /// Freeze the graph for read-only querying.
    pub fn finish(self) -> TaskDag {
        debug!(
            "Finished DAG with {} nodes and {} edges",
            self.dag.node_count(),
            self.dag.edge_count()
        );
        self.dag
    }

    fn find_parallel(&self, edge: &FlowEdge) -> Option<usize> {
        self.dag
            .adjacency_out
            .get(&edge.source)?
            .iter()
            .copied()
            .find(|&position| self.dag.edges[position].target == edge.target)
    }
}
