//! Frozen task DAG and its read-only query surface.

use super::index::IdentifierIndex;
use super::types::{FlowEdge, TaskId, TaskNode};
use crate::error::{DagError, Result};
use std::collections::HashMap;

/// A fully loaded task DAG.
///
/// Produced by [`DagBuilder::finish`](crate::DagBuilder::finish). Every
/// method takes `&self`; the graph cannot change once built.
#[derive(Debug, Clone, Default)]
pub struct TaskDag {
    // Nodes in first-declaration order, with their positions by name
    pub(crate) nodes: Vec<TaskNode>,
    pub(crate) positions: HashMap<String, usize>,
    // Edges in file order, adjacency lists hold positions into `edges`
    pub(crate) edges: Vec<FlowEdge>,
    pub(crate) adjacency_out: HashMap<String, Vec<usize>>,
    pub(crate) adjacency_in: HashMap<String, Vec<usize>>,
    pub(crate) index: IdentifierIndex,
}

impl TaskDag {
    /// Look a node up by display name.
    ///
    /// # Errors
    ///
    /// Returns [`DagError::NodeNotFound`] if no node is declared under `name`.
    pub fn node_by_name(&self, name: &str) -> Result<&TaskNode> {
        self.positions
            .get(name)
            .map(|&position| &self.nodes[position])
            .ok_or_else(|| DagError::node_not_found(name))
    }

    /// Look a node up by the three components of its task id.
    ///
    /// # Errors
    ///
    /// Returns [`DagError::TaskIdNotFound`] if the id is not registered.
    pub fn node_by_id(&self, taskpool_id: i64, dictionary_id: i64, task_id: i64) -> Result<&TaskNode> {
        self.node_by_task_id(TaskId::new(taskpool_id, dictionary_id, task_id))
    }

    /// Look a node up by task id.
    ///
    /// # Errors
    ///
    /// Returns [`DagError::TaskIdNotFound`] if the id is not registered.
    pub fn node_by_task_id(&self, id: TaskId) -> Result<&TaskNode> {
        let name = self.resolve(id)?;
        self.node_by_name(name)
    }

    /// Out-edges recorded with `source == name`, in file order.
    ///
    /// Yields `(edge, target name)`. Empty when nothing was recorded, whether
    /// or not `name` itself was ever declared.
    pub fn successors_by_name(&self, name: &str) -> Successors<'_> {
        Successors {
            edges: &self.edges,
            positions: adjacent(&self.adjacency_out, name).iter(),
        }
    }

    /// Out-edges of the node registered under the given task id.
    ///
    /// # Errors
    ///
    /// Returns [`DagError::TaskIdNotFound`] if the id is not registered.
    /// A registered id with no out-edges yields an empty iterator.
    pub fn successors_by_id(
        &self,
        taskpool_id: i64,
        dictionary_id: i64,
        task_id: i64,
    ) -> Result<Successors<'_>> {
        let name = self.resolve(TaskId::new(taskpool_id, dictionary_id, task_id))?;
        Ok(self.successors_by_name(name))
    }

    /// In-edges recorded with `target == name`, in file order.
    ///
    /// Yields `(edge, source name)`.
    pub fn predecessors_by_name(&self, name: &str) -> Predecessors<'_> {
        Predecessors {
            edges: &self.edges,
            positions: adjacent(&self.adjacency_in, name).iter(),
        }
    }

    /// In-edges of the node registered under the given task id.
    ///
    /// # Errors
    ///
    /// Returns [`DagError::TaskIdNotFound`] if the id is not registered.
    pub fn predecessors_by_id(
        &self,
        taskpool_id: i64,
        dictionary_id: i64,
        task_id: i64,
    ) -> Result<Predecessors<'_>> {
        let name = self.resolve(TaskId::new(taskpool_id, dictionary_id, task_id))?;
        Ok(self.predecessors_by_name(name))
    }

    /// Name registered under `id`.
    pub fn name_of(&self, id: TaskId) -> Option<&str> {
        self.index.name_of(&id)
    }

    /// Task id registered for `name`.
    pub fn id_of(&self, name: &str) -> Option<TaskId> {
        self.index.id_of(name)
    }

    /// True if a node is declared under `name`.
    pub fn contains_node(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// All nodes, in first-declaration order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &TaskNode> + '_ {
        self.nodes.iter()
    }

    /// All edges, in file order.
    pub fn edges(&self) -> impl ExactSizeIterator<Item = &FlowEdge> + '_ {
        self.edges.iter()
    }

    /// Number of distinct node names.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of recorded edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The name <-> task id index.
    pub fn index(&self) -> &IdentifierIndex {
        &self.index
    }

    /// Start a filtered node query.
    ///
    /// # Examples
    ///
    /// ```
    /// use taskdag::{DagBuilder, TaskNode};
    ///
    /// let mut builder = DagBuilder::new();
    /// builder.add_node(TaskNode::new("A", "POTRF", 0, 1, 7)).unwrap();
    /// builder.add_node(TaskNode::new("B", "GEMM", 0, 2, 8)).unwrap();
    /// let dag = builder.finish();
    ///
    /// let gemms = dag.query().class_label("GEMM").execute();
    /// assert_eq!(gemms.len(), 1);
    /// ```
    pub fn query(&self) -> crate::query::QueryBuilder<'_> {
        crate::query::QueryBuilder::new(self)
    }

    fn resolve(&self, id: TaskId) -> Result<&str> {
        self.index
            .name_of(&id)
            .ok_or(DagError::TaskIdNotFound { id })
    }
}

fn adjacent<'a>(adjacency: &'a HashMap<String, Vec<usize>>, name: &str) -> &'a [usize] {
    adjacency.get(name).map(Vec::as_slice).unwrap_or(&[])
}

/// Out-edges of one node, yielded as `(edge, target name)`.
#[derive(Debug, Clone)]
pub struct Successors<'a> {
    edges: &'a [FlowEdge],
    positions: std::slice::Iter<'a, usize>,
}

impl<'a> Iterator for Successors<'a> {
    type Item = (&'a FlowEdge, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let edge = &self.edges[*self.positions.next()?];
        Some((edge, edge.target.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }
}

impl ExactSizeIterator for Successors<'_> {}

/// In-edges of one node, yielded as `(edge, source name)`.
#[derive(Debug, Clone)]
pub struct Predecessors<'a> {
    edges: &'a [FlowEdge],
    positions: std::slice::Iter<'a, usize>,
}

impl<'a> Iterator for Predecessors<'a> {
    type Item = (&'a FlowEdge, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let edge = &self.edges[*self.positions.next()?];
        Some((edge, edge.source.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }
}

impl ExactSizeIterator for Predecessors<'_> {}
