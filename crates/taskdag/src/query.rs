//! Query builder for fluent node queries.
//!
//! Filters are combined with logical AND and evaluated over the nodes in
//! first-declaration order.

use crate::graph::{TaskDag, TaskNode};

/// A filter predicate that can be applied to nodes.
type FilterFn<'f> = Box<dyn Fn(&TaskNode) -> bool + 'f>;

/// Fluent query builder over the nodes of a [`TaskDag`].
///
/// # Examples
///
/// ```
/// use taskdag::{DagBuilder, TaskNode};
///
/// let mut builder = DagBuilder::new();
/// builder.add_node(TaskNode::new("GEMM_0", "GEMM", 0, 3, 1).with_placement(2, 0)).unwrap();
/// builder.add_node(TaskNode::new("GEMM_1", "GEMM", 0, 3, 2).with_placement(5, 0)).unwrap();
/// let dag = builder.finish();
///
/// // GEMM tasks that ran on thread 2
/// let results = dag.query()
///     .class_label("GEMM")
///     .thread(2)
///     .execute();
/// assert_eq!(results[0].name, "GEMM_0");
/// ```
pub struct QueryBuilder<'a> {
    dag: &'a TaskDag,
    filters: Vec<FilterFn<'a>>,
    limit_value: Option<usize>,
}

impl<'a> QueryBuilder<'a> {
    /// Create a new query builder for the given DAG.
    pub fn new(dag: &'a TaskDag) -> Self {
        Self {
            dag,
            filters: Vec::new(),
            limit_value: None,
        }
    }

    /// Filter nodes by task class name (exact match).
    pub fn class_label(mut self, class_label: &str) -> Self {
        let class_label = class_label.to_string();
        self.filters
            .push(Box::new(move |node| node.class_label == class_label));
        self
    }

    /// Filter nodes by taskpool.
    pub fn taskpool(mut self, taskpool_id: i64) -> Self {
        self.filters
            .push(Box::new(move |node| node.taskpool_id == taskpool_id));
        self
    }

    /// Filter nodes by dictionary id.
    pub fn dictionary(mut self, dictionary_id: i64) -> Self {
        self.filters
            .push(Box::new(move |node| node.dictionary_id == dictionary_id));
        self
    }

    /// Filter nodes by the thread they executed on.
    pub fn thread(mut self, thread_id: i64) -> Self {
        self.filters
            .push(Box::new(move |node| node.thread_id == thread_id));
        self
    }

    /// Filter nodes by the virtual process they executed on.
    pub fn vp(mut self, vp_id: i64) -> Self {
        self.filters.push(Box::new(move |node| node.vp_id == vp_id));
        self
    }

    /// Keep nodes whose priority is at least `priority`.
    pub fn min_priority(mut self, priority: i64) -> Self {
        self.filters
            .push(Box::new(move |node| node.priority >= priority));
        self
    }

    /// Filter nodes by name matching a simple pattern.
    ///
    /// Supports `^` to anchor at the start and `$` to anchor at the end;
    /// without anchors the pattern matches anywhere in the name.
    pub fn name_matches(mut self, pattern: &str) -> Self {
        let pattern = pattern.to_string();
        self.filters
            .push(Box::new(move |node| anchored_match(&pattern, &node.name)));
        self
    }

    /// Keep only nodes with at least one recorded out-edge.
    pub fn has_successors(mut self) -> Self {
        let dag = self.dag;
        self.filters.push(Box::new(move |node| {
            dag.successors_by_name(&node.name).next().is_some()
        }));
        self
    }

    /// Filter nodes using a custom predicate function.
    ///
    /// # Examples
    ///
    /// ```
    /// # use taskdag::{DagBuilder, TaskNode};
    /// # let dag = DagBuilder::new().finish();
    /// // Tasks with an empty local-variable listing
    /// let results = dag.query()
    ///     .custom(|node| node.locals.trim().is_empty())
    ///     .execute();
    /// # assert!(results.is_empty());
    /// ```
    pub fn custom<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&TaskNode) -> bool + 'a,
    {
        self.filters.push(Box::new(predicate));
        self
    }

    /// Limit the number of results returned.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit_value = Some(n);
        self
    }

    /// Execute the query and return matching nodes in declaration order.
    pub fn execute(&self) -> Vec<&'a TaskNode> {
        let dag = self.dag;
        dag.nodes()
            .filter(|node| self.matches_filters(node))
            .take(self.limit_value.unwrap_or(usize::MAX))
            .collect()
    }

    /// Count the matching nodes without allocating a result vector.
    pub fn count(&self) -> usize {
        self.dag
            .nodes()
            .filter(|node| self.matches_filters(node))
            .take(self.limit_value.unwrap_or(usize::MAX))
            .count()
    }

    /// Check if any node matches the query (short-circuits on first match).
    pub fn exists(&self) -> bool {
        self.dag.nodes().any(|node| self.matches_filters(node))
    }

    /// Check if a node matches all filters.
    fn matches_filters(&self, node: &TaskNode) -> bool {
        self.filters.iter().all(|filter| filter(node))
    }
}

/// Substring match with optional `^` / `$` anchors.
fn anchored_match(pattern: &str, text: &str) -> bool {
    let starts_with = pattern.starts_with('^');
    let ends_with = pattern.ends_with('$');

    let pattern = pattern.trim_start_matches('^').trim_end_matches('$');

    match (starts_with, ends_with) {
        (true, true) => text == pattern,
        (true, false) => text.starts_with(pattern),
        (false, true) => text.ends_with(pattern),
        (false, false) => text.contains(pattern),
    }
}

#[cfg(test)]
mod tests {
    use super::anchored_match;

    #[test]
    fn test_anchored_match() {
        assert!(anchored_match("^GEMM", "GEMM_1_2"));
        assert!(!anchored_match("^GEMM", "DGEMM_1"));
        assert!(anchored_match("_2$", "GEMM_1_2"));
        assert!(anchored_match("^POTRF_0$", "POTRF_0"));
        assert!(anchored_match("MM_1", "GEMM_1_2"));
    }
}
