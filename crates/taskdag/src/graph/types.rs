//! Core graph types: task ids, task nodes and flow edges.

use serde::{Deserialize, Serialize};

/// Canonical identity of a task instance.
///
/// Matches the `(taskpool_id, type, id)` triple the runtime writes into its
/// other trace records, so a node can be correlated with profiling events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId {
    /// Taskpool the task ran under
    pub taskpool_id: i64,
    /// Task class entry in the runtime's type dictionary
    pub dictionary_id: i64,
    /// Task identifier within the taskpool
    pub task_id: i64,
}

impl TaskId {
    /// Create a task id from its three components.
    pub fn new(taskpool_id: i64, dictionary_id: i64, task_id: i64) -> Self {
        Self {
            taskpool_id,
            dictionary_id,
            task_id,
        }
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "tpid={}:did={}:tid={}",
            self.taskpool_id, self.dictionary_id, self.task_id
        )
    }
}

impl From<(i64, i64, i64)> for TaskId {
    fn from((taskpool_id, dictionary_id, task_id): (i64, i64, i64)) -> Self {
        Self::new(taskpool_id, dictionary_id, task_id)
    }
}

/// A task instance in the DAG.
///
/// String attributes are kept exactly as the trace wrote them; `parameters`
/// and `locals` are not re-parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskNode {
    /// Display name, unique per trace
    pub name: String,
    /// Fill colour hint (hex digits, no leading `#`)
    pub fill_color: String,
    /// Thread the task executed on
    pub thread_id: i64,
    /// Virtual process the task executed on
    pub vp_id: i64,
    /// Task class name
    pub class_label: String,
    /// Raw parameter listing
    pub parameters: String,
    /// Raw local-variable listing
    pub locals: String,
    /// Scheduling priority
    pub priority: i64,
    /// Taskpool component of the [`TaskId`]
    pub taskpool_id: i64,
    /// Dictionary component of the [`TaskId`]
    pub dictionary_id: i64,
    /// Task component of the [`TaskId`]
    pub task_id: i64,
}

impl TaskNode {
    /// Create a node with the identifying fields set and every other
    /// attribute empty or zero.
    pub fn new(
        name: impl Into<String>,
        class_label: impl Into<String>,
        taskpool_id: i64,
        dictionary_id: i64,
        task_id: i64,
    ) -> Self {
        Self {
            name: name.into(),
            fill_color: String::new(),
            thread_id: 0,
            vp_id: 0,
            class_label: class_label.into(),
            parameters: String::new(),
            locals: String::new(),
            priority: 0,
            taskpool_id,
            dictionary_id,
            task_id,
        }
    }

    /// The node's composite identifier.
    pub fn id(&self) -> TaskId {
        TaskId::new(self.taskpool_id, self.dictionary_id, self.task_id)
    }

    /// Set the execution placement.
    pub fn with_placement(mut self, thread_id: i64, vp_id: i64) -> Self {
        self.thread_id = thread_id;
        self.vp_id = vp_id;
        self
    }

    /// Set the scheduling priority.
    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }
}

/// A directed data-flow dependency.
///
/// `source` and `target` are node names; nothing guarantees they were declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEdge {
    /// Producing task
    pub source: String,
    /// Consuming task
    pub target: String,
    /// Flow name on the producing side
    pub flow_source: String,
    /// Flow name on the consuming side
    pub flow_target: String,
    /// Colour hint (hex digits, no leading `#`)
    pub color: String,
    /// Line style hint
    pub style: String,
}

impl FlowEdge {
    /// Create an edge with empty presentation hints.
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        flow_source: impl Into<String>,
        flow_target: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            flow_source: flow_source.into(),
            flow_target: flow_target.into(),
            color: String::new(),
            style: String::new(),
        }
    }

    /// True if both edges connect the same ordered pair of names.
    pub fn same_endpoints(&self, other: &FlowEdge) -> bool {
        self.source == other.source && self.target == other.target
    }
}
