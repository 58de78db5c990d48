//! Line grammar of grapher traces.
//!
//! A trace is a Graphviz file, but a very regular one: every line is either
//! the graph header, a node, an edge, or the closing brace. Each shape has a
//! fixed pattern anchored at the start of the line; anything after the last
//! captured field (closing brackets, `;`) is ignored.
//!
//! ```text
//! digraph G {
//! NAME [shape="polygon",style=filled,fillcolor="#HEX",fontcolor="black",label="<TH/VP> CLASS(PARAMS)[LOCALS]<PRIO>{TP}",tooltip="tpid=TP:did=DID:tname=CLASS:tid=TID"];
//! SRC -> DST [label="FLOW=>FLOW",color="#HEX",style="STYLE"];
//! }
//! ```

use regex::{Captures, Regex};
use std::sync::LazyLock;
use taskdag::{FlowEdge, TaskNode};
use thiserror::Error;

// Patterns are compiled once
static NODE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r##"^([^ ]+)..shape="polygon",style=filled,fillcolor="#([^"]+)",fontcolor="black","##,
        r##"label=".([0-9]+).([0-9]+). ([^(]+)\(([0-9, ]+)\).([0-9,\[\] ]+).<([0-9]+)>\{([0-9]+)\}""##,
        r##".tooltip="tpid=([0-9]+):did=([0-9]+).tname=([^:]+):tid=([0-9]+)"##,
    ))
    .unwrap()
});
static EDGE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r##"^([^ ]+) -> ([^ ]+) .label="([^=]+)=>([^,]+)",color="#([^"]+)",style="([^"]+)""##,
    )
    .unwrap()
});
static GRAPH_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^digraph G \{").unwrap());
static GRAPH_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\}").unwrap());

/// Field names of a node line, in capture order.
const NODE_FIELDS: [&str; 13] = [
    "name",
    "fill_color",
    "thread_id",
    "vp_id",
    "class_label",
    "parameters",
    "locals",
    "priority",
    "taskpool_id",
    "tooltip_taskpool_id",
    "dictionary_id",
    "class_title",
    "task_id",
];

/// Field names of an edge line, in capture order.
const EDGE_FIELDS: [&str; 6] = [
    "source",
    "target",
    "flow_source",
    "flow_target",
    "color",
    "style",
];

/// The four line shapes a trace may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// `NAME [shape="polygon",...]`
    Node,
    /// `SRC -> DST [label=...]`
    Edge,
    /// `digraph G {`
    GraphStart,
    /// `}`
    GraphEnd,
}

impl Shape {
    /// Number of fields a line of this shape carries.
    pub fn field_count(self) -> usize {
        match self {
            Shape::Node => NODE_FIELDS.len(),
            Shape::Edge => EDGE_FIELDS.len(),
            Shape::GraphStart | Shape::GraphEnd => 0,
        }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shape::Node => write!(f, "Node"),
            Shape::Edge => write!(f, "Link"),
            Shape::GraphStart => write!(f, "Graph start"),
            Shape::GraphEnd => write!(f, "Graph end"),
        }
    }
}

/// A line that matched a shape but whose fields cannot be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// The pattern matched with the wrong number of fields
    #[error("{shape} lines are expected to provide {expected} arguments, {found} found")]
    FieldCount {
        /// Shape that matched
        shape: Shape,
        /// Fields the shape defines
        expected: usize,
        /// Fields actually captured
        found: usize,
    },

    /// A numeric field does not fit a 64-bit integer
    #[error("{shape} field `{field}` is not a valid integer: {value}")]
    BadInteger {
        /// Shape that matched
        shape: Shape,
        /// Name of the field
        field: &'static str,
        /// Raw text of the field
        value: String,
    },
}

/// A node declaration, with the fields the graph itself does not keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDecl {
    /// The node; its taskpool comes from the label
    pub node: TaskNode,
    /// Taskpool repeated in the tooltip
    pub tooltip_taskpool_id: i64,
    /// Class name repeated in the tooltip
    pub class_title: String,
}

impl NodeDecl {
    /// True if the label and tooltip agree on the taskpool.
    pub fn taskpool_consistent(&self) -> bool {
        self.node.taskpool_id == self.tooltip_taskpool_id
    }
}

/// One classified trace line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceLine {
    /// `digraph G {`
    GraphStart,
    /// A task declaration
    Node(NodeDecl),
    /// A dependency between two tasks
    Edge(FlowEdge),
    /// `}`
    GraphEnd,
}

impl TraceLine {
    /// The shape this line matched.
    pub fn shape(&self) -> Shape {
        match self {
            TraceLine::GraphStart => Shape::GraphStart,
            TraceLine::Node(_) => Shape::Node,
            TraceLine::Edge(_) => Shape::Edge,
            TraceLine::GraphEnd => Shape::GraphEnd,
        }
    }
}

/// Classify one line.
///
/// Shapes are tried in order: node, edge, graph start, graph end. Returns
/// `Ok(None)` when no shape matches.
///
/// # Errors
///
/// Returns a [`ShapeError`] when a shape matches but its fields are unusable.
pub fn match_line(line: &str) -> Result<Option<TraceLine>, ShapeError> {
    if let Some(caps) = NODE_LINE.captures(line) {
        let fields = captured(&caps, Shape::Node)?;
        return node_decl(&fields).map(|decl| Some(TraceLine::Node(decl)));
    }

    if let Some(caps) = EDGE_LINE.captures(line) {
        let fields = captured(&caps, Shape::Edge)?;
        return Ok(Some(TraceLine::Edge(FlowEdge {
            source: fields[0].to_string(),
            target: fields[1].to_string(),
            flow_source: fields[2].to_string(),
            flow_target: fields[3].to_string(),
            color: fields[4].to_string(),
            style: fields[5].to_string(),
        })));
    }

    if GRAPH_START.is_match(line) {
        return Ok(Some(TraceLine::GraphStart));
    }

    if GRAPH_END.is_match(line) {
        return Ok(Some(TraceLine::GraphEnd));
    }

    Ok(None)
}

/// Collect the participating capture groups and check their count.
fn captured<'t>(caps: &Captures<'t>, shape: Shape) -> Result<Vec<&'t str>, ShapeError> {
    let fields: Vec<&str> = caps.iter().skip(1).flatten().map(|m| m.as_str()).collect();
    if fields.len() != shape.field_count() {
        return Err(ShapeError::FieldCount {
            shape,
            expected: shape.field_count(),
            found: fields.len(),
        });
    }
    Ok(fields)
}

fn node_decl(fields: &[&str]) -> Result<NodeDecl, ShapeError> {
    let int = |i: usize| integer(fields, i, Shape::Node, &NODE_FIELDS);

    let node = TaskNode {
        name: fields[0].to_string(),
        fill_color: fields[1].to_string(),
        thread_id: int(2)?,
        vp_id: int(3)?,
        class_label: fields[4].to_string(),
        parameters: fields[5].to_string(),
        locals: fields[6].to_string(),
        priority: int(7)?,
        taskpool_id: int(8)?,
        dictionary_id: int(10)?,
        task_id: int(12)?,
    };

    Ok(NodeDecl {
        node,
        tooltip_taskpool_id: int(9)?,
        class_title: fields[11].to_string(),
    })
}

fn integer(
    fields: &[&str],
    i: usize,
    shape: Shape,
    names: &[&'static str],
) -> Result<i64, ShapeError> {
    fields[i].parse().map_err(|_| ShapeError::BadInteger {
        shape,
        field: names[i],
        value: fields[i].to_string(),
    })
}
