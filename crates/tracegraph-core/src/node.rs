//! Graph node types: origin, actions, and fault sinks.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::trace::Origin;
use crate::value::FaultKind;

/// One successfully correlated proposal/result pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionNode {
    pub correlation_id: String,
    pub action_name: String,
    pub arguments: IndexMap<String, Value>,
    pub result: Value,
}

/// A node of the dependency graph.
///
/// Exactly one `Origin` exists per graph; `Action` nodes are created in
/// trace order; at most one sink exists per [`FaultKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum GraphNode {
    Origin(Origin),
    Action(ActionNode),
    Sink { kind: FaultKind },
}

impl GraphNode {
    /// The serialized node kind.
    pub fn kind(&self) -> NodeKind {
        match self {
            GraphNode::Origin(_) => NodeKind::Origin,
            GraphNode::Action(_) => NodeKind::Action,
            GraphNode::Sink {
                kind: FaultKind::Error,
            } => NodeKind::Error,
            GraphNode::Sink {
                kind: FaultKind::Warning,
            } => NodeKind::Warning,
        }
    }

    /// The stable string id used in serialized output: `origin`, the
    /// action's correlation id, or the sink name.
    pub fn id_str(&self) -> &str {
        match self {
            GraphNode::Origin(_) => "origin",
            GraphNode::Action(action) => &action.correlation_id,
            GraphNode::Sink {
                kind: FaultKind::Error,
            } => "error",
            GraphNode::Sink {
                kind: FaultKind::Warning,
            } => "warning",
        }
    }

    pub fn as_action(&self) -> Option<&ActionNode> {
        match self {
            GraphNode::Action(action) => Some(action),
            _ => None,
        }
    }

    pub fn is_origin(&self) -> bool {
        matches!(self, GraphNode::Origin(_))
    }

    pub fn is_sink(&self) -> bool {
        matches!(self, GraphNode::Sink { .. })
    }
}

/// Node kind as it appears in serialized documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Origin,
    Action,
    Error,
    Warning,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Origin => write!(f, "origin"),
            NodeKind::Action => write!(f, "action"),
            NodeKind::Error => write!(f, "error"),
            NodeKind::Warning => write!(f, "warning"),
        }
    }
}
