//! Exchange document for built graphs.
//!
//! [`GraphDoc`] is the flat, serde-friendly form of a [`ProvenanceGraph`]:
//! string node ids, stringified edge labels, and per-kind optional fields.
//! It is the shape consumed by exporters and external tooling.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::graph::ProvenanceGraph;
use crate::node::{GraphNode, NodeKind};
use crate::trace::ParamValue;

/// Serialized node: `origin`, a correlation id, or a sink name, plus the
/// fields that apply to its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDoc {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<IndexMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<IndexMap<String, ParamValue>>,
}

/// Serialized edge with its display label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDoc {
    pub from: String,
    pub to: String,
    pub label: String,
}

/// The full serialized graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDoc {
    pub nodes: Vec<NodeDoc>,
    pub edges: Vec<EdgeDoc>,
}

impl GraphDoc {
    /// Flattens a built graph into its document form. Nodes keep creation
    /// order; edges keep insertion order.
    pub fn from_graph(graph: &ProvenanceGraph) -> GraphDoc {
        let nodes = graph
            .nodes()
            .map(|(_, node)| {
                let mut doc = NodeDoc {
                    id: node.id_str().to_owned(),
                    kind: node.kind(),
                    action_name: None,
                    arguments: None,
                    result: None,
                    request_text: None,
                    parameters: None,
                };
                match node {
                    GraphNode::Origin(origin) => {
                        doc.request_text = origin.request_text.clone();
                        if !origin.parameters.is_empty() {
                            doc.parameters = Some(origin.parameters.clone());
                        }
                    }
                    GraphNode::Action(action) => {
                        doc.action_name = Some(action.action_name.clone());
                        doc.arguments = Some(action.arguments.clone());
                        doc.result = Some(action.result.clone());
                    }
                    GraphNode::Sink { .. } => {}
                }
                doc
            })
            .collect();

        let edges = graph
            .edges()
            .map(|(from, to, label)| {
                // Edge endpoints always resolve; edges() only yields live ids.
                let from = graph.node(from).expect("edge source exists").id_str();
                let to = graph.node(to).expect("edge target exists").id_str();
                EdgeDoc {
                    from: from.to_owned(),
                    to: to.to_owned(),
                    label: label.to_string(),
                }
            })
            .collect();

        GraphDoc { nodes, edges }
    }
}
