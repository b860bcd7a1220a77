//! YAML audit report: the graph in reviewable form plus its diagnostics.
//!
//! Every action argument is annotated with the node it was traced back to,
//! resolved from the edge labels, so a reviewer can read the data flow
//! without walking edges by hand. Diagnostics are rendered as sentences in
//! the `issues` list.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tracegraph_build::BuildOutput;
use tracegraph_core::graph::ProvenanceGraph;
use tracegraph_core::id::NodeId;
use tracegraph_core::node::{GraphNode, NodeKind};

use crate::error::ExportError;

/// One argument of an action, with the node that supplied it if any edge
/// labeled with this key points at the action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditArgument {
    pub name: String,
    pub value: Value,
    pub source_node: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub call_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub action_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub request_text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub arguments: Vec<AuditArgument>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub result: Option<Value>,
}

/// A labeled edge, with the argument key and matched value parsed out of
/// the label where it refers to one. Fault edges carry neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEdge {
    pub from: String,
    pub to: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub argument_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub argument_value: Option<String>,
}

/// The full report for one build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub nodes: Vec<AuditNode>,
    pub edges: Vec<AuditEdge>,
    pub issues: Vec<String>,
}

impl AuditReport {
    pub fn from_build(output: &BuildOutput) -> AuditReport {
        let graph = &output.graph;

        // Last edge per (target, argument key) wins, in insertion order.
        let mut arg_sources: HashMap<(String, String), String> = HashMap::new();
        for (from, to, label) in graph.edges() {
            if let Some(key) = label.argument_key() {
                arg_sources.insert(
                    (id_str(graph, to), key.to_owned()),
                    id_str(graph, from),
                );
            }
        }

        let mut call_index = 0usize;
        let nodes = graph
            .nodes()
            .map(|(_, node)| {
                let id = node.id_str().to_owned();
                let mut doc = AuditNode {
                    id: id.clone(),
                    kind: node.kind(),
                    call_index: None,
                    action_name: None,
                    request_text: None,
                    arguments: Vec::new(),
                    result: None,
                };
                match node {
                    GraphNode::Origin(origin) => {
                        doc.request_text = origin.request_text.clone();
                    }
                    GraphNode::Action(action) => {
                        call_index += 1;
                        doc.call_index = Some(call_index);
                        doc.action_name = Some(action.action_name.clone());
                        doc.arguments = action
                            .arguments
                            .iter()
                            .map(|(name, value)| AuditArgument {
                                name: name.clone(),
                                value: value.clone(),
                                source_node: arg_sources
                                    .get(&(id.clone(), name.clone()))
                                    .cloned(),
                            })
                            .collect();
                        doc.result = Some(action.result.clone());
                    }
                    GraphNode::Sink { .. } => {}
                }
                doc
            })
            .collect();

        let edges = graph
            .edges()
            .map(|(from, to, label)| AuditEdge {
                from: id_str(graph, from),
                to: id_str(graph, to),
                label: label.to_string(),
                argument_key: label.argument_key().map(str::to_owned),
                argument_value: label.argument_value().map(str::to_owned),
            })
            .collect();

        let report = &output.report;
        let mut issues = Vec::new();
        for cid in &report.pending_correlation_ids {
            issues.push(format!("Proposal `{cid}` never received a result."));
        }
        for cid in &report.orphaned_correlation_ids {
            issues.push(format!(
                "Result `{cid}` had no matching proposal and was skipped."
            ));
        }
        for cid in &report.reused_correlation_ids {
            issues.push(format!(
                "Correlation id `{cid}` was reused; node `{cid}` keeps only the last arguments and result."
            ));
        }
        for value in &report.unused_provenance_values {
            issues.push(format!(
                "Result value `{value}` was never used by a later action."
            ));
        }
        for arg in &report.unattributed_arguments {
            issues.push(format!(
                "Node `{}` arg `{}` = `{}` has no incoming edge, indicating that it \
                 is not derived from a previous tool call and so its provenance is unclear.",
                arg.node_id, arg.argument_key, arg.value
            ));
        }
        for missing in &report.missing_required_arguments {
            issues.push(format!(
                "Node `{}` is missing required argument `{}` for `{}`.",
                missing.node_id, missing.argument_key, missing.action_name
            ));
        }

        AuditReport {
            nodes,
            edges,
            issues,
        }
    }

    pub fn to_yaml(&self) -> Result<String, ExportError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

fn id_str(graph: &ProvenanceGraph, id: NodeId) -> String {
    graph
        .node(id)
        .expect("edge endpoints resolve")
        .id_str()
        .to_owned()
}
