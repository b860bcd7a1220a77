//! Build diagnostics: everything the matching pass could not explain.
//!
//! The report is assembled once per build and is part of the build output
//! rather than a side channel, so callers can assert on it or serialize it
//! next to the graph itself.

use serde::{Deserialize, Serialize};

use tracegraph_core::graph::ProvenanceGraph;
use tracegraph_core::provenance::ValueIndex;

use crate::schema::ToolSchema;

/// An argument occurrence no strategy could tie to a source node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnattributedArgument {
    pub node_id: String,
    pub argument_key: String,
    pub value: String,
}

/// A required argument the schema declares but the proposal omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingArgument {
    pub node_id: String,
    pub action_name: String,
    pub argument_key: String,
}

/// Everything left unexplained after a build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsReport {
    /// Proposals that never received a result, in proposal order.
    pub pending_correlation_ids: Vec<String>,
    /// Results that never had a matching proposal, in arrival order.
    pub orphaned_correlation_ids: Vec<String>,
    /// Correlation ids completed more than once; the node keeps the last
    /// pair's arguments and result. One entry per extra completion.
    pub reused_correlation_ids: Vec<String>,
    /// Indexed result values where some producer has no outgoing edge.
    pub unused_provenance_values: Vec<String>,
    /// Argument occurrences with no incoming edge.
    pub unattributed_arguments: Vec<UnattributedArgument>,
    /// Schema-required arguments absent from the proposal. Empty when no
    /// schema was supplied.
    pub missing_required_arguments: Vec<MissingArgument>,
}

impl DiagnosticsReport {
    pub fn is_clean(&self) -> bool {
        self.issue_count() == 0
    }

    pub fn issue_count(&self) -> usize {
        self.pending_correlation_ids.len()
            + self.orphaned_correlation_ids.len()
            + self.reused_correlation_ids.len()
            + self.unused_provenance_values.len()
            + self.unattributed_arguments.len()
            + self.missing_required_arguments.len()
    }
}

/// Indexed values whose producing node ended up with no outgoing edge.
/// A value with several producers is flagged when any one of them went
/// unused. Order follows first indexing.
pub(crate) fn unused_values(index: &ValueIndex, graph: &ProvenanceGraph) -> Vec<String> {
    index
        .iter()
        .filter(|(_, producers)| {
            producers
                .iter()
                .any(|producer| !graph.has_outgoing(*producer))
        })
        .map(|(value, _)| value.to_owned())
        .collect()
}

/// Required arguments the schema declares that an action's proposal never
/// carried. Actions without a schema entry are not checked.
pub(crate) fn missing_required(
    schema: &ToolSchema,
    graph: &ProvenanceGraph,
) -> Vec<MissingArgument> {
    let mut missing = Vec::new();
    for (correlation_id, node_id) in graph.actions() {
        let action = graph
            .node(node_id)
            .ok()
            .and_then(|node| node.as_action())
            .expect("action registry ids resolve to action nodes");
        let Some(spec) = schema.get(&action.action_name) else {
            continue;
        };
        for key in &spec.required {
            if !action.arguments.contains_key(key) {
                missing.push(MissingArgument {
                    node_id: correlation_id.to_owned(),
                    action_name: action.action_name.clone(),
                    argument_key: key.clone(),
                });
            }
        }
    }
    missing
}
