//! Two-pass graph construction from a flat event trace.
//!
//! Pass 1 correlates proposals with their results, creates one action node
//! per completed pair in trace order, and indexes every normalized result
//! value by its producer. Pass 2 then walks each action's argument
//! occurrences through the strategy chain in [`crate::matcher`] and adds
//! one edge per attributed occurrence. The passes are strictly sequential:
//! no matching happens until every event has been consumed, so a source is
//! never missed because its result arrived late in the trace.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

use tracegraph_core::graph::ProvenanceGraph;
use tracegraph_core::id::NodeId;
use tracegraph_core::node::ActionNode;
use tracegraph_core::provenance::ValueIndex;
use tracegraph_core::trace::{Origin, Proposal, ToolResult, Trace, TraceEvent};
use tracegraph_core::value::{normalize, scalar_repr, FaultKind};

use crate::diagnostics::{self, DiagnosticsReport, UnattributedArgument};
use crate::matcher::results::{MembershipProducer, SearchProducer, SearchRecord};
use crate::matcher::text::RequestText;
use crate::matcher::{self, MatchContext, Occurrence, TargetState};
use crate::schema::ToolSchema;
use crate::vocab;

/// A built graph together with everything the build could not explain.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub graph: ProvenanceGraph,
    pub report: DiagnosticsReport,
}

/// Builds provenance graphs from traces.
///
/// The builder itself is cheap and reusable; an optional [`ToolSchema`]
/// enables the missing-required-argument check in the report.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    schema: Option<ToolSchema>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        GraphBuilder::default()
    }

    pub fn with_schema(schema: ToolSchema) -> Self {
        GraphBuilder {
            schema: Some(schema),
        }
    }

    /// Reconstructs the dependency graph for one trace.
    pub fn build(&self, trace: &Trace) -> BuildOutput {
        debug!(events = trace.events.len(), "building provenance graph");

        let mut correlator = Correlator::new(trace.origin.clone());
        for event in &trace.events {
            match event {
                TraceEvent::Proposal(proposal) => correlator.propose(proposal),
                TraceEvent::Result(result) => correlator.complete(result),
            }
        }
        let Correlator {
            mut graph,
            index,
            pending,
            orphaned,
            reused,
            search_records,
            membership_codes,
        } = correlator;

        let targets = collect_targets(&graph);
        let origin_values = trace.origin.value_set();
        let request_text = trace.origin.request_text.as_deref().map(RequestText::new);
        let ctx = MatchContext {
            origin_id: graph.origin_id(),
            origin_values: &origin_values,
            request_text: request_text.as_ref(),
            index: &index,
            search_records: &search_records,
            membership_codes: &membership_codes,
        };

        let mut unattributed = Vec::new();
        for target in &targets {
            let mut state = TargetState::default();
            for (key, reprs) in &target.arguments {
                for value in reprs {
                    let occ = Occurrence {
                        target: target.id,
                        action_name: &target.action_name,
                        key,
                        value,
                    };
                    match matcher::attribute(&ctx, &mut state, &occ) {
                        Some(hit) => {
                            graph
                                .add_edge(hit.source, target.id, hit.label)
                                .expect("matched endpoints are live nodes");
                        }
                        None => {
                            debug!(
                                node = %target.id,
                                key,
                                value,
                                "argument occurrence left unattributed"
                            );
                            unattributed.push(UnattributedArgument {
                                node_id: target.correlation_id.clone(),
                                argument_key: key.clone(),
                                value: value.clone(),
                            });
                        }
                    }
                }
            }
        }

        let report = DiagnosticsReport {
            pending_correlation_ids: pending.into_keys().collect(),
            orphaned_correlation_ids: orphaned,
            reused_correlation_ids: reused,
            unused_provenance_values: diagnostics::unused_values(&index, &graph),
            unattributed_arguments: unattributed,
            missing_required_arguments: self
                .schema
                .as_ref()
                .map(|schema| diagnostics::missing_required(schema, &graph))
                .unwrap_or_default(),
        };
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            issues = report.issue_count(),
            "build finished"
        );
        BuildOutput { graph, report }
    }
}

/// Pass 1 state: node creation, value indexing, and the pending map.
struct Correlator {
    graph: ProvenanceGraph,
    index: ValueIndex,
    /// Proposals awaiting a result, in proposal order.
    pending: IndexMap<String, PendingProposal>,
    /// Correlation ids of results that had no pending proposal.
    orphaned: Vec<String>,
    /// Correlation ids that completed a second time.
    reused: Vec<String>,
    search_records: Vec<SearchProducer>,
    membership_codes: Vec<MembershipProducer>,
}

struct PendingProposal {
    action_name: String,
    arguments: IndexMap<String, Value>,
}

impl Correlator {
    fn new(origin: Origin) -> Self {
        Correlator {
            graph: ProvenanceGraph::new(origin),
            index: ValueIndex::new(),
            pending: IndexMap::new(),
            orphaned: Vec::new(),
            reused: Vec::new(),
            search_records: Vec::new(),
            membership_codes: Vec::new(),
        }
    }

    fn propose(&mut self, proposal: &Proposal) {
        if self.pending.contains_key(&proposal.correlation_id) {
            warn!(
                correlation_id = %proposal.correlation_id,
                "duplicate proposal replaces the pending one"
            );
        }
        self.pending.insert(
            proposal.correlation_id.clone(),
            PendingProposal {
                action_name: proposal.action_name.clone(),
                arguments: proposal.arguments.clone(),
            },
        );
    }

    fn complete(&mut self, result: &ToolResult) {
        let Some(pending) = self.pending.shift_remove(&result.correlation_id) else {
            warn!(
                correlation_id = %result.correlation_id,
                "result without a pending proposal skipped"
            );
            self.orphaned.push(result.correlation_id.clone());
            return;
        };
        let action_name = pending.action_name;
        let action = ActionNode {
            correlation_id: result.correlation_id.clone(),
            action_name: action_name.clone(),
            arguments: pending.arguments,
            result: result.payload.clone(),
        };
        // A completed pair may reuse an id that already produced a node.
        // The node is overwritten in place, keeping its position and edges;
        // earlier index entries for it stay, cached record lists do not.
        let node = match self.graph.action_id(&result.correlation_id) {
            Some(existing) => {
                warn!(
                    correlation_id = %result.correlation_id,
                    "correlation id reused; node overwritten with the later pair"
                );
                self.reused.push(result.correlation_id.clone());
                self.search_records
                    .retain(|producer| producer.node != existing);
                self.membership_codes
                    .retain(|producer| producer.node != existing);
                self.graph
                    .replace_action(existing, action)
                    .expect("registered action ids resolve to live nodes");
                existing
            }
            None => self.graph.add_action(action),
        };

        for repr in normalize(&result.payload) {
            self.index.record(repr, node);
        }
        if action_name == vocab::SEARCH_ACTION {
            self.cache_search_records(node, &result.payload);
        } else if action_name == vocab::MEMBERSHIP_ACTION {
            self.cache_membership_codes(node, &result.payload);
        }
        if let Some(kind) = FaultKind::detect(&result.payload) {
            self.graph
                .connect_fault(node, kind)
                .expect("completed pairs map to live action nodes");
        }
    }

    /// Caches a search action's record list and indexes each record's id
    /// and name, which the generic normalization keeps only as whole-record
    /// JSON. Non-record list entries are skipped.
    fn cache_search_records(&mut self, node: NodeId, payload: &Value) {
        let Value::Array(items) = payload else {
            return;
        };
        let mut records = Vec::new();
        for item in items {
            let Value::Object(fields) = item else {
                continue;
            };
            let id = fields
                .get("id")
                .and_then(scalar_repr)
                .filter(|repr| !repr.is_empty());
            let name = fields
                .get("name")
                .and_then(scalar_repr)
                .filter(|repr| !repr.is_empty());
            if let Some(id) = &id {
                self.index.record(id.clone(), node);
            }
            if let Some(name) = &name {
                self.index.record(name.clone(), node);
            }
            records.push(SearchRecord { id, name });
        }
        self.search_records.push(SearchProducer { node, records });
    }

    fn cache_membership_codes(&mut self, node: NodeId, payload: &Value) {
        let Value::Array(items) = payload else {
            return;
        };
        let codes = items.iter().filter_map(scalar_repr).collect();
        self.membership_codes.push(MembershipProducer { node, codes });
    }
}

/// One action's argument occurrences, captured before matching so the
/// graph is free for edge insertion during the walk.
struct Target {
    id: NodeId,
    correlation_id: String,
    action_name: String,
    /// Argument key to the normalized occurrence reprs of its value.
    arguments: Vec<(String, Vec<String>)>,
}

fn collect_targets(graph: &ProvenanceGraph) -> Vec<Target> {
    graph
        .actions()
        .map(|(correlation_id, id)| {
            let action = graph
                .node(id)
                .ok()
                .and_then(|node| node.as_action())
                .expect("action registry ids resolve to action nodes");
            let arguments = action
                .arguments
                .iter()
                .map(|(key, value)| (key.clone(), normalize(value).into_vec()))
                .collect();
            Target {
                id,
                correlation_id: correlation_id.to_owned(),
                action_name: action.action_name.clone(),
                arguments,
            }
        })
        .collect()
}
