//! ProvenanceGraph: the labeled dependency DAG for one trace.
//!
//! [`ProvenanceGraph`] is the single entry point for constructing and
//! querying a built graph. The origin node is created first, action nodes
//! follow in trace order, and sinks appear lazily when first needed, so node
//! ids encode creation order and the ordering checks in
//! [`ProvenanceGraph::add_edge`] keep the graph acyclic by construction.
//!
//! # Architecture
//!
//! The graph is a single `StableGraph<GraphNode, EdgeLabel>`. It is private;
//! all mutations go through `ProvenanceGraph` methods, which enforce:
//! - the origin node never gains incoming edges,
//! - sink nodes never gain outgoing edges,
//! - an action only feeds actions created after it,
//! - duplicate (source, target, label) insertions are no-ops.
//!
//! Violations of these rules are builder bugs and fail with assertions; the
//! only recoverable error is addressing a node id that does not exist.

use indexmap::IndexMap;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableGraph;
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::{Directed, Direction};
use serde::{Deserialize, Serialize};

use crate::edge::EdgeLabel;
use crate::error::GraphError;
use crate::id::{EdgeId, NodeId};
use crate::node::{ActionNode, GraphNode};
use crate::trace::Origin;
use crate::value::FaultKind;

/// The dependency graph for one built trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvenanceGraph {
    graph: StableGraph<GraphNode, EdgeLabel, Directed, u32>,
    origin: NodeId,
    /// Correlation id to node id, in creation (trace) order.
    actions: IndexMap<String, NodeId>,
    error_sink: Option<NodeId>,
    warning_sink: Option<NodeId>,
}

impl ProvenanceGraph {
    /// Creates a graph containing only the origin node.
    pub fn new(origin: Origin) -> Self {
        let mut graph = StableGraph::new();
        let origin_id = NodeId::from(graph.add_node(GraphNode::Origin(origin)));
        ProvenanceGraph {
            graph,
            origin: origin_id,
            actions: IndexMap::new(),
            error_sink: None,
            warning_sink: None,
        }
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Adds an action node and registers its correlation id.
    pub fn add_action(&mut self, action: ActionNode) -> NodeId {
        let correlation_id = action.correlation_id.clone();
        debug_assert!(
            !self.actions.contains_key(&correlation_id),
            "duplicate correlation id '{correlation_id}'"
        );
        let id = NodeId::from(self.graph.add_node(GraphNode::Action(action)));
        self.actions.insert(correlation_id, id);
        id
    }

    /// Overwrites the payload of an existing action node in place. The node
    /// keeps its id, its creation-order position, and every edge already
    /// attached to it.
    pub fn replace_action(&mut self, id: NodeId, action: ActionNode) -> Result<(), GraphError> {
        let node = self
            .graph
            .node_weight_mut(id.into())
            .ok_or(GraphError::NodeNotFound { id })?;
        assert!(
            node.as_action().is_some(),
            "only action nodes can be replaced (node {id})"
        );
        debug_assert_eq!(
            node.as_action().map(|a| a.correlation_id.as_str()),
            Some(action.correlation_id.as_str()),
            "replacement keeps the node's correlation id"
        );
        *node = GraphNode::Action(action);
        Ok(())
    }

    /// Returns the sink node for `kind`, creating it on first use.
    pub fn fault_sink(&mut self, kind: FaultKind) -> NodeId {
        let existing = match kind {
            FaultKind::Error => self.error_sink,
            FaultKind::Warning => self.warning_sink,
        };
        if let Some(id) = existing {
            return id;
        }
        let id = NodeId::from(self.graph.add_node(GraphNode::Sink { kind }));
        match kind {
            FaultKind::Error => self.error_sink = Some(id),
            FaultKind::Warning => self.warning_sink = Some(id),
        }
        id
    }

    /// Connects an action to the sink for `kind`, creating the sink if
    /// needed. Idempotent: the action keeps at most one edge per sink.
    pub fn connect_fault(&mut self, from: NodeId, kind: FaultKind) -> Result<EdgeId, GraphError> {
        let node = self
            .graph
            .node_weight(from.into())
            .ok_or(GraphError::NodeNotFound { id: from })?;
        assert!(
            node.as_action().is_some(),
            "only action nodes connect to sinks (node {from})"
        );
        let sink = self.fault_sink(kind);
        self.add_edge(from, sink, EdgeLabel::Fault { kind })
    }

    /// Adds a labeled edge.
    ///
    /// Returns the existing edge id if the same (source, target, label)
    /// triple is already present. Panics on edges that would break the
    /// ordering invariant: into the origin, out of a sink, onto the node
    /// itself, or from an action to an earlier action.
    pub fn add_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        label: EdgeLabel,
    ) -> Result<EdgeId, GraphError> {
        let from_idx: NodeIndex<u32> = from.into();
        let to_idx: NodeIndex<u32> = to.into();

        let (from_is_sink, from_is_action) = match self.graph.node_weight(from_idx) {
            Some(node) => (node.is_sink(), node.as_action().is_some()),
            None => return Err(GraphError::NodeNotFound { id: from }),
        };
        let (to_is_origin, to_is_action) = match self.graph.node_weight(to_idx) {
            Some(node) => (node.is_origin(), node.as_action().is_some()),
            None => return Err(GraphError::NodeNotFound { id: to }),
        };

        assert_ne!(from, to, "self edge rejected on node {from}");
        assert!(!to_is_origin, "edge into the origin node rejected ({from} -> {to})");
        assert!(!from_is_sink, "edge out of a sink node rejected ({from} -> {to})");
        if from_is_action && to_is_action {
            assert!(
                from.created_before(to),
                "action edge {from} -> {to} violates creation order"
            );
        }

        if let Some(existing) = self.find_edge(from, to, &label) {
            return Ok(existing);
        }
        let idx = self.graph.add_edge(from_idx, to_idx, label);

        #[cfg(debug_assertions)]
        self.assert_acyclic();

        Ok(EdgeId::from(idx))
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    /// The origin node's id.
    pub fn origin_id(&self) -> NodeId {
        self.origin
    }

    /// The origin parameters and request text this graph was seeded with.
    pub fn origin(&self) -> &Origin {
        match &self.graph[NodeIndex::from(self.origin)] {
            GraphNode::Origin(origin) => origin,
            _ => unreachable!("origin id always points at the origin node"),
        }
    }

    /// Looks up a node by id.
    pub fn node(&self, id: NodeId) -> Result<&GraphNode, GraphError> {
        self.graph
            .node_weight(id.into())
            .ok_or(GraphError::NodeNotFound { id })
    }

    /// Node id for a correlation id, if that proposal completed.
    pub fn action_id(&self, correlation_id: &str) -> Option<NodeId> {
        self.actions.get(correlation_id).copied()
    }

    /// (correlation id, node id) pairs in creation order.
    pub fn actions(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.actions.iter().map(|(cid, id)| (cid.as_str(), *id))
    }

    /// All nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &GraphNode)> {
        self.graph
            .node_indices()
            .map(|idx| (NodeId::from(idx), &self.graph[idx]))
    }

    /// All edges as (source, target, label).
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, &EdgeLabel)> {
        self.graph.edge_references().map(|edge| {
            (
                NodeId::from(edge.source()),
                NodeId::from(edge.target()),
                edge.weight(),
            )
        })
    }

    /// Finds an edge by its exact (source, target, label) triple.
    pub fn find_edge(&self, from: NodeId, to: NodeId, label: &EdgeLabel) -> Option<EdgeId> {
        self.graph
            .edges_connecting(from.into(), to.into())
            .find(|edge| edge.weight() == label)
            .map(|edge| EdgeId::from(edge.id()))
    }

    /// True if the node is the source of at least one edge.
    pub fn has_outgoing(&self, id: NodeId) -> bool {
        self.graph
            .edges_directed(id.into(), Direction::Outgoing)
            .next()
            .is_some()
    }

    pub fn error_sink(&self) -> Option<NodeId> {
        self.error_sink
    }

    pub fn warning_sink(&self) -> Option<NodeId> {
        self.warning_sink
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of action nodes.
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    // -----------------------------------------------------------------------
    // Debug consistency assertion
    // -----------------------------------------------------------------------

    /// Verifies the graph stayed acyclic. Only called in debug builds.
    #[cfg(debug_assertions)]
    fn assert_acyclic(&self) {
        assert!(
            !petgraph::algo::is_cyclic_directed(&self.graph),
            "dependency graph must stay acyclic"
        );
    }
}
