//! Core error types for tracegraph-core.
//!
//! Uses `thiserror` for structured, matchable error variants. Only
//! recoverable conditions live here; violations of the graph's ordering
//! invariant are programming bugs and fail with an assertion instead
//! (see [`crate::graph::ProvenanceGraph`]).

use crate::id::NodeId;
use thiserror::Error;

/// Core errors produced by the tracegraph-core crate.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A node id was not found in the graph.
    #[error("node not found: NodeId({id})", id = id.0)]
    NodeNotFound { id: NodeId },
}
