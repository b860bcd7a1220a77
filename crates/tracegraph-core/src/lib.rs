pub mod id;
pub mod error;
pub mod value;
pub mod trace;
pub mod node;
pub mod edge;
pub mod provenance;
pub mod graph;
pub mod doc;

// Re-export commonly used types
pub use doc::{EdgeDoc, GraphDoc, NodeDoc};
pub use edge::EdgeLabel;
pub use error::GraphError;
pub use graph::ProvenanceGraph;
pub use id::{EdgeId, NodeId};
pub use node::{ActionNode, GraphNode, NodeKind};
pub use provenance::ValueIndex;
pub use trace::{Origin, OriginValues, ParamValue, Proposal, ToolResult, Trace, TraceEvent};
pub use value::{normalize, scalar_repr, FaultKind, ERROR_MARKER, WARNING_MARKER};
