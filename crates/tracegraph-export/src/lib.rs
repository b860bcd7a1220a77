pub mod error;
pub mod gexf;
pub mod report;

// Re-export commonly used types
pub use error::ExportError;
pub use gexf::GexfWriter;
pub use report::{AuditArgument, AuditEdge, AuditNode, AuditReport};
