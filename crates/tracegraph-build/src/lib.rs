pub mod batch;
pub mod builder;
pub mod diagnostics;
pub mod matcher;
pub mod schema;
pub mod vocab;

// Re-export commonly used types
pub use batch::build_all;
pub use builder::{BuildOutput, GraphBuilder};
pub use diagnostics::{DiagnosticsReport, MissingArgument, UnattributedArgument};
pub use matcher::results::{MembershipProducer, SearchProducer, SearchRecord};
pub use matcher::text::RequestText;
pub use schema::{SchemaError, ToolSchema, ToolSpec};
