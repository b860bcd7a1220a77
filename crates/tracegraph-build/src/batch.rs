//! Parallel builds over collections of traces.
//!
//! Builds are independent per trace, so a batch fans out over the rayon
//! pool. Output order follows input order.

use rayon::prelude::*;

use tracegraph_core::trace::Trace;

use crate::builder::{BuildOutput, GraphBuilder};

/// Builds every trace with the same builder. The output at position `i`
/// belongs to the trace at position `i`.
pub fn build_all(builder: &GraphBuilder, traces: &[Trace]) -> Vec<BuildOutput> {
    traces
        .par_iter()
        .map(|trace| builder.build(trace))
        .collect()
}
