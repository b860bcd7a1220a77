//! Value provenance index: which nodes produced which string values.
//!
//! Populated during Pass 1 in trace order and read during Pass 2. Candidate
//! lookup walks producers newest-first so a repeated value resolves to its
//! most recent producer rather than collapsing every consumer onto the
//! first one.

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::id::NodeId;

/// Mapping from a normalized value to the ordered list of nodes that
/// produced it.
#[derive(Debug, Clone, Default)]
pub struct ValueIndex {
    producers: IndexMap<String, SmallVec<[NodeId; 2]>>,
}

impl ValueIndex {
    pub fn new() -> Self {
        ValueIndex::default()
    }

    /// Records `producer` as having produced `value`. Producers accumulate
    /// in call order; the same producer may be recorded more than once if a
    /// payload repeats a value.
    pub fn record(&mut self, value: String, producer: NodeId) {
        self.producers.entry(value).or_default().push(producer);
    }

    /// Producer ids for `value`, oldest first. Empty if the value was never
    /// produced.
    pub fn producers(&self, value: &str) -> &[NodeId] {
        self.producers
            .get(value)
            .map(SmallVec::as_slice)
            .unwrap_or_default()
    }

    /// Candidate producers for `value`, newest first.
    pub fn candidates(&self, value: &str) -> impl Iterator<Item = NodeId> + '_ {
        self.producers(value).iter().rev().copied()
    }

    /// Number of distinct values recorded.
    pub fn len(&self) -> usize {
        self.producers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }

    /// Iterates (value, producers) pairs in first-recorded order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[NodeId])> {
        self.producers
            .iter()
            .map(|(value, ids)| (value.as_str(), ids.as_slice()))
    }
}
