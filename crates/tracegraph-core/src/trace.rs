//! Input trace model: the contract with the trace-producing collaborator.
//!
//! A [`Trace`] is an already-captured, time-ordered list of [`TraceEvent`]s
//! plus the [`Origin`] the task started from. Proposals and results are
//! linked by correlation id; nothing here assumes the pairs are adjacent or
//! even both present.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One request-derived origin parameter: a string, a list of strings, or a
/// string-to-string map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Text(String),
    List(Vec<String>),
    Map(IndexMap<String, String>),
}

/// The task's initiating request: optional free text plus the flat parameter
/// mapping derived from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    #[serde(default)]
    pub request_text: Option<String>,
    #[serde(default)]
    pub parameters: IndexMap<String, ParamValue>,
}

impl Origin {
    /// Flattens the parameter mapping one level deep into the set of
    /// (key, value) pairs used by the origin-matching strategies.
    pub fn value_set(&self) -> OriginValues {
        let mut values = OriginValues::default();
        for (key, param) in &self.parameters {
            match param {
                ParamValue::Text(s) => values.insert(key, s),
                ParamValue::List(items) => {
                    for item in items {
                        values.insert(key, item);
                    }
                }
                ParamValue::Map(map) => {
                    for v in map.values() {
                        values.insert(key, v);
                    }
                }
            }
        }
        values
    }
}

/// Flattened (key, value) pairs of an [`Origin`], keyed for exact and
/// aliased lookups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OriginValues {
    by_key: IndexMap<String, IndexSet<String>>,
}

impl OriginValues {
    fn insert(&mut self, key: &str, value: &str) {
        self.by_key
            .entry(key.to_owned())
            .or_default()
            .insert(value.to_owned());
    }

    /// Returns true if the pair (key, value) was present in the origin
    /// parameters.
    pub fn contains(&self, key: &str, value: &str) -> bool {
        self.by_key
            .get(key)
            .map_or(false, |values| values.contains(value))
    }

    /// Total number of flattened pairs.
    pub fn len(&self) -> usize {
        self.by_key.values().map(IndexSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

/// A tool-call proposal: the agent asked for `action_name` to run with
/// `arguments`, to be answered under `correlation_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub correlation_id: String,
    pub action_name: String,
    #[serde(default)]
    pub arguments: IndexMap<String, Value>,
}

/// The eventual result for a proposal with the same correlation id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub correlation_id: String,
    pub payload: Value,
}

/// One entry of the flat trace, in capture order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    Proposal(Proposal),
    Result(ToolResult),
}

impl TraceEvent {
    /// Builds a proposal event.
    pub fn proposal(
        correlation_id: impl Into<String>,
        action_name: impl Into<String>,
        arguments: IndexMap<String, Value>,
    ) -> Self {
        TraceEvent::Proposal(Proposal {
            correlation_id: correlation_id.into(),
            action_name: action_name.into(),
            arguments,
        })
    }

    /// Builds a result event.
    pub fn result(correlation_id: impl Into<String>, payload: Value) -> Self {
        TraceEvent::Result(ToolResult {
            correlation_id: correlation_id.into(),
            payload,
        })
    }

    /// The correlation id this event belongs to.
    pub fn correlation_id(&self) -> &str {
        match self {
            TraceEvent::Proposal(p) => &p.correlation_id,
            TraceEvent::Result(r) => &r.correlation_id,
        }
    }
}

/// The complete captured trace of one task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(default)]
    pub origin: Origin,
    #[serde(default)]
    pub events: Vec<TraceEvent>,
}

impl Trace {
    pub fn new(origin: Origin, events: Vec<TraceEvent>) -> Self {
        Trace { origin, events }
    }

    /// Number of proposal events in the trace.
    pub fn proposal_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TraceEvent::Proposal(_)))
            .count()
    }
}
