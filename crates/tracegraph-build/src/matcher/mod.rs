//! Edge matching: the ordered strategy chain of Pass 2.
//!
//! Each strategy is a pure function from an argument occurrence to an
//! optional [`Match`]. [`attribute`] runs the chain in fixed priority order
//! and stops at the first success, so every edge is explained by exactly one
//! strategy:
//!
//! 1. exact origin match ([`origin::exact`])
//! 2. aliased origin match ([`origin::aliased`])
//! 3. value provenance ([`provenance::producer`])
//! 4. natural-language overlap ([`text::overlap`])
//! 5. cross-tool result match ([`results::cross_tool`])
//!
//! A miss across the whole chain is not an error; the builder records the
//! occurrence for the diagnostics report.

pub mod origin;
pub mod provenance;
pub mod results;
pub mod text;

use std::collections::HashSet;

use tracing::debug;

use tracegraph_core::edge::EdgeLabel;
use tracegraph_core::id::NodeId;
use tracegraph_core::provenance::ValueIndex;
use tracegraph_core::trace::OriginValues;

use crate::matcher::results::{MembershipProducer, SearchProducer};
use crate::matcher::text::RequestText;

/// Read-only state shared by all strategies for one build.
pub struct MatchContext<'a> {
    /// Node id of the origin node.
    pub origin_id: NodeId,
    /// Flattened origin parameters.
    pub origin_values: &'a OriginValues,
    /// Tokenized request text, if the origin carried any.
    pub request_text: Option<&'a RequestText>,
    /// The complete value provenance index from Pass 1.
    pub index: &'a ValueIndex,
    /// Search records cached per producing node, in trace order.
    pub search_records: &'a [SearchProducer],
    /// Membership code lists cached per producing node, in trace order.
    pub membership_codes: &'a [MembershipProducer],
}

/// One argument value occurrence on a target node.
pub struct Occurrence<'a> {
    pub target: NodeId,
    pub action_name: &'a str,
    pub key: &'a str,
    pub value: &'a str,
}

/// Per-target bookkeeping: producers already consumed by an earlier
/// occurrence on the same target node.
#[derive(Debug, Default)]
pub struct TargetState {
    consumed: HashSet<NodeId>,
}

impl TargetState {
    pub fn is_consumed(&self, id: NodeId) -> bool {
        self.consumed.contains(&id)
    }

    pub fn consume(&mut self, id: NodeId) {
        self.consumed.insert(id);
    }
}

/// A successful attribution: the source node and the edge label to record.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub source: NodeId,
    pub label: EdgeLabel,
}

/// One entry of the strategy chain.
pub struct StrategyEntry {
    pub name: &'static str,
    pub apply: StrategyFn,
}

/// Strategy signature: pure except for the consumed-set bookkeeping.
pub type StrategyFn = fn(&MatchContext, &mut TargetState, &Occurrence) -> Option<Match>;

/// The strategy chain in priority order.
pub fn strategies() -> Vec<StrategyEntry> {
    vec![
        StrategyEntry {
            name: "exact origin",
            apply: origin::exact,
        },
        StrategyEntry {
            name: "aliased origin",
            apply: origin::aliased,
        },
        StrategyEntry {
            name: "value provenance",
            apply: provenance::producer,
        },
        StrategyEntry {
            name: "text overlap",
            apply: text::overlap,
        },
        StrategyEntry {
            name: "cross-tool result",
            apply: results::cross_tool,
        },
    ]
}

/// Runs the chain, first success wins. Returns `None` when the occurrence
/// stays unattributed.
pub fn attribute(
    ctx: &MatchContext<'_>,
    state: &mut TargetState,
    occ: &Occurrence<'_>,
) -> Option<Match> {
    for strategy in strategies() {
        if let Some(found) = (strategy.apply)(ctx, state, occ) {
            debug!(
                strategy = strategy.name,
                node = %occ.target,
                key = occ.key,
                value = occ.value,
                "argument occurrence attributed"
            );
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use tracegraph_core::trace::{Origin, ParamValue};

    fn origin_with(pairs: &[(&str, &str)]) -> Origin {
        let mut parameters = IndexMap::new();
        for (key, value) in pairs {
            parameters.insert((*key).to_owned(), ParamValue::Text((*value).to_owned()));
        }
        Origin {
            request_text: None,
            parameters,
        }
    }

    #[test]
    fn chain_is_ordered_and_complete() {
        let names: Vec<&str> = strategies().iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            [
                "exact origin",
                "aliased origin",
                "value provenance",
                "text overlap",
                "cross-tool result"
            ]
        );
    }

    #[test]
    fn origin_match_wins_over_value_provenance() {
        let origin = origin_with(&[("country_code", "FRA")]);
        let origin_values = origin.value_set();
        let mut index = ValueIndex::new();
        // an earlier node also produced FRA
        index.record("FRA".to_owned(), NodeId(1));

        let ctx = MatchContext {
            origin_id: NodeId(0),
            origin_values: &origin_values,
            request_text: None,
            index: &index,
            search_records: &[],
            membership_codes: &[],
        };
        let mut state = TargetState::default();
        let occ = Occurrence {
            target: NodeId(2),
            action_name: "retrieve_value",
            key: "country_code",
            value: "FRA",
        };

        let found = attribute(&ctx, &mut state, &occ).unwrap();
        assert_eq!(found.source, NodeId(0));
        assert_eq!(found.label, EdgeLabel::argument("country_code", "FRA"));
        // the producer was not consumed because strategy 3 never ran
        assert!(!state.is_consumed(NodeId(1)));
    }

    #[test]
    fn provenance_runs_when_origin_does_not_hold_the_pair() {
        let origin = origin_with(&[("subject_name", "France")]);
        let origin_values = origin.value_set();
        let mut index = ValueIndex::new();
        index.record("FRA".to_owned(), NodeId(1));

        let ctx = MatchContext {
            origin_id: NodeId(0),
            origin_values: &origin_values,
            request_text: None,
            index: &index,
            search_records: &[],
            membership_codes: &[],
        };
        let mut state = TargetState::default();
        let occ = Occurrence {
            target: NodeId(2),
            action_name: "retrieve_value",
            key: "country_code",
            value: "FRA",
        };

        let found = attribute(&ctx, &mut state, &occ).unwrap();
        assert_eq!(found.source, NodeId(1));
        assert!(state.is_consumed(NodeId(1)));
    }

    #[test]
    fn unmatched_occurrence_returns_none() {
        let origin = origin_with(&[]);
        let origin_values = origin.value_set();
        let index = ValueIndex::new();

        let ctx = MatchContext {
            origin_id: NodeId(0),
            origin_values: &origin_values,
            request_text: None,
            index: &index,
            search_records: &[],
            membership_codes: &[],
        };
        let mut state = TargetState::default();
        let occ = Occurrence {
            target: NodeId(2),
            action_name: "retrieve_value",
            key: "year",
            value: "2020",
        };

        assert!(attribute(&ctx, &mut state, &occ).is_none());
    }
}
