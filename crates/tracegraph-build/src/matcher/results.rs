//! Cross-action result matching for the two structured result shapes.
//!
//! Search actions return lists of indicator records and region membership
//! actions return lists of country codes. Those payloads are cached during
//! the correlation pass so that later arguments can be tied back to the
//! action that produced them even when the argument text differs from any
//! single indexed value.

use tracegraph_core::edge::EdgeLabel;
use tracegraph_core::id::NodeId;

use crate::matcher::{Match, MatchContext, Occurrence, TargetState};
use crate::vocab;

/// One record from a search action's result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRecord {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// A search action together with the records it returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchProducer {
    pub node: NodeId,
    pub records: Vec<SearchRecord>,
}

/// A region membership action together with the country codes it returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipProducer {
    pub node: NodeId,
    pub codes: Vec<String>,
}

/// Strategy 5: match an argument against cached structured results.
///
/// An indicator name argument matches the `name` field of a search record;
/// a country code argument matches a code listed by a membership action.
/// Producers are scanned newest first, skipping any created at or after
/// the target.
pub fn cross_tool(
    ctx: &MatchContext<'_>,
    _state: &mut TargetState,
    occ: &Occurrence<'_>,
) -> Option<Match> {
    if occ.action_name == vocab::INDICATOR_LOOKUP_ACTION && occ.key == vocab::INDICATOR_NAME_ARG {
        return match_search_name(ctx, occ);
    }
    if occ.action_name == vocab::RETRIEVAL_ACTION && occ.key == vocab::COUNTRY_CODE_ARG {
        return match_membership_code(ctx, occ);
    }
    None
}

fn match_search_name(ctx: &MatchContext<'_>, occ: &Occurrence<'_>) -> Option<Match> {
    for producer in ctx.search_records.iter().rev() {
        if !producer.node.created_before(occ.target) {
            continue;
        }
        if producer
            .records
            .iter()
            .any(|record| record.name.as_deref() == Some(occ.value))
        {
            return Some(Match {
                source: producer.node,
                label: EdgeLabel::NameMatch {
                    key: occ.key.to_owned(),
                    value: occ.value.to_owned(),
                },
            });
        }
    }
    None
}

fn match_membership_code(ctx: &MatchContext<'_>, occ: &Occurrence<'_>) -> Option<Match> {
    for producer in ctx.membership_codes.iter().rev() {
        if !producer.node.created_before(occ.target) {
            continue;
        }
        if producer.codes.iter().any(|code| code == occ.value) {
            return Some(Match {
                source: producer.node,
                label: EdgeLabel::CodeMatch {
                    key: occ.key.to_owned(),
                    value: occ.value.to_owned(),
                },
            });
        }
    }
    None
}
