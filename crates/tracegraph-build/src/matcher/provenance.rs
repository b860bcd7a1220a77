//! Value-provenance strategy: attribute a value to the node that produced it.

use tracegraph_core::edge::EdgeLabel;

use crate::matcher::{Match, MatchContext, Occurrence, TargetState};

/// Strategy 3: walk the producers of the value newest-first and take the
/// first one that is not the target itself, was created before the target,
/// and was not already consumed by an earlier occurrence on this target.
pub fn producer(
    ctx: &MatchContext<'_>,
    state: &mut TargetState,
    occ: &Occurrence<'_>,
) -> Option<Match> {
    for candidate in ctx.index.candidates(occ.value) {
        if candidate == occ.target {
            continue;
        }
        if !candidate.created_before(occ.target) {
            continue;
        }
        if state.is_consumed(candidate) {
            continue;
        }
        state.consume(candidate);
        return Some(Match {
            source: candidate,
            label: EdgeLabel::argument(occ.key, occ.value),
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracegraph_core::id::NodeId;
    use tracegraph_core::provenance::ValueIndex;
    use tracegraph_core::trace::{Origin, OriginValues};

    fn empty_origin() -> OriginValues {
        Origin::default().value_set()
    }

    fn occurrence(target: NodeId, value: &str) -> Occurrence<'_> {
        Occurrence {
            target,
            action_name: "retrieve_value",
            key: "country_code",
            value,
        }
    }

    #[test]
    fn newest_eligible_producer_wins() {
        let origin_values = empty_origin();
        let mut index = ValueIndex::new();
        index.record("FRA".to_owned(), NodeId(1));
        index.record("FRA".to_owned(), NodeId(3));

        let ctx = MatchContext {
            origin_id: NodeId(0),
            origin_values: &origin_values,
            request_text: None,
            index: &index,
            search_records: &[],
            membership_codes: &[],
        };
        let mut state = TargetState::default();

        let hit = producer(&ctx, &mut state, &occurrence(NodeId(5), "FRA")).unwrap();
        assert_eq!(hit.source, NodeId(3));
        assert!(state.is_consumed(NodeId(3)));
    }

    #[test]
    fn skips_the_target_itself() {
        let origin_values = empty_origin();
        let mut index = ValueIndex::new();
        index.record("7".to_owned(), NodeId(2));
        index.record("7".to_owned(), NodeId(4));

        let ctx = MatchContext {
            origin_id: NodeId(0),
            origin_values: &origin_values,
            request_text: None,
            index: &index,
            search_records: &[],
            membership_codes: &[],
        };
        let mut state = TargetState::default();

        // node 4 produced the value itself; the earlier producer is used
        let hit = producer(&ctx, &mut state, &occurrence(NodeId(4), "7")).unwrap();
        assert_eq!(hit.source, NodeId(2));
    }

    #[test]
    fn skips_producers_created_after_the_target() {
        let origin_values = empty_origin();
        let mut index = ValueIndex::new();
        index.record("42".to_owned(), NodeId(6));

        let ctx = MatchContext {
            origin_id: NodeId(0),
            origin_values: &origin_values,
            request_text: None,
            index: &index,
            search_records: &[],
            membership_codes: &[],
        };
        let mut state = TargetState::default();

        assert!(producer(&ctx, &mut state, &occurrence(NodeId(3), "42")).is_none());
    }

    #[test]
    fn consumed_producers_fall_through_to_older_ones() {
        let origin_values = empty_origin();
        let mut index = ValueIndex::new();
        index.record("FRA".to_owned(), NodeId(1));
        index.record("FRA".to_owned(), NodeId(2));

        let ctx = MatchContext {
            origin_id: NodeId(0),
            origin_values: &origin_values,
            request_text: None,
            index: &index,
            search_records: &[],
            membership_codes: &[],
        };
        let mut state = TargetState::default();

        let first = producer(&ctx, &mut state, &occurrence(NodeId(5), "FRA")).unwrap();
        assert_eq!(first.source, NodeId(2));
        // second occurrence of the same value on the same target
        let second = producer(&ctx, &mut state, &occurrence(NodeId(5), "FRA")).unwrap();
        assert_eq!(second.source, NodeId(1));
        // no producers left
        assert!(producer(&ctx, &mut state, &occurrence(NodeId(5), "FRA")).is_none());
    }
}
