//! Origin-parameter strategies: exact and aliased key matching.

use tracegraph_core::edge::EdgeLabel;

use crate::matcher::{Match, MatchContext, Occurrence, TargetState};
use crate::vocab;

/// Strategy 1: the (argument key, value) pair appears verbatim in the
/// origin parameters.
pub fn exact(
    ctx: &MatchContext<'_>,
    _state: &mut TargetState,
    occ: &Occurrence<'_>,
) -> Option<Match> {
    if !ctx.origin_values.contains(occ.key, occ.value) {
        return None;
    }
    Some(Match {
        source: ctx.origin_id,
        label: EdgeLabel::argument(occ.key, occ.value),
    })
}

/// Strategy 2: the argument restates an origin parameter under a per-tool
/// alias; the value is checked under the origin's own key.
pub fn aliased(
    ctx: &MatchContext<'_>,
    _state: &mut TargetState,
    occ: &Occurrence<'_>,
) -> Option<Match> {
    let origin_key = vocab::origin_alias(occ.action_name, occ.key)?;
    if !ctx.origin_values.contains(origin_key, occ.value) {
        return None;
    }
    Some(Match {
        source: ctx.origin_id,
        label: EdgeLabel::AliasedArgument {
            key: occ.key.to_owned(),
            origin_key: origin_key.to_owned(),
            value: occ.value.to_owned(),
        },
    })
}
