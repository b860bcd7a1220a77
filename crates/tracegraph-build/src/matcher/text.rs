//! Natural-language overlap strategy against the origin request text.

use indexmap::IndexSet;

use tracegraph_core::edge::EdgeLabel;

use crate::matcher::{Match, MatchContext, Occurrence, TargetState};
use crate::vocab;

/// Lower-cased, punctuation-stripped word list.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| !c.is_ascii_punctuation())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
        .collect()
}

/// The origin request text, tokenized once per build.
#[derive(Debug, Clone)]
pub struct RequestText {
    tokens: Vec<String>,
    token_set: IndexSet<String>,
}

impl RequestText {
    pub fn new(text: &str) -> Self {
        let tokens = tokenize(text);
        let token_set = tokens.iter().cloned().collect();
        RequestText { tokens, token_set }
    }

    pub fn contains_token(&self, token: &str) -> bool {
        self.token_set.contains(token)
    }

    /// Tokens of `value` that also occur in the request text, deduplicated,
    /// in value order.
    pub fn shared_tokens(&self, value: &str) -> Vec<String> {
        let mut shared = Vec::new();
        for token in tokenize(value) {
            if self.contains_token(&token) && !shared.contains(&token) {
                shared.push(token);
            }
        }
        shared
    }

    /// Contiguous 2-5 word phrases of the request text contained in the
    /// normalized form of `value`. Longest phrases are preferred; phrases
    /// covered by an already matched longer phrase are dropped.
    pub fn contained_phrases(&self, value: &str) -> Vec<String> {
        let value_norm = tokenize(value).join(" ");
        if value_norm.is_empty() {
            return Vec::new();
        }
        let mut matched: Vec<String> = Vec::new();
        for len in (2..=5usize).rev() {
            if self.tokens.len() < len {
                continue;
            }
            for window in self.tokens.windows(len) {
                let phrase = window.join(" ");
                if !value_norm.contains(&phrase) {
                    continue;
                }
                if matched.iter().any(|longer| longer.contains(&phrase)) {
                    continue;
                }
                matched.push(phrase);
            }
        }
        matched
    }
}

/// Strategy 4: tie an argument to the origin when its text overlaps the
/// request. Keyword arguments match on shared tokens; the indicator name
/// argument first tries contained phrases, then falls back to tokens.
pub fn overlap(
    ctx: &MatchContext<'_>,
    _state: &mut TargetState,
    occ: &Occurrence<'_>,
) -> Option<Match> {
    if !vocab::text_overlap_applies(occ.action_name, occ.key) {
        return None;
    }
    let request = ctx.request_text?;

    if occ.action_name == vocab::INDICATOR_LOOKUP_ACTION {
        let phrases = request.contained_phrases(occ.value);
        if !phrases.is_empty() {
            return Some(Match {
                source: ctx.origin_id,
                label: EdgeLabel::TextOverlap {
                    key: occ.key.to_owned(),
                    matched: phrases,
                },
            });
        }
    }

    let shared = request.shared_tokens(occ.value);
    if shared.is_empty() {
        return None;
    }
    Some(Match {
        source: ctx.origin_id,
        label: EdgeLabel::TextOverlap {
            key: occ.key.to_owned(),
            matched: shared,
        },
    })
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

    #[test]
    fn tokenize_lowercases_and_strips_punctuation() {
        assert_eq!(
            tokenize("What was GDP growth in France, in 2020?"),
            ["what", "was", "gdp", "growth", "in", "france", "in", "2020"]
        );
        assert!(tokenize("?! ...").is_empty());
    }

    #[test]
    fn shared_tokens_dedupe_and_keep_value_order() {
        let request = RequestText::new("What was GDP growth in France in 2020?");
        assert_eq!(request.shared_tokens("growth GDP growth"), ["growth", "gdp"]);
        assert!(request.shared_tokens("population density").is_empty());
    }

    #[test]
    fn contained_phrases_prefer_longest() {
        let request = RequestText::new("What was GDP growth in France?");
        // "gdp growth" is contained; its 2-word sub-windows are covered by it
        assert_eq!(request.contained_phrases("annual GDP growth"), ["gdp growth"]);
        assert!(request.contained_phrases("population").is_empty());
    }

    #[test]
    fn keyword_arguments_match_on_token_overlap() {
        let origin_values = empty_origin();
        let index = ValueIndex::new();
        let request = RequestText::new("What was GDP growth in France in 2020?");
        let ctx = MatchContext {
            origin_id: NodeId(0),
            origin_values: &origin_values,
            request_text: Some(&request),
            index: &index,
            search_records: &[],
            membership_codes: &[],
        };
        let mut state = TargetState::default();

        let hit = overlap(
            &ctx,
            &mut state,
            &Occurrence {
                target: NodeId(1),
                action_name: vocab::SEARCH_ACTION,
                key: vocab::KEYWORDS_ARG,
                value: "GDP",
            },
        )
        .unwrap();
        assert_eq!(hit.source, NodeId(0));
        assert_eq!(
            hit.label,
            EdgeLabel::TextOverlap {
                key: "keywords".to_owned(),
                matched: vec!["gdp".to_owned()],
            }
        );
    }

    #[test]
    fn name_argument_prefers_phrases_over_tokens() {
        let origin_values = empty_origin();
        let index = ValueIndex::new();
        let request = RequestText::new("What was GDP growth in France in 2020?");
        let ctx = MatchContext {
            origin_id: NodeId(0),
            origin_values: &origin_values,
            request_text: Some(&request),
            index: &index,
            search_records: &[],
            membership_codes: &[],
        };
        let mut state = TargetState::default();

        let hit = overlap(
            &ctx,
            &mut state,
            &Occurrence {
                target: NodeId(1),
                action_name: vocab::INDICATOR_LOOKUP_ACTION,
                key: vocab::INDICATOR_NAME_ARG,
                value: "GDP growth (annual %)",
            },
        )
        .unwrap();
        match hit.label {
            EdgeLabel::TextOverlap { matched, .. } => assert_eq!(matched, ["gdp growth"]),
            other => panic!("expected text overlap, got {other:?}"),
        }
    }

    #[test]
    fn inapplicable_shapes_and_missing_text_yield_none() {
        let origin_values = empty_origin();
        let index = ValueIndex::new();
        let request = RequestText::new("What was GDP growth in France in 2020?");

        let with_text = MatchContext {
            origin_id: NodeId(0),
            origin_values: &origin_values,
            request_text: Some(&request),
            index: &index,
            search_records: &[],
            membership_codes: &[],
        };
        let mut state = TargetState::default();

        // year on retrieve_value is outside the two documented shapes
        assert!(overlap(
            &with_text,
            &mut state,
            &Occurrence {
                target: NodeId(1),
                action_name: "retrieve_value",
                key: "year",
                value: "2020",
            },
        )
        .is_none());

        let without_text = MatchContext {
            origin_id: NodeId(0),
            origin_values: &origin_values,
            request_text: None,
            index: &index,
            search_records: &[],
            membership_codes: &[],
        };
        assert!(overlap(
            &without_text,
            &mut state,
            &Occurrence {
                target: NodeId(1),
                action_name: vocab::SEARCH_ACTION,
                key: vocab::KEYWORDS_ARG,
                value: "GDP",
            },
        )
        .is_none());
    }
}
