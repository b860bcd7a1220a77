//! Edge labels: why a source node feeds a target node.
//!
//! The [`Display`](std::fmt::Display) form is the label string that appears
//! in serialized documents. Argument-style labels render as `key=value` with
//! the target's own argument key, so a reader (or the audit report) can map
//! every labeled edge back to the argument it explains. Heuristic matches
//! render as their documented tags instead.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::FaultKind;

/// Label of a directed dependency edge.
///
/// Internally tagged as `type`; the `Fault` variant keeps its `kind` field
/// as payload, so the tag must not reuse that name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EdgeLabel {
    /// The target's argument `key` carried `value`, found verbatim in the
    /// origin parameters or produced by the source node.
    Argument { key: String, value: String },
    /// Like [`EdgeLabel::Argument`], but matched through the per-tool alias
    /// table: `origin_key` is the origin parameter the argument refers to.
    AliasedArgument {
        key: String,
        origin_key: String,
        value: String,
    },
    /// Natural-language overlap between the origin request text and the
    /// target's argument `key`; `matched` holds the overlapping tokens or
    /// phrases.
    TextOverlap { key: String, matched: Vec<String> },
    /// The argument value equals the `name` field of a record returned by an
    /// earlier search action.
    NameMatch { key: String, value: String },
    /// The argument value equals a code returned by an earlier membership
    /// lookup.
    CodeMatch { key: String, value: String },
    /// Edge from an action into its error or warning sink.
    Fault { kind: FaultKind },
}

impl EdgeLabel {
    /// Builds an argument label.
    pub fn argument(key: impl Into<String>, value: impl Into<String>) -> Self {
        EdgeLabel::Argument {
            key: key.into(),
            value: value.into(),
        }
    }

    /// The target argument key this label refers to, if any.
    pub fn argument_key(&self) -> Option<&str> {
        match self {
            EdgeLabel::Argument { key, .. }
            | EdgeLabel::AliasedArgument { key, .. }
            | EdgeLabel::TextOverlap { key, .. }
            | EdgeLabel::NameMatch { key, .. }
            | EdgeLabel::CodeMatch { key, .. } => Some(key),
            EdgeLabel::Fault { .. } => None,
        }
    }

    /// The matched value recorded for that key. Text-overlap labels hold
    /// overlapping request tokens rather than a single value, so they
    /// return `None` here.
    pub fn argument_value(&self) -> Option<&str> {
        match self {
            EdgeLabel::Argument { value, .. }
            | EdgeLabel::AliasedArgument { value, .. }
            | EdgeLabel::NameMatch { value, .. }
            | EdgeLabel::CodeMatch { value, .. } => Some(value),
            EdgeLabel::TextOverlap { .. } | EdgeLabel::Fault { .. } => None,
        }
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, EdgeLabel::Fault { .. })
    }
}

impl fmt::Display for EdgeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeLabel::Argument { key, value } => write!(f, "{key}={value}"),
            EdgeLabel::AliasedArgument { key, value, .. } => write!(f, "{key}={value}"),
            EdgeLabel::TextOverlap { key, matched } => {
                write!(f, "NLQ→{key}: {}", matched.join(", "))
            }
            EdgeLabel::NameMatch { .. } => write!(f, "name match"),
            EdgeLabel::CodeMatch { .. } => write!(f, "code match"),
            EdgeLabel::Fault { kind } => write!(f, "{kind}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn argument_label_renders_key_equals_value() {
        let label = EdgeLabel::argument("country_name", "France");
        assert_snapshot!(label.to_string(), @"country_name=France");
        assert_eq!(label.argument_key(), Some("country_name"));
        assert_eq!(label.argument_value(), Some("France"));
    }

    #[test]
    fn aliased_label_renders_with_target_key() {
        let label = EdgeLabel::AliasedArgument {
            key: "indicator_name".to_owned(),
            origin_key: "property_original".to_owned(),
            value: "GDP growth".to_owned(),
        };
        assert_snapshot!(label.to_string(), @"indicator_name=GDP growth");
        assert_eq!(label.argument_key(), Some("indicator_name"));
    }

    #[test]
    fn text_overlap_label_lists_matches() {
        let label = EdgeLabel::TextOverlap {
            key: "keywords".to_owned(),
            matched: vec!["gdp".to_owned(), "growth".to_owned()],
        };
        assert_snapshot!(label.to_string(), @"NLQ→keywords: gdp, growth");
        assert_eq!(label.argument_key(), Some("keywords"));
        assert_eq!(label.argument_value(), None);
    }

    #[test]
    fn heuristic_and_fault_labels_render_tags() {
        let name = EdgeLabel::NameMatch {
            key: "indicator_name".to_owned(),
            value: "GDP growth".to_owned(),
        };
        assert_snapshot!(name.to_string(), @"name match");
        assert_eq!(name.argument_value(), Some("GDP growth"));

        let code = EdgeLabel::CodeMatch {
            key: "country_code".to_owned(),
            value: "FRA".to_owned(),
        };
        assert_snapshot!(code.to_string(), @"code match");

        let fault = EdgeLabel::Fault {
            kind: FaultKind::Error,
        };
        assert_snapshot!(fault.to_string(), @"error");
        assert!(fault.is_fault());
        assert_eq!(fault.argument_key(), None);
    }

    #[test]
    fn label_serde_roundtrip() {
        let label = EdgeLabel::AliasedArgument {
            key: "country_name".to_owned(),
            origin_key: "subject_name".to_owned(),
            value: "France".to_owned(),
        };
        let value = serde_json::to_value(&label).unwrap();
        assert_eq!(value["type"], "aliased_argument");
        let back: EdgeLabel = serde_json::from_value(value).unwrap();
        assert_eq!(back, label);
    }

    #[test]
    fn fault_label_tag_does_not_shadow_its_kind_field() {
        let label = EdgeLabel::Fault {
            kind: FaultKind::Warning,
        };
        let value = serde_json::to_value(&label).unwrap();
        assert_eq!(value["type"], "fault");
        assert_eq!(value["kind"], "warning");
        let back: EdgeLabel = serde_json::from_value(value).unwrap();
        assert_eq!(back, label);
    }
}
