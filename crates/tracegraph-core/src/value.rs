//! Normalization of payload values into comparable string forms.
//!
//! Matching works entirely on strings: a result payload is broken into the
//! string representations it "produces", and an argument value is broken into
//! the string occurrences it "consumes". [`normalize`] implements the single
//! shared rule for both sides:
//!
//! - a string maps to itself (no added quotes),
//! - a number or bool maps to its display form,
//! - a list maps to one string per element,
//! - a map maps to one string per value,
//! - null maps to nothing.
//!
//! Compound elements nested inside a list or map are stringified to their
//! compact JSON form so they remain comparable without losing information.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use smallvec::SmallVec;

/// Reserved prefix marking an error result payload.
pub const ERROR_MARKER: &str = "Error:";
/// Reserved prefix marking a warning result payload.
pub const WARNING_MARKER: &str = "Warning:";

/// The two fault categories a result payload can signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultKind {
    Error,
    Warning,
}

impl FaultKind {
    /// Detects a fault marker on a string payload.
    ///
    /// Returns `None` for non-string payloads and for strings without a
    /// reserved prefix.
    pub fn detect(payload: &Value) -> Option<FaultKind> {
        let text = payload.as_str()?;
        if text.starts_with(ERROR_MARKER) {
            Some(FaultKind::Error)
        } else if text.starts_with(WARNING_MARKER) {
            Some(FaultKind::Warning)
        } else {
            None
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultKind::Error => write!(f, "error"),
            FaultKind::Warning => write!(f, "warning"),
        }
    }
}

/// Returns the string form of a scalar value, or `None` for null and
/// compound values.
pub fn scalar_repr(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// String form of a list element or map value: scalars as themselves,
/// compounds as compact JSON, null as nothing.
fn element_repr(value: &Value) -> Option<String> {
    if let Some(s) = scalar_repr(value) {
        return Some(s);
    }
    match value {
        Value::Null => None,
        other => serde_json::to_string(other).ok(),
    }
}

/// Breaks a value into the string occurrences used for provenance matching.
pub fn normalize(value: &Value) -> SmallVec<[String; 4]> {
    let mut out = SmallVec::new();
    match value {
        Value::Null => {}
        Value::Array(items) => {
            for item in items {
                if let Some(s) = element_repr(item) {
                    out.push(s);
                }
            }
        }
        Value::Object(map) => {
            for v in map.values() {
                if let Some(s) = element_repr(v) {
                    out.push(s);
                }
            }
        }
        other => {
            if let Some(s) = scalar_repr(other) {
                out.push(s);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn string_normalizes_without_quotes() {
        assert_eq!(normalize(&json!("FRA")).as_slice(), ["FRA"]);
    }

    #[test]
    fn number_and_bool_normalize_to_display_form() {
        assert_eq!(normalize(&json!(1.5)).as_slice(), ["1.5"]);
        assert_eq!(normalize(&json!(2020)).as_slice(), ["2020"]);
        assert_eq!(normalize(&json!(true)).as_slice(), ["true"]);
    }

    #[test]
    fn list_normalizes_per_element() {
        assert_eq!(
            normalize(&json!(["FRA", "DEU", 7])).as_slice(),
            ["FRA", "DEU", "7"]
        );
    }

    #[test]
    fn map_normalizes_to_value_strings() {
        assert_eq!(
            normalize(&json!({"code": "FRA", "year": 2020})).as_slice(),
            ["FRA", "2020"]
        );
    }

    #[test]
    fn null_normalizes_to_nothing() {
        assert!(normalize(&Value::Null).is_empty());
        assert!(normalize(&json!([null])).is_empty());
    }

    #[test]
    fn compound_list_element_stringifies_to_json() {
        let reprs = normalize(&json!([{"id": "X", "name": "Y"}]));
        assert_eq!(reprs.as_slice(), [r#"{"id":"X","name":"Y"}"#]);
    }

    #[test]
    fn fault_detection_matches_reserved_prefixes() {
        assert_eq!(
            FaultKind::detect(&json!("Error: no such country")),
            Some(FaultKind::Error)
        );
        assert_eq!(
            FaultKind::detect(&json!("Warning: partial data")),
            Some(FaultKind::Warning)
        );
        assert_eq!(FaultKind::detect(&json!("all good")), None);
        assert_eq!(FaultKind::detect(&json!(["Error: nested"])), None);
        assert_eq!(FaultKind::detect(&json!(42)), None);
    }

    #[test]
    fn fault_kind_display() {
        assert_eq!(FaultKind::Error.to_string(), "error");
        assert_eq!(FaultKind::Warning.to_string(), "warning");
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| Value::Number(n.into())),
            "[a-zA-Z0-9 ]{0,12}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                proptest::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn normalize_never_panics(value in arb_json()) {
            let _ = normalize(&value);
        }

        #[test]
        fn scalar_normalizes_to_at_most_one_repr(value in arb_json()) {
            if !value.is_array() && !value.is_object() {
                prop_assert!(normalize(&value).len() <= 1);
            }
        }

        #[test]
        fn list_never_produces_more_reprs_than_elements(items in proptest::collection::vec(arb_json(), 0..8)) {
            let n = items.len();
            prop_assert!(normalize(&Value::Array(items)).len() <= n);
        }
    }
}
