//! Well-known action vocabulary.
//!
//! The matcher is tool-agnostic except for the special cases below: the
//! alias table maps lookup arguments onto origin parameter keys, and the
//! named search/membership/retrieval actions participate in result indexing
//! and cross-tool matching.

/// Keyword search returning `{id, name}` records.
pub const SEARCH_ACTION: &str = "search_for_indicator_codes";
/// Region membership lookup returning a list of country codes.
pub const MEMBERSHIP_ACTION: &str = "get_country_codes_in_region";
/// Name lookup resolving an indicator name to its code.
pub const INDICATOR_LOOKUP_ACTION: &str = "get_indicator_code_from_name";
/// Name lookup resolving a country name to its code.
pub const COUNTRY_LOOKUP_ACTION: &str = "get_country_code_from_name";
/// Value retrieval consuming country and indicator codes.
pub const RETRIEVAL_ACTION: &str = "retrieve_value";

/// Keyword-list argument of [`SEARCH_ACTION`].
pub const KEYWORDS_ARG: &str = "keywords";
/// Name argument of [`INDICATOR_LOOKUP_ACTION`].
pub const INDICATOR_NAME_ARG: &str = "indicator_name";
/// Name argument of [`COUNTRY_LOOKUP_ACTION`].
pub const COUNTRY_NAME_ARG: &str = "country_name";
/// Code argument of [`RETRIEVAL_ACTION`] matched against membership codes.
pub const COUNTRY_CODE_ARG: &str = "country_code";

/// Per-tool alias table: (action name, argument key, origin parameter key).
///
/// A lookup argument conventionally restates an origin parameter under a
/// different name; the alias strategy checks the origin value set under the
/// origin's own key.
const ORIGIN_ALIASES: &[(&str, &str, &str)] = &[
    (INDICATOR_LOOKUP_ACTION, INDICATOR_NAME_ARG, "property_original"),
    (COUNTRY_LOOKUP_ACTION, COUNTRY_NAME_ARG, "subject_name"),
];

/// Origin parameter key aliased by `key` on `action`, if any.
pub fn origin_alias(action: &str, key: &str) -> Option<&'static str> {
    ORIGIN_ALIASES
        .iter()
        .find(|(a, k, _)| *a == action && *k == key)
        .map(|(_, _, origin_key)| *origin_key)
}

/// True if the natural-language overlap strategy applies to this
/// (action, argument) pair.
pub fn text_overlap_applies(action: &str, key: &str) -> bool {
    (action == SEARCH_ACTION && key == KEYWORDS_ARG)
        || (action == INDICATOR_LOOKUP_ACTION && key == INDICATOR_NAME_ARG)
}
