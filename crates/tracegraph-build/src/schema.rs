//! Tool schema loading from JSONL declarations.
//!
//! Each line declares one tool in the common function-calling shape:
//!
//! ```json
//! {"type": "function", "function": {"name": "retrieve_value", "parameters":
//!   {"properties": {"year": {"type": "integer"}}, "required": ["year"]}}}
//! ```
//!
//! Only the pieces the diagnostics pass consumes are retained: the set of
//! required argument keys and the declared type per argument. Arguments
//! without a declared type default to `"string"`.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("line {line}: malformed tool declaration")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("line {line}: declaration has no function body")]
    MissingFunction { line: usize },
}

/// What one tool declares about its arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub required: IndexSet<String>,
    pub types: IndexMap<String, String>,
}

/// All tool declarations, keyed by tool name in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSchema {
    tools: IndexMap<String, ToolSpec>,
}

impl ToolSchema {
    /// Parses a JSONL document of tool declarations. Blank lines are
    /// skipped; line numbers in errors are one-based.
    pub fn from_jsonl(text: &str) -> Result<Self, SchemaError> {
        let mut tools = IndexMap::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            if raw.trim().is_empty() {
                continue;
            }
            let decl: SchemaLine = serde_json::from_str(raw)
                .map_err(|source| SchemaError::Parse { line, source })?;
            let function = decl
                .function
                .ok_or(SchemaError::MissingFunction { line })?;
            let required = function.parameters.required.into_iter().collect();
            let types = function
                .parameters
                .properties
                .into_iter()
                .map(|(key, property)| (key, property.r#type))
                .collect();
            tools.insert(function.name, ToolSpec { required, types });
        }
        Ok(ToolSchema { tools })
    }

    pub fn get(&self, tool_name: &str) -> Option<&ToolSpec> {
        self.tools.get(tool_name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

// Wire shapes for one declaration line. Everything not consumed is ignored.

#[derive(Debug, Deserialize)]
struct SchemaLine {
    function: Option<FunctionDecl>,
}

#[derive(Debug, Deserialize)]
struct FunctionDecl {
    name: String,
    #[serde(default)]
    parameters: Parameters,
}

#[derive(Debug, Default, Deserialize)]
struct Parameters {
    #[serde(default)]
    required: Vec<String>,
    #[serde(default)]
    properties: IndexMap<String, Property>,
}

#[derive(Debug, Deserialize)]
struct Property {
    #[serde(default = "default_type")]
    r#type: String,
}

fn default_type() -> String {
    "string".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_TOOLS: &str = r#"{"type": "function", "function": {"name": "get_country_code_from_name", "parameters": {"properties": {"country_name": {"type": "string"}}, "required": ["country_name"]}}}

{"type": "function", "function": {"name": "retrieve_value", "parameters": {"properties": {"country_code": {"type": "string"}, "indicator_code": {"type": "string"}, "year": {"type": "integer"}}, "required": ["country_code", "indicator_code", "year"]}}}
"#;

    #[test]
    fn parses_declarations_and_skips_blank_lines() {
        let schema = ToolSchema::from_jsonl(TWO_TOOLS).unwrap();
        assert_eq!(schema.len(), 2);

        let retrieve = schema.get("retrieve_value").unwrap();
        assert!(retrieve.required.contains("year"));
        assert_eq!(retrieve.types.get("year").unwrap(), "integer");
        assert_eq!(retrieve.types.get("country_code").unwrap(), "string");
    }

    #[test]
    fn missing_type_defaults_to_string() {
        let schema = ToolSchema::from_jsonl(
            r#"{"function": {"name": "t", "parameters": {"properties": {"q": {}}}}}"#,
        )
        .unwrap();
        assert_eq!(schema.get("t").unwrap().types.get("q").unwrap(), "string");
    }

    #[test]
    fn missing_parameters_means_no_requirements() {
        let schema =
            ToolSchema::from_jsonl(r#"{"function": {"name": "bare"}}"#).unwrap();
        let spec = schema.get("bare").unwrap();
        assert!(spec.required.is_empty());
        assert!(spec.types.is_empty());
    }

    #[test]
    fn declaration_without_function_body_fails_with_line_number() {
        let err = ToolSchema::from_jsonl("{\"type\": \"function\"}\n").unwrap_err();
        assert!(matches!(err, SchemaError::MissingFunction { line: 1 }));
    }

    #[test]
    fn malformed_line_reports_its_position() {
        let text = "{\"function\": {\"name\": \"ok\"}}\nnot json\n";
        let err = ToolSchema::from_jsonl(text).unwrap_err();
        match err {
            SchemaError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("expected parse error, got {other}"),
        }
    }
}
