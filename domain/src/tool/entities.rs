//! Tool definitions and the registry spec.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;

/// Definition of a tool that review agents may call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g. "fetch_pr_diff")
    pub name: String,
    /// Human-readable description shown to the model
    pub description: String,
    /// Parameter specifications
    pub parameters: Vec<ToolParameter>,
}

/// Parameter specification for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Whether this parameter is required
    pub required: bool,
    /// JSON type of the parameter ("string", "integer", ...)
    pub param_type: String,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    /// JSON Schema for this tool's parameters, in the function-calling
    /// shape the hosting platform expects.
    pub fn parameters_schema(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();
        for param in &self.parameters {
            properties.insert(
                param.name.clone(),
                json!({
                    "type": param.param_type,
                    "description": param.description,
                }),
            );
            if param.required {
                required.push(param.name.clone());
            }
        }
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }
}

/// Registry of the tools available to the pipeline.
///
/// Lookup is exact: a [`ToolCallRequest`](super::ToolCallRequest) naming
/// anything not registered here is a hard error at the dispatch boundary.
#[derive(Debug, Clone, Default)]
pub struct ToolSpec {
    tools: HashMap<String, ToolDefinition>,
}

impl ToolSpec {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn register(mut self, tool: ToolDefinition) -> Self {
        self.tools.insert(tool.name.clone(), tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn all(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(|s| s.as_str())
    }

    /// Select definitions by name, preserving the requested order.
    /// Unknown names are skipped.
    pub fn select(&self, names: &[&str]) -> Vec<ToolDefinition> {
        names
            .iter()
            .filter_map(|name| self.tools.get(*name).cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_definition() {
        let tool = ToolDefinition::new("read_file", "Read file contents").with_parameter(
            ToolParameter::new("path", "File path relative to repo root", true),
        );

        assert_eq!(tool.name, "read_file");
        assert_eq!(tool.parameters.len(), 1);
        assert_eq!(tool.parameters[0].name, "path");
    }

    #[test]
    fn test_parameters_schema_shape() {
        let tool = ToolDefinition::new("fetch_pr_diff", "Fetch the diff")
            .with_parameter(ToolParameter::new("owner", "Repository owner", true))
            .with_parameter(
                ToolParameter::new("pr_number", "Pull request number", true).with_type("integer"),
            )
            .with_parameter(ToolParameter::new("ref", "Git ref", false));

        let schema = tool.parameters_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["pr_number"]["type"], "integer");
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 2);
        assert!(!required.contains(&serde_json::json!("ref")));
    }

    #[test]
    fn test_tool_spec_lookup_is_exact() {
        let spec = ToolSpec::new()
            .register(ToolDefinition::new("fetch_pr_diff", "Fetch diff"))
            .register(ToolDefinition::new("check_style", "Check style"));

        assert!(spec.contains("fetch_pr_diff"));
        assert!(spec.get("check_style").is_some());
        assert!(spec.get("Fetch_PR_Diff").is_none());
        assert!(spec.get("unknown").is_none());
    }

    #[test]
    fn test_select_preserves_order_and_skips_unknown() {
        let spec = ToolSpec::new()
            .register(ToolDefinition::new("a", "A"))
            .register(ToolDefinition::new("b", "B"));

        let selected = spec.select(&["b", "missing", "a"]);
        let names: Vec<_> = selected.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
