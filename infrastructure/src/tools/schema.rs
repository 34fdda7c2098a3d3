//! JSON Schema tool converter.
//!
//! Default implementation of [`ToolSchemaPort`] producing provider-neutral
//! declarations for function-calling model APIs. The projection is pure
//! data — name, description, parameter schema — and never includes the
//! capability class or any implementation detail.

use corral_application::ports::tool_schema::ToolSchemaPort;
use corral_domain::tool::entities::{ToolDefinition, ToolSpec};

/// Default implementation producing provider-neutral JSON Schema.
///
/// Handles param_type → JSON Schema type mapping:
/// - `"string"`, `"path"` → `"string"`
/// - `"number"` → `"number"`
/// - `"integer"` → `"integer"`
/// - `"boolean"` → `"boolean"`
/// - anything else → `"string"`
///
/// Constraints are projected too: `allowed_values` → `enum`, `max_length`
/// → `maxLength`.
pub struct JsonSchemaToolConverter;

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &tool.parameters {
            let schema_type = match param.param_type.as_str() {
                "string" | "path" => "string",
                "number" => "number",
                "integer" => "integer",
                "boolean" => "boolean",
                _ => "string",
            };

            let mut prop = serde_json::Map::new();
            prop.insert("type".to_string(), serde_json::json!(schema_type));
            prop.insert(
                "description".to_string(),
                serde_json::json!(param.description),
            );
            if !param.allowed_values.is_empty() {
                prop.insert("enum".to_string(), serde_json::json!(param.allowed_values));
            }
            if let Some(max_length) = param.max_length {
                prop.insert("maxLength".to_string(), serde_json::json!(max_length));
            }
            properties.insert(param.name.clone(), serde_json::Value::Object(prop));

            if param.required {
                required.push(serde_json::json!(param.name));
            }
        }

        serde_json::json!({
            "name": tool.name,
            "description": tool.description,
            "input_schema": {
                "type": "object",
                "properties": properties,
                "required": required,
            }
        })
    }

    fn all_tools_schema(&self, spec: &ToolSpec) -> Vec<serde_json::Value> {
        let mut tools: Vec<&ToolDefinition> = spec.all().collect();
        tools.sort_by_key(|t| &t.name);
        tools.into_iter().map(|t| self.tool_to_schema(t)).collect()
    }

    fn read_only_tools_schema(&self, spec: &ToolSpec) -> Vec<serde_json::Value> {
        let mut tools: Vec<&ToolDefinition> = spec.read_only_tools().collect();
        tools.sort_by_key(|t| &t.name);
        tools.into_iter().map(|t| self.tool_to_schema(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corral_domain::tool::entities::{Capability, ToolParameter};

    #[test]
    fn test_tool_to_schema() {
        let converter = JsonSchemaToolConverter;
        let tool = ToolDefinition::new("read_file", "Read file contents", Capability::Read)
            .with_parameter(ToolParameter::new("path", "File path to read", true).with_type("path"))
            .with_parameter(
                ToolParameter::new("limit", "Max lines to read", false).with_type("integer"),
            );

        let schema = converter.tool_to_schema(&tool);

        assert_eq!(schema["name"], "read_file");
        assert_eq!(schema["description"], "Read file contents");
        assert_eq!(schema["input_schema"]["type"], "object");

        let path_prop = &schema["input_schema"]["properties"]["path"];
        assert_eq!(path_prop["type"], "string"); // "path" maps to "string"
        assert_eq!(path_prop["description"], "File path to read");

        let limit_prop = &schema["input_schema"]["properties"]["limit"];
        assert_eq!(limit_prop["type"], "integer");

        let required = schema["input_schema"]["required"].as_array().unwrap();
        assert_eq!(required.len(), 1);
        assert_eq!(required[0], "path");
    }

    #[test]
    fn test_schema_never_exposes_capability() {
        let converter = JsonSchemaToolConverter;
        let tool = ToolDefinition::new("write_file", "Write file", Capability::Write);

        let schema = converter.tool_to_schema(&tool);
        assert!(schema.get("capability").is_none());
        assert!(!schema.to_string().contains("write\""));
    }

    #[test]
    fn test_schema_projects_constraints() {
        let converter = JsonSchemaToolConverter;
        let tool = ToolDefinition::new("write_file", "Write file", Capability::Write)
            .with_parameter(
                ToolParameter::new("mode", "Write mode", false)
                    .with_allowed_values(["overwrite", "create_new"])
                    .with_max_length(16),
            );

        let schema = converter.tool_to_schema(&tool);
        let mode = &schema["input_schema"]["properties"]["mode"];
        assert_eq!(mode["enum"].as_array().unwrap().len(), 2);
        assert_eq!(mode["maxLength"], 16);
    }

    #[test]
    fn test_all_tools_schema_sorted() {
        let converter = JsonSchemaToolConverter;
        let spec = ToolSpec::new()
            .register(ToolDefinition::new(
                "write_file",
                "Write file",
                Capability::Write,
            ))
            .register(ToolDefinition::new(
                "read_file",
                "Read file",
                Capability::Read,
            ));

        let tools = converter.all_tools_schema(&spec);
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0]["name"], "read_file");
        assert_eq!(tools[1]["name"], "write_file");
    }

    #[test]
    fn test_read_only_tools_schema_excludes_mutating() {
        let converter = JsonSchemaToolConverter;
        let spec = ToolSpec::new()
            .register(ToolDefinition::new(
                "read_file",
                "Read file",
                Capability::Read,
            ))
            .register(ToolDefinition::new(
                "write_file",
                "Write file",
                Capability::Write,
            ))
            .register(ToolDefinition::new(
                "run_shell_command",
                "Run command",
                Capability::Execute,
            ));

        let tools = converter.read_only_tools_schema(&spec);
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["name"], "read_file");
    }
}
