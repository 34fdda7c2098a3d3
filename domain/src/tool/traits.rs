//! Tool domain traits
//!
//! Contains pure domain logic traits for structural tool-call validation.
//! The async execution port is defined in the application layer (ports).

use super::entities::{ToolCall, ToolDefinition};
use super::value_objects::ToolError;

/// Structural validator for tool calls
///
/// Validates a call's argument map against the tool's parameter schema
/// without any I/O. Semantic validation (paths, existence) happens later,
/// when an invocation is built.
pub trait ToolValidator {
    /// Validate a tool call against its definition
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), ToolError>;
}

/// Default implementation of ToolValidator
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), ToolError> {
        // All required parameters must be present
        for param in &definition.parameters {
            if param.required && !call.arguments.contains_key(&param.name) {
                return Err(ToolError::validation(format!(
                    "Missing required parameter '{}' for tool '{}'",
                    param.name, definition.name
                )));
            }
        }

        // All provided arguments must be declared parameters
        for arg_name in call.arguments.keys() {
            if !definition.parameters.iter().any(|p| &p.name == arg_name) {
                return Err(ToolError::validation(format!(
                    "Unknown parameter '{}' for tool '{}'",
                    arg_name, definition.name
                )));
            }
        }

        // Type and constraint checks per declared parameter
        for param in &definition.parameters {
            let Some(value) = call.arguments.get(&param.name) else {
                continue;
            };

            let type_ok = match param.param_type.as_str() {
                "string" | "path" => value.is_string(),
                "integer" => value.is_i64() || value.is_u64(),
                "number" => value.is_number(),
                "boolean" => value.is_boolean(),
                _ => value.is_string(),
            };
            if !type_ok {
                return Err(ToolError::validation(format!(
                    "Parameter '{}' of tool '{}' must be of type {}",
                    param.name, definition.name, param.param_type
                )));
            }

            if let Some(s) = value.as_str() {
                if !param.allowed_values.is_empty()
                    && !param.allowed_values.iter().any(|v| v == s)
                {
                    return Err(ToolError::validation(format!(
                        "Parameter '{}' of tool '{}' must be one of: {}",
                        param.name,
                        definition.name,
                        param.allowed_values.join(", ")
                    )));
                }

                if let Some(max_length) = param.max_length
                    && s.len() > max_length
                {
                    return Err(ToolError::validation(format!(
                        "Parameter '{}' of tool '{}' exceeds maximum length of {} bytes",
                        param.name, definition.name, max_length
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::{Capability, ToolParameter};
    use crate::tool::value_objects::ErrorKind;

    fn definition() -> ToolDefinition {
        ToolDefinition::new("test", "test tool", Capability::Read)
            .with_parameter(ToolParameter::new("path", "A path", true).with_type("path"))
            .with_parameter(ToolParameter::new("limit", "A limit", false).with_type("integer"))
            .with_parameter(
                ToolParameter::new("mode", "A mode", false)
                    .with_allowed_values(["fast", "slow"])
                    .with_max_length(8),
            )
    }

    #[test]
    fn test_validator_missing_required() {
        let validator = DefaultToolValidator;
        let call = ToolCall::new("test");

        let err = validator.validate(&call, &definition()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("Missing required parameter"));
    }

    #[test]
    fn test_validator_unknown_param() {
        let validator = DefaultToolValidator;
        let call = ToolCall::new("test")
            .with_arg("path", "/p")
            .with_arg("bogus", "value");

        let err = validator.validate(&call, &definition()).unwrap_err();
        assert!(err.message.contains("Unknown parameter"));
    }

    #[test]
    fn test_validator_wrong_type() {
        let validator = DefaultToolValidator;
        let call = ToolCall::new("test")
            .with_arg("path", "/p")
            .with_arg("limit", "not a number");

        let err = validator.validate(&call, &definition()).unwrap_err();
        assert!(err.message.contains("must be of type integer"));
    }

    #[test]
    fn test_validator_enum_membership() {
        let validator = DefaultToolValidator;
        let call = ToolCall::new("test")
            .with_arg("path", "/p")
            .with_arg("mode", "warp");

        let err = validator.validate(&call, &definition()).unwrap_err();
        assert!(err.message.contains("must be one of"));

        let ok = ToolCall::new("test")
            .with_arg("path", "/p")
            .with_arg("mode", "fast");
        assert!(validator.validate(&ok, &definition()).is_ok());
    }

    #[test]
    fn test_validator_max_length() {
        let validator = DefaultToolValidator;
        let def = ToolDefinition::new("test", "test tool", Capability::Read)
            .with_parameter(ToolParameter::new("name", "A name", true).with_max_length(4));

        let call = ToolCall::new("test").with_arg("name", "toolong");
        let err = validator.validate(&call, &def).unwrap_err();
        assert!(err.message.contains("maximum length"));
    }

    #[test]
    fn test_validator_valid_call() {
        let validator = DefaultToolValidator;
        let call = ToolCall::new("test")
            .with_arg("path", "/p")
            .with_arg("limit", 10i64)
            .with_arg("mode", "slow");

        assert!(validator.validate(&call, &definition()).is_ok());
    }
}
