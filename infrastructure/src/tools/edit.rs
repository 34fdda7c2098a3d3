//! Exact-substring edit tool: replace

use crate::tools::file::write_atomic;
use crate::workspace::PathGuard;
use corral_domain::tool::{
    entities::{Capability, ToolCall, ToolDefinition, ToolParameter},
    value_objects::{ToolError, ToolPayload, ToolResult, ToolResultMetadata},
};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

/// Tool name constant
pub const REPLACE: &str = "replace";

/// Get the tool definition for replace
pub fn replace_definition() -> ToolDefinition {
    ToolDefinition::new(
        REPLACE,
        "Replace an exact substring in a file. Fails unless old_string occurs exactly once, or replace_all is set.",
        Capability::Write,
    )
    .with_parameter(
        ToolParameter::new("path", "Absolute path to the file to edit", true).with_type("path"),
    )
    .with_parameter(
        ToolParameter::new("old_string", "Exact text to replace", true).with_type("string"),
    )
    .with_parameter(
        ToolParameter::new("new_string", "Replacement text", true).with_type("string"),
    )
    .with_parameter(
        ToolParameter::new(
            "replace_all",
            "Replace every occurrence instead of requiring a unique match",
            false,
        )
        .with_type("boolean"),
    )
}

/// Validated, ready-to-run replace invocation
#[derive(Debug, Clone)]
pub struct ReplaceInvocation {
    path: PathBuf,
    old_string: String,
    new_string: String,
    replace_all: bool,
}

impl ReplaceInvocation {
    pub fn build(call: &ToolCall, guard: &PathGuard) -> Result<Self, ToolError> {
        let path_str = call.require_string("path").map_err(ToolError::validation)?;
        let old_string = call
            .require_string("old_string")
            .map_err(ToolError::validation)?;
        let new_string = call
            .require_string("new_string")
            .map_err(ToolError::validation)?;

        if old_string.is_empty() {
            return Err(ToolError::validation("old_string must not be empty"));
        }
        if old_string == new_string {
            return Err(ToolError::validation(
                "old_string and new_string are identical",
            ));
        }

        let path = guard.resolve(path_str)?;
        if !path.exists() {
            return Err(ToolError::not_found(path_str));
        }
        if !path.is_file() {
            return Err(ToolError::validation(format!(
                "'{}' is not a file",
                path_str
            )));
        }

        Ok(Self {
            path,
            old_string: old_string.to_string(),
            new_string: new_string.to_string(),
            replace_all: call.get_bool("replace_all").unwrap_or(false),
        })
    }

    pub async fn run(self, token: &CancellationToken) -> ToolResult {
        if token.is_cancelled() {
            return ToolResult::failure(REPLACE, ToolError::cancelled());
        }

        let display = self.path.display().to_string();
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                return ToolResult::failure(
                    REPLACE,
                    ToolError::validation(format!("'{}' is not valid UTF-8 text", display)),
                );
            }
            Err(e) => return ToolResult::failure(REPLACE, ToolError::from_io(&e, &display)),
        };

        let occurrences = content.matches(&self.old_string).count();
        if occurrences == 0 {
            return ToolResult::failure(
                REPLACE,
                ToolError::pattern_not_found(format!("old_string not found in {}", display)),
            );
        }
        if occurrences > 1 && !self.replace_all {
            return ToolResult::failure(
                REPLACE,
                ToolError::pattern_not_found(format!(
                    "old_string occurs {} times in {}; pass replace_all to replace every occurrence",
                    occurrences, display
                )),
            );
        }

        let (new_content, replacements) = if self.replace_all {
            (
                content.replace(&self.old_string, &self.new_string),
                occurrences,
            )
        } else {
            (
                content.replacen(&self.old_string, &self.new_string, 1),
                1,
            )
        };

        let bytes = match write_atomic(&self.path, new_content.as_bytes(), token).await {
            Ok(n) => n,
            Err(e) => return ToolResult::failure(REPLACE, e),
        };

        ToolResult::success(
            REPLACE,
            ToolPayload::Replaced {
                path: display.clone(),
                replacements,
            },
        )
        .with_metadata(ToolResultMetadata {
            bytes: Some(bytes),
            path: Some(display),
            ..Default::default()
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
