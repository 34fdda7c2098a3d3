//! Content search tool: search_file_content

use crate::workspace::PathGuard;
use corral_application::config::ExecutionLimits;
use corral_domain::tool::{
    entities::{Capability, ToolCall, ToolDefinition, ToolParameter},
    value_objects::{SearchMatch, ToolError, ToolPayload, ToolResult, ToolResultMetadata},
};
use regex::Regex;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Tool name constant
pub const SEARCH_FILE_CONTENT: &str = "search_file_content";

/// Get the tool definition for search_file_content
pub fn search_file_content_definition() -> ToolDefinition {
    ToolDefinition::new(
        SEARCH_FILE_CONTENT,
        "Search file contents for a regular expression. Returns file, line number, and matched line for each hit.",
        Capability::Search,
    )
    .with_parameter(
        ToolParameter::new("pattern", "Regex pattern to search for", true).with_type("string"),
    )
    .with_parameter(
        ToolParameter::new(
            "include",
            "Glob restricting candidate files (e.g. '*.tsx' or 'src/**/*.rs'; bare file globs match at any depth)",
            false,
        )
        .with_type("string"),
    )
    .with_parameter(
        ToolParameter::new(
            "path",
            "Absolute directory to search in (default: workspace root)",
            false,
        )
        .with_type("path"),
    )
    .with_parameter(
        ToolParameter::new("case_insensitive", "Perform case-insensitive search", false)
            .with_type("boolean"),
    )
}

/// Validated, ready-to-run search_file_content invocation
#[derive(Debug, Clone)]
pub struct SearchInvocation {
    regex: Regex,
    include: String,
    base: PathBuf,
    guard: PathGuard,
}

impl SearchInvocation {
    pub fn build(call: &ToolCall, guard: &PathGuard) -> Result<Self, ToolError> {
        let pattern_str = call
            .require_string("pattern")
            .map_err(ToolError::validation)?;
        let case_insensitive = call.get_bool("case_insensitive").unwrap_or(false);

        let regex_pattern = if case_insensitive {
            format!("(?i){}", pattern_str)
        } else {
            pattern_str.to_string()
        };
        let regex = Regex::new(&regex_pattern)
            .map_err(|e| ToolError::validation(format!("Invalid regex pattern: {}", e)))?;

        let include = call.get_string("include").unwrap_or("**/*");
        glob::Pattern::new(include)
            .map_err(|e| ToolError::validation(format!("Invalid include glob: {}", e)))?;
        // A bare file glob matches at any depth
        let include = if include.contains('/') {
            include.to_string()
        } else {
            format!("**/{}", include)
        };

        let base = match call.get_string("path") {
            Some(path_str) => {
                let base = guard.resolve(path_str)?;
                if !base.is_dir() {
                    return Err(ToolError::validation(format!(
                        "'{}' is not a directory",
                        path_str
                    )));
                }
                base
            }
            None => guard.root().to_path_buf(),
        };

        Ok(Self {
            regex,
            include,
            base,
            guard: guard.clone(),
        })
    }

    pub async fn run(self, token: &CancellationToken, limits: &ExecutionLimits) -> ToolResult {
        if token.is_cancelled() {
            return ToolResult::failure(SEARCH_FILE_CONTENT, ToolError::cancelled());
        }

        let full_pattern = format!("{}/{}", self.base.display(), self.include);
        let paths = match glob::glob(&full_pattern) {
            Ok(paths) => paths,
            Err(e) => {
                return ToolResult::failure(
                    SEARCH_FILE_CONTENT,
                    ToolError::validation(format!("Invalid include glob: {}", e)),
                );
            }
        };

        let mut matches: Vec<SearchMatch> = Vec::new();
        let mut truncated = false;

        'files: for candidate in paths.flatten() {
            if token.is_cancelled() {
                return ToolResult::failure(SEARCH_FILE_CONTENT, ToolError::cancelled());
            }
            if !candidate.is_file() {
                continue;
            }

            // Re-check every candidate: a crafted glob must not traverse
            // outside the boundary.
            let resolved = match self.guard.resolve(&candidate.display().to_string()) {
                Ok(resolved) => resolved,
                Err(_) => {
                    trace!(candidate = %candidate.display(), "Skipping candidate outside boundary");
                    continue;
                }
            };

            if let Ok(meta) = tokio::fs::metadata(&resolved).await
                && meta.len() > limits.max_search_file_bytes
            {
                continue;
            }

            // Unreadable or non-text files are skipped, not errors
            let Ok(content) = tokio::fs::read_to_string(&resolved).await else {
                continue;
            };

            let display = resolved.display().to_string();
            for (index, line) in content.lines().enumerate() {
                if self.regex.is_match(line) {
                    if matches.len() >= limits.max_matches {
                        truncated = true;
                        break 'files;
                    }
                    matches.push(SearchMatch {
                        path: display.clone(),
                        line: (index + 1) as u64,
                        text: line.to_string(),
                    });
                }
            }
        }

        let match_count = matches.len();
        ToolResult::success(
            SEARCH_FILE_CONTENT,
            ToolPayload::Matches { matches, truncated },
        )
        .with_metadata(ToolResultMetadata {
            match_count: Some(match_count),
            path: Some(self.base.display().to_string()),
            ..Default::default()
        })
    }

    pub fn base(&self) -> &Path {
        &self.base
    }
}
