//! Tool definitions for the review pipeline.

use warden_domain::{ToolDefinition, ToolParameter, ToolSpec};

pub const FETCH_PR_DIFF: &str = "fetch_pr_diff";
pub const LIST_CHANGED_FILES: &str = "list_changed_files";
pub const READ_FILE: &str = "read_file";
pub const CHECK_STYLE: &str = "check_style";

/// Definition for `fetch_pr_diff`
pub fn fetch_pr_diff_definition() -> ToolDefinition {
    ToolDefinition::new(
        FETCH_PR_DIFF,
        "Fetch the unified diff for the pull request under review. \
         Returns the raw diff text including all file changes, hunks, and context lines.",
    )
    .with_parameter(ToolParameter::new(
        "owner",
        "Repository owner (user or organization)",
        true,
    ))
    .with_parameter(ToolParameter::new("repo", "Repository name", true))
    .with_parameter(
        ToolParameter::new("pr_number", "Pull request number", true).with_type("integer"),
    )
}

/// Definition for `list_changed_files`
pub fn list_changed_files_definition() -> ToolDefinition {
    ToolDefinition::new(
        LIST_CHANGED_FILES,
        "List all files changed in the pull request with per-file addition, \
         deletion, and change counts.",
    )
    .with_parameter(ToolParameter::new(
        "owner",
        "Repository owner (user or organization)",
        true,
    ))
    .with_parameter(ToolParameter::new("repo", "Repository name", true))
    .with_parameter(
        ToolParameter::new("pr_number", "Pull request number", true).with_type("integer"),
    )
}

/// Definition for `read_file`
pub fn read_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        READ_FILE,
        "Read the full content of a file from the repository at a git ref. \
         Use this for context beyond what the diff shows.",
    )
    .with_parameter(ToolParameter::new("owner", "Repository owner", true))
    .with_parameter(ToolParameter::new("repo", "Repository name", true))
    .with_parameter(ToolParameter::new(
        "path",
        "File path relative to repository root",
        true,
    ))
    .with_parameter(ToolParameter::new(
        "ref",
        "Git ref (branch, tag, or SHA) to read from. Defaults to the default branch.",
        false,
    ))
}

/// Definition for `check_style`
pub fn check_style_definition() -> ToolDefinition {
    ToolDefinition::new(
        CHECK_STYLE,
        "Run static style checks on a code snippet. Returns a structured list of \
         issues with line numbers. Python gets a syntax parse plus lint heuristics; \
         other languages get generic whitespace and line-length checks.",
    )
    .with_parameter(ToolParameter::new("code", "The code snippet to check", true))
    .with_parameter(ToolParameter::new(
        "language",
        "Programming language of the snippet (e.g. 'python', 'javascript')",
        false,
    ))
}

/// The full registry the pipeline runs with.
pub fn review_tool_spec() -> ToolSpec {
    ToolSpec::new()
        .register(fetch_pr_diff_definition())
        .register(list_changed_files_definition())
        .register(read_file_definition())
        .register(check_style_definition())
}
