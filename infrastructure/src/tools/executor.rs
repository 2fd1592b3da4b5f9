//! The concrete tool executor behind [`ToolExecutorPort`].
//!
//! Dispatches agent-issued calls against the review tool registry. An
//! unmatched tool name escapes as [`ToolDispatchError::UnknownTool`],
//! a contract violation the run loop treats as fatal. Tool-body
//! failures (HTTP errors, bad arguments, unreadable files) become
//! failure-describing [`ToolOutcome`]s so the agent can adapt.

use crate::diff::LocalDiffSource;
use crate::github::GithubClient;
use crate::style::check_style;
use crate::tools::registry::{
    review_tool_spec, CHECK_STYLE, FETCH_PR_DIFF, LIST_CHANGED_FILES, READ_FILE,
};
use async_trait::async_trait;
use tracing::debug;
use warden_application::{ToolDispatchError, ToolExecutorPort};
use warden_domain::{ToolCallRequest, ToolOutcome, ToolSpec};

/// Where the change set under review comes from.
pub enum DiffSource {
    /// A pull request, fetched through the code-host API.
    CodeHost(GithubClient),
    /// A unified diff file on local disk.
    Local(LocalDiffSource),
}

/// Executor that serves the four review tools.
pub struct ReviewToolExecutor {
    spec: ToolSpec,
    source: DiffSource,
}

impl ReviewToolExecutor {
    pub fn new(source: DiffSource) -> Self {
        Self {
            spec: review_tool_spec(),
            source,
        }
    }

    async fn fetch_pr_diff(&self, call: &ToolCallRequest) -> ToolOutcome {
        match &self.source {
            DiffSource::CodeHost(client) => {
                let (owner, repo, number) = match pr_arguments(call) {
                    Ok(args) => args,
                    Err(message) => return ToolOutcome::failure(&call.call_id, message),
                };
                match client.fetch_pr_diff(owner, repo, number).await {
                    Ok(diff) => ToolOutcome::new(&call.call_id, diff),
                    Err(error) => ToolOutcome::failure(&call.call_id, error),
                }
            }
            DiffSource::Local(source) => match source.diff().await {
                Ok(diff) => ToolOutcome::new(&call.call_id, diff),
                Err(error) => ToolOutcome::failure(
                    &call.call_id,
                    format!("failed to read local diff: {error}"),
                ),
            },
        }
    }

    async fn list_changed_files(&self, call: &ToolCallRequest) -> ToolOutcome {
        match &self.source {
            DiffSource::CodeHost(client) => {
                let (owner, repo, number) = match pr_arguments(call) {
                    Ok(args) => args,
                    Err(message) => return ToolOutcome::failure(&call.call_id, message),
                };
                match client.list_changed_files(owner, repo, number).await {
                    Ok(listing) => ToolOutcome::new(&call.call_id, listing),
                    Err(error) => ToolOutcome::failure(&call.call_id, error),
                }
            }
            DiffSource::Local(source) => match source.changed_files().await {
                Ok(listing) => ToolOutcome::new(&call.call_id, listing),
                Err(error) => ToolOutcome::failure(
                    &call.call_id,
                    format!("failed to read local diff: {error}"),
                ),
            },
        }
    }

    async fn read_file(&self, call: &ToolCallRequest) -> ToolOutcome {
        match &self.source {
            DiffSource::CodeHost(client) => {
                let owner = match call.require_string("owner") {
                    Ok(value) => value,
                    Err(message) => return ToolOutcome::failure(&call.call_id, message),
                };
                let repo = match call.require_string("repo") {
                    Ok(value) => value,
                    Err(message) => return ToolOutcome::failure(&call.call_id, message),
                };
                let path = match call.require_string("path") {
                    Ok(value) => value,
                    Err(message) => return ToolOutcome::failure(&call.call_id, message),
                };
                let git_ref = call.get_string("ref").unwrap_or("HEAD");
                match client.read_file(owner, repo, path, git_ref).await {
                    Ok(content) => ToolOutcome::new(&call.call_id, content),
                    Err(error) => ToolOutcome::failure(&call.call_id, error),
                }
            }
            DiffSource::Local(_) => ToolOutcome::failure(
                &call.call_id,
                "read_file is not available when reviewing a local diff; \
                 rely on the diff context instead",
            ),
        }
    }

    fn run_style_check(&self, call: &ToolCallRequest) -> ToolOutcome {
        let code = match call.require_string("code") {
            Ok(value) => value,
            Err(message) => return ToolOutcome::failure(&call.call_id, message),
        };
        let language = call.get_string("language").unwrap_or("plain");
        ToolOutcome::new(&call.call_id, check_style(code, language))
    }
}

fn pr_arguments(call: &ToolCallRequest) -> Result<(&str, &str, u64), String> {
    let owner = call.require_string("owner")?;
    let repo = call.require_string("repo")?;
    let number = call.require_i64("pr_number")?;
    let number = u64::try_from(number)
        .map_err(|_| format!("pr_number must be positive, got {number}"))?;
    Ok((owner, repo, number))
}

#[async_trait]
impl ToolExecutorPort for ReviewToolExecutor {
    fn tool_spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn dispatch(&self, call: &ToolCallRequest) -> Result<ToolOutcome, ToolDispatchError> {
        debug!(tool = %call.name, call_id = %call.call_id, "dispatching review tool");
        match call.name.as_str() {
            FETCH_PR_DIFF => Ok(self.fetch_pr_diff(call).await),
            LIST_CHANGED_FILES => Ok(self.list_changed_files(call).await),
            READ_FILE => Ok(self.read_file(call).await),
            CHECK_STYLE => Ok(self.run_style_check(call)),
            other => Err(ToolDispatchError::UnknownTool(other.to_string())),
        }
    }
}
