//! Tool executor port
//!
//! Defines how the run loop dispatches agent-issued tool calls. The
//! concrete executor (code-host fetchers, style checker) lives in the
//! infrastructure layer.

use async_trait::async_trait;
use thiserror::Error;
use warden_domain::{ToolCallRequest, ToolOutcome, ToolSpec};

/// Errors that escape the dispatch boundary.
///
/// Tool-body failures do NOT appear here; they are converted into a
/// failure-describing [`ToolOutcome`] so the agent can adapt. Only an
/// unmatched tool name (an orchestrator/platform contract mismatch) and
/// configuration errors abort the run.
#[derive(Error, Debug)]
pub enum ToolDispatchError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Executes tool calls against the registry
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// The registry of tools this executor can dispatch.
    fn tool_spec(&self) -> &ToolSpec;

    /// Invoke the named tool synchronously with the declared arguments.
    /// The returned outcome carries the request's correlation id.
    async fn dispatch(&self, call: &ToolCallRequest) -> Result<ToolOutcome, ToolDispatchError>;
}
