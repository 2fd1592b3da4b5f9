//! Tool domain module
//!
//! Core abstractions for mid-conversation tool calls: how review agents
//! fetch diffs, file listings, file contents, and style-check results.
//!
//! ```text
//! ┌──────────────┐    ┌─────────────────┐    ┌──────────────┐
//! │ ToolSpec     │───▶│ ToolCallRequest │───▶│ ToolOutcome  │
//! │ (registry)   │    │ (agent-issued)  │    │ (serialized) │
//! └──────────────┘    └─────────────────┘    └──────────────┘
//! ```
//!
//! Every tool is declared by a [`ToolDefinition`] (name + parameter
//! schema). Agents issue [`ToolCallRequest`]s carrying a correlation id;
//! the orchestrator dispatches them against the registry and feeds the
//! matching [`ToolOutcome`] back into the conversation under the same
//! correlation id. A request naming a tool absent from the registry is a
//! protocol violation, not a recoverable miss.

pub mod entities;
pub mod value_objects;

pub use entities::{ToolDefinition, ToolParameter, ToolSpec};
pub use value_objects::{ToolCallRequest, ToolOutcome};
