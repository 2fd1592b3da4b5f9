//! Agent platform port
//!
//! Defines the interface to the agent-hosting platform: agent lifecycle
//! management and the conversation round-trip. The orchestrator depends
//! only on this contract, not on any vendor's surface.

use async_trait::async_trait;
use thiserror::Error;
use warden_domain::{AgentHandle, StageSpec, ToolCallRequest, ToolOutcome};

/// Errors from the hosting platform
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Platform rejected the request: {0}")]
    Rejected(String),

    #[error("Platform request timed out: {0}")]
    Timeout(String),

    #[error("Platform unavailable: {0}")]
    Unavailable(String),

    #[error("Conversation step limit exceeded")]
    StepLimitExceeded,

    #[error("Unexpected platform response: {0}")]
    Protocol(String),
}

impl PlatformError {
    /// Whether a bounded retry at the call site is worthwhile.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PlatformError::Timeout(_) | PlatformError::Unavailable(_)
        )
    }
}

/// Identifies one server-side conversation across round-trips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationId(pub String);

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One event produced by the platform within a turn, in server order.
#[derive(Debug, Clone)]
pub enum TurnEvent {
    /// Plain model output text.
    Message(String),
    /// The agent wants a tool invoked.
    ToolCall(ToolCallRequest),
    /// The conversation was handed to another agent; carries the target
    /// agent id as reported by the platform.
    Handoff { to: String },
}

/// What one platform round-trip produced.
#[derive(Debug, Clone)]
pub struct Turn {
    pub conversation: ConversationId,
    /// Events in the exact order the platform emitted them.
    pub events: Vec<TurnEvent>,
}

impl Turn {
    pub fn new(conversation: impl Into<String>, events: Vec<TurnEvent>) -> Self {
        Self {
            conversation: ConversationId(conversation.into()),
            events,
        }
    }
}

/// Gateway to the agent-hosting platform
///
/// Covers the two surfaces the orchestrator needs: agent management
/// (create / link hand-off / delete) and the conversation round-trip.
#[async_trait]
pub trait AgentPlatform: Send + Sync {
    /// Provision one stage agent. The returned handle must eventually be
    /// passed to [`delete_agent`](Self::delete_agent) exactly once.
    async fn create_agent(&self, spec: &StageSpec) -> Result<AgentHandle, PlatformError>;

    /// Declare `to` as the hand-off target of `from`.
    async fn link_handoff(
        &self,
        from: &AgentHandle,
        to: &AgentHandle,
    ) -> Result<(), PlatformError>;

    /// Delete a provisioned agent.
    async fn delete_agent(&self, handle: &AgentHandle) -> Result<(), PlatformError>;

    /// Open a conversation with the entry agent and submit the review
    /// request.
    async fn start_conversation(
        &self,
        entry: &AgentHandle,
        input: &str,
    ) -> Result<Turn, PlatformError>;

    /// Feed tool results back into a conversation, in request order, and
    /// collect the next turn.
    async fn continue_with_results(
        &self,
        conversation: &ConversationId,
        results: Vec<ToolOutcome>,
    ) -> Result<Turn, PlatformError>;
}
