//! Tool call requests and their serialized outcomes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A tool invocation issued by an agent mid-conversation.
///
/// The `call_id` is the correlation token: the matching [`ToolOutcome`]
/// must carry the same id so the platform can pair result with request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Correlation token assigned by the platform.
    pub call_id: String,
    /// Name of the tool to call.
    pub name: String,
    /// Named arguments.
    pub arguments: HashMap<String, serde_json::Value>,
}

impl ToolCallRequest {
    pub fn new(call_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            name: name.into(),
            arguments: HashMap::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    /// Get a required string argument or return an error message
    pub fn require_string(&self, key: &str) -> Result<&str, String> {
        self.get_string(key)
            .ok_or_else(|| format!("Missing required argument: {}", key))
    }

    /// Get an optional i64 argument (accepts numeric strings too, since models
    /// occasionally quote numbers)
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        match self.arguments.get(key) {
            Some(v) if v.is_i64() => v.as_i64(),
            Some(v) => v.as_str().and_then(|s| s.parse().ok()),
            None => None,
        }
    }

    /// Get a required i64 argument or return an error message
    pub fn require_i64(&self, key: &str) -> Result<i64, String> {
        self.get_i64(key)
            .ok_or_else(|| format!("Missing required argument: {}", key))
    }
}

/// The serialized result of a tool call, tagged with the request's
/// correlation token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutcome {
    /// Correlation token copied from the originating request.
    pub call_id: String,
    /// Serialized result returned to the conversation.
    pub content: String,
}

impl ToolOutcome {
    pub fn new(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            content: content.into(),
        }
    }

    /// Outcome describing a tool-body failure, so the agent can adapt
    /// instead of the run aborting.
    pub fn failure(call_id: impl Into<String>, message: impl std::fmt::Display) -> Self {
        let payload = serde_json::json!({ "error": message.to_string() });
        Self {
            call_id: call_id.into(),
            content: payload.to_string(),
        }
    }
}
