//! Test doubles shared by the use-case tests.

use crate::config::PipelineConfig;
use crate::ports::agent_platform::{
    AgentPlatform, ConversationId, PlatformError, Turn, TurnEvent,
};
use crate::ports::tool_executor::{ToolDispatchError, ToolExecutorPort};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use warden_domain::{
    AgentHandle, Stage, StageSpec, ToolCallRequest, ToolDefinition, ToolOutcome, ToolSpec,
};

/// Stage specs built the same way the binary builds them.
pub(crate) fn stage_specs() -> Vec<StageSpec> {
    let tools = review_tool_spec();
    PipelineConfig::new("large", "code", "code", "large").stage_specs(&tools)
}

fn review_tool_spec() -> ToolSpec {
    ["fetch_pr_diff", "list_changed_files", "read_file", "check_style"]
        .into_iter()
        .fold(ToolSpec::new(), |spec, name| {
            spec.register(ToolDefinition::new(name, name))
        })
}

pub(crate) fn tool_call(call_id: &str, name: &str) -> TurnEvent {
    TurnEvent::ToolCall(ToolCallRequest::new(call_id, name))
}

pub(crate) fn message(text: &str) -> TurnEvent {
    TurnEvent::Message(text.to_string())
}

/// Hand-off to the deterministic agent id `ScriptedPlatform` assigns.
pub(crate) fn handoff(to: Stage) -> TurnEvent {
    TurnEvent::Handoff {
        to: format!("ag_{to}"),
    }
}

pub(crate) fn report_payload() -> String {
    let value = serde_json::json!({
        "summary": "Small, well-scoped change.",
        "comments": [],
        "overall_score": 95,
        "recommendation": "approve",
        "files_reviewed": 3,
        "total_issues": 0
    });
    serde_json::to_string_pretty(&value).expect("report payload serializes")
}

/// A platform double that replays scripted turns and records every
/// lifecycle call.
pub(crate) struct ScriptedPlatform {
    fail_create_at: Option<usize>,
    fail_links: bool,
    fail_delete_for: Option<String>,
    created: Mutex<usize>,
    links: Mutex<Vec<(String, String)>>,
    deleted: Mutex<Vec<String>>,
    started: Mutex<usize>,
    turns: Mutex<VecDeque<Result<Turn, PlatformError>>>,
    result_batches: Mutex<Vec<Vec<String>>>,
}

impl ScriptedPlatform {
    pub(crate) fn new(turns: Vec<Result<Turn, PlatformError>>) -> Self {
        Self {
            fail_create_at: None,
            fail_links: false,
            fail_delete_for: None,
            created: Mutex::new(0),
            links: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            started: Mutex::new(0),
            turns: Mutex::new(turns.into()),
            result_batches: Mutex::new(Vec::new()),
        }
    }

    /// Fail the Nth (0-based) create call.
    pub(crate) fn failing_create_at(mut self, index: usize) -> Self {
        self.fail_create_at = Some(index);
        self
    }

    pub(crate) fn failing_links(mut self) -> Self {
        self.fail_links = true;
        self
    }

    pub(crate) fn failing_delete_for(mut self, id: &str) -> Self {
        self.fail_delete_for = Some(id.to_string());
        self
    }

    pub(crate) fn created_count(&self) -> usize {
        *self.created.lock().unwrap()
    }

    pub(crate) fn links(&self) -> Vec<(String, String)> {
        self.links.lock().unwrap().clone()
    }

    pub(crate) fn deleted_ids(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub(crate) fn conversations_started(&self) -> usize {
        *self.started.lock().unwrap()
    }

    /// Correlation ids of each result batch, in arrival order.
    pub(crate) fn result_batches(&self) -> Vec<Vec<String>> {
        self.result_batches.lock().unwrap().clone()
    }

    fn next_turn(&self) -> Result<Turn, PlatformError> {
        self.turns
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PlatformError::Protocol("no scripted turn left".into())))
    }
}

#[async_trait]
impl AgentPlatform for ScriptedPlatform {
    async fn create_agent(&self, spec: &StageSpec) -> Result<AgentHandle, PlatformError> {
        let index = {
            let mut created = self.created.lock().unwrap();
            let index = *created;
            *created += 1;
            index
        };
        if self.fail_create_at == Some(index) {
            return Err(PlatformError::Rejected(format!(
                "creation refused for {}",
                spec.stage
            )));
        }
        Ok(AgentHandle::new(format!("ag_{}", spec.stage), spec.stage))
    }

    async fn link_handoff(
        &self,
        from: &AgentHandle,
        to: &AgentHandle,
    ) -> Result<(), PlatformError> {
        if self.fail_links {
            return Err(PlatformError::Unavailable("link refused".into()));
        }
        self.links
            .lock()
            .unwrap()
            .push((from.id.clone(), to.id.clone()));
        Ok(())
    }

    async fn delete_agent(&self, handle: &AgentHandle) -> Result<(), PlatformError> {
        self.deleted.lock().unwrap().push(handle.id.clone());
        if self.fail_delete_for.as_deref() == Some(handle.id.as_str()) {
            return Err(PlatformError::Unavailable("delete refused".into()));
        }
        Ok(())
    }

    async fn start_conversation(
        &self,
        _entry: &AgentHandle,
        _input: &str,
    ) -> Result<Turn, PlatformError> {
        *self.started.lock().unwrap() += 1;
        self.next_turn()
    }

    async fn continue_with_results(
        &self,
        _conversation: &ConversationId,
        results: Vec<ToolOutcome>,
    ) -> Result<Turn, PlatformError> {
        self.result_batches
            .lock()
            .unwrap()
            .push(results.iter().map(|r| r.call_id.clone()).collect());
        self.next_turn()
    }
}

/// A tool executor double that records dispatch order.
pub(crate) struct RecordingExecutor {
    spec: ToolSpec,
    dispatched: Mutex<Vec<String>>,
}

impl RecordingExecutor {
    pub(crate) fn with_review_tools() -> Self {
        Self {
            spec: review_tool_spec(),
            dispatched: Mutex::new(Vec::new()),
        }
    }

    /// Correlation ids in the order they were dispatched.
    pub(crate) fn dispatched_ids(&self) -> Vec<String> {
        self.dispatched.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolExecutorPort for RecordingExecutor {
    fn tool_spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn dispatch(&self, call: &ToolCallRequest) -> Result<ToolOutcome, ToolDispatchError> {
        if !self.spec.contains(&call.name) {
            return Err(ToolDispatchError::UnknownTool(call.name.clone()));
        }
        self.dispatched.lock().unwrap().push(call.call_id.clone());
        Ok(ToolOutcome::new(
            call.call_id.clone(),
            format!("result of {}", call.name),
        ))
    }
}
