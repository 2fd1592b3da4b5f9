//! Pipeline entities: stage specifications, agent handles, and the chain.

use super::stage::Stage;
use crate::tool::entities::ToolDefinition;
use thiserror::Error;

/// Everything needed to provision one stage agent on the hosting platform.
///
/// Specs are immutable once built. The Reporter carries a strict output
/// schema so its raw output is guaranteed parseable; the other stages
/// carry a tool set only.
#[derive(Debug, Clone)]
pub struct StageSpec {
    /// Which pipeline position this spec provisions.
    pub stage: Stage,
    /// Agent name as shown on the platform (e.g. "diffwarden-planner").
    pub name: String,
    /// Short human-readable description of the agent's job.
    pub description: String,
    /// Model identifier to run the stage on.
    pub model: String,
    /// Full instruction text (system prompt).
    pub instructions: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Tools bound to this stage.
    pub tools: Vec<ToolDefinition>,
    /// Strict JSON output schema, set only on the terminal stage.
    pub output_schema: Option<serde_json::Value>,
}

impl StageSpec {
    pub fn new(stage: Stage, model: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            stage,
            name: format!("diffwarden-{stage}"),
            description: String::new(),
            model: model.into(),
            instructions: instructions.into(),
            temperature: 0.2,
            tools: Vec::new(),
            output_schema: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_output_schema(mut self, schema: serde_json::Value) -> Self {
        self.output_schema = Some(schema);
        self
    }
}

/// Opaque identifier of a provisioned remote agent.
///
/// Handles are created by the hosting platform, owned by the [`Chain`],
/// and must be deleted exactly once at teardown, on every exit path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentHandle {
    /// Platform-assigned agent id.
    pub id: String,
    /// The stage this agent implements.
    pub stage: Stage,
}

impl AgentHandle {
    pub fn new(id: impl Into<String>, stage: Stage) -> Self {
        Self {
            id: id.into(),
            stage,
        }
    }

    /// Short id prefix for display (platform ids are long).
    pub fn short_id(&self) -> &str {
        let end = self.id.len().min(8);
        self.id.get(..end).unwrap_or(&self.id)
    }
}

impl std::fmt::Display for AgentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.stage, self.short_id())
    }
}

/// Errors constructing a [`Chain`].
#[derive(Error, Debug)]
pub enum ChainError {
    #[error("chain has {got} handles, expected {expected}")]
    WrongLength { got: usize, expected: usize },

    #[error("handle at position {position} is for {got}, expected {expected}")]
    OutOfOrder {
        position: usize,
        got: Stage,
        expected: Stage,
    },
}

/// The ordered sequence of agent handles, entry to terminal.
///
/// Construction validates that the handles cover every stage in pipeline
/// order, so a well-formed `Chain` always has Planner at the entry and
/// Reporter at the terminal end.
#[derive(Debug, Clone)]
pub struct Chain {
    handles: Vec<AgentHandle>,
}

impl Chain {
    /// Build a chain from handles in pipeline order.
    pub fn new(handles: Vec<AgentHandle>) -> Result<Self, ChainError> {
        let expected = Stage::all();
        if handles.len() != expected.len() {
            return Err(ChainError::WrongLength {
                got: handles.len(),
                expected: expected.len(),
            });
        }
        for (position, (handle, stage)) in handles.iter().zip(expected).enumerate() {
            if handle.stage != stage {
                return Err(ChainError::OutOfOrder {
                    position,
                    got: handle.stage,
                    expected: stage,
                });
            }
        }
        Ok(Self { handles })
    }

    /// The entry handle; receives the user's review request.
    pub fn entry(&self) -> &AgentHandle {
        &self.handles[0]
    }

    /// The terminal handle; produces the structured report.
    pub fn terminal(&self) -> &AgentHandle {
        &self.handles[self.handles.len() - 1]
    }

    /// Handle for a specific stage.
    pub fn handle(&self, stage: Stage) -> &AgentHandle {
        // Chain::new guarantees pipeline order, so index by position.
        let index = Stage::all().iter().position(|s| *s == stage).unwrap_or(0);
        &self.handles[index]
    }

    /// All handles, entry to terminal.
    pub fn handles(&self) -> &[AgentHandle] {
        &self.handles
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_handles() -> Vec<AgentHandle> {
        Stage::all()
            .into_iter()
            .map(|stage| AgentHandle::new(format!("ag_{stage}"), stage))
            .collect()
    }

    #[test]
    fn test_chain_new_accepts_pipeline_order() {
        let chain = Chain::new(full_handles()).unwrap();
        assert_eq!(chain.entry().stage, Stage::Planner);
        assert_eq!(chain.terminal().stage, Stage::Reporter);
        assert_eq!(chain.len(), 4);
    }

    #[test]
    fn test_chain_new_rejects_wrong_length() {
        let mut handles = full_handles();
        handles.pop();
        assert!(matches!(
            Chain::new(handles),
            Err(ChainError::WrongLength { got: 3, .. })
        ));
    }

    #[test]
    fn test_chain_new_rejects_out_of_order() {
        let mut handles = full_handles();
        handles.swap(1, 2);
        assert!(matches!(
            Chain::new(handles),
            Err(ChainError::OutOfOrder { position: 1, .. })
        ));
    }

    #[test]
    fn test_handle_lookup_by_stage() {
        let chain = Chain::new(full_handles()).unwrap();
        assert_eq!(chain.handle(Stage::Verifier).id, "ag_verifier");
    }

    #[test]
    fn test_stage_spec_builder() {
        let spec = StageSpec::new(Stage::Planner, "large-latest", "Plan the review.")
            .with_description("Builds the review plan")
            .with_temperature(0.3);
        assert_eq!(spec.name, "diffwarden-planner");
        assert_eq!(spec.temperature, 0.3);
        assert!(spec.output_schema.is_none());
        assert!(spec.tools.is_empty());
    }

    #[test]
    fn test_agent_handle_display() {
        let handle = AgentHandle::new("ag_0123456789abcdef", Stage::Planner);
        assert_eq!(handle.to_string(), "planner(ag_01234)");
        // Short ids are not padded
        let short = AgentHandle::new("ag1", Stage::Reporter);
        assert_eq!(short.short_id(), "ag1");
    }
}
