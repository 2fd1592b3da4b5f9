//! Wire types for the agents/conversations REST API.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use warden_application::{PlatformError, Turn, TurnEvent};
use warden_domain::{StageSpec, ToolCallRequest, ToolDefinition, ToolOutcome};

// ── Requests ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct CreateAgentRequest<'a> {
    pub model: &'a str,
    pub name: &'a str,
    pub description: &'a str,
    pub instructions: &'a str,
    pub completion_args: CompletionArgs,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolSchema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

impl<'a> CreateAgentRequest<'a> {
    pub fn from_spec(spec: &'a StageSpec) -> Self {
        Self {
            model: &spec.model,
            name: &spec.name,
            description: &spec.description,
            instructions: &spec.instructions,
            completion_args: CompletionArgs {
                temperature: spec.temperature,
            },
            tools: spec.tools.iter().map(ToolSchema::from).collect(),
            response_format: spec.output_schema.clone().map(ResponseFormat::strict),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CompletionArgs {
    pub temperature: f32,
}

/// Function-calling tool declaration.
#[derive(Debug, Serialize)]
pub(crate) struct ToolSchema {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub function: FunctionSchema,
}

#[derive(Debug, Serialize)]
pub(crate) struct FunctionSchema {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl From<&ToolDefinition> for ToolSchema {
    fn from(tool: &ToolDefinition) -> Self {
        Self {
            kind: "function",
            function: FunctionSchema {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.parameters_schema(),
            },
        }
    }
}

/// Structured-output constraint for the terminal agent.
#[derive(Debug, Serialize)]
pub(crate) struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub json_schema: JsonSchemaSpec,
}

#[derive(Debug, Serialize)]
pub(crate) struct JsonSchemaSpec {
    pub name: &'static str,
    pub strict: bool,
    pub schema: Value,
}

impl ResponseFormat {
    pub fn strict(schema: Value) -> Self {
        Self {
            kind: "json_schema",
            json_schema: JsonSchemaSpec {
                name: "ReviewReport",
                strict: true,
                schema,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateHandoffsRequest<'a> {
    pub handoffs: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StartConversationRequest<'a> {
    pub agent_id: &'a str,
    pub inputs: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct AppendConversationRequest {
    pub inputs: Vec<FunctionResultEntry>,
}

#[derive(Debug, Serialize)]
pub(crate) struct FunctionResultEntry {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub tool_call_id: String,
    pub result: String,
}

impl From<ToolOutcome> for FunctionResultEntry {
    fn from(outcome: ToolOutcome) -> Self {
        Self {
            kind: "function.result",
            tool_call_id: outcome.call_id,
            result: outcome.content,
        }
    }
}

// ── Responses ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct AgentResponse {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConversationResponse {
    pub conversation_id: String,
    #[serde(default)]
    pub outputs: Vec<OutputEntry>,
    #[serde(default)]
    pub status: Option<String>,
}

/// One output entry, in server order. Entry kinds the orchestrator does
/// not consume (e.g. built-in tool execution traces) are tolerated and
/// skipped.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub(crate) enum OutputEntry {
    #[serde(rename = "message.output")]
    Message { content: MessageContent },
    #[serde(rename = "function.call")]
    FunctionCall {
        tool_call_id: String,
        name: String,
        arguments: Value,
    },
    #[serde(rename = "agent.handoff")]
    Handoff { next_agent_id: String },
    #[serde(other)]
    Other,
}

/// Message content arrives either as a plain string or as text chunks.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum MessageContent {
    Text(String),
    Chunks(Vec<ContentChunk>),
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentChunk {
    #[serde(default)]
    pub text: String,
}

impl MessageContent {
    pub fn into_text(self) -> String {
        match self {
            MessageContent::Text(text) => text,
            MessageContent::Chunks(chunks) => chunks
                .into_iter()
                .map(|c| c.text)
                .collect::<Vec<_>>()
                .join(""),
        }
    }
}

/// The status value the platform reports when its turn/step ceiling
/// cut a conversation short.
const STATUS_MAX_STEPS: &str = "max_steps_reached";

/// Map one conversation response onto an ordered [`Turn`].
pub(crate) fn into_turn(response: ConversationResponse) -> Result<Turn, PlatformError> {
    if response.status.as_deref() == Some(STATUS_MAX_STEPS) {
        return Err(PlatformError::StepLimitExceeded);
    }

    let mut events = Vec::with_capacity(response.outputs.len());
    for entry in response.outputs {
        match entry {
            OutputEntry::Message { content } => {
                let text = content.into_text();
                if !text.is_empty() {
                    events.push(TurnEvent::Message(text));
                }
            }
            OutputEntry::FunctionCall {
                tool_call_id,
                name,
                arguments,
            } => {
                let arguments = parse_arguments(arguments)?;
                let mut call = ToolCallRequest::new(tool_call_id, name);
                call.arguments = arguments;
                events.push(TurnEvent::ToolCall(call));
            }
            OutputEntry::Handoff { next_agent_id } => {
                events.push(TurnEvent::Handoff { to: next_agent_id });
            }
            OutputEntry::Other => {}
        }
    }
    Ok(Turn::new(response.conversation_id, events))
}

/// Tool arguments arrive as an object or as a JSON-encoded string.
fn parse_arguments(value: Value) -> Result<HashMap<String, Value>, PlatformError> {
    let value = match value {
        Value::String(raw) => serde_json::from_str(&raw)
            .map_err(|e| PlatformError::Protocol(format!("malformed tool arguments: {e}")))?,
        other => other,
    };
    match value {
        Value::Object(map) => Ok(map.into_iter().collect()),
        other => Err(PlatformError::Protocol(format!(
            "tool arguments are not an object: {other}"
        ))),
    }
}
