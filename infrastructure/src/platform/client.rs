//! reqwest adapter implementing the [`AgentPlatform`] port.

use crate::platform::protocol::{
    into_turn, AgentResponse, AppendConversationRequest, ConversationResponse,
    CreateAgentRequest, FunctionResultEntry, StartConversationRequest, UpdateHandoffsRequest,
};
use crate::retry::{with_backoff, Retryable};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use warden_application::{AgentPlatform, ConversationId, PlatformError, Turn};
use warden_domain::core::string::truncate;
use warden_domain::{AgentHandle, StageSpec, ToolOutcome};

impl Retryable for PlatformError {
    fn is_retryable(&self) -> bool {
        matches!(
            self,
            PlatformError::Timeout(_) | PlatformError::Unavailable(_)
        )
    }
}

/// Client for a Mistral-style agents/conversations REST API.
///
/// Management calls (hand-off wiring, deletion) are idempotent and get
/// bounded retries; conversation round-trips are never retried here:
/// a replayed POST could double-execute a turn.
pub struct AgentsApiPlatform {
    http: reqwest::Client,
    base_url: String,
}

impl AgentsApiPlatform {
    pub fn new(
        api_key: &str,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PlatformError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| PlatformError::Auth("API key contains invalid characters".into()))?;
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| PlatformError::Rejected(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    async fn send<B, R>(&self, method: Method, url: &str, body: Option<&B>) -> Result<R, PlatformError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                PlatformError::Timeout(url.to_string())
            } else {
                PlatformError::Unavailable(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Self::classify_status(status, url, &detail));
        }
        response
            .json()
            .await
            .map_err(|e| PlatformError::Protocol(format!("malformed response from {url}: {e}")))
    }

    /// DELETE that tolerates an empty body.
    async fn send_delete(&self, url: &str) -> Result<(), PlatformError> {
        let response = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PlatformError::Timeout(url.to_string())
                } else {
                    PlatformError::Unavailable(e.to_string())
                }
            })?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let detail = response.text().await.unwrap_or_default();
        Err(Self::classify_status(status, url, &detail))
    }

    fn classify_status(status: StatusCode, url: &str, detail: &str) -> PlatformError {
        let detail = format!("{} {}: {}", status.as_u16(), url, truncate(detail, 200));
        match status.as_u16() {
            401 | 403 => PlatformError::Auth(detail),
            408 => PlatformError::Timeout(detail),
            429 | 500..=599 => PlatformError::Unavailable(detail),
            _ => PlatformError::Rejected(detail),
        }
    }
}

#[async_trait]
impl AgentPlatform for AgentsApiPlatform {
    async fn create_agent(&self, spec: &StageSpec) -> Result<AgentHandle, PlatformError> {
        let url = format!("{}/v1/agents", self.base_url);
        let body = CreateAgentRequest::from_spec(spec);
        let response: AgentResponse = self.send(Method::POST, &url, Some(&body)).await?;
        debug!(stage = %spec.stage, id = %response.id, "agent created");
        Ok(AgentHandle::new(response.id, spec.stage))
    }

    async fn link_handoff(
        &self,
        from: &AgentHandle,
        to: &AgentHandle,
    ) -> Result<(), PlatformError> {
        let url = format!("{}/v1/agents/{}", self.base_url, from.id);
        let body = UpdateHandoffsRequest {
            handoffs: vec![to.id.as_str()],
        };
        let _: AgentResponse = with_backoff("link_handoff", || {
            self.send(Method::PATCH, &url, Some(&body))
        })
        .await?;
        debug!(%from, %to, "hand-off wired");
        Ok(())
    }

    async fn delete_agent(&self, handle: &AgentHandle) -> Result<(), PlatformError> {
        let url = format!("{}/v1/agents/{}", self.base_url, handle.id);
        with_backoff("delete_agent", || self.send_delete(&url)).await
    }

    async fn start_conversation(
        &self,
        entry: &AgentHandle,
        input: &str,
    ) -> Result<Turn, PlatformError> {
        let url = format!("{}/v1/conversations", self.base_url);
        let body = StartConversationRequest {
            agent_id: &entry.id,
            inputs: input,
        };
        let response: ConversationResponse = self.send(Method::POST, &url, Some(&body)).await?;
        into_turn(response)
    }

    async fn continue_with_results(
        &self,
        conversation: &ConversationId,
        results: Vec<ToolOutcome>,
    ) -> Result<Turn, PlatformError> {
        let url = format!("{}/v1/conversations/{}", self.base_url, conversation.0);
        let body = AppendConversationRequest {
            inputs: results.into_iter().map(FunctionResultEntry::from).collect(),
        };
        let response: ConversationResponse = self.send(Method::POST, &url, Some(&body)).await?;
        into_turn(response)
    }
}
