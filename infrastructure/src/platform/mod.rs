//! Agent-hosting platform adapter
//!
//! Implements the application layer's [`AgentPlatform`] port against a
//! Mistral-style agents/conversations REST API:
//!
//! - `POST /v1/agents` — create a stage agent
//! - `PATCH /v1/agents/{id}` — declare its hand-off target
//! - `DELETE /v1/agents/{id}` — delete it at teardown
//! - `POST /v1/conversations` — open a conversation with the entry agent
//! - `POST /v1/conversations/{id}` — append tool results, collect the
//!   next turn
//!
//! The orchestrator never sees these shapes; [`protocol`] maps the wire
//! entries onto ordered [`TurnEvent`]s.
//!
//! [`AgentPlatform`]: warden_application::AgentPlatform
//! [`TurnEvent`]: warden_application::TurnEvent

pub mod client;
pub mod protocol;

pub use client::AgentsApiPlatform;
