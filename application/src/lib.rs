//! Application layer for diffwarden
//!
//! Use cases and ports. This crate owns the orchestration core (the
//! chain builder, the run-loop state machine, and teardown) expressed
//! against abstract ports. Concrete adapters (the agents API, the code
//! host, local tools) live in the infrastructure layer.

pub mod config;
pub mod ports;
pub mod use_cases;

pub use config::PipelineConfig;
pub use ports::{
    agent_platform::{AgentPlatform, ConversationId, PlatformError, Turn, TurnEvent},
    progress::{NoProgress, ProgressNotifier},
    tool_executor::{ToolDispatchError, ToolExecutorPort},
};
pub use use_cases::{
    build_chain::{BuildChainError, BuildChainUseCase},
    run_review::{RunReviewError, RunReviewInput, RunReviewUseCase},
    teardown::teardown_agents,
};
