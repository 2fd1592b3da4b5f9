//! Pipeline domain module
//!
//! Defines the fixed four-stage review pipeline and the remote agent
//! chain that executes it.
//!
//! ```text
//! ┌─────────┐    ┌──────────┐    ┌──────────┐    ┌──────────┐
//! │ Planner │───▶│ Reviewer │───▶│ Verifier │───▶│ Reporter │
//! └─────────┘    └──────────┘    └──────────┘    └──────────┘
//!   entry          hand-off        hand-off        terminal
//! ```
//!
//! The hand-off graph is a simple path: each stage has at most one
//! successor, fixed at compile time by [`Stage::successor`]. There is no
//! dynamic dispatch table to corrupt: an out-of-order hand-off can only
//! be a protocol violation, never a reachable route.
//!
//! # Key Types
//!
//! - [`Stage`](stage::Stage) — position in the pipeline with its fixed successor
//! - [`StageSpec`](entities::StageSpec) — everything needed to provision one stage agent
//! - [`AgentHandle`](entities::AgentHandle) — opaque remote agent id, deleted exactly once at teardown
//! - [`Chain`](entities::Chain) — the ordered handle sequence with entry and terminal ends

pub mod entities;
pub mod stage;

pub use entities::{AgentHandle, Chain, ChainError, StageSpec};
pub use stage::Stage;
