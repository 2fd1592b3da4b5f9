//! Infrastructure layer for diffwarden
//!
//! Concrete adapters behind the application layer's ports:
//!
//! - [`platform`] — reqwest client for the agent-hosting platform's
//!   agents/conversations REST API
//! - [`github`] — read-only code-host client (diff, changed files, file
//!   content at a ref)
//! - [`diff`] — local unified-diff source for offline review targets
//! - [`style`] — the style-check tool (tree-sitter parse + heuristics)
//! - [`tools`] — the tool registry and the executor adapter
//! - [`config`] — figment-based configuration loading

pub mod config;
pub mod diff;
pub mod github;
pub mod platform;
mod retry;
pub mod style;
pub mod tools;

pub use config::{ConfigError, ConfigLoader, WardenConfig};
pub use diff::LocalDiffSource;
pub use github::GithubClient;
pub use platform::AgentsApiPlatform;
pub use style::check_style;
pub use tools::{review_tool_spec, DiffSource, ReviewToolExecutor};
