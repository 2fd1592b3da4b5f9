//! Code-host client module
//!
//! Read-only GitHub REST access for the review tools: the unified diff,
//! the changed-file listing, and file content at a ref. Payloads above
//! the fixed character ceilings are truncated with an explicit marker so
//! agent context windows stay bounded.

pub mod client;

pub use client::{GithubClient, GithubError, DIFF_CHAR_CEILING, FILE_CHAR_CEILING};
