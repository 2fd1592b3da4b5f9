//! Configuration module
//!
//! Figment-based loading of `diffwarden.toml` plus environment
//! credentials. Credential absence is caught here, before any network
//! call is attempted.

pub mod file_config;
pub mod loader;

pub use file_config::{ConfigError, GithubSettings, ModelSettings, PlatformSettings, WardenConfig};
pub use loader::ConfigLoader;
