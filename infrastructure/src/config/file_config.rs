//! Configuration schema with defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use warden_application::PipelineConfig;

/// Errors resolving configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "Platform API key is not set. Set platform.api_key in diffwarden.toml \
         or export MISTRAL_API_KEY."
    )]
    MissingPlatformKey,

    #[error(
        "GitHub token is not set. Set github.token in diffwarden.toml \
         or export GITHUB_TOKEN."
    )]
    MissingGithubToken,

    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
}

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WardenConfig {
    pub platform: PlatformSettings,
    pub github: GithubSettings,
    pub models: ModelSettings,
}

/// Agent-hosting platform settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformSettings {
    /// Base URL of the agents/conversations API.
    pub base_url: String,
    /// API key; falls back to the MISTRAL_API_KEY environment variable.
    pub api_key: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.mistral.ai".to_string(),
            api_key: None,
            request_timeout_secs: 60,
        }
    }
}

/// Code-host settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubSettings {
    /// Base URL of the GitHub REST API.
    pub base_url: String,
    /// Bearer token; falls back to the GITHUB_TOKEN environment variable.
    pub token: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for GithubSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.github.com".to_string(),
            token: None,
            request_timeout_secs: 30,
        }
    }
}

/// Model assignment per pipeline stage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub planner: String,
    pub reviewer: String,
    pub verifier: String,
    pub reporter: String,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            planner: "mistral-large-latest".to_string(),
            reviewer: "devstral-latest".to_string(),
            verifier: "devstral-latest".to_string(),
            reporter: "mistral-large-latest".to_string(),
        }
    }
}

impl WardenConfig {
    /// Resolve the platform credential, file first, then environment.
    pub fn platform_api_key(&self) -> Result<String, ConfigError> {
        if let Some(key) = &self.platform.api_key
            && !key.is_empty()
        {
            return Ok(key.clone());
        }
        std::env::var("MISTRAL_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingPlatformKey)
    }

    /// Resolve the code-host credential, file first, then environment.
    pub fn github_token(&self) -> Result<String, ConfigError> {
        if let Some(token) = &self.github.token
            && !token.is_empty()
        {
            return Ok(token.clone());
        }
        std::env::var("GITHUB_TOKEN")
            .ok()
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::MissingGithubToken)
    }

    /// The per-stage model assignment as the application layer sees it.
    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig::new(
            self.models.planner.clone(),
            self.models.reviewer.clone(),
            self.models.verifier.clone(),
            self.models.reporter.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_public_endpoints() {
        let config = WardenConfig::default();
        assert_eq!(config.platform.base_url, "https://api.mistral.ai");
        assert_eq!(config.github.base_url, "https://api.github.com");
        assert_eq!(config.platform.request_timeout_secs, 60);
        assert_eq!(config.github.request_timeout_secs, 30);
    }

    #[test]
    fn test_file_credential_wins_over_environment() {
        let mut config = WardenConfig::default();
        config.platform.api_key = Some("from-file".to_string());
        assert_eq!(config.platform_api_key().unwrap(), "from-file");
    }

    #[test]
    fn test_empty_file_credential_is_treated_as_unset() {
        let mut config = WardenConfig::default();
        config.github.token = Some(String::new());
        // Falls through to the environment; in a clean environment this
        // is the missing-credential configuration error.
        if std::env::var("GITHUB_TOKEN").is_err() {
            assert!(matches!(
                config.github_token(),
                Err(ConfigError::MissingGithubToken)
            ));
        }
    }

    #[test]
    fn test_pipeline_mapping_carries_models() {
        let config = WardenConfig::default();
        let pipeline = config.pipeline();
        assert_eq!(pipeline.planner_model, "mistral-large-latest");
        assert_eq!(pipeline.reviewer_model, "devstral-latest");
    }
}
