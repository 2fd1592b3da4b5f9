//! Configuration file loader with multi-source merging

use super::file_config::{ConfigError, WardenConfig};
use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use std::path::PathBuf;

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Explicit config path (if provided)
    /// 2. Project root: `./diffwarden.toml` or `./.diffwarden.toml`
    /// 3. XDG config: `~/.config/diffwarden/config.toml`
    /// 4. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<WardenConfig, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(WardenConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.extract().map_err(|e| ConfigError::Load(Box::new(e)))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> WardenConfig {
        WardenConfig::default()
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("diffwarden").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        for filename in &["diffwarden.toml", ".diffwarden.toml"] {
            let path = PathBuf::from(filename);
            if path.exists() {
                return Some(path);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_defaults_matches_default_config() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.platform.base_url, "https://api.mistral.ai");
        assert_eq!(config.models.planner, "mistral-large-latest");
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
[platform]
base_url = "https://llm.internal.example"

[models]
planner = "custom-model"
"#
        )
        .unwrap();

        let path = file.path().to_path_buf();
        let config = ConfigLoader::load(Some(&path)).unwrap();
        assert_eq!(config.platform.base_url, "https://llm.internal.example");
        assert_eq!(config.models.planner, "custom-model");
        // Untouched sections keep their defaults.
        assert_eq!(config.github.base_url, "https://api.github.com");
        assert_eq!(config.models.reporter, "mistral-large-latest");
    }
}
