//! Configuration for validation, reporting and model loading
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (twin.toml)
//! - Environment variables (TWIN__*)
//!
//! ## Example config file (twin.toml):
//! ```toml
//! [validation]
//! expected_context = "dtmi:htc:context;1"
//! check_emitted_events = true
//! suggest_names = true
//!
//! [report]
//! output_format = "pretty"
//! show_suggestions = true
//!
//! [loader]
//! skip_prefixes = ["target/", ".git/"]
//! extension = "json"
//! ```

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::CONTEXT;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TwinConfig {
    /// Validation settings
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Report settings
    #[serde(default)]
    pub report: ReportConfig,

    /// Loader settings
    #[serde(default)]
    pub loader: LoaderConfig,
}

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// The only `@context` value accepted on a model
    #[serde(default = "default_context")]
    pub expected_context: String,

    /// Resolve `emitEvent` names of transition and rule actions
    #[serde(default = "default_true")]
    pub check_emitted_events: bool,

    /// Attach "did you mean" suggestions to unresolved references
    #[serde(default = "default_true")]
    pub suggest_names: bool,
}

/// Report configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format (pretty or compact)
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Print suggestions next to unresolved references
    #[serde(default = "default_true")]
    pub show_suggestions: bool,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

/// Loader configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Skip files whose relative path starts with one of these prefixes
    #[serde(default = "default_skip_prefixes")]
    pub skip_prefixes: Vec<String>,

    /// File extension of model files
    #[serde(default = "default_extension")]
    pub extension: String,
}

// Default value functions
fn default_context() -> String {
    CONTEXT.to_string()
}

fn default_true() -> bool {
    true
}

fn default_skip_prefixes() -> Vec<String> {
    vec![
        "target/".to_string(),
        ".git/".to_string(),
        "node_modules/".to_string(),
    ]
}

fn default_extension() -> String {
    "json".to_string()
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            expected_context: default_context(),
            check_emitted_events: true,
            suggest_names: true,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Pretty,
            show_suggestions: true,
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            skip_prefixes: default_skip_prefixes(),
            extension: default_extension(),
        }
    }
}

impl TwinConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from default locations
        let config_locations = ["twin.toml", ".twin.toml", "config/twin.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "twin-schemas") {
            let xdg_config = config_dir.config_dir().join("twin.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        // Load from specified path
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (TWIN__*)
        builder = builder.add_source(
            Environment::with_prefix("TWIN")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TwinError;

    #[test]
    fn test_default_config() {
        let config = TwinConfig::default();
        assert_eq!(config.validation.expected_context, CONTEXT);
        assert!(config.validation.check_emitted_events);
        assert_eq!(config.report.output_format, OutputFormat::Pretty);
        assert_eq!(config.loader.extension, "json");
    }

    #[test]
    fn test_serialize_config() {
        let config = TwinConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[validation]"));
        assert!(toml_str.contains("[report]"));
        assert!(toml_str.contains("[loader]"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("twin.toml");
        let path_str = path.to_str().unwrap();

        let mut config = TwinConfig::default();
        config.validation.check_emitted_events = false;
        config.report.output_format = OutputFormat::Compact;
        config.save(path_str).unwrap();

        let loaded = TwinConfig::load_from(Some(path_str)).unwrap();
        assert!(!loaded.validation.check_emitted_events);
        assert_eq!(loaded.report.output_format, OutputFormat::Compact);
    }

    #[test]
    fn test_missing_explicit_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = TwinConfig::load_from(path.to_str()).unwrap_err();
        assert!(matches!(err, TwinError::Config(_)));
    }
}
