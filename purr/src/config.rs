//! Configuration management for the purr bridge
//!
//! Configuration priority (highest to lowest):
//! 1. Command line arguments
//! 2. Config file specified via --config flag
//! 3. Environment variables (PURR_*)
//! 4. Local config file (./config.toml)
//! 5. Global config file ($XDG_CONFIG_HOME/purr/config.toml)
//!
//! XDG environment variables are checked first on all platforms.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    /// Default voice id
    pub voice: String,

    /// Default speech speed
    pub speed: f32,

    /// Path to a local ONNX model file (optional)
    pub model_path: Option<String>,

    /// Path to a local voices data file (optional)
    pub data_path: Option<String>,

    /// Enable diagnostic output on stderr
    pub verbose: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            voice: "expr-voice-2-f".to_string(),
            speed: 1.0,
            model_path: None,
            data_path: None,
            verbose: false,
        }
    }
}

/// Get the XDG config directory ($XDG_CONFIG_HOME or ~/.config)
pub fn xdg_config_home() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return PathBuf::from(xdg);
        }
    }
    dirs::home_dir()
        .map(|h| h.join(".config"))
        .unwrap_or_else(|| PathBuf::from(".config"))
}

impl AppConfig {
    /// Global config directory for purr
    pub fn global_config_dir() -> PathBuf {
        xdg_config_home().join("purr")
    }

    /// Global config file path
    pub fn global_config_path() -> PathBuf {
        Self::global_config_dir().join("config.toml")
    }

    /// Local config file path (current directory)
    pub fn local_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    /// Load configuration with the priority chain described at the top of
    /// this module. CLI arguments are merged afterwards by the caller.
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // Defaults (lowest priority)
        builder = builder.add_source(config::File::from_str(
            include_str!("default_config.toml"),
            config::FileFormat::Toml,
        ));

        // Global config file
        let global_path = Self::global_config_path();
        if global_path.exists() {
            builder = builder.add_source(File::from(global_path).required(false));
        }

        // Local config file (./config.toml)
        let local_path = Self::local_config_path();
        if local_path.exists() {
            builder = builder.add_source(File::from(local_path).required(false));
        }

        // Environment variables (PURR_*)
        builder = builder.add_source(
            Environment::with_prefix("PURR")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // Config file specified via --config flag (highest config source)
        if let Some(config_path) = config_file {
            let expanded = expand_path(config_path);
            builder = builder.add_source(File::with_name(&expanded).required(true));
        }

        let config = builder.build()?;
        config.try_deserialize()
    }
}

/// Expand shell-like paths (~ and environment variables)
pub fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = AppConfig::default();
        assert_eq!(config.voice, "expr-voice-2-f");
        assert_eq!(config.speed, 1.0);
        assert!(config.model_path.is_none());
        assert!(!config.verbose);
    }

    #[test]
    fn embedded_defaults_parse() {
        let config: AppConfig = Config::builder()
            .add_source(config::File::from_str(
                include_str!("default_config.toml"),
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.voice, AppConfig::default().voice);
        assert_eq!(config.speed, AppConfig::default().speed);
    }

    #[test]
    fn expands_home_prefix() {
        let expanded = expand_path("~/test");
        assert!(!expanded.starts_with('~'));
    }
}
