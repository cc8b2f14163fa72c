//! Configuration management for the CLI

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sizer_lib::PerformanceProfile;
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

const DEFAULT_API_URL: &str = "http://localhost:8080";

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Sizing service URL used by `--remote`
    pub api_url: Option<String>,
    /// Performance profile JSON used for local planning
    pub profile_path: Option<String>,
    /// Default output format
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from `~/.config/ssz/config.json`, if present
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Get the configuration file path
    fn config_path() -> Option<PathBuf> {
        dirs_next::home_dir().map(|home| home.join(".config").join("ssz").join("config.json"))
    }
}

/// Effective settings after merging flags, environment and the config file
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_url: String,
    pub profile_path: Option<String>,
    pub format: OutputFormat,
}

impl Settings {
    /// Merge command-line values over the config file; flags and env vars win
    pub fn resolve(
        api_url: Option<String>,
        profile_path: Option<String>,
        format: Option<OutputFormat>,
        file: Config,
    ) -> Result<Self> {
        let format = match (format, file.default_format.as_deref()) {
            (Some(format), _) => format,
            (None, Some(name)) => name.parse().context("Invalid default_format in config file")?,
            (None, None) => OutputFormat::default(),
        };

        Ok(Self {
            api_url: api_url
                .or(file.api_url)
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            profile_path: profile_path.or(file.profile_path),
            format,
        })
    }

    /// Load the profile used for local planning
    pub fn load_profile(&self) -> Result<PerformanceProfile> {
        match &self.profile_path {
            Some(path) => PerformanceProfile::from_json_file(path),
            None => Ok(PerformanceProfile::bare_metal()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "api_url": "http://sizer:8080", "default_format": "json" }}"#).unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.api_url.as_deref(), Some("http://sizer:8080"));
        assert_eq!(config.default_format.as_deref(), Some("json"));
        assert!(config.profile_path.is_none());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(Config::load_from(file.path()).is_err());
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::resolve(None, None, None, Config::default()).unwrap();
        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert_eq!(settings.format, OutputFormat::Table);
        assert_eq!(settings.load_profile().unwrap().name, "bare-metal");
    }

    #[test]
    fn test_flags_override_config_file() {
        let file = Config {
            api_url: Some("http://from-file:8080".to_string()),
            profile_path: Some("/etc/ssz/profile.json".to_string()),
            default_format: Some("json".to_string()),
        };

        let settings = Settings::resolve(
            Some("http://from-flag:9090".to_string()),
            None,
            Some(OutputFormat::Table),
            file,
        )
        .unwrap();

        assert_eq!(settings.api_url, "http://from-flag:9090");
        assert_eq!(settings.profile_path.as_deref(), Some("/etc/ssz/profile.json"));
        assert_eq!(settings.format, OutputFormat::Table);
    }

    #[test]
    fn test_bad_default_format_is_an_error() {
        let file = Config {
            default_format: Some("yaml".to_string()),
            ..Config::default()
        };
        assert!(Settings::resolve(None, None, None, file).is_err());
    }
}
