//! Service configuration

use anyhow::{Context, Result};
use serde::Deserialize;
use sizer_lib::PerformanceProfile;

/// Service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SizerConfig {
    /// Name reported in structured logs
    #[serde(default = "default_instance_name")]
    pub instance_name: String,

    /// Port for the planning, health and metrics API
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// JSON performance profile; the built-in bare-metal profile when unset
    #[serde(default)]
    pub profile_path: Option<String>,
}

impl Default for SizerConfig {
    fn default() -> Self {
        Self {
            instance_name: default_instance_name(),
            api_port: default_api_port(),
            profile_path: None,
        }
    }
}

fn default_instance_name() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "sizer".to_string())
}

fn default_api_port() -> u16 {
    8080
}

impl SizerConfig {
    /// Load configuration from an optional `sizer` file and `SIZER_*` environment variables
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("sizer").required(false))
            .add_source(config::Environment::with_prefix("SIZER").try_parsing(true))
            .build()
            .context("Failed to read sizer configuration")?;

        config
            .try_deserialize()
            .context("Invalid sizer configuration")
    }

    /// Load the configured performance profile
    pub fn load_profile(&self) -> Result<PerformanceProfile> {
        match &self.profile_path {
            Some(path) => PerformanceProfile::from_json_file(path),
            None => Ok(PerformanceProfile::bare_metal()),
        }
    }

    /// Human-readable origin of the profile, for logs
    pub fn profile_source(&self) -> &str {
        self.profile_path.as_deref().unwrap_or("built-in")
    }
}
