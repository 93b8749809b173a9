use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::provider::insight::DEFAULT_ENDPOINT;

/// NASA's shared, rate-limited key for unauthenticated use.
pub const DEMO_API_KEY: &str = "DEMO_KEY";

pub const DEFAULT_SPLASH_SECS: u64 = 3;

/// Upper bound on `splash_secs`.
pub const MAX_SPLASH_SECS: u64 = 60;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// endpoint = "https://api.nasa.gov/insight_weather/"
/// splash_secs = 3
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// api.nasa.gov key.
    pub api_key: Option<String>,

    /// Override for the InSight weather endpoint.
    pub endpoint: Option<String>,

    /// How long the splash screen stays up.
    pub splash_secs: Option<u64>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "mars-weather", "mars-weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Set or replace the API key. Blank input clears it.
    pub fn set_api_key(&mut self, api_key: &str) {
        let trimmed = api_key.trim();
        self.api_key = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }

    /// Set or clear the endpoint override.
    pub fn set_endpoint(&mut self, endpoint: &str) {
        let trimmed = endpoint.trim();
        self.endpoint = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }

    pub fn api_key_or_demo(&self) -> &str {
        self.api_key.as_deref().unwrap_or(DEMO_API_KEY)
    }

    pub fn endpoint_or_default(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    pub fn splash_duration(&self) -> Duration {
        let secs = self.splash_secs.unwrap_or(DEFAULT_SPLASH_SECS);
        Duration::from_secs(secs.min(MAX_SPLASH_SECS))
    }
}
