//! Configuration handling for the address directory client

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Default address directory
pub const DEFAULT_DIRECTORY_URL: &str = "https://viacep.com.br";

/// Environment variable overriding the directory address
pub const DIRECTORY_URL_ENV: &str = "CADASTRO_DIRECTORY_URL";

const DEFAULT_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_MAX_RETRIES: u32 = 2;

/// User configuration for the registration form
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct FormConfig {
    /// Base URL of the postal-code directory
    pub directory_url: Option<String>,
    /// Per-request timeout for directory lookups, in milliseconds
    pub timeout_ms: Option<u64>,
    /// Automatic retries after a failed lookup
    pub max_retries: Option<u32>,
}

impl FormConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("br", "cadastro", "cadastro")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: FormConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)?;
            fs::write(&path, content)?;
        }
        Ok(())
    }

    /// Directory address: environment, then file, then the public ViaCEP service
    pub fn directory_url(&self) -> String {
        std::env::var(DIRECTORY_URL_ENV)
            .ok()
            .filter(|url| !url.is_empty())
            .or_else(|| self.directory_url.clone())
            .unwrap_or_else(|| DEFAULT_DIRECTORY_URL.to_string())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS))
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES)
    }
}
