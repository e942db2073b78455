use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::app_paths::AppPaths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Endpoint the catalog query is POSTed to
    pub api_url: String,

    /// Sent as `Authorization: Bearer <auth_token>`
    pub auth_token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Override for where the last response is saved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_path: Option<PathBuf>,
}

impl Config {
    /// Load config from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            // Create default config if it doesn't exist
            let default_config = Self::default();
            default_config.save()?;
            return Ok(default_config);
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Invalid config {}", path.display()))?;

        tracing::debug!(target: "config", "Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        Ok(AppPaths::config_dir()?.join("config.toml"))
    }

    /// The configured response path, or the fixed default
    pub fn response_path(&self) -> Result<PathBuf> {
        match &self.storage.response_path {
            Some(path) => Ok(path.clone()),
            None => AppPaths::response_file(),
        }
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# Catalog Fetch Configuration File
# Location: ~/.config/catalog-fetch/config.toml (Linux)
#           ~/Library/Application Support/catalog-fetch/config.toml (macOS)
#           %APPDATA%\catalog-fetch\config.toml (Windows)

[api]
# Catalog service endpoint that receives the JSON query
api_url = ""

# Token sent as "Authorization: Bearer <auth_token>"
auth_token = ""

[storage]
# Where the last successful response is written (leave commented for the default
# <data dir>/catalog-fetch/response.json)
# response_path = "/path/to/response.json"
"#
        .to_string()
    }

    /// Initialize config with a setup wizard
    pub fn init_wizard() -> Result<Self> {
        println!("Catalog Fetch Configuration Setup");
        println!("=================================");

        let mut config = Config::default();
        let mut input = String::new();

        print!("Catalog API URL: ");
        std::io::Write::flush(&mut std::io::stdout())?;
        std::io::stdin().read_line(&mut input)?;
        config.api.api_url = input.trim().to_string();

        print!("Auth token: ");
        std::io::Write::flush(&mut std::io::stdout())?;
        input.clear();
        std::io::stdin().read_line(&mut input)?;
        config.api.auth_token = input.trim().to_string();

        config.save()?;

        println!("\nConfiguration saved to: {:?}", Config::get_config_path()?);
        println!("You can edit this file directly to customize further.");

        Ok(config)
    }
}
