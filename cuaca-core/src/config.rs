use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// OpenWeatherMap API key.
    pub api_key: Option<String>,

    /// Base URL for the geocoding endpoints.
    #[serde(default = "default_geo_base_url")]
    pub geo_base_url: String,

    /// Base URL for the One Call endpoint.
    #[serde(default = "default_data_base_url")]
    pub data_base_url: String,

    /// Display language passed to the provider.
    #[serde(default = "default_lang")]
    pub lang: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            geo_base_url: default_geo_base_url(),
            data_base_url: default_data_base_url(),
            lang: default_lang(),
        }
    }
}

fn default_geo_base_url() -> String {
    "https://api.openweathermap.org/geo/1.0".to_string()
}

fn default_data_base_url() -> String {
    "https://api.openweathermap.org/data/3.0".to_string()
}

fn default_lang() -> String {
    "id".to_string()
}

impl Config {
    /// Load config from disk (defaults when no file exists yet), then apply
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;

        let mut cfg = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;

            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        cfg.apply_env();
        Ok(cfg)
    }

    /// `OPENWEATHER_API_KEY`, `CUACA_GEO_BASE_URL` and `CUACA_DATA_BASE_URL`
    /// override the stored values when set and non-empty.
    fn apply_env(&mut self) {
        if let Ok(key) = env::var("OPENWEATHER_API_KEY") {
            if !key.is_empty() {
                self.api_key = Some(key);
            }
        }
        if let Ok(url) = env::var("CUACA_GEO_BASE_URL") {
            if !url.is_empty() {
                self.geo_base_url = url;
            }
        }
        if let Ok(url) = env::var("CUACA_DATA_BASE_URL") {
            if !url.is_empty() {
                self.data_base_url = url;
            }
        }
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "cuaca", "cuaca")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Set/replace the stored API key.
    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }
}
