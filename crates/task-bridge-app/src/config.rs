use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;
use task_bridge_google::GoogleSettings;

const CONFIG_DIR: &str = "task-bridge";
const CONFIG_FILE: &str = "config.toml";

/// Environment variables that override values from the config file.
pub const ENV_CLIENT_ID: &str = "GOOGLE_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "GOOGLE_CLIENT_SECRET";
pub const ENV_REFRESH_TOKEN: &str = "GOOGLE_REFRESH_TOKEN";
pub const ENV_API_URL: &str = "GOOGLE_TASKS_API_URL";

/// Top-level configuration loaded from `<config dir>/task-bridge/config.toml`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub google: GoogleSettings,
}

impl AppConfig {
    /// Location of the per-user config file, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load configuration from `path` (or the default location) and apply
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a file. A missing file yields defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Overlay non-empty values returned by `lookup` onto the Google settings.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let google = &mut self.google;
        if let Some(value) = read(ENV_CLIENT_ID) {
            google.client_id = Some(value);
        }
        if let Some(value) = read(ENV_CLIENT_SECRET) {
            google.client_secret = Some(value);
        }
        if let Some(value) = read(ENV_REFRESH_TOKEN) {
            google.refresh_token = Some(value);
        }
        if let Some(value) = read(ENV_API_URL) {
            google.api_url = Some(value);
        }
    }
}
