use std::{env, path::PathBuf};

use dirs_next::config_dir;
use serde::{Deserialize, Serialize};
use stepform_util::expand_tilde;
use tracing::warn;

/// Environment variable allowing callers to override the config file path.
pub const CONFIG_PATH_ENV: &str = "STEPFORM_CONFIG_PATH";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Location of the cache manifest (`~` is expanded).
    #[serde(default)]
    pub cache_path: Option<String>,
    /// Whether editors start out readonly.
    #[serde(default)]
    pub readonly: bool,
}

impl RegistryConfig {
    /// Loads the config file, falling back to defaults when it is missing or
    /// cannot be parsed.
    pub fn load() -> Self {
        let path = default_config_path();
        let Ok(content) = std::fs::read_to_string(&path) else {
            return RegistryConfig::default();
        };
        match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(error) => {
                warn!(path = %path.display(), error = %error, "Failed to parse registry config; using defaults");
                RegistryConfig::default()
            }
        }
    }

    /// The cache manifest path with `~` expanded.
    pub fn resolved_cache_path(&self) -> Option<PathBuf> {
        self.cache_path
            .as_deref()
            .filter(|path| !path.trim().is_empty())
            .map(expand_tilde)
    }
}

/// Get the default path for the registry configuration file.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stepform")
        .join("config.json")
}
