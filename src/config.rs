//! Tool configuration with persistence.
//!
//! Configuration is saved to `~/.config/modelyard/config.toml`.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Persistent settings for the modelyard tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YardConfig {
    /// Folder scanned for models when none is given explicitly.
    pub models_folder: PathBuf,
}

impl Default for YardConfig {
    fn default() -> Self {
        Self {
            models_folder: PathBuf::from("models"),
        }
    }
}

impl YardConfig {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("modelyard"))
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.toml"))
    }

    /// Load the configuration from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            info!("No config file found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Failed to parse config: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read config file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save the configuration to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(dir) = Self::config_dir() else {
            anyhow::bail!("Could not determine config directory");
        };

        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(dir.join("config.toml"), content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_a_local_models_folder() {
        assert_eq!(YardConfig::default().models_folder, PathBuf::from("models"));
    }

    #[test]
    fn parses_a_plain_toml_file() {
        let config: YardConfig = toml::from_str("models_folder = \"/srv/models\"").unwrap();
        assert_eq!(config.models_folder, PathBuf::from("/srv/models"));
    }

    #[test]
    fn round_trips_through_toml() {
        let config = YardConfig {
            models_folder: PathBuf::from("/srv/models"),
        };
        let serialized = toml::to_string_pretty(&config).unwrap();
        let reparsed: YardConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(reparsed.models_folder, config.models_folder);
    }
}
