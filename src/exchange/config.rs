use crate::error::{BuilderError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

/// Configuration for the builder, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuilderConfig {
    /// Query parameter that carries the open overlay
    #[serde(default = "default_modal_param")]
    pub modal_param: String,

    /// Overlay key of the university search dialog
    #[serde(default = "default_search_key")]
    pub search_key: String,

    /// Overlay key of the submit confirmation
    #[serde(default = "default_confirm_key")]
    pub confirm_key: String,

    /// Path of the application edit page
    #[serde(default = "default_base_path")]
    pub base_path: String,
}

fn default_modal_param() -> String {
    "modal".to_string()
}

fn default_search_key() -> String {
    "search".to_string()
}

fn default_confirm_key() -> String {
    "confirm".to_string()
}

fn default_base_path() -> String {
    "/application/edit".to_string()
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            modal_param: default_modal_param(),
            search_key: default_search_key(),
            confirm_key: default_confirm_key(),
            base_path: default_base_path(),
        }
    }
}

impl BuilderConfig {
    pub const KEYS: [&'static str; 4] = ["modal-param", "search-key", "confirm-key", "base-path"];

    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(BuilderError::Io)?;
        let config: BuilderConfig =
            serde_json::from_str(&content).map_err(BuilderError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(BuilderError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(BuilderError::Serialization)?;
        fs::write(config_path, content).map_err(BuilderError::Io)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "modal-param" => Some(self.modal_param.clone()),
            "search-key" => Some(self.search_key.clone()),
            "confirm-key" => Some(self.confirm_key.clone()),
            "base-path" => Some(self.base_path.clone()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        let value = value.trim();
        if value.is_empty() {
            return Err(format!("Value for {} cannot be empty", key));
        }
        let clash = match key {
            "search-key" => value == self.confirm_key,
            "confirm-key" => value == self.search_key,
            _ => false,
        };
        if clash {
            return Err("search-key and confirm-key must differ".to_string());
        }

        match key {
            "modal-param" => self.modal_param = value.to_string(),
            "search-key" => self.search_key = value.to_string(),
            "confirm-key" => self.confirm_key = value.to_string(),
            "base-path" => {
                if value.starts_with('/') {
                    self.base_path = value.to_string();
                } else {
                    self.base_path = format!("/{}", value);
                }
            }
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }
}
