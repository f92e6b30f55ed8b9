//! Configuration for chitieud.
//!
//! Loads settings from /etc/chitieu/config.toml or uses defaults. A missing
//! file is normal; a broken file logs a warning and falls back to defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Config file path
pub const CONFIG_PATH: &str = "/etc/chitieu/config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Base URL of the OpenAI-compatible oracle endpoint.
    #[serde(default = "default_oracle_url")]
    pub oracle_url: String,

    /// Model used for intent classification and extraction.
    #[serde(default = "default_model")]
    pub model: String,

    /// Bearer token for hosted endpoints. Local servers need none.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Bound on the single oracle round trip. A timeout is treated the same
    /// as a parse failure downstream.
    #[serde(default = "default_oracle_timeout")]
    pub oracle_timeout_secs: u64,

    /// SQLite database path.
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

fn default_oracle_url() -> String {
    // Ollama's OpenAI compatibility endpoint.
    "http://127.0.0.1:11434".to_string()
}

fn default_model() -> String {
    "qwen2.5:3b-instruct".to_string()
}

fn default_oracle_timeout() -> u64 {
    10
}

fn default_db_path() -> String {
    "expenses.db".to_string()
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            oracle_url: default_oracle_url(),
            model: default_model(),
            api_key: None,
            oracle_timeout_secs: default_oracle_timeout(),
            db_path: default_db_path(),
        }
    }
}

impl BotConfig {
    pub fn load() -> Self {
        Self::load_from(CONFIG_PATH)
    }

    pub fn load_from(path: &str) -> Self {
        if !Path::new(path).exists() {
            info!("no config at {}, using defaults", path);
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    info!("loaded config from {}", path);
                    config
                }
                Err(e) => {
                    warn!("config parse error in {}: {}, using defaults", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("cannot read {}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }
}
