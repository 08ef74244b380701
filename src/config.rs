// src/config.rs
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const SETTINGS_FILE: &str = "settings.json";
pub const SETTINGS_ENV: &str = "LED_PANEL_SETTINGS";
pub const API_BASE_ENV: &str = "LED_PANEL_API_BASE";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Settings {
    /// Backend root, e.g. `http://127.0.0.1:5000`.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Quiet period before input changes are saved.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default)]
    pub debug_logging: bool,
}

fn default_api_base() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_debounce_ms() -> u64 {
    180
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            debounce_ms: default_debounce_ms(),
            debug_logging: false,
        }
    }
}

impl Settings {
    /// A missing or empty file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Apply `LED_PANEL_API_BASE` when set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(base) = std::env::var(API_BASE_ENV) {
            if !base.trim().is_empty() {
                self.api_base = base.trim().to_string();
            }
        }
        self
    }

    pub fn api_base(&self) -> &str {
        self.api_base.trim_end_matches('/')
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

pub fn settings_path() -> String {
    std::env::var(SETTINGS_ENV).unwrap_or_else(|_| SETTINGS_FILE.to_string())
}
