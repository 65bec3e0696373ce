use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

use crate::error::{AssistantError, Result};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_API_VERSION: &str = "v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Main configuration structure for the health assistant
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub gemini: GeminiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Absent means the assistant runs in its "configuration missing" mode.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            api_version: default_api_version(),
            model: default_model(),
        }
    }
}

impl GeminiConfig {
    fn base(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.api_version.trim_matches('/')
        )
    }

    /// `<base>/<version>/models/<model>:generateContent?key=<key>`
    pub fn generate_url(&self, api_key: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base(),
            self.model,
            api_key
        )
    }

    /// `<base>/<version>/models?key=<key>`
    pub fn models_url(&self, api_key: &str) -> String {
        format!("{}/models?key={}", self.base(), api_key)
    }

    /// First ten characters of the key, for log lines.
    pub fn masked_key(&self) -> String {
        match &self.api_key {
            Some(key) => format!("{}...", key.chars().take(10).collect::<String>()),
            None => "NOT FOUND".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment variable overrides
    /// ALWAYS returns a valid config - never fails
    pub fn load() -> Self {
        let env_paths = ["../.env", ".env"];

        let mut env_loaded = false;
        for path in &env_paths {
            if dotenvy::from_path(path).is_ok() {
                tracing::info!("Loaded .env from: {}", path);
                env_loaded = true;
                break;
            }
        }

        if !env_loaded {
            tracing::debug!("No .env file found - continuing with env vars only");
        }

        let config_path = env::var("HEALTHMONITOR_CONFIG_PATH")
            .unwrap_or_else(|_| "healthmonitor.yaml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            match Self::from_file(&config_path) {
                Ok(config) => {
                    tracing::info!("Loaded configuration from {}", config_path);
                    config
                }
                Err(e) => {
                    tracing::error!("{} - using defaults", e);
                    Self::default()
                }
            }
        } else {
            tracing::debug!("Config file not found at {} - using defaults", config_path);
            Self::default()
        };

        config.apply_env_overrides();

        if let Err(e) = config.validate() {
            tracing::warn!("Config validation warnings: {} - continuing anyway", e);
        }

        config
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| AssistantError::Config(format!("Failed to read {path}: {e}")))?;
        Self::from_yaml(&contents)
            .map_err(|e| AssistantError::Config(format!("Failed to parse {path}: {e}")))
    }

    pub fn from_yaml(contents: &str) -> std::result::Result<Self, serde_yaml::Error> {
        let mut config: Config = serde_yaml::from_str(contents)?;
        config.gemini.api_key = normalize_key(config.gemini.api_key.take());
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| env::var(name).ok());
    }

    /// Overrides from any variable source; split out so tests don't touch the
    /// process environment.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // GEMINI_API_KEY wins over the legacy frontend variable name
        let key = ["GEMINI_API_KEY", "VITE_GEMINI_API_KEY"]
            .iter()
            .find_map(|name| normalize_key(lookup(name)));
        if key.is_some() {
            self.gemini.api_key = key;
        }

        if let Some(base_url) = lookup("GEMINI_BASE_URL") {
            self.gemini.base_url = base_url;
        }
        if let Some(version) = lookup("GEMINI_API_VERSION") {
            self.gemini.api_version = version;
        }
        if let Some(model) = lookup("GEMINI_MODEL") {
            self.gemini.model = model;
        }
    }

    /// Validate configuration
    fn validate(&self) -> std::result::Result<(), String> {
        if self.gemini.api_key.is_none() {
            return Err("GEMINI_API_KEY environment variable must be set".into());
        }
        if !self.gemini.base_url.starts_with("http://")
            && !self.gemini.base_url.starts_with("https://")
        {
            return Err(format!(
                "gemini.base_url must be an http(s) URL, got '{}'",
                self.gemini.base_url
            ));
        }
        if self.gemini.model.trim().is_empty() {
            return Err("gemini.model cannot be empty".into());
        }
        Ok(())
    }
}

fn normalize_key(key: Option<String>) -> Option<String> {
    key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty())
}
