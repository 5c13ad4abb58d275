use serde::Deserialize;
use std::{error::Error, fs, path::Path};

#[derive(Debug, Deserialize, Clone)]
pub struct CommonConfig {
    pub project_name: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            project_name: "receipts".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub server_address: String,
    pub log_level: String,
    /// Expose the Prometheus exposition at `/metrics`
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

fn default_metrics_enabled() -> bool {
    true
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            server_address: "0.0.0.0:8080".to_string(),
            log_level: "info".to_string(),
            metrics_enabled: default_metrics_enabled(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub backend: BackendConfig,
}

impl Config {
    pub fn load(config_path: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let contents = fs::read_to_string(config_path)?;
        let config = serde_yml::from_str(&contents)?;

        Ok(config)
    }

    /// Loads the config file if it exists, otherwise falls back to defaults.
    pub fn load_or_default(config_path: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        if Path::new(config_path).exists() {
            Self::load(config_path)
        } else {
            tracing::warn!("Config file {} not found, using defaults", config_path);
            Ok(Self::default())
        }
    }
}
