//! Configuration management for the Trade Analytics dataset server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with TAD_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::MatchConfig;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Source dataset configuration
    pub dataset: DatasetConfig,

    /// Match engine tunables
    pub matching: MatchConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatasetConfig {
    /// Path to the trade CSV file
    pub path: String,

    /// Field delimiter; only the first byte is used
    pub delimiter: String,
}

impl DatasetConfig {
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter.bytes().next().unwrap_or(b',')
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("TAD_ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let matching = MatchConfig::default();

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("dataset.path", "data/trade_data.csv")?
            .set_default("dataset.delimiter", ",")?
            .set_default("matching.revenue_tolerance", matching.revenue_tolerance)?
            .set_default("matching.volume_tolerance", matching.volume_tolerance)?
            .set_default("matching.top_k", matching.top_k as u64)?
            .set_default("matching.literal_scale_vocabulary", matching.literal_scale_vocabulary)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (TAD_ prefix)
            .add_source(
                Environment::with_prefix("TAD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            dataset: DatasetConfig::default(),
            matching: MatchConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: "data/trade_data.csv".to_string(),
            delimiter: ",".to_string(),
        }
    }
}
