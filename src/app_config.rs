use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

/// Application configuration module
/// This module handles the core service configuration including loading,
/// validating and the documented defaults.
/// Represents the service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Result cache capacity in entries; 0 disables caching
    #[serde(default = "default_cache_size")]
    pub cache_size: usize,

    /// Seconds an engine may sit idle before it is evicted from the pool
    #[serde(default = "default_engine_idle_timeout_secs")]
    pub engine_idle_timeout_secs: u64,

    /// Bounded startup timeout for native engine initialization, in seconds
    #[serde(default = "default_engine_init_timeout_secs")]
    pub engine_init_timeout_secs: u64,

    /// Default minimum confidence for language detection results
    #[serde(default = "default_detection_confidence_threshold")]
    pub detection_confidence_threshold: f64,

    /// Maximum number of distinct languages a segmentation result may carry
    #[serde(default = "default_max_languages_per_text")]
    pub max_languages_per_text: usize,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

fn default_cache_size() -> usize {
    200
}

fn default_engine_idle_timeout_secs() -> u64 {
    60
}

fn default_engine_init_timeout_secs() -> u64 {
    30
}

fn default_detection_confidence_threshold() -> f64 {
    0.5
}

fn default_max_languages_per_text() -> usize {
    2
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .map_err(|e| anyhow!("Failed to open config file {}: {}", path.as_ref().display(), e))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .map_err(|e| anyhow!("Failed to parse config file: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.engine_init_timeout_secs == 0 {
            return Err(anyhow!("engine_init_timeout_secs must be greater than zero"));
        }

        if self.max_languages_per_text == 0 {
            return Err(anyhow!("max_languages_per_text must be greater than zero"));
        }

        if !(0.0..=1.0).contains(&self.detection_confidence_threshold) {
            return Err(anyhow!(
                "detection_confidence_threshold must be between 0.0 and 1.0, got {}",
                self.detection_confidence_threshold
            ));
        }

        Ok(())
    }

    /// Idle eviction delay as a Duration
    pub fn engine_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.engine_idle_timeout_secs)
    }

    /// Engine startup timeout as a Duration
    pub fn engine_init_timeout(&self) -> Duration {
        Duration::from_secs(self.engine_init_timeout_secs)
    }

    /// Whether the result cache is enabled at all
    pub fn cache_enabled(&self) -> bool {
        self.cache_size > 0
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            cache_size: default_cache_size(),
            engine_idle_timeout_secs: default_engine_idle_timeout_secs(),
            engine_init_timeout_secs: default_engine_init_timeout_secs(),
            detection_confidence_threshold: default_detection_confidence_threshold(),
            max_languages_per_text: default_max_languages_per_text(),
            log_level: LogLevel::default(),
        }
    }
}
