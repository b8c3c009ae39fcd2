//! Engine configuration
//!
//! Loaded from YAML at startup. Every field has a default so a partial file
//! (or none at all) still yields a working instance.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use f1cu_common::{Error, LogLevel};

/// Configuration for one F1AP CU-CP protocol instance.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct F1cuConfig {
    /// Maximum number of concurrently served UEs; also bounds the CU UE
    /// F1AP id pool.
    pub max_ues: usize,
    /// Capacity of the task message queue. Inbound PDUs submitted while the
    /// queue is full are dropped.
    pub channel_capacity: usize,
    /// Deadline for a procedure awaiting its peer response, in milliseconds.
    pub procedure_timeout_ms: u64,
    /// Human-readable CU name announced in F1 SETUP RESPONSE.
    pub gnb_cu_name: Option<String>,
    /// Log level for the subscriber installed by the application.
    pub log_level: String,
}

impl Default for F1cuConfig {
    fn default() -> Self {
        Self {
            max_ues: 1024,
            channel_capacity: crate::tasks::DEFAULT_CHANNEL_CAPACITY,
            procedure_timeout_ms: 5000,
            gnb_cu_name: Some("f1cu".to_string()),
            log_level: "info".to_string(),
        }
    }
}

impl F1cuConfig {
    /// Parses a configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, Error> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Loads a configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Procedure response deadline as a `Duration`.
    pub fn procedure_timeout(&self) -> Duration {
        Duration::from_millis(self.procedure_timeout_ms)
    }

    /// Parsed log level, falling back to Info on unknown strings.
    pub fn log_level(&self) -> LogLevel {
        self.log_level.parse().unwrap_or_default()
    }
}
