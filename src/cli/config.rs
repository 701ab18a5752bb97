//! Configuration file
//!
//! ```json
//! { "schema_dir": "./schemas", "max_depth": 64, "log_level": "info" }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::deserialize::{Deserializer, DEFAULT_MAX_DEPTH};
use crate::observability::Severity;

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding `*.json` type definitions (required)
    pub schema_dir: String,

    /// Nested record depth limit (optional, default 64)
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Minimum log severity (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> CliResult<()> {
        if self.schema_dir.trim().is_empty() {
            return Err(CliError::config_error("schema_dir must not be empty"));
        }

        if self.max_depth == 0 {
            return Err(CliError::config_error("max_depth must be > 0"));
        }

        self.log_severity()?;

        Ok(())
    }

    /// Get schema directory as Path
    pub fn schema_path(&self) -> &Path {
        Path::new(&self.schema_dir)
    }

    /// Parsed `log_level`
    pub fn log_severity(&self) -> CliResult<Severity> {
        self.log_level
            .parse::<Severity>()
            .map_err(|e: String| CliError::config_error(format!("Invalid log_level: {}", e)))
    }

    /// Deserializer carrying the configured limits
    pub fn deserializer(&self) -> Deserializer {
        Deserializer::new().with_max_depth(self.max_depth)
    }
}
