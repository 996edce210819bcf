//! Nebula Configuration
//!
//! TOML-based configuration loading with sensible defaults. A minimal
//! config only has to say where output goes - everything else defaults.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use nebula_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[agent]\nrun_id = \"43\"").unwrap();
//! assert_eq!(config.agent.run_id.as_deref(), Some("43"));
//! ```
//!
//! # Example Minimal Config
//!
//! ```toml
//! [agent]
//! run_id = "43"
//! ```
//!
//! # Example Full Config
//!
//! ```toml
//! [agent]
//! file_type = "json"
//! output_root = "/output"
//! run_id = "43"
//! mode = "per_selector"
//!
//! [log]
//! level = "info"
//! format = "console"
//! ```

mod agent;
mod error;
mod logging;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use agent::{AgentConfig, OutputMode, SUPPORTED_FILE_TYPES};
pub use error::{ConfigError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel};

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional; validation requires only that an output
/// location (`agent.run_id` or `agent.directory`) is configured.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Agent settings (file type, output location, addressing mode)
    pub agent: AgentConfig,

    /// Logging configuration
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, contains invalid TOML,
    /// or fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    ///
    /// Prefer using the `FromStr` trait implementation.
    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// Checks for:
    /// - Supported output file type
    /// - A usable output location source
    fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::str::FromStr;

    #[test]
    fn test_minimal_config() {
        let config = Config::from_str("[agent]\nrun_id = \"43\"").unwrap();
        assert_eq!(config.agent.file_type, "json");
        assert_eq!(config.agent.output_root, PathBuf::from("/output"));
        assert_eq!(config.agent.run_id.as_deref(), Some("43"));
        assert_eq!(config.log.level, LogLevel::Info);
    }

    #[test]
    fn test_full_config_parse() {
        let toml = r#"
[agent]
file_type = "json"
output_root = "/var/lib/nebula"
directory = "results"
mode = "per_run"

[log]
level = "debug"
format = "json"
"#;
        let config = Config::from_str(toml).unwrap();

        assert_eq!(config.agent.output_root, PathBuf::from("/var/lib/nebula"));
        assert_eq!(config.agent.directory.as_deref(), Some("results"));
        assert_eq!(config.agent.mode, OutputMode::PerRun);
        assert_eq!(config.log.level, LogLevel::Debug);
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn test_empty_config_fails_validation() {
        // No run_id and no directory - nowhere to derive the output path from
        let result = Config::from_str("");
        assert!(matches!(result, Err(ConfigError::MissingField { .. })));
    }

    #[test]
    fn test_invalid_toml() {
        let result = Config::from_str("invalid { toml");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_from_file_missing() {
        let result = Config::from_file("/nonexistent/nebula.toml");
        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }
}
