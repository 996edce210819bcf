//! Agent configuration
//!
//! Controls what the worker persists and where. Exactly one of `run_id`
//! and `directory` is required; `directory` wins when both are set.

use std::path::PathBuf;

use serde::Deserialize;

/// File types the sink knows how to write
pub const SUPPORTED_FILE_TYPES: &[&str] = &["json"];

/// Output addressing mode
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// One file per selector: `<base>/<selector>_messages.json` (default)
    #[default]
    PerSelector,
    /// One timestamped file shared by all selectors
    PerRun,
}

/// Agent configuration
///
/// # Example
///
/// ```toml
/// [agent]
/// file_type = "json"
/// output_root = "/output"
/// run_id = "43"
/// mode = "per_selector"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Output file type; only "json" is supported
    /// Default: json
    pub file_type: String,

    /// Root directory under which per-run base directories live
    /// Default: /output
    pub output_root: PathBuf,

    /// Run identifier; derives the base directory `scan_<run_id>_messages`
    pub run_id: Option<String>,

    /// Explicit base directory name (single path component, no separators).
    /// Takes precedence over `run_id`.
    pub directory: Option<String>,

    /// Output addressing mode (per_selector, per_run)
    /// Default: per_selector
    pub mode: OutputMode,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            file_type: "json".to_string(),
            output_root: PathBuf::from("/output"),
            run_id: None,
            directory: None,
            mode: OutputMode::PerSelector,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AgentConfig::default();
        assert_eq!(config.file_type, "json");
        assert_eq!(config.output_root, PathBuf::from("/output"));
        assert!(config.run_id.is_none());
        assert!(config.directory.is_none());
        assert_eq!(config.mode, OutputMode::PerSelector);
    }

    #[test]
    fn test_deserialize_empty() {
        let config: AgentConfig = toml::from_str("").unwrap();
        assert_eq!(config.file_type, "json");
        assert_eq!(config.mode, OutputMode::PerSelector);
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
file_type = "json"
output_root = "/var/lib/nebula"
run_id = "43"
directory = "results"
mode = "per_run"
"#;
        let config: AgentConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.output_root, PathBuf::from("/var/lib/nebula"));
        assert_eq!(config.run_id.as_deref(), Some("43"));
        assert_eq!(config.directory.as_deref(), Some("results"));
        assert_eq!(config.mode, OutputMode::PerRun);
    }

    #[test]
    fn test_deserialize_modes() {
        for (s, expected) in [
            ("per_selector", OutputMode::PerSelector),
            ("per_run", OutputMode::PerRun),
        ] {
            let toml = format!("mode = \"{}\"", s);
            let config: AgentConfig = toml::from_str(&toml).unwrap();
            assert_eq!(config.mode, expected);
        }
    }
}
