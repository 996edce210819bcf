//! Configuration validation
//!
//! Validates config consistency at load time so the worker refuses to
//! start on a bad configuration instead of failing on the first message:
//! - Output file type is in the supported set
//! - An output location source (`run_id` or `directory`) is configured
//! - An explicit directory name is a single, usable path component

use crate::agent::SUPPORTED_FILE_TYPES;
use crate::error::{ConfigError, Result};
use crate::Config;

/// Validate the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_file_type(config)?;
    validate_output_location(config)?;
    Ok(())
}

/// Validate the output file type
fn validate_file_type(config: &Config) -> Result<()> {
    let file_type = config.agent.file_type.to_ascii_lowercase();
    if !SUPPORTED_FILE_TYPES.contains(&file_type.as_str()) {
        return Err(ConfigError::unsupported_file_type(
            &config.agent.file_type,
            SUPPORTED_FILE_TYPES,
        ));
    }
    Ok(())
}

/// Validate that an output location can be derived
fn validate_output_location(config: &Config) -> Result<()> {
    if let Some(ref name) = config.agent.directory {
        validate_directory_name(name)?;
        return Ok(());
    }

    if config.agent.run_id.is_none() {
        return Err(ConfigError::missing_field("run_id"));
    }

    Ok(())
}

/// Validate an explicit directory name
///
/// The name must be a single path component: no separators, no parent
/// references, not empty after trimming. The sink re-derives the base name
/// on its side; this check makes a bad name fail at startup.
fn validate_directory_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::invalid_directory(name, "name is empty"));
    }
    if trimmed == "." || trimmed == ".." {
        return Err(ConfigError::invalid_directory(
            name,
            "name must not reference the current or parent directory",
        ));
    }
    if trimmed.contains('/') || trimmed.contains('\\') {
        return Err(ConfigError::invalid_directory(
            name,
            "path separators are not allowed",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_valid_config_with_run_id() {
        let config = Config::from_str("[agent]\nrun_id = \"43\"").unwrap();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_valid_config_with_directory() {
        let config = Config::from_str("[agent]\ndirectory = \"results\"").unwrap();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_unsupported_file_type_rejected() {
        let result = Config::from_str("[agent]\nfile_type = \"txt\"\nrun_id = \"43\"");
        assert!(matches!(
            result,
            Err(ConfigError::UnsupportedFileType { .. })
        ));
    }

    #[test]
    fn test_file_type_check_is_case_insensitive() {
        let config = Config::from_str("[agent]\nfile_type = \"JSON\"\nrun_id = \"43\"").unwrap();
        assert_eq!(config.agent.file_type, "JSON");
    }

    #[test]
    fn test_missing_output_location_rejected() {
        let result = Config::from_str("[agent]\nfile_type = \"json\"");
        assert!(matches!(result, Err(ConfigError::MissingField { .. })));
    }

    #[test]
    fn test_directory_with_separators_rejected() {
        for name in ["../etc", "a/b", "a\\b", "/absolute"] {
            let toml = format!("[agent]\ndirectory = \"{}\"", name.replace('\\', "\\\\"));
            let result = Config::from_str(&toml);
            assert!(
                matches!(result, Err(ConfigError::InvalidDirectory { .. })),
                "expected '{}' to be rejected",
                name
            );
        }
    }

    #[test]
    fn test_empty_directory_rejected() {
        for name in ["", "   ", ".", ".."] {
            let toml = format!("[agent]\ndirectory = \"{}\"", name);
            let result = Config::from_str(&toml);
            assert!(
                matches!(result, Err(ConfigError::InvalidDirectory { .. })),
                "expected '{}' to be rejected",
                name
            );
        }
    }
}
