//! Output routing
//!
//! Maps a message selector plus process-level configuration to a concrete
//! file path. The base directory is resolved once, at sink construction,
//! and reused for the life of the process.
//!
//! # Addressing modes
//!
//! - **PerSelector** (default): `<base>/<selector>_messages.json`. Messages
//!   sharing a selector accumulate in one file; distinct selectors get
//!   separate files.
//! - **PerRun**: a single `<base>/messages_<start-timestamp>.json` shared by
//!   all selectors, the timestamp fixed when the router is built.
//!
//! # Base directory
//!
//! Resolved from configuration, one of:
//! - an explicit directory name, sanitized to a single path component so a
//!   configured name can never escape the output root;
//! - a run identifier, which derives `scan_<run_id>_messages`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use nebula_message::Selector;

use crate::common::SinkError;
use crate::json_disk::JsonDiskConfig;

/// Output addressing mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Addressing {
    /// One file per selector (default)
    #[default]
    PerSelector,
    /// One timestamped file shared by all selectors
    PerRun,
}

/// Resolves output file paths for the JSON disk sink
///
/// Construction resolves the base directory and, in per-run mode, fixes the
/// shared file name. `path_for` is then a cheap join with no IO.
#[derive(Debug, Clone)]
pub struct OutputRouter {
    /// Base directory all output files live under
    base_dir: PathBuf,

    /// Addressing mode chosen at startup
    addressing: Addressing,

    /// Shared file name for per-run addressing, fixed at construction
    run_file_name: Option<String>,
}

impl OutputRouter {
    /// Build a router from sink configuration
    ///
    /// Does not touch the filesystem; call `ensure_base_dir` before the
    /// first write.
    ///
    /// # Errors
    ///
    /// Returns `SinkError::Config` if the configuration names no output
    /// location, or if an explicit directory name is empty after
    /// sanitization.
    pub fn new(config: &JsonDiskConfig) -> Result<Self, SinkError> {
        let base_dir = resolve_base_dir(config)?;

        let run_file_name = match config.addressing {
            Addressing::PerSelector => None,
            Addressing::PerRun => Some(format!(
                "messages_{}.json",
                Utc::now().format("%Y%m%dT%H%M%S")
            )),
        };

        Ok(Self {
            base_dir,
            addressing: config.addressing,
            run_file_name,
        })
    }

    /// Create the base directory, recursively and idempotently
    ///
    /// Succeeds if the directory already exists.
    pub fn ensure_base_dir(&self) -> Result<(), SinkError> {
        fs::create_dir_all(&self.base_dir)
            .map_err(|e| SinkError::create_dir(self.base_dir.display().to_string(), e))
    }

    /// Resolve the output file path for a selector
    #[inline]
    pub fn path_for(&self, selector: &Selector) -> PathBuf {
        match self.addressing {
            Addressing::PerSelector => self
                .base_dir
                .join(format!("{}_messages.json", selector.as_str())),
            // run_file_name is always set in per-run mode
            Addressing::PerRun => self
                .base_dir
                .join(self.run_file_name.as_deref().unwrap_or("messages.json")),
        }
    }

    /// The base directory all output files live under
    #[inline]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

/// Resolve the base directory from configuration
///
/// An explicit directory name wins over a run identifier.
fn resolve_base_dir(config: &JsonDiskConfig) -> Result<PathBuf, SinkError> {
    if let Some(ref name) = config.directory {
        let sanitized = sanitize_dir_name(name).ok_or_else(|| {
            SinkError::config(format!(
                "output directory name '{name}' is empty after sanitization"
            ))
        })?;
        return Ok(config.output_root.join(sanitized));
    }

    if let Some(ref run_id) = config.run_id {
        return Ok(config.output_root.join(format!("scan_{run_id}_messages")));
    }

    Err(SinkError::config(
        "no output location configured: set a directory name or a run id",
    ))
}

/// Reduce a configured directory name to a usable base name
///
/// Strips any leading path components so the result is a single component
/// under the output root. Returns `None` for names with no usable base name
/// (empty, `.`, `..`, separators only).
fn sanitize_dir_name(name: &str) -> Option<String> {
    let base = Path::new(name.trim()).file_name()?.to_str()?;
    if base.is_empty() || base == "." || base == ".." {
        return None;
    }
    Some(base.to_string())
}

#[cfg(test)]
#[path = "route_test.rs"]
mod route_test;
