//! JSON Disk Sink - Append-only line-delimited JSON storage
//!
//! Persists one message per call: the payload is encoded as a single JSON
//! line and appended to the file the router picks for the message's
//! selector. Files are plain UTF-8 text, newline-separated, no framing -
//! a consumer reads them as a JSON-lines stream.
//!
//! # Output Format
//!
//! One line per message, the canonical JSON encoding of its payload:
//! ```text
//! {"method":"GET","url":"https://ostorlab.co"}
//! {"method":"GET","url":"https://www.domain0.com"}
//! ```
//!
//! # Directory Structure
//!
//! ```text
//! /output/
//! └── scan_43_messages/
//!     ├── v3.asset.link_messages.json
//!     ├── v3.asset.ip_messages.json
//!     └── v3.report.vulnerability_messages.json
//! ```
//!
//! # Write Semantics
//!
//! Each write opens the file in append mode (creating it if absent), writes
//! the full line in one call, and drops the handle. Writes to the same path
//! are serialized through a per-path lock so concurrent in-process callers
//! never interleave partial lines. No retries; failures surface to the
//! caller and leave previously written lines intact.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use nebula_message::{Message, Payload, Selector};
use parking_lot::Mutex;

use crate::common::{SinkError, SinkMetrics};
use crate::encode;
use crate::route::{Addressing, OutputRouter};

/// File types the sink knows how to write
pub const SUPPORTED_FILE_TYPES: &[&str] = &["json"];

/// Configuration for the JSON disk sink
#[derive(Debug, Clone)]
pub struct JsonDiskConfig {
    /// Output file type; only "json" is supported (checked case-insensitively)
    pub file_type: String,

    /// Root directory under which the base directory lives
    pub output_root: PathBuf,

    /// Explicit base directory name; wins over `run_id` when both are set
    pub directory: Option<String>,

    /// Run identifier; derives the base directory `scan_<run_id>_messages`
    pub run_id: Option<String>,

    /// Output addressing mode
    pub addressing: Addressing,
}

impl Default for JsonDiskConfig {
    fn default() -> Self {
        Self {
            file_type: "json".to_string(),
            output_root: PathBuf::from("/output"),
            directory: None,
            run_id: None,
            addressing: Addressing::PerSelector,
        }
    }
}

impl JsonDiskConfig {
    /// Create config with a custom file type
    #[must_use]
    pub fn with_file_type(mut self, file_type: impl Into<String>) -> Self {
        self.file_type = file_type.into();
        self
    }

    /// Create config with a custom output root
    #[must_use]
    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    /// Create config with an explicit base directory name
    #[must_use]
    pub fn with_directory(mut self, name: impl Into<String>) -> Self {
        self.directory = Some(name.into());
        self
    }

    /// Create config with a run identifier
    #[must_use]
    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    /// Create config with per-run (single timestamped file) addressing
    #[must_use]
    pub fn with_per_run_addressing(mut self) -> Self {
        self.addressing = Addressing::PerRun;
        self
    }
}

/// JSON disk sink
///
/// Construction validates the configured file type and creates the base
/// directory; a sink that failed construction is never usable. After that,
/// `persist` is the single operation.
#[derive(Debug)]
pub struct JsonDiskSink {
    /// Path resolution, fixed at construction
    router: OutputRouter,

    /// Sink name for logging
    name: String,

    /// Counters for this sink
    metrics: SinkMetrics,

    /// Per-path write locks; one entry per output file, so cardinality is
    /// bounded by the number of distinct selectors seen
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl JsonDiskSink {
    /// Create a new JSON disk sink
    ///
    /// Validates the configured file type before touching the filesystem,
    /// then resolves the output location and creates the base directory.
    ///
    /// # Errors
    ///
    /// - `SinkError::Config` for an unsupported file type or an unusable
    ///   output location; no directory is created in that case.
    /// - `SinkError::CreateDir` if base directory creation fails for a
    ///   reason other than already existing.
    pub fn new(config: JsonDiskConfig) -> Result<Self, SinkError> {
        Self::with_name(config, "json_disk")
    }

    /// Create a new JSON disk sink with a custom name
    pub fn with_name(config: JsonDiskConfig, name: impl Into<String>) -> Result<Self, SinkError> {
        let name = name.into();

        let file_type = config.file_type.to_ascii_lowercase();
        if !SUPPORTED_FILE_TYPES.contains(&file_type.as_str()) {
            return Err(SinkError::config(format!(
                "file type '{}' is not supported, supported file types: {}",
                config.file_type,
                SUPPORTED_FILE_TYPES.join(", ")
            )));
        }

        let router = OutputRouter::new(&config)?;
        router.ensure_base_dir()?;

        tracing::info!(
            sink = %name,
            base_dir = %router.base_dir().display(),
            "json disk sink ready"
        );

        Ok(Self {
            router,
            name,
            metrics: SinkMetrics::new(),
            locks: Mutex::new(HashMap::new()),
        })
    }

    /// Get reference to metrics
    #[inline]
    pub fn metrics(&self) -> &SinkMetrics {
        &self.metrics
    }

    /// Get the sink name
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The base directory all output files live under
    #[inline]
    pub fn base_dir(&self) -> &Path {
        self.router.base_dir()
    }

    /// Persist one message
    ///
    /// Appends exactly one line for exactly one message. A message without
    /// a payload is skipped without error. Success has no return value;
    /// it is observable only through the filesystem.
    ///
    /// # Errors
    ///
    /// - `SinkError::Serialization` if the payload cannot be represented in
    ///   JSON; previously written lines are unaffected and the sink stays
    ///   usable.
    /// - `SinkError::Io` if the append fails.
    pub fn persist(&self, message: &Message) -> Result<(), SinkError> {
        self.metrics.record_received();

        let Some(payload) = message.data() else {
            tracing::debug!(
                sink = %self.name,
                selector = %message.selector(),
                "message has no payload, skipping"
            );
            self.metrics.record_empty_payload();
            return Ok(());
        };

        let result = self.write_payload(message.selector(), payload);
        if result.is_err() {
            self.metrics.record_error();
        }
        result
    }

    /// Encode the payload and append it to the selector's file
    fn write_payload(&self, selector: &Selector, payload: &Payload) -> Result<(), SinkError> {
        let path = self.router.path_for(selector);

        let mut line = encode::to_json_line(payload)?;
        line.push('\n');

        let lock = self.lock_for(&path);
        let _guard = lock.lock();

        let mut file = OpenOptions::new().append(true).create(true).open(&path)?;
        // Single write of the full line; the handle closes on drop, so the
        // bytes are with the OS before persist returns.
        file.write_all(line.as_bytes())?;

        self.metrics.record_written(line.len() as u64);
        tracing::debug!(
            sink = %self.name,
            selector = %selector,
            path = %path.display(),
            bytes = line.len(),
            "message persisted"
        );

        Ok(())
    }

    /// Get or create the write lock for a path
    fn lock_for(&self, path: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        match locks.get(path) {
            Some(lock) => Arc::clone(lock),
            None => {
                let lock = Arc::new(Mutex::new(()));
                locks.insert(path.to_path_buf(), Arc::clone(&lock));
                lock
            }
        }
    }
}

#[cfg(test)]
#[path = "json_disk_test.rs"]
mod json_disk_test;
