//! Common types for sinks
//!
//! Error taxonomy and per-sink counters.

use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

/// Sink errors
///
/// `Config` is fatal and only produced at construction time; a sink that
/// failed construction never becomes usable. `Serialization` and the IO
/// variants are per-message: they surface to the caller and leave the sink
/// usable for subsequent messages.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Sink configuration is invalid (unsupported file type, unusable
    /// output directory). Raised at construction, never deferred.
    #[error("configuration error: {0}")]
    Config(String),

    /// Payload contains a value that cannot be represented in JSON
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Base directory creation failed
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Directory that could not be created
        path: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// File append failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SinkError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a serialization error
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Create a directory creation error
    pub fn create_dir(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::CreateDir {
            path: path.into(),
            source,
        }
    }
}

/// Counters for one sink instance
#[derive(Debug, Default)]
pub struct SinkMetrics {
    /// Total messages received by `persist`
    messages_received: AtomicU64,

    /// Total messages written to disk
    messages_written: AtomicU64,

    /// Total bytes written (lines including newline terminators)
    bytes_written: AtomicU64,

    /// Messages skipped because they carried no payload
    empty_payloads: AtomicU64,

    /// Encode or write failures
    write_errors: AtomicU64,
}

impl SinkMetrics {
    /// Create new metrics instance
    pub const fn new() -> Self {
        Self {
            messages_received: AtomicU64::new(0),
            messages_written: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
            empty_payloads: AtomicU64::new(0),
            write_errors: AtomicU64::new(0),
        }
    }

    /// Record a message received
    #[inline]
    pub fn record_received(&self) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a message written to disk
    #[inline]
    pub fn record_written(&self, bytes: u64) {
        self.messages_written.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Record a message skipped for lack of a payload
    #[inline]
    pub fn record_empty_payload(&self) {
        self.empty_payloads.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an encode or write failure
    #[inline]
    pub fn record_error(&self) {
        self.write_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            messages_received: self.messages_received.load(Ordering::Relaxed),
            messages_written: self.messages_written.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            empty_payloads: self.empty_payloads.load(Ordering::Relaxed),
            write_errors: self.write_errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of sink counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub messages_received: u64,
    pub messages_written: u64,
    pub bytes_written: u64,
    pub empty_payloads: u64,
    pub write_errors: u64,
}

#[cfg(test)]
#[path = "common_test.rs"]
mod common_test;
