//! Nebula - Sinks
//!
//! Persistence sinks for the Nebula worker. One sink exists today: the JSON
//! disk sink, which appends each message's payload as one line of JSON to a
//! file chosen by the message's selector.
//!
//! # Architecture
//!
//! ```text
//! [Delivery] --Message--> [JsonDiskSink::persist] --> <base>/<selector>_messages.json
//! ```
//!
//! Each `persist` call resolves the output path, encodes the payload, and
//! appends one line with an open-append-close cycle. No file handles are
//! held between calls and no written line is ever rewritten.
//!
//! # Example
//!
//! ```no_run
//! use nebula_message::{Message, Payload, Value};
//! use nebula_sink::{JsonDiskConfig, JsonDiskSink};
//!
//! let config = JsonDiskConfig::default().with_run_id("43");
//! let sink = JsonDiskSink::new(config)?;
//!
//! let mut payload = Payload::new();
//! payload.insert("url".into(), Value::from("https://ostorlab.co"));
//! sink.persist(&Message::new("v3.asset.link", payload))?;
//! # Ok::<(), nebula_sink::SinkError>(())
//! ```

/// Payload encoding (payload map to one JSON line)
pub mod encode;

/// Output routing (selector to file path, base directory management)
pub mod route;

/// JSON disk sink - append-only line-delimited JSON storage
pub mod json_disk;

/// Common types shared by sink code (errors, metrics)
mod common;

pub use common::{MetricsSnapshot, SinkError, SinkMetrics};
pub use json_disk::{JsonDiskConfig, JsonDiskSink, SUPPORTED_FILE_TYPES};
pub use route::{Addressing, OutputRouter};
