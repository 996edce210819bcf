//! Delivery mechanisms
//!
//! The transport seam: the platform that schedules this worker delivers
//! messages one at a time, and everything upstream of `Delivery::recv` is
//! its concern (bus protocol, redelivery policy, lifecycle). Two
//! implementations live here:
//!
//! - `ChannelDelivery` - an in-process `tokio::sync::mpsc` adapter, used by
//!   tests and by embedders that already have messages in hand
//! - `StdinDelivery` - JSON-lines on standard input, what the standalone
//!   binary runs against

use std::collections::BTreeMap;

use async_trait::async_trait;
use nebula_message::{Message, Payload, Value};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc;

/// A source of messages for the agent
///
/// `recv` returns `None` when the transport has closed and no further
/// messages will arrive; the agent's run loop exits then.
#[async_trait]
pub trait Delivery: Send {
    /// Receive the next message, or `None` on end of input
    async fn recv(&mut self) -> Option<Message>;
}

/// In-process channel delivery
pub struct ChannelDelivery {
    receiver: mpsc::Receiver<Message>,
}

impl ChannelDelivery {
    /// Wrap an existing receiver
    pub fn new(receiver: mpsc::Receiver<Message>) -> Self {
        Self { receiver }
    }

    /// Create a bounded channel and its delivery end
    pub fn channel(capacity: usize) -> (mpsc::Sender<Message>, Self) {
        let (sender, receiver) = mpsc::channel(capacity);
        (sender, Self::new(receiver))
    }
}

#[async_trait]
impl Delivery for ChannelDelivery {
    async fn recv(&mut self) -> Option<Message> {
        self.receiver.recv().await
    }
}

/// JSON-lines delivery from standard input
///
/// Each input line is one message:
/// `{"selector": "v3.asset.link", "data": {"url": "..."}}`.
/// Blank lines are ignored; undecodable lines are logged and skipped so
/// one bad line cannot stop the worker.
pub struct StdinDelivery {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinDelivery {
    /// Create a delivery reading from this process's stdin
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdinDelivery {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Delivery for StdinDelivery {
    async fn recv(&mut self) -> Option<Message> {
        loop {
            match self.lines.next_line().await {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match parse_message(line) {
                        Ok(message) => return Some(message),
                        Err(error) => {
                            tracing::warn!(%error, "skipping undecodable input line");
                        }
                    }
                }
                Ok(None) => return None,
                Err(error) => {
                    tracing::error!(%error, "stdin read failed, stopping delivery");
                    return None;
                }
            }
        }
    }
}

/// Parse one JSON input line into a message
///
/// The line must be an object with a string `selector`; `data` is optional
/// and must be an object when present.
pub fn parse_message(line: &str) -> anyhow::Result<Message> {
    let value: serde_json::Value = serde_json::from_str(line)?;

    let Some(selector) = value.get("selector").and_then(serde_json::Value::as_str) else {
        anyhow::bail!("input line has no string 'selector' field");
    };

    match value.get("data") {
        None | Some(serde_json::Value::Null) => Ok(Message::without_data(selector)),
        Some(serde_json::Value::Object(object)) => {
            let mut payload = Payload::new();
            for (key, value) in object {
                payload.insert(key.clone(), json_to_value(value));
            }
            Ok(Message::new(selector, payload))
        }
        Some(other) => anyhow::bail!(
            "input line 'data' field must be an object, got {}",
            json_type_name(other)
        ),
    }
}

/// Convert a JSON value into a payload value
///
/// JSON carries no raw bytes, so nothing maps to `Value::Bytes` here;
/// binary payloads only arrive through in-process delivery.
fn json_to_value(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::MAX)),
        },
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(values) => {
            Value::Array(values.iter().map(json_to_value).collect())
        }
        serde_json::Value::Object(object) => {
            let mut map = BTreeMap::new();
            for (key, value) in object {
                map.insert(key.clone(), json_to_value(value));
            }
            Value::Map(map)
        }
    }
}

/// Name a JSON value's type for error messages
fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
